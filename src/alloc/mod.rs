//! Raw-slot allocation for deque rows.

pub mod allocator;
pub mod heap;

pub use allocator::{AllocError, RowAlloc};
pub use heap::Global;
