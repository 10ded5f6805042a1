//! Double-ended queues built on fixed-size rows.
//!
//! This module contains the row-table deque and its supporting pieces:
//! row storage, element lifecycle helpers, cursors and iterators.

#[cfg(feature = "proptest")]
mod arbitrary;
mod lifecycle;
mod storage;
mod traits;

pub mod cursor;
pub mod iter;
pub mod row_deque;

pub use cursor::{Access, Cursor, CursorMut, CursorRef, Exclusive, Shared};
pub use iter::{IntoIter, Iter, IterMut};
pub use row_deque::{RowDeque, RowStats};
