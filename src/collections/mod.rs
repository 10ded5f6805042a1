//! Collections built on raw row storage.
//!
//! Collections are organized by data structure type:
//! - `deque`: Double-ended queues over fixed-size rows

pub mod deque;

pub use deque::{CursorMut, CursorRef, RowDeque, RowStats};
