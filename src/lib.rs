//! # `rowdeque` - Row-Table Double-Ended Queue
//!
//! A double-ended, random-access sequence that grows at both ends in
//! amortized O(1) without moving the elements it already holds.
//!
//! ## Architecture
//!
//! Storage is two-level: a row table of pointers, and fixed-size rows of raw
//! element slots. Only the table is ever reallocated.
//!
//! ### Core Abstractions
//!
//! 1. **Row storage** (`RowAlloc`, `Global`):
//!    - Rows are allocated uninitialized through a pluggable allocator
//!    - Row buffers never move or resize once allocated
//!    - Allocation failures surface as `AllocError`
//!
//! 2. **Element lifecycle**:
//!    - Bulk construct, clone, relocate and destroy over raw slot ranges
//!    - A panicking `Clone` unwinds exactly the elements that call built
//!
//! 3. **Cursors** (`CursorRef`, `CursorMut`):
//!    - One generic cursor type, capability-tagged for read-only or read-write access
//!    - Random-access arithmetic (`+`, `-`, `+=`, `-=`), ordering and distance
//!
//! 4. **Container** (`RowDeque<T, ROW, A>`):
//!    - push/pop at both ends, checked and unchecked indexing
//!    - insert/remove that shift the shorter side
//!    - value semantics: `Clone`, `Eq`, `Ord`, `Hash`, serde
//!
//! ## Example
//!
//! ```rust
//! use rowdeque::RowDeque;
//!
//! let mut deque: RowDeque<i32> = RowDeque::new();
//! deque.push_back(7);
//! deque.push_back(6);
//! deque.push_back(5);
//! assert_eq!(deque.pop_front(), Some(7));
//!
//! deque.insert(0, 99);
//! assert_eq!(deque, [99, 6, 5]);
//! assert!(deque.at(3).is_err());
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `trace`-level events on row growth and release.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

/// Emits a `tracing::trace!` event when the `tracing` feature is enabled.
macro_rules! trace_rows {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    }};
}
pub(crate) use trace_rows;

pub mod alloc;
pub mod collections;
pub mod error;

pub use alloc::{AllocError, Global, RowAlloc};
pub use collections::{CursorMut, CursorRef, RowDeque, RowStats};
pub use error::DequeError;

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    // The default allocator is a ZST.
    assert!(mem::size_of::<Global>() == 0);

    // Row table plus two indices; the allocator and marker add nothing.
    assert!(mem::size_of::<RowDeque<u64>>() == mem::size_of::<Vec<*const u64>>() + 2 * mem::size_of::<usize>());

    // Cursors are an owner pointer and an index.
    assert!(mem::size_of::<CursorRef<'static, u64>>() == 2 * mem::size_of::<usize>());
};
