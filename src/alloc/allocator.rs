//! The allocator interface rows are drawn from, and its failure type.

use core::alloc::Layout;
use core::ptr::NonNull;

/// A trait for the raw-slot allocators that back deque rows.
///
/// This mirrors the shape of `std::alloc::Allocator` but stays on stable Rust.
/// Implementors only hand out raw memory: element construction and
/// destruction are the caller's responsibility.
///
/// Callers never pass a zero-sized layout. Zero-sized rows are represented
/// with dangling pointers and never reach the allocator.
pub trait RowAlloc {
    /// Allocates memory according to the given layout.
    ///
    /// # Errors
    /// Returns `AllocError` if allocation fails.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Deallocates memory.
    ///
    /// # Safety
    /// `ptr` must denote a block of memory currently allocated by this allocator.
    /// `layout` must be the same layout that was used to allocate that block of memory.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Returns `true` if memory allocated by `self` may be released by `other`
    /// and vice versa.
    ///
    /// Deques whose allocators share storage can exchange their row tables
    /// in O(1) during `swap`.
    fn shares_storage_with(&self, other: &Self) -> bool;
}

/// The error type for allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    /// Creates an error for a failed request of `layout`.
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout of the request that could not be satisfied.
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Diverges through `std::alloc::handle_alloc_error`.
    ///
    /// Infallible constructors and mutators route their failures here, the
    /// same way `Vec` does on out-of-memory.
    pub fn handle(self) -> ! {
        std::alloc::handle_alloc_error(self.layout)
    }
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "memory allocation of {} bytes (align {}) failed",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl std::error::Error for AllocError {}
