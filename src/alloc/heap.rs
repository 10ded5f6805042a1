//! `Global`, the default row allocator.
//!
//! Delegates to the process-wide allocator through `std::alloc`. Every
//! `Global` value is interchangeable with every other, so deques using it
//! always take the O(1) path in `swap`.

use super::{AllocError, RowAlloc};
use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};

/// The global memory allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

impl RowAlloc for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0, "zero-sized rows never reach the allocator");
        // SAFETY: callers never request zero-sized layouts.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::new(layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        dealloc(ptr.as_ptr(), layout);
    }

    #[inline(always)]
    fn shares_storage_with(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_allocates_and_releases_a_row() {
        let layout = Layout::array::<u64>(16).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        unsafe {
            let slots = ptr.cast::<u64>().as_ptr();
            for i in 0..16 {
                slots.add(i).write(i as u64);
            }
            assert_eq!(*slots.add(15), 15);
            Global.deallocate(ptr, layout);
        }
    }

    #[test]
    fn global_instances_share_storage() {
        assert!(Global.shares_storage_with(&Global));
    }

    #[test]
    fn alloc_error_reports_layout() {
        let layout = Layout::array::<u32>(8).unwrap();
        let err = AllocError::new(layout);
        assert_eq!(err.layout(), layout);
        assert_eq!(err.to_string(), "memory allocation of 32 bytes (align 4) failed");
    }
}
