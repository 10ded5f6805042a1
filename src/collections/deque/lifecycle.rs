//! Bulk construct / copy / destroy over raw row slots.
//!
//! Every mutator that creates or moves elements goes through these helpers.
//! The cloning helpers unwind partial work on panic: slots they already
//! filled are dropped in reverse, untouched slots stay raw. Relocation is a
//! bitwise move and cannot fail.
//!
//! All ranges are half-open logical slot ranges resolved through `RowSlots`.

use super::storage::RowSlots;
use core::mem;
use core::ptr;

/// Drops `[first, next)` if a cloning loop unwinds.
struct Rollback<'a, T, const ROW: usize> {
    slots: RowSlots<'a, T, ROW>,
    first: usize,
    next: usize,
}

impl<T, const ROW: usize> Drop for Rollback<'_, T, ROW> {
    fn drop(&mut self) {
        // SAFETY: `[first, next)` holds exactly the elements this call constructed.
        unsafe { destroy_range(self.slots, self.first, self.next) };
    }
}

/// Clones `value` into every raw slot in `[first, last)` and returns `last`.
///
/// # Safety
/// Every slot in the range must be allocated and raw.
pub(crate) unsafe fn construct_range<T: Clone, const ROW: usize>(
    dst: RowSlots<'_, T, ROW>,
    first: usize,
    last: usize,
    value: &T,
) -> usize {
    let mut guard = Rollback { slots: dst, first, next: first };
    while guard.next != last {
        dst.slot(guard.next).write(value.clone());
        guard.next += 1;
    }
    mem::forget(guard);
    last
}

/// Clones the live elements `src[first..last]` into the raw slots starting at
/// `dst_first`, returning one past the last slot written.
///
/// # Safety
/// The source slots must be live, the destination slots allocated and raw,
/// and the two ranges must not overlap.
pub(crate) unsafe fn copy_range<T: Clone, const S: usize, const D: usize>(
    src: RowSlots<'_, T, S>,
    first: usize,
    last: usize,
    dst: RowSlots<'_, T, D>,
    dst_first: usize,
) -> usize {
    let mut guard = Rollback { slots: dst, first: dst_first, next: dst_first };
    for k in first..last {
        dst.slot(guard.next).write((*src.slot(k)).clone());
        guard.next += 1;
    }
    let end = guard.next;
    mem::forget(guard);
    end
}

/// Moves the elements in `src[first..last]` so the last one lands at
/// `dst_last - 1`, working from the high end toward the low end. Returns the
/// first destination slot.
///
/// Safe for overlapping ranges within one table when the destination lies at
/// or after the source. Vacated source slots become raw.
///
/// # Safety
/// The source slots must be live and every destination slot outside the
/// source range must be allocated and raw.
pub(crate) unsafe fn copy_range_backward<T, const S: usize, const D: usize>(
    src: RowSlots<'_, T, S>,
    first: usize,
    last: usize,
    dst: RowSlots<'_, T, D>,
    dst_last: usize,
) -> usize {
    let mut out = dst_last;
    let mut k = last;
    while k != first {
        k -= 1;
        out -= 1;
        ptr::copy(src.slot(k), dst.slot(out), 1);
    }
    out
}

/// Moves the elements in `src[first..last]` into the slots starting at
/// `dst_first`, low to high. Returns one past the last destination slot.
///
/// Safe for overlapping ranges within one table when the destination lies at
/// or before the source. Vacated source slots become raw.
///
/// # Safety
/// Same contract as [`copy_range_backward`].
pub(crate) unsafe fn copy_range_forward<T, const S: usize, const D: usize>(
    src: RowSlots<'_, T, S>,
    first: usize,
    last: usize,
    dst: RowSlots<'_, T, D>,
    dst_first: usize,
) -> usize {
    let mut out = dst_first;
    for k in first..last {
        ptr::copy(src.slot(k), dst.slot(out), 1);
        out += 1;
    }
    out
}

/// Drops every live element in `[first, last)`, high to low, and returns
/// `first` as the new end of the live range.
///
/// # Safety
/// Every slot in the range must be live. They are raw afterwards.
pub(crate) unsafe fn destroy_range<T, const ROW: usize>(
    slots: RowSlots<'_, T, ROW>,
    first: usize,
    last: usize,
) -> usize {
    if mem::needs_drop::<T>() {
        let mut k = last;
        while k != first {
            k -= 1;
            ptr::drop_in_place(slots.slot(k));
        }
    }
    first
}
