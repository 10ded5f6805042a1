//! Row storage for `RowDeque`.
//!
//! A deque owns a row table (`Vec<NonNull<T>>`) whose entries point at rows of
//! `ROW` raw slots obtained from the deque's allocator. Logical slot `k` lives
//! in row `k / ROW` at offset `k % ROW`. Rows are never moved or resized after
//! allocation; growing at either end only reallocates the table, so elements
//! keep their addresses.

use super::row_deque::RowDeque;
use crate::alloc::{AllocError, RowAlloc};
use core::alloc::Layout;
use core::ptr::NonNull;

/// A borrowed view of a row table that resolves logical slots to pointers.
pub(crate) struct RowSlots<'a, T, const ROW: usize> {
    rows: &'a [NonNull<T>],
}

impl<T, const ROW: usize> Clone for RowSlots<'_, T, ROW> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const ROW: usize> Copy for RowSlots<'_, T, ROW> {}

impl<'a, T, const ROW: usize> RowSlots<'a, T, ROW> {
    #[inline(always)]
    pub(crate) fn new(rows: &'a [NonNull<T>]) -> Self {
        Self { rows }
    }

    /// Returns a pointer to logical slot `k`.
    ///
    /// Panics if `k` falls outside the allocated rows.
    #[inline(always)]
    pub(crate) fn slot(self, k: usize) -> *mut T {
        let (r, o) = index_split::<ROW>(k);
        // SAFETY: `o < ROW` and every row holds `ROW` slots.
        unsafe { self.rows[r].as_ptr().add(o) }
    }
}

#[inline(always)]
pub(crate) const fn index_split<const ROW: usize>(k: usize) -> (usize, usize) {
    if ROW.is_power_of_two() {
        let shift = ROW.trailing_zeros() as usize;
        let mask = ROW - 1;
        (k >> shift, k & mask)
    } else {
        (k / ROW, k % ROW)
    }
}

fn table_layout<T>(rows: usize) -> Layout {
    Layout::array::<NonNull<T>>(rows).unwrap_or(Layout::new::<NonNull<T>>())
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Layout of a single row.
    #[inline]
    pub(super) fn row_layout() -> Layout {
        match Layout::array::<T>(ROW) {
            Ok(layout) => layout,
            Err(_) => panic!("a row of {ROW} elements overflows isize::MAX bytes"),
        }
    }

    /// One past the last slot covered by the allocated rows.
    #[inline(always)]
    pub(super) fn capacity_end(&self) -> usize {
        self.rows.len() * ROW
    }

    #[inline(always)]
    pub(super) fn slots(&self) -> RowSlots<'_, T, ROW> {
        RowSlots::new(&self.rows)
    }

    /// Allocates one uninitialized row.
    pub(super) fn allocate_row(&self) -> Result<NonNull<T>, AllocError> {
        let layout = Self::row_layout();
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.alloc.allocate(layout).map(NonNull::cast)
    }

    /// Returns a row to the allocator.
    ///
    /// # Safety
    /// `row` must come from `allocate_row` on a deque with an allocator that
    /// shares storage with `self.alloc`, and must hold no live elements.
    pub(super) unsafe fn release_row(&self, row: NonNull<T>) {
        let layout = Self::row_layout();
        if layout.size() != 0 {
            self.alloc.deallocate(row.cast(), layout);
        }
    }

    /// Allocates a fresh row table able to hold `n_elements` starting at slot 0.
    ///
    /// Every row is left uninitialized. On failure the rows allocated so far
    /// are released and nothing stays referenced.
    pub(super) fn allocate_rows(&self, n_elements: usize) -> Result<Vec<NonNull<T>>, AllocError> {
        let needed = n_elements.div_ceil(ROW);
        let mut table = Vec::new();
        table
            .try_reserve_exact(needed)
            .map_err(|_| AllocError::new(table_layout::<T>(needed)))?;
        for _ in 0..needed {
            match self.allocate_row() {
                Ok(row) => table.push(row),
                Err(err) => {
                    for row in table.drain(..) {
                        // SAFETY: freshly allocated, never initialized.
                        unsafe { self.release_row(row) };
                    }
                    return Err(err);
                }
            }
        }
        crate::trace_rows!(rows = needed, n_elements, "allocated row table");
        Ok(table)
    }

    /// Appends one row after the last allocated row.
    ///
    /// Called when `end` sits on the boundary of the last row. Existing rows
    /// keep their positions in the table, so no index moves.
    pub(super) fn grow_back(&mut self) -> Result<(), AllocError> {
        let rows = self.rows.len();
        self.rows
            .try_reserve(1)
            .map_err(|_| AllocError::new(table_layout::<T>(rows + 1)))?;
        let row = self.allocate_row()?;
        self.rows.push(row);
        crate::trace_rows!(rows = self.rows.len(), begin = self.begin, end = self.end, "grew back row");
        Ok(())
    }

    /// Prepends one row before the first allocated row.
    ///
    /// Called when `begin == 0`. Both indices shift up by `ROW` so every live
    /// element keeps its (row, slot) position relative to its own row buffer.
    pub(super) fn grow_front(&mut self) -> Result<(), AllocError> {
        let rows = self.rows.len();
        self.rows
            .try_reserve(1)
            .map_err(|_| AllocError::new(table_layout::<T>(rows + 1)))?;
        let row = self.allocate_row()?;
        self.rows.insert(0, row);
        self.begin += ROW;
        self.end += ROW;
        crate::trace_rows!(rows = self.rows.len(), begin = self.begin, end = self.end, "grew front row");
        Ok(())
    }

    /// Releases every row from index `keep` onward and shortens the table.
    ///
    /// # Safety
    /// The released rows must hold no live elements.
    pub(super) unsafe fn release_rows_from(&mut self, keep: usize) {
        if keep >= self.rows.len() {
            return;
        }
        crate::trace_rows!(released = self.rows.len() - keep, keep, "releasing rows");
        for i in keep..self.rows.len() {
            self.release_row(self.rows[i]);
        }
        self.rows.truncate(keep);
    }

    /// Releases the vacated rows before `begin`, keeping one spare.
    ///
    /// Does nothing until at least two leading rows are vacant and they make
    /// up half the table, so the table shift is amortized over the pops that
    /// vacated them. Both indices drop by `ROW` per released row; the rows
    /// that stay keep their buffers.
    pub(super) fn reclaim_front(&mut self) {
        let vacant = self.begin / ROW;
        if vacant < 2 || vacant * 2 < self.rows.len() {
            return;
        }
        let released = vacant - 1;
        for i in 0..released {
            // SAFETY: rows before `begin / ROW` hold no live slots.
            unsafe { self.release_row(self.rows[i]) };
        }
        self.rows.drain(..released);
        self.begin -= released * ROW;
        self.end -= released * ROW;
        crate::trace_rows!(released, rows = self.rows.len(), begin = self.begin, end = self.end, "reclaimed front rows");
    }

    /// Releases the vacated rows after `end`, keeping one spare.
    ///
    /// Mirrors [`reclaim_front`](Self::reclaim_front). Indices do not move.
    pub(super) fn reclaim_back(&mut self) {
        let vacant = (self.capacity_end() - self.end) / ROW;
        if vacant < 2 || vacant * 2 < self.rows.len() {
            return;
        }
        // SAFETY: rows wholly past `end` hold no live slots.
        unsafe { self.release_rows_from(self.rows.len() - (vacant - 1)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;

    #[test]
    fn index_split_power_of_two_uses_shift_and_mask() {
        assert_eq!(index_split::<16>(0), (0, 0));
        assert_eq!(index_split::<16>(15), (0, 15));
        assert_eq!(index_split::<16>(16), (1, 0));
        assert_eq!(index_split::<16>(49), (3, 1));
    }

    #[test]
    fn index_split_other_sizes_use_div_and_mod() {
        assert_eq!(index_split::<6>(5), (0, 5));
        assert_eq!(index_split::<6>(6), (1, 0));
        assert_eq!(index_split::<6>(27), (4, 3));
    }

    #[test]
    fn allocate_rows_rounds_up() {
        let deque: RowDeque<u32, 8, Global> = RowDeque::new_in(Global);
        let table = deque.allocate_rows(17).unwrap();
        assert_eq!(table.len(), 3);
        for row in table {
            unsafe { deque.release_row(row) };
        }
        assert!(deque.allocate_rows(0).unwrap().is_empty());
    }

    #[test]
    fn grow_front_shifts_indices_by_one_row() {
        let mut deque: RowDeque<u32, 4, Global> = RowDeque::new_in(Global);
        assert_eq!((deque.begin, deque.end), (2, 2));
        deque.grow_front().unwrap();
        assert_eq!(deque.rows.len(), 2);
        assert_eq!((deque.begin, deque.end), (6, 6));
    }

    #[test]
    fn grow_back_keeps_indices() {
        let mut deque: RowDeque<u32, 4, Global> = RowDeque::new_in(Global);
        deque.grow_back().unwrap();
        assert_eq!(deque.rows.len(), 2);
        assert_eq!(deque.capacity_end(), 8);
        assert_eq!((deque.begin, deque.end), (2, 2));
    }

    #[test]
    fn reclaim_front_keeps_one_spare_row() {
        let mut deque: RowDeque<u32, 4, Global> = RowDeque::new_in(Global);
        for _ in 0..3 {
            deque.grow_back().unwrap();
        }
        deque.begin = 13;
        deque.end = 13;
        deque.reclaim_front();
        assert_eq!(deque.rows.len(), 2);
        assert_eq!((deque.begin, deque.end), (5, 5));

        // One vacant row is not worth a table shift.
        deque.reclaim_front();
        assert_eq!(deque.rows.len(), 2);
    }

    #[test]
    fn reclaim_back_waits_for_half_the_table() {
        let mut deque: RowDeque<u32, 4, Global> = RowDeque::new_in(Global);
        for _ in 0..4 {
            deque.grow_back().unwrap();
        }
        deque.begin = 2;
        deque.end = 11;
        deque.reclaim_back();
        assert_eq!(deque.rows.len(), 5);

        deque.end = 6;
        deque.reclaim_back();
        assert_eq!(deque.rows.len(), 3);
        assert_eq!((deque.begin, deque.end), (2, 6));
        deque.end = deque.begin;
    }

    #[test]
    fn zero_sized_rows_never_allocate() {
        let deque: RowDeque<(), 16, Global> = RowDeque::new_in(Global);
        assert_eq!(RowDeque::<(), 16, Global>::row_layout().size(), 0);
        let row = deque.allocate_row().unwrap();
        assert_eq!(row, NonNull::dangling());
    }
}
