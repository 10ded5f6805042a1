//! `RowDeque` — a double-ended queue over fixed-size rows.
//!
//! ## Layout
//!
//! Elements live in rows of `ROW` slots. A row table maps row numbers to row
//! buffers, and two logical indices `begin <= end` delimit the live elements
//! in the flat slot space the table spans:
//!
//! ```text
//!  table ──► [row 0] [ . . . a b ]
//!            [row 1] [ c d e f g ]
//!            [row 2] [ h . . . . ]
//!                          ▲     ▲
//!                        begin  end
//! ```
//!
//! Pushing at an end that has no spare slot allocates a whole new row and
//! splices its pointer into the table. Row buffers never move, so the address
//! of an element is stable for as long as it stays in the deque and no
//! operation relocates it (`insert`/`remove` shift one side, `clone_from`,
//! `clear` and a cross-allocator `swap` rebuild). Pops release rows that no
//! longer hold live elements; the rows that remain stay where they are.
//!
//! ## Performance Characteristics
//!
//! - **Push/Pop at either end**: O(1) amortized, one row allocation every `ROW` pushes
//! - **Index**: O(1) via shift/mask for power-of-two rows
//! - **Insert/Remove**: O(min(i, len - i)), shifting the shorter side
//! - **Iteration**: O(1) per element

use super::cursor::{Cursor, CursorMut, CursorRef};
use super::iter::{Iter, IterMut};
use super::lifecycle::{construct_range, copy_range, copy_range_backward, copy_range_forward, destroy_range};
use super::storage::RowSlots;
use crate::alloc::{AllocError, Global, RowAlloc};
use crate::error::DequeError;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;
use serde::{Deserialize, Serialize};

/// A double-ended queue with address-stable growth at both ends.
///
/// `ROW` is the number of element slots per row (default 16). Any non-zero
/// value works; powers of two index with shift/mask.
pub struct RowDeque<T, const ROW: usize = 16, A: RowAlloc = Global> {
    pub(super) rows: Vec<NonNull<T>>,
    pub(super) begin: usize,
    pub(super) end: usize,
    pub(super) alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: the deque uniquely owns its rows and elements, like `Vec<T>`.
unsafe impl<T: Send, const ROW: usize, A: RowAlloc + Send> Send for RowDeque<T, ROW, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, const ROW: usize, A: RowAlloc + Sync> Sync for RowDeque<T, ROW, A> {}

/// A snapshot of a deque's row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowStats {
    /// Number of allocated rows.
    pub rows: usize,
    /// Slots per row.
    pub row_capacity: usize,
    /// Number of live elements.
    pub len: usize,
    /// Logical slot of the first live element.
    pub begin: usize,
    /// Logical slot one past the last live element.
    pub end: usize,
}

impl<T, const ROW: usize> RowDeque<T, ROW, Global> {
    /// Creates an empty deque with one pre-allocated row.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a deque holding `n` clones of `value`.
    pub fn from_elem(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(n, value, Global)
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Slots per row.
    pub const ROW_CAPACITY: usize = ROW;

    const ROW_IS_NONZERO: () = assert!(ROW != 0, "RowDeque ROW must be > 0");

    /// A deque with no rows at all. Every constructor starts here.
    pub(super) fn unallocated_in(alloc: A) -> Self {
        let () = Self::ROW_IS_NONZERO;
        Self {
            rows: Vec::new(),
            begin: 0,
            end: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Creates an empty deque in `alloc` with one pre-allocated row.
    pub fn new_in(alloc: A) -> Self {
        Self::try_new_in(alloc).unwrap_or_else(|err| err.handle())
    }

    /// Fallible form of [`new_in`](Self::new_in).
    ///
    /// # Errors
    /// Returns `AllocError` if the first row cannot be allocated.
    pub fn try_new_in(alloc: A) -> Result<Self, AllocError> {
        let mut deque = Self::unallocated_in(alloc);
        deque.rows = deque.allocate_rows(ROW)?;
        deque.begin = ROW / 2;
        deque.end = ROW / 2;
        Ok(deque)
    }

    /// Creates a deque in `alloc` holding `n` clones of `value`.
    pub fn from_elem_in(n: usize, value: T, alloc: A) -> Self
    where
        T: Clone,
    {
        match Self::try_from_elem_in(n, value, alloc) {
            Ok(deque) => deque,
            Err(DequeError::Alloc(err)) => err.handle(),
            Err(err) => unreachable!("{err}"),
        }
    }

    /// Fallible form of [`from_elem_in`](Self::from_elem_in).
    ///
    /// The elements start at logical slot 0 with no spare rows. `n == 0`
    /// yields the same state as [`try_new_in`](Self::try_new_in).
    ///
    /// # Errors
    /// Returns `DequeError::Alloc` if a row cannot be allocated.
    pub fn try_from_elem_in(n: usize, value: T, alloc: A) -> Result<Self, DequeError>
    where
        T: Clone,
    {
        if n == 0 {
            return Ok(Self::try_new_in(alloc)?);
        }
        let mut deque = Self::unallocated_in(alloc);
        deque.rows = deque.allocate_rows(n)?;
        // SAFETY: the fresh rows cover `[0, n)` and are raw.
        deque.end = unsafe { construct_range(RowSlots::<T, ROW>::new(&deque.rows), 0, n, &value) };
        debug_assert!(deque.check_invariants());
        Ok(deque)
    }

    /// Returns a reference to the row allocator.
    #[inline(always)]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns `true` if there are no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Returns the number of rows currently allocated.
    #[inline(always)]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the total number of slots across allocated rows.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity_end()
    }

    /// Returns a snapshot of the row layout.
    pub fn stats(&self) -> RowStats {
        RowStats {
            rows: self.rows.len(),
            row_capacity: ROW,
            len: self.len(),
            begin: self.begin,
            end: self.end,
        }
    }

    /// Checks the structural invariants of the deque.
    ///
    /// Every mutator asserts this in debug builds.
    pub fn check_invariants(&self) -> bool {
        self.begin <= self.end
            && self.end <= self.capacity_end()
            && (!self.rows.is_empty() || self.end == 0)
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Returns a shared reference to element `index` if in-bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        // SAFETY: `index < len` so the slot is live.
        Some(unsafe { &*self.slots().slot(self.begin + index) })
    }

    /// Returns a mutable reference to element `index` if in-bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        // SAFETY: `index < len` so the slot is live; `&mut self` makes it unique.
        Some(unsafe { &mut *self.slots().slot(self.begin + index) })
    }

    /// Returns a shared reference to element `index` without bounds checks.
    ///
    /// # Safety
    /// Caller must ensure `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.slots().slot(self.begin + index)
    }

    /// Returns a mutable reference to element `index` without bounds checks.
    ///
    /// # Safety
    /// Caller must ensure `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self.slots().slot(self.begin + index)
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfRange` if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<&T, DequeError> {
        let len = self.len();
        self.get(index).ok_or(DequeError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfRange` if `index >= self.len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, DequeError> {
        let len = self.len();
        self.get_mut(index).ok_or(DequeError::OutOfRange { index, len })
    }

    /// Returns the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the first element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Returns the last element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len().checked_sub(1).and_then(move |i| self.get_mut(i))
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Appends an element to the back.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.push_back_raw(value) {
            err.handle();
        }
    }

    /// Fallible form of [`push_back`](Self::push_back). On failure the deque
    /// is unchanged and `value` is dropped.
    ///
    /// # Errors
    /// Returns `DequeError::Alloc` if a new row was needed and could not be allocated.
    pub fn try_push_back(&mut self, value: T) -> Result<(), DequeError> {
        Ok(self.push_back_raw(value)?)
    }

    fn push_back_raw(&mut self, value: T) -> Result<(), AllocError> {
        if self.end == self.capacity_end() {
            self.grow_back()?;
        }
        // SAFETY: `end < capacity_end` after growth and the slot is raw.
        unsafe { self.slots().slot(self.end).write(value) };
        self.end += 1;
        debug_assert!(self.check_invariants());
        Ok(())
    }

    /// Prepends an element to the front.
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.push_front_raw(value) {
            err.handle();
        }
    }

    /// Fallible form of [`push_front`](Self::push_front). On failure the
    /// deque is unchanged and `value` is dropped.
    ///
    /// # Errors
    /// Returns `DequeError::Alloc` if a new row was needed and could not be allocated.
    pub fn try_push_front(&mut self, value: T) -> Result<(), DequeError> {
        Ok(self.push_front_raw(value)?)
    }

    fn push_front_raw(&mut self, value: T) -> Result<(), AllocError> {
        if self.begin == 0 {
            self.grow_front()?;
        }
        // SAFETY: `begin > 0` after growth and the slot before it is raw.
        unsafe { self.slots().slot(self.begin - 1).write(value) };
        self.begin -= 1;
        debug_assert!(self.check_invariants());
        Ok(())
    }

    /// Removes and returns the last element, or `None` if empty.
    ///
    /// Trailing rows left without live elements are handed back to the
    /// allocator in batches, keeping one spare.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was the last live one; it is now outside `[begin, end)`.
        let value = unsafe { self.slots().slot(self.end).read() };
        if self.capacity_end() - self.end >= 2 * ROW {
            self.reclaim_back();
        }
        debug_assert!(self.check_invariants());
        Some(value)
    }

    /// Removes and returns the first element, or `None` if empty.
    ///
    /// Leading rows left without live elements are handed back to the
    /// allocator in batches, keeping one spare, so a deque used as a queue
    /// holds a bounded number of rows.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let k = self.begin;
        self.begin += 1;
        // SAFETY: the slot was the first live one; it is now outside `[begin, end)`.
        let value = unsafe { self.slots().slot(k).read() };
        if self.begin >= 2 * ROW {
            self.reclaim_front();
        }
        debug_assert!(self.check_invariants());
        Some(value)
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Inserts `value` so it becomes element `index`.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        match self.try_insert(index, value) {
            Ok(()) => {}
            Err(DequeError::Alloc(err)) => err.handle(),
            Err(err) => panic!("insertion failed: {err}"),
        }
    }

    /// Fallible form of [`insert`](Self::insert). On failure the deque is
    /// unchanged and `value` is dropped.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfRange` if `index > len`, or
    /// `DequeError::Alloc` if a row was needed and could not be allocated.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), DequeError> {
        let len = self.len();
        if index > len {
            return Err(DequeError::OutOfRange { index, len });
        }
        self.insert_raw(index, value)?;
        Ok(())
    }

    /// Inserts at logical `index <= len`, shifting the shorter side, and
    /// returns the slot the new element occupies.
    pub(super) fn insert_raw(&mut self, index: usize, value: T) -> Result<usize, AllocError> {
        let len = self.len();
        let at = if index < len - index {
            if self.begin == 0 {
                self.grow_front()?;
            }
            let at = self.begin + index;
            let slots = RowSlots::<T, ROW>::new(&self.rows);
            // SAFETY: `[begin, at)` is live and `begin - 1` is raw; moving the
            // prefix one slot toward the front leaves `at - 1` raw.
            unsafe {
                copy_range_forward(slots, self.begin, at, slots, self.begin - 1);
                slots.slot(at - 1).write(value);
            }
            self.begin -= 1;
            at - 1
        } else {
            if self.end == self.capacity_end() {
                self.grow_back()?;
            }
            let at = self.begin + index;
            let slots = RowSlots::<T, ROW>::new(&self.rows);
            // SAFETY: `[at, end)` is live and `end` is raw; moving the suffix
            // one slot toward the back leaves `at` raw.
            unsafe {
                copy_range_backward(slots, at, self.end, slots, self.end + 1);
                slots.slot(at).write(value);
            }
            self.end += 1;
            at
        };
        debug_assert!(self.check_invariants());
        Ok(at)
    }

    /// Removes and returns element `index`, closing the gap from the shorter
    /// side. Returns `None` if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let len = self.len();
        if index >= len {
            return None;
        }
        let at = self.begin + index;
        let slots = RowSlots::<T, ROW>::new(&self.rows);
        // SAFETY: `at` is live. After the read it is raw and one side moves
        // over it, leaving exactly one raw slot at the edge that shrinks.
        let value = unsafe { slots.slot(at).read() };
        if index < len - index - 1 {
            unsafe { copy_range_backward(slots, self.begin, at, slots, at + 1) };
            self.begin += 1;
        } else {
            unsafe { copy_range_forward(slots, at + 1, self.end, slots, at) };
            self.end -= 1;
        }
        debug_assert!(self.check_invariants());
        Some(value)
    }

    /// Drops element `index` and returns the index of the element that
    /// followed it (which is `index` again).
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len();
        match self.remove(index) {
            Some(value) => drop(value),
            None => panic!("erase index (is {index}) should be < len (is {len})"),
        }
        index
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Shortens the deque to `len` elements, dropping the tail.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }
        let old_end = self.end;
        self.end = self.begin + len;
        // SAFETY: `[end, old_end)` was live and is now outside the live range.
        unsafe { destroy_range(RowSlots::<T, ROW>::new(&self.rows), self.end, old_end) };
        debug_assert!(self.check_invariants());
    }

    /// Resizes to `new_len`, appending clones of `value` or dropping from the back.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        while self.len() < new_len {
            self.push_back(value.clone());
        }
        self.truncate(new_len);
    }

    /// Resizes to `new_len`, appending values produced by `f` or dropping
    /// from the back.
    pub fn resize_with(&mut self, new_len: usize, mut f: impl FnMut() -> T) {
        while self.len() < new_len {
            self.push_back(f());
        }
        self.truncate(new_len);
    }

    /// Drops every element and returns to the freshly constructed shape:
    /// one row with the live range centred in it. A deque that holds no rows
    /// gets a fresh one.
    pub fn clear(&mut self) {
        let (begin, end) = (self.begin, self.end);
        self.end = self.begin;
        // SAFETY: `[begin, end)` was live. After dropping, every row is raw.
        unsafe {
            destroy_range(RowSlots::<T, ROW>::new(&self.rows), begin, end);
            self.release_rows_from(1);
        }
        if self.rows.is_empty() {
            match self.allocate_rows(ROW) {
                Ok(rows) => self.rows = rows,
                Err(err) => err.handle(),
            }
        }
        self.begin = ROW / 2;
        self.end = ROW / 2;
        debug_assert!(self.check_invariants());
    }

    /// Exchanges the contents of two deques.
    ///
    /// When the allocators share storage only the row tables and indices
    /// change hands. Otherwise each deque rebuilds rows in its own allocator
    /// and the elements are moved across; allocators never migrate. In both
    /// cases a failure leaves both deques untouched.
    pub fn swap(&mut self, other: &mut Self) {
        if let Err(err) = self.try_swap(other) {
            err.handle();
        }
    }

    /// Fallible form of [`swap`](Self::swap).
    ///
    /// # Errors
    /// Returns `AllocError` if the slow path cannot allocate replacement rows.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocError> {
        if self.alloc.shares_storage_with(&other.alloc) {
            mem::swap(&mut self.rows, &mut other.rows);
            mem::swap(&mut self.begin, &mut other.begin);
            mem::swap(&mut self.end, &mut other.end);
            return Ok(());
        }

        crate::trace_rows!(left = self.len(), right = other.len(), "swapping across allocators");
        let for_other = other.allocate_rows(self.len())?;
        let for_self = match self.allocate_rows(other.len()) {
            Ok(rows) => rows,
            Err(err) => {
                for row in for_other {
                    // SAFETY: freshly allocated by `other`, never initialized.
                    unsafe { other.release_row(row) };
                }
                return Err(err);
            }
        };

        // SAFETY: each fresh table covers `[0, len)` of the deque it is
        // moving to. Elements are moved bitwise, so the old rows end up raw.
        unsafe {
            copy_range_forward(self.slots(), self.begin, self.end, RowSlots::<T, ROW>::new(&for_other), 0);
            copy_range_forward(other.slots(), other.begin, other.end, RowSlots::<T, ROW>::new(&for_self), 0);
        }
        let (self_len, other_len) = (self.len(), other.len());
        self.end = self.begin;
        other.end = other.begin;
        // SAFETY: all old rows are raw now.
        unsafe {
            self.release_rows_from(0);
            other.release_rows_from(0);
        }
        self.rows = for_self;
        self.begin = 0;
        self.end = other_len;
        other.rows = for_other;
        other.begin = 0;
        other.end = self_len;
        debug_assert!(self.check_invariants() && other.check_invariants());
        Ok(())
    }

    /// Clones `self` into a deque that uses `alloc`.
    ///
    /// The copy starts at logical slot 0 with exactly enough rows for its
    /// elements.
    ///
    /// # Errors
    /// Returns `AllocError` if a row cannot be allocated.
    pub fn try_clone_in<B: RowAlloc>(&self, alloc: B) -> Result<RowDeque<T, ROW, B>, AllocError>
    where
        T: Clone,
    {
        let mut out = RowDeque::<T, ROW, B>::unallocated_in(alloc);
        out.rows = out.allocate_rows(self.len())?;
        // SAFETY: source range is live, destination rows are fresh and raw.
        // A panicking clone rolls back its own elements and `out` frees the rows.
        out.end = unsafe {
            copy_range(self.slots(), self.begin, self.end, RowSlots::<T, ROW>::new(&out.rows), 0)
        };
        debug_assert!(out.check_invariants());
        Ok(out)
    }

    /// Clones `self` into a new deque sharing a clone of its allocator.
    ///
    /// # Errors
    /// Returns `AllocError` if a row cannot be allocated.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
        A: Clone,
    {
        self.try_clone_in(self.alloc.clone())
    }

    /// Element-wise assignment used by `Clone::clone_from`.
    pub(super) fn assign_from<B: RowAlloc>(&mut self, source: &RowDeque<T, ROW, B>) -> Result<(), AllocError>
    where
        T: Clone,
        A: Clone,
    {
        let (len, source_len) = (self.len(), source.len());
        if source_len <= len {
            for (dst, src) in self.iter_mut().zip(source.iter()) {
                dst.clone_from(src);
            }
            self.truncate(source_len);
        } else {
            let fresh = source.try_clone_in(self.alloc.clone())?;
            crate::trace_rows!(rows = fresh.rows.len(), len = source_len, "rebuilt rows for assignment");
            *self = fresh;
        }
        Ok(())
    }
}

impl<T, const ROW: usize, A: RowAlloc> RowDeque<T, ROW, A> {
    /// Returns a front-to-back iterator over `&T`.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, ROW> {
        Iter::new(RowSlots::new(&self.rows), self.begin, self.end)
    }

    /// Returns a front-to-back iterator over `&mut T`.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, ROW> {
        IterMut::new(RowSlots::new(&self.rows), self.begin, self.end)
    }

    /// A read-only cursor at the first element (`begin()`).
    pub fn cursor_front(&self) -> CursorRef<'_, T, ROW, A> {
        Cursor::new(NonNull::from(self), self.begin)
    }

    /// A read-only cursor one past the last element (`end()`).
    pub fn cursor_end(&self) -> CursorRef<'_, T, ROW, A> {
        Cursor::new(NonNull::from(self), self.end)
    }

    /// A read-only cursor at element `index`; `index == len` gives the end cursor.
    ///
    /// Panics if `index > len`.
    pub fn cursor_at(&self, index: usize) -> CursorRef<'_, T, ROW, A> {
        assert!(index <= self.len(), "cursor index (is {index}) should be <= len (is {})", self.len());
        Cursor::new(NonNull::from(self), self.begin + index)
    }

    /// A read-write cursor at the first element.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, ROW, A> {
        let k = self.begin;
        Cursor::new(NonNull::from(self), k)
    }

    /// A read-write cursor one past the last element.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, ROW, A> {
        let k = self.end;
        Cursor::new(NonNull::from(self), k)
    }

    /// A read-write cursor at element `index`; `index == len` gives the end cursor.
    ///
    /// Panics if `index > len`.
    pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T, ROW, A> {
        assert!(index <= self.len(), "cursor index (is {index}) should be <= len (is {})", self.len());
        let k = self.begin + index;
        Cursor::new(NonNull::from(self), k)
    }
}

impl<T, const ROW: usize, A: RowAlloc> Drop for RowDeque<T, ROW, A> {
    fn drop(&mut self) {
        /// Frees the rows even if an element destructor unwinds.
        struct ReleaseRows<'a, T, const ROW: usize, A: RowAlloc>(&'a mut RowDeque<T, ROW, A>);

        impl<T, const ROW: usize, A: RowAlloc> Drop for ReleaseRows<'_, T, ROW, A> {
            fn drop(&mut self) {
                // SAFETY: the live range was emptied before this guard was armed.
                unsafe { self.0.release_rows_from(0) };
            }
        }

        let (begin, end) = (self.begin, self.end);
        self.end = self.begin;
        let guard = ReleaseRows(self);
        // SAFETY: `[begin, end)` was the live range.
        unsafe { destroy_range(RowSlots::<T, ROW>::new(&guard.0.rows), begin, end) };
        drop(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_deque_has_one_centred_row() {
        let deque: RowDeque<i32> = RowDeque::new();
        assert_eq!(deque.row_count(), 1);
        assert_eq!(deque.stats(), RowStats { rows: 1, row_capacity: 16, len: 0, begin: 8, end: 8 });
        assert!(deque.check_invariants());
    }

    #[test]
    fn from_elem_starts_at_slot_zero_without_spare_rows() {
        let deque: RowDeque<i32, 16> = RowDeque::from_elem(20, 6);
        assert_eq!(deque.stats(), RowStats { rows: 2, row_capacity: 16, len: 20, begin: 0, end: 20 });
    }

    #[test]
    fn push_front_from_slot_zero_grows_front_row() {
        let mut deque: RowDeque<i32, 4> = RowDeque::from_elem(4, 1);
        assert_eq!((deque.begin, deque.end), (0, 4));
        deque.push_front(0);
        assert_eq!(deque.row_count(), 2);
        assert_eq!((deque.begin, deque.end), (3, 8));
        assert_eq!(deque.front(), Some(&0));
    }

    #[test]
    fn insert_front_half_shifts_prefix() {
        let mut deque: RowDeque<i32, 4> = (0..8).collect();
        let before = deque.stats();
        deque.insert(1, 99);
        let after = deque.stats();
        assert_eq!(after.begin + 1, before.begin);
        assert_eq!(after.end, before.end);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 99, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn insert_back_half_shifts_suffix() {
        let mut deque: RowDeque<i32, 4> = (0..8).collect();
        let before = deque.stats();
        deque.insert(6, 99);
        let after = deque.stats();
        assert_eq!(after.begin, before.begin);
        assert_eq!(after.end, before.end + 1);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 99, 6, 7]);
    }

    #[test]
    fn remove_closes_gap_from_shorter_side() {
        let mut deque: RowDeque<i32, 4> = (0..9).collect();
        let before = deque.stats();
        assert_eq!(deque.remove(1), Some(1));
        assert_eq!(deque.stats().begin, before.begin + 1);
        assert_eq!(deque.remove(6), Some(7));
        assert_eq!(deque.stats().end, before.end - 1);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4, 5, 6, 8]);
        assert_eq!(deque.remove(7), None);
    }

    #[test]
    fn clear_keeps_one_row() {
        let mut deque: RowDeque<String, 4> = (0..20).map(|i| i.to_string()).collect();
        assert!(deque.row_count() > 1);
        deque.clear();
        assert_eq!(deque.stats(), RowStats { rows: 1, row_capacity: 4, len: 0, begin: 2, end: 2 });
    }
}
