//! Random-access cursors over a `RowDeque`.
//!
//! A cursor is an (owner, logical slot) pair. One type serves both the
//! read-only and the read-write flavour: the `M` parameter is a capability
//! marker, and only `Cursor<_, _, _, _, Exclusive>` exposes mutation.
//!
//! Cursors may sit anywhere in `[begin, end]`; the end position is valid to
//! hold but has no element. Moving a cursor never checks bounds, reading
//! through it always does.

use super::row_deque::RowDeque;
use crate::alloc::{Global, RowAlloc};
use crate::error::DequeError;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr::NonNull;

mod sealed {
    pub trait Sealed {}
}

/// Access capability carried by a [`Cursor`].
pub trait Access: sealed::Sealed {}

/// Read-only capability: the deque is shared-borrowed.
#[derive(Debug)]
pub enum Shared {}

/// Read-write capability: the deque is exclusively borrowed.
#[derive(Debug)]
pub enum Exclusive {}

impl sealed::Sealed for Shared {}
impl sealed::Sealed for Exclusive {}
impl Access for Shared {}
impl Access for Exclusive {}

/// A cursor into a `RowDeque`.
pub struct Cursor<'a, T, const ROW: usize, A: RowAlloc, M: Access> {
    owner: NonNull<RowDeque<T, ROW, A>>,
    k: usize,
    _borrow: PhantomData<(&'a mut RowDeque<T, ROW, A>, M)>,
}

/// A read-only cursor (`const_iterator`).
pub type CursorRef<'a, T, const ROW: usize = 16, A = Global> = Cursor<'a, T, ROW, A, Shared>;

/// A read-write cursor (`iterator`).
pub type CursorMut<'a, T, const ROW: usize = 16, A = Global> = Cursor<'a, T, ROW, A, Exclusive>;

impl<'a, T, const ROW: usize, A: RowAlloc, M: Access> Cursor<'a, T, ROW, A, M> {
    #[inline]
    pub(super) fn new(owner: NonNull<RowDeque<T, ROW, A>>, k: usize) -> Self {
        Self { owner, k, _borrow: PhantomData }
    }

    #[inline(always)]
    fn deque(&self) -> &RowDeque<T, ROW, A> {
        // SAFETY: the cursor borrows the deque for `'a`.
        unsafe { self.owner.as_ref() }
    }

    /// The logical index the cursor designates (`len` at the end position).
    #[inline]
    pub fn index(&self) -> usize {
        self.k.wrapping_sub(self.deque().begin)
    }

    /// Returns `true` at the one-past-the-end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.k == self.deque().end
    }

    /// The element under the cursor, or `None` outside the live range.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.deque().get(self.index())
    }

    /// The element `offset` positions away from the cursor.
    #[inline]
    pub fn peek(&self, offset: isize) -> Option<&T> {
        self.deque().get(self.index().wrapping_add_signed(offset))
    }

    /// Moves one element toward the back (`++`).
    #[inline]
    pub fn move_next(&mut self) {
        self.k = self.k.wrapping_add(1);
    }

    /// Moves one element toward the front (`--`).
    #[inline]
    pub fn move_prev(&mut self) {
        self.k = self.k.wrapping_sub(1);
    }

    /// Moves `n` elements, toward the back for positive `n` (`+=`).
    #[inline]
    pub fn advance(&mut self, n: isize) {
        self.k = self.k.wrapping_add_signed(n);
    }

    /// Signed distance from `other` to `self`, or `None` if the cursors
    /// belong to different deques.
    pub fn offset_from<N: Access>(&self, other: &Cursor<'_, T, ROW, A, N>) -> Option<isize> {
        if self.owner != other.owner {
            return None;
        }
        #[allow(clippy::cast_possible_wrap)]
        let distance = self.k.wrapping_sub(other.k) as isize;
        Some(distance)
    }
}

impl<'a, T, const ROW: usize, A: RowAlloc> Cursor<'a, T, ROW, A, Shared> {
    /// The element under the cursor with the full borrow lifetime.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        // SAFETY: shared cursors only ever hold a shared borrow for `'a`.
        let deque: &'a RowDeque<T, ROW, A> = unsafe { self.owner.as_ref() };
        deque.get(self.k.wrapping_sub(deque.begin))
    }
}

impl<'a, T, const ROW: usize, A: RowAlloc> Cursor<'a, T, ROW, A, Exclusive> {
    #[inline(always)]
    fn deque_mut(&mut self) -> &mut RowDeque<T, ROW, A> {
        // SAFETY: the cursor holds the only borrow of the deque for `'a`.
        unsafe { self.owner.as_mut() }
    }

    /// The element under the cursor, mutably.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let index = self.index();
        self.deque_mut().get_mut(index)
    }

    /// Inserts `value` before the cursor position. The cursor then
    /// designates the new element.
    ///
    /// Panics if the cursor is outside `[begin, end]`.
    pub fn insert(&mut self, value: T) {
        match self.try_insert(value) {
            Ok(()) => {}
            Err(DequeError::Alloc(err)) => err.handle(),
            Err(err) => panic!("cursor insertion failed: {err}"),
        }
    }

    /// Fallible form of [`insert`](Self::insert).
    ///
    /// # Errors
    /// Returns `DequeError::OutOfRange` if the cursor is outside
    /// `[begin, end]`, or `DequeError::Alloc` if a row could not be allocated.
    pub fn try_insert(&mut self, value: T) -> Result<(), DequeError> {
        let index = self.index();
        let deque = self.deque_mut();
        let len = deque.len();
        if index > len {
            return Err(DequeError::OutOfRange { index, len });
        }
        let k = deque.insert_raw(index, value)?;
        self.k = k;
        Ok(())
    }

    /// Removes the element under the cursor and returns it. The cursor then
    /// designates the element that followed it.
    pub fn remove_current(&mut self) -> Option<T> {
        let index = self.index();
        let deque = self.deque_mut();
        let value = deque.remove(index)?;
        let k = deque.begin + index;
        self.k = k;
        Some(value)
    }

    /// Reborrows as a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, ROW, A, Shared> {
        Cursor::new(self.owner, self.k)
    }
}

impl<T, const ROW: usize, A: RowAlloc> Clone for Cursor<'_, T, ROW, A, Shared> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const ROW: usize, A: RowAlloc> Copy for Cursor<'_, T, ROW, A, Shared> {}

// SAFETY: a shared cursor behaves like `&RowDeque`.
unsafe impl<T: Sync, const ROW: usize, A: RowAlloc + Sync> Send for Cursor<'_, T, ROW, A, Shared> {}
// SAFETY: see above.
unsafe impl<T: Sync, const ROW: usize, A: RowAlloc + Sync> Sync for Cursor<'_, T, ROW, A, Shared> {}
// SAFETY: an exclusive cursor behaves like `&mut RowDeque`.
unsafe impl<T: Send, const ROW: usize, A: RowAlloc + Send> Send for Cursor<'_, T, ROW, A, Exclusive> {}
// SAFETY: `&CursorMut` only reads through the deque.
unsafe impl<T: Sync, const ROW: usize, A: RowAlloc + Sync> Sync for Cursor<'_, T, ROW, A, Exclusive> {}

impl<T: fmt::Debug, const ROW: usize, A: RowAlloc, M: Access> fmt::Debug for Cursor<'_, T, ROW, A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access, N: Access> PartialEq<Cursor<'_, T, ROW, A, N>>
    for Cursor<'_, T, ROW, A, M>
{
    fn eq(&self, other: &Cursor<'_, T, ROW, A, N>) -> bool {
        self.owner == other.owner && self.k == other.k
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access> Eq for Cursor<'_, T, ROW, A, M> {}

impl<T, const ROW: usize, A: RowAlloc, M: Access, N: Access> PartialOrd<Cursor<'_, T, ROW, A, N>>
    for Cursor<'_, T, ROW, A, M>
{
    fn partial_cmp(&self, other: &Cursor<'_, T, ROW, A, N>) -> Option<Ordering> {
        (self.owner == other.owner).then(|| self.k.cmp(&other.k))
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access> Add<isize> for Cursor<'_, T, ROW, A, M> {
    type Output = Self;

    fn add(mut self, n: isize) -> Self {
        self.advance(n);
        self
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access> Sub<isize> for Cursor<'_, T, ROW, A, M> {
    type Output = Self;

    fn sub(mut self, n: isize) -> Self {
        self.advance(n.wrapping_neg());
        self
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access> AddAssign<isize> for Cursor<'_, T, ROW, A, M> {
    fn add_assign(&mut self, n: isize) {
        self.advance(n);
    }
}

impl<T, const ROW: usize, A: RowAlloc, M: Access> SubAssign<isize> for Cursor<'_, T, ROW, A, M> {
    fn sub_assign(&mut self, n: isize) {
        self.advance(n.wrapping_neg());
    }
}
