//! Borrowing and owning iterators for `RowDeque`.

use super::row_deque::RowDeque;
use super::storage::RowSlots;
use crate::alloc::RowAlloc;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

/// Iterator over `&T` for a `RowDeque`.
pub struct Iter<'a, T, const ROW: usize> {
    slots: RowSlots<'a, T, ROW>,
    front: usize,
    back: usize,
}

impl<'a, T, const ROW: usize> Iter<'a, T, ROW> {
    #[inline]
    pub(super) fn new(slots: RowSlots<'a, T, ROW>, front: usize, back: usize) -> Self {
        Self { slots, front, back }
    }

    /// Returns how many items remain.
    pub fn remaining(&self) -> usize {
        self.back - self.front
    }
}

impl<T, const ROW: usize> Clone for Iter<'_, T, ROW> {
    fn clone(&self) -> Self {
        Self { slots: self.slots, front: self.front, back: self.back }
    }
}

impl<T: fmt::Debug, const ROW: usize> fmt::Debug for Iter<'_, T, ROW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, const ROW: usize> Iterator for Iter<'a, T, ROW> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let k = self.front;
        self.front += 1;
        // SAFETY: `k` lies in the live range the iterator was created over.
        Some(unsafe { &*self.slots.slot(k) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.remaining();
        (rem, Some(rem))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T, const ROW: usize> DoubleEndedIterator for Iter<'_, T, ROW> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: `back` lies in the live range the iterator was created over.
        Some(unsafe { &*self.slots.slot(self.back) })
    }
}

impl<T, const ROW: usize> ExactSizeIterator for Iter<'_, T, ROW> {}
impl<T, const ROW: usize> FusedIterator for Iter<'_, T, ROW> {}

// SAFETY: an `Iter` only hands out `&T`, like `slice::Iter`.
unsafe impl<T: Sync, const ROW: usize> Send for Iter<'_, T, ROW> {}
// SAFETY: see above.
unsafe impl<T: Sync, const ROW: usize> Sync for Iter<'_, T, ROW> {}

/// Iterator over `&mut T` for a `RowDeque`.
pub struct IterMut<'a, T, const ROW: usize> {
    slots: RowSlots<'a, T, ROW>,
    front: usize,
    back: usize,
    _unique: PhantomData<&'a mut T>,
}

impl<'a, T, const ROW: usize> IterMut<'a, T, ROW> {
    #[inline]
    pub(super) fn new(slots: RowSlots<'a, T, ROW>, front: usize, back: usize) -> Self {
        Self { slots, front, back, _unique: PhantomData }
    }

    /// Returns how many items remain.
    pub fn remaining(&self) -> usize {
        self.back - self.front
    }
}

impl<'a, T, const ROW: usize> Iterator for IterMut<'a, T, ROW> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let k = self.front;
        self.front += 1;
        // SAFETY: live slot, yielded at most once, and the deque is mutably
        // borrowed for `'a`.
        Some(unsafe { &mut *self.slots.slot(k) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.remaining();
        (rem, Some(rem))
    }
}

impl<T, const ROW: usize> DoubleEndedIterator for IterMut<'_, T, ROW> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { &mut *self.slots.slot(self.back) })
    }
}

impl<T, const ROW: usize> ExactSizeIterator for IterMut<'_, T, ROW> {}
impl<T, const ROW: usize> FusedIterator for IterMut<'_, T, ROW> {}

// SAFETY: an `IterMut` hands out disjoint `&mut T`, like `slice::IterMut`.
unsafe impl<T: Send, const ROW: usize> Send for IterMut<'_, T, ROW> {}
// SAFETY: `&IterMut` gives no access to the elements.
unsafe impl<T: Sync, const ROW: usize> Sync for IterMut<'_, T, ROW> {}

/// Owning iterator for a `RowDeque`.
pub struct IntoIter<T, const ROW: usize, A: RowAlloc> {
    deque: RowDeque<T, ROW, A>,
}

impl<T, const ROW: usize, A: RowAlloc> IntoIter<T, ROW, A> {
    pub(super) fn new(deque: RowDeque<T, ROW, A>) -> Self {
        Self { deque }
    }
}

impl<T, const ROW: usize, A: RowAlloc> Iterator for IntoIter<T, ROW, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T, const ROW: usize, A: RowAlloc> DoubleEndedIterator for IntoIter<T, ROW, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T, const ROW: usize, A: RowAlloc> ExactSizeIterator for IntoIter<T, ROW, A> {}
impl<T, const ROW: usize, A: RowAlloc> FusedIterator for IntoIter<T, ROW, A> {}

impl<T, const ROW: usize, A: RowAlloc> IntoIterator for RowDeque<T, ROW, A> {
    type Item = T;
    type IntoIter = IntoIter<T, ROW, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, const ROW: usize, A: RowAlloc> IntoIterator for &'a RowDeque<T, ROW, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, ROW>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const ROW: usize, A: RowAlloc> IntoIterator for &'a mut RowDeque<T, ROW, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, ROW>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: &T) {}
    fn assert_sync<T: Sync>(_: &T) {}

    #[test]
    fn iterators_cross_threads_with_their_elements() {
        let mut deque: RowDeque<u32, 4> = (0..10).collect();
        let it = deque.iter();
        assert_send(&it);
        assert_sync(&it);
        let total = std::thread::scope(|s| s.spawn(move || it.sum::<u32>()).join().unwrap());
        assert_eq!(total, 45);

        let it = deque.iter_mut();
        assert_send(&it);
        assert_sync(&it);
        std::thread::scope(|s| {
            s.spawn(move || it.for_each(|x| *x += 1));
        });
        assert_eq!(deque.iter().sum::<u32>(), 55);
    }

    #[test]
    fn iter_walks_both_ends_across_rows() {
        let mut deque: RowDeque<u32, 4> = RowDeque::new();
        for i in 0..6 {
            deque.push_back(i);
            deque.push_front(100 + i);
        }
        let mut it = deque.iter();
        assert_eq!(it.len(), 12);
        assert_eq!(it.next(), Some(&105));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.remaining(), 10);
        let rest: Vec<u32> = it.copied().collect();
        assert_eq!(rest, vec![104, 103, 102, 101, 100, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn iter_nth_skips_and_fuses() {
        let deque: RowDeque<u32, 4> = (0..10).collect();
        let mut it = deque.iter();
        assert_eq!(it.nth(7), Some(&7));
        assert_eq!(it.nth(5), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn iter_mut_writes_every_slot() {
        let mut deque: RowDeque<u32, 3> = (0..10).collect();
        for x in &mut deque {
            *x *= 2;
        }
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), (0..10).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn into_iter_yields_owned_values_from_both_ends() {
        let deque: RowDeque<String, 4> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        let mut it = deque.into_iter();
        assert_eq!(it.next_back().as_deref(), Some("e"));
        assert_eq!(it.next().as_deref(), Some("a"));
        assert_eq!(it.len(), 3);
        // Remaining elements are dropped with the iterator.
    }
}
