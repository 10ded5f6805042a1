//! Standard trait impls for `RowDeque`: value semantics, indexing,
//! collection and serde.

use super::row_deque::RowDeque;
use crate::alloc::{Global, RowAlloc};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<T, const ROW: usize> Default for RowDeque<T, ROW, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const ROW: usize, A: RowAlloc + Clone> Clone for RowDeque<T, ROW, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.handle())
    }

    /// Assigns element-wise when `source` is no longer than `self`, dropping
    /// any surplus tail; otherwise rebuilds the rows from scratch.
    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            err.handle();
        }
    }
}

impl<T: fmt::Debug, const ROW: usize, A: RowAlloc> fmt::Debug for RowDeque<T, ROW, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, const R1: usize, const R2: usize, A1: RowAlloc, A2: RowAlloc> PartialEq<RowDeque<U, R2, A2>>
    for RowDeque<T, R1, A1>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &RowDeque<U, R2, A2>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, const ROW: usize, A: RowAlloc> Eq for RowDeque<T, ROW, A> {}

impl<T: PartialEq, const ROW: usize, A: RowAlloc> PartialEq<[T]> for RowDeque<T, ROW, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, const ROW: usize, A: RowAlloc> PartialEq<Vec<T>> for RowDeque<T, ROW, A> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T: PartialEq, const ROW: usize, A: RowAlloc, const N: usize> PartialEq<[T; N]> for RowDeque<T, ROW, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        *self == other[..]
    }
}

impl<T, const R1: usize, const R2: usize, A1: RowAlloc, A2: RowAlloc> PartialOrd<RowDeque<T, R2, A2>>
    for RowDeque<T, R1, A1>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &RowDeque<T, R2, A2>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, const ROW: usize, A: RowAlloc> Ord for RowDeque<T, ROW, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, const ROW: usize, A: RowAlloc> Hash for RowDeque<T, ROW, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for item in self {
            item.hash(state);
        }
    }
}

impl<T, const ROW: usize, A: RowAlloc> Index<usize> for RowDeque<T, ROW, A> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        self.get(index)
            .unwrap_or_else(|| panic!("index out of bounds: the len is {len} but the index is {index}"))
    }
}

impl<T, const ROW: usize, A: RowAlloc> IndexMut<usize> for RowDeque<T, ROW, A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        self.get_mut(index)
            .unwrap_or_else(|| panic!("index out of bounds: the len is {len} but the index is {index}"))
    }
}

impl<T, const ROW: usize, A: RowAlloc> Extend<T> for RowDeque<T, ROW, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, const ROW: usize, A: RowAlloc> Extend<&'a T> for RowDeque<T, ROW, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const ROW: usize> FromIterator<T> for RowDeque<T, ROW, Global> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

impl<T, const ROW: usize> From<Vec<T>> for RowDeque<T, ROW, Global> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T, const ROW: usize, const N: usize> From<[T; N]> for RowDeque<T, ROW, Global> {
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

impl<T, const ROW: usize, A: RowAlloc> From<RowDeque<T, ROW, A>> for Vec<T> {
    fn from(deque: RowDeque<T, ROW, A>) -> Self {
        deque.into_iter().collect()
    }
}

impl<T: Serialize, const ROW: usize, A: RowAlloc> Serialize for RowDeque<T, ROW, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

struct RowDequeVisitor<T, const ROW: usize>(PhantomData<T>);

impl<'de, T: Deserialize<'de>, const ROW: usize> Visitor<'de> for RowDequeVisitor<T, ROW> {
    type Value = RowDeque<T, ROW, Global>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
        let mut deque = RowDeque::new();
        while let Some(item) = seq.next_element()? {
            deque.push_back(item);
        }
        Ok(deque)
    }
}

impl<'de, T: Deserialize<'de>, const ROW: usize> Deserialize<'de> for RowDeque<T, ROW, Global> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(RowDequeVisitor::<T, ROW>(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_ignores_row_layout() {
        let mut a: RowDeque<i32, 4> = RowDeque::new();
        for i in (0..10).rev() {
            a.push_front(i);
        }
        let b: RowDeque<i32, 16> = (0..10).collect();
        assert_eq!(a, b);
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Equal));
        assert_eq!(a, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a: RowDeque<i32> = [1, 2, 3].into();
        let b: RowDeque<i32> = [1, 2, 4].into();
        let c: RowDeque<i32> = [1, 2].into();
        assert!(a < b);
        assert!(c < a);
        assert!(b >= a);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn equal_deques_hash_equal() {
        let a: RowDeque<u8, 2> = (0..9).collect();
        let mut b: RowDeque<u8, 2> = (1..9).collect();
        b.push_front(0);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_end_panics() {
        let deque: RowDeque<i32> = [1].into();
        let _ = deque[1];
    }

    #[test]
    fn debug_lists_elements() {
        let deque: RowDeque<i32, 2> = [3, 1, 2].into();
        assert_eq!(format!("{deque:?}"), "[3, 1, 2]");
    }
}
