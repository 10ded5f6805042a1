//! `proptest` strategies for `RowDeque` (enabled by the `proptest` feature).

use super::row_deque::RowDeque;
use crate::alloc::Global;
use proptest::arbitrary::{any_with, Arbitrary};
use proptest::collection::{vec, SizeRange};
use proptest::strategy::{BoxedStrategy, Strategy};

impl<T: Arbitrary + 'static, const ROW: usize> Arbitrary for RowDeque<T, ROW, Global> {
    type Parameters = (SizeRange, T::Parameters);
    type Strategy = BoxedStrategy<Self>;

    /// Builds deques by pushing generated elements at the back, so the live
    /// range starts in the middle of the first row like any fresh deque.
    fn arbitrary_with((size, params): Self::Parameters) -> Self::Strategy {
        vec(any_with::<T>(params), size).prop_map(Self::from).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arbitrary_deques_hold_their_invariants(deque in any::<RowDeque<u16, 4>>()) {
            prop_assert!(deque.check_invariants());
            prop_assert_eq!(deque.iter().count(), deque.len());
        }
    }
}
