//! Deque error types.

use std::error::Error;
use std::fmt;

use crate::alloc::AllocError;

/// Errors reported by the checked and fallible deque operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DequeError {
    /// A checked access or positional insert named a position past the end.
    OutOfRange {
        /// The requested logical index.
        index: usize,
        /// The number of live elements at the time of the request.
        len: usize,
    },
    /// The row allocator could not satisfy a request.
    Alloc(AllocError),
}

impl fmt::Display for DequeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for deque of length {len}")
            }
            Self::Alloc(err) => write!(f, "row allocation failed: {err}"),
        }
    }
}

impl Error for DequeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfRange { .. } => None,
            Self::Alloc(err) => Some(err),
        }
    }
}

impl From<AllocError> for DequeError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::alloc::Layout;

    #[test]
    fn out_of_range_message() {
        let err = DequeError::OutOfRange { index: 3, len: 3 };
        assert_eq!(err.to_string(), "index 3 out of range for deque of length 3");
        assert!(err.source().is_none());
    }

    #[test]
    fn alloc_error_is_the_source() {
        let err: DequeError = AllocError::new(Layout::new::<u64>()).into();
        assert!(matches!(err, DequeError::Alloc(_)));
        assert!(err.source().is_some());
    }
}
