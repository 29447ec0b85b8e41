//! Pure state-transition functions.
//!
//! Reducers work on reference-counted snapshots. Returning the very same
//! `Arc` that came in means "nothing changed"; that identity is what lets
//! the store and its subscribers skip work by comparing pointers.

use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when a reducer cannot produce a valid next state.
///
/// A rejected reduction leaves the store state untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReducerError {
    #[error("Slice '{slice}' does not hold a value of type {expected}")]
    SliceTypeMismatch {
        slice: String,
        expected: &'static str,
    },

    #[error("Reducer rejected the action: {reason}")]
    Rejected { reason: String },
}

/// Pure function mapping `(state, action)` to the next state.
///
/// Implementations must not mutate `state` in place; build a new value
/// (copy-on-write) or hand back a clone of the same `Arc` when the action
/// does not apply.
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: &Arc<S>, action: &A) -> Result<Arc<S>, ReducerError>;
}

/// Adapter turning an infallible closure into a [`Reducer`].
///
/// # Example
///
/// ```rust
/// use reductor::core::{FnReducer, Reducer};
/// use std::sync::Arc;
///
/// let counter = FnReducer::new(|state: &Arc<i64>, delta: &i64| {
///     if *delta == 0 {
///         Arc::clone(state)
///     } else {
///         Arc::new(**state + delta)
///     }
/// });
///
/// let state = Arc::new(1);
/// assert_eq!(*counter.reduce(&state, &2).unwrap(), 3);
/// assert!(Arc::ptr_eq(&counter.reduce(&state, &0).unwrap(), &state));
/// ```
pub struct FnReducer<S, A, F> {
    reduce: F,
    _phantom: PhantomData<fn(&S, &A)>,
}

impl<S, A, F> FnReducer<S, A, F>
where
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _phantom: PhantomData,
        }
    }
}

impl<S, A, F> Reducer<S, A> for FnReducer<S, A, F>
where
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync,
{
    fn reduce(&self, state: &Arc<S>, action: &A) -> Result<Arc<S>, ReducerError> {
        Ok((self.reduce)(state, action))
    }
}
