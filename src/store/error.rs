//! Store error types.

use crate::core::ReducerError;
use thiserror::Error;

/// Errors returned from `dispatch`.
///
/// None of these leave the store partially updated: a failed dispatch
/// keeps the previous state snapshot.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The root reducer refused the command
    #[error(transparent)]
    Reducer(#[from] ReducerError),

    /// An effect reached the bottom of the chain without being run
    #[error("Effect '{label}' reached the reducer. Add a ThunkMiddleware to run effects")]
    UnhandledEffect { label: String },

    /// No tokio runtime is available on the dispatching thread
    #[error("No tokio runtime available to run effect '{label}'")]
    NoRuntime { label: String },
}
