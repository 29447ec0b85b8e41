//! Build errors for stores and slice registries.

use thiserror::Error;

/// Configuration errors, raised when a store or registry is built.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Reducer not specified. Call .reducer(..) or .reducer_fn(..)")]
    MissingReducer,

    #[error("No slices registered. Add at least one slice")]
    NoSlices,

    #[error("Slice name must not be empty")]
    EmptySliceName,

    #[error("Slice '{name}' is registered more than once")]
    DuplicateSlice { name: String },

    #[error("Invalid slice registrations: {0:?}")]
    InvalidSlices(Vec<BuildError>),
}
