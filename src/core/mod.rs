//! Core store types and logic.
//!
//! This module contains the pure part of the store:
//! - Actions via the `Command` trait and the `Action` sum type
//! - Reducers and the slice registry that combines them
//! - Guard predicates and the dispatch history
//!
//! Nothing in here performs I/O or touches shared state; the `store`
//! and `middleware` modules form the shell around it.

mod action;
mod guard;
mod history;
mod reducer;
mod slice;

pub use action::{Action, Command};
pub use guard::Guard;
pub use history::{DispatchHistory, DispatchRecord};
pub use reducer::{FnReducer, Reducer, ReducerError};
pub use slice::{CombinedReducer, SliceRegistry, SliceState, StateTree};
