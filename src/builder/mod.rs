//! Builder API for ergonomic store construction.
//!
//! This module provides a fluent builder, two shortcut constructors and a
//! macro for declaring commands with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod store;

pub use error::BuildError;
pub use store::StoreBuilder;

use crate::core::{Command, FnReducer, SliceRegistry, StateTree};
use crate::middleware::ThunkMiddleware;
use crate::store::{Store, StoreConfig};
use std::sync::Arc;

/// Create a store from an initial state and a single reducer closure.
///
/// # Example
///
/// ```
/// use reductor::builder::create_store;
/// use reductor::core::Command;
/// use std::sync::Arc;
///
/// struct Inc;
///
/// impl Command for Inc {
///     fn kind(&self) -> &str {
///         "counter/inc"
///     }
/// }
///
/// let store = create_store(0u32, |n: &Arc<u32>, _: &Inc| Arc::new(**n + 1));
/// store.dispatch(Inc).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub fn create_store<S, A, F>(initial: S, reduce: F) -> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
{
    Store::from_parts(
        Arc::new(initial),
        Box::new(FnReducer::new(reduce)),
        Vec::new(),
        StoreConfig::default(),
        None,
    )
}

/// Create a store over a slice registry with the thunk middleware
/// installed, so effects can be dispatched right away.
///
/// Fails if the registry is invalid (duplicate or empty slice names).
pub fn configure_store<A: Command>(
    slices: SliceRegistry<A>,
) -> Result<Store<StateTree, A>, BuildError> {
    let root = slices.build()?;
    StoreBuilder::from_slices(root)
        .middleware(ThunkMiddleware::new())
        .build()
}
