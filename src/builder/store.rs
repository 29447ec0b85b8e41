//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::checkpoint::Checkpoint;
use crate::core::{CombinedReducer, Command, DispatchHistory, FnReducer, Reducer, StateTree};
use crate::middleware::Middleware;
use crate::store::{Store, StoreConfig};
use std::sync::Arc;

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder<S, A> {
    initial: Option<Arc<S>>,
    reducer: Option<Box<dyn Reducer<S, A>>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    config: StoreConfig,
    history: Option<DispatchHistory>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    pub fn new() -> Self {
        Self {
            initial: None,
            reducer: None,
            middleware: Vec::new(),
            config: StoreConfig::default(),
            history: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(self, state: S) -> Self {
        self.initial_arc(Arc::new(state))
    }

    /// Set the initial state from an existing snapshot.
    pub fn initial_arc(mut self, state: Arc<S>) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the root reducer (required).
    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Set the root reducer from a closure.
    pub fn reducer_fn<F>(self, reduce: F) -> Self
    where
        F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
    {
        self.reducer(FnReducer::new(reduce))
    }

    /// Append a middleware. The first one added sees actions first.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from a checkpoint: its state becomes the initial state and its
    /// history is kept when the config enables history.
    pub fn restore(mut self, checkpoint: Checkpoint<S>) -> Self {
        self.history = checkpoint.history;
        self.initial_arc(Arc::new(checkpoint.state))
    }

    /// Build the store.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Store<S, A>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;

        Ok(Store::from_parts(
            initial,
            reducer,
            self.middleware,
            self.config,
            self.history,
        ))
    }
}

impl<A: Command> StoreBuilder<StateTree, A> {
    /// Builder whose state is the registry's tree, seeded with every
    /// slice's default.
    pub fn from_slices(root: CombinedReducer<A>) -> Self {
        let initial = root.initial_state();
        Self::new().initial(initial).reducer(root)
    }
}

impl<S, A> Default for StoreBuilder<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    fn default() -> Self {
        Self::new()
    }
}
