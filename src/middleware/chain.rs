//! The middleware trait and the continuation that links the chain.

use crate::core::{Action, Command};
use crate::store::{Dispatched, Store, StoreError};

/// Interceptor wrapping `dispatch`.
///
/// Middleware run in registration order. Each one decides whether to
/// forward the action with [`Next::run`], possibly transformed, or to stop
/// it. The store handed in exposes `dispatch` and `get_state`, so a
/// middleware can inspect state or issue further actions.
pub trait Middleware<S, A>: Send + Sync {
    fn handle(
        &self,
        store: &Store<S, A>,
        action: Action<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched, StoreError>;
}

/// The rest of the chain after the current middleware.
pub struct Next<'a, S, A> {
    store: &'a Store<S, A>,
    rest: &'a [Box<dyn Middleware<S, A>>],
}

impl<'a, S, A> Next<'a, S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    pub(crate) fn new(store: &'a Store<S, A>, rest: &'a [Box<dyn Middleware<S, A>>]) -> Self {
        Self { store, rest }
    }

    /// Forward to the next middleware, or to the root reducer at the end.
    pub fn run(self, action: Action<S, A>) -> Result<Dispatched, StoreError> {
        match self.rest.split_first() {
            Some((current, rest)) => current.handle(
                self.store,
                action,
                Next {
                    store: self.store,
                    rest,
                },
            ),
            None => self.store.apply(action),
        }
    }

    /// Middleware left after this point, excluding the reducer.
    pub(crate) fn remaining(&self) -> usize {
        self.rest.len()
    }
}
