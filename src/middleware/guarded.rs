//! Middleware that blocks commands rejected by a [`Guard`].

use crate::core::{Action, Command, Guard};
use crate::middleware::chain::{Middleware, Next};
use crate::store::{Dispatched, Store, StoreError};
use tracing::debug;

/// Checks each command against the current state before forwarding it.
///
/// Effects pass through; the commands they dispatch later are checked
/// like any other.
pub struct GuardMiddleware<S, A> {
    guard: Guard<S, A>,
}

impl<S, A> GuardMiddleware<S, A> {
    pub fn new(guard: Guard<S, A>) -> Self {
        Self { guard }
    }

    /// Build directly from a predicate.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&S, &A) -> bool + Send + Sync + 'static,
    {
        Self::new(Guard::new(predicate))
    }
}

impl<S, A> Middleware<S, A> for GuardMiddleware<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    fn handle(
        &self,
        store: &Store<S, A>,
        action: Action<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched, StoreError> {
        if let Action::Command(command) = &action {
            if !self.guard.check(&store.get_state(), command) {
                debug!(store = %store.name(), kind = command.kind(), "Guard blocked command");
                return Ok(Dispatched::Blocked);
            }
        }
        next.run(action)
    }
}
