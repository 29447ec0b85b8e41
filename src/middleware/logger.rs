//! Middleware that traces every dispatched action.

use crate::core::{Action, Command};
use crate::middleware::chain::{Middleware, Next};
use crate::store::{Dispatched, Store, StoreError};
use std::time::Instant;
use tracing::{debug, warn};

/// Logs each action's kind, outcome and elapsed time.
///
/// Place it first in the chain to time everything below it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggerMiddleware;

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, A> Middleware<S, A> for LoggerMiddleware
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
        let kind = action.kind().to_string();
        let started = Instant::now();

        let result = next.run(action);
        let elapsed_us = started.elapsed().as_micros() as u64;

        match &result {
            Ok(outcome) => debug!(
                store = %store.name(),
                kind = %kind,
                outcome = ?outcome,
                elapsed_us,
                "Dispatched"
            ),
            Err(err) => warn!(
                store = %store.name(),
                kind = %kind,
                error = %err,
                elapsed_us,
                "Dispatch failed"
            ),
        }

        result
    }
}
