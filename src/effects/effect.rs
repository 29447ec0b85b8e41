//! Asynchronous action producers.

use crate::core::Command;
use crate::store::{Dispatched, Store, StoreError};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced by an effect's own work.
///
/// These never escape the store: the thunk middleware logs them and may
/// translate them into a failure command.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Effect failed: {0}")]
    Failed(String),

    #[error("Effect could not dispatch: {0}")]
    Dispatch(#[from] StoreError),

    #[error("Effect '{label}' panicked")]
    Panicked { label: String },

    #[error("Effect '{label}' was cancelled before completing")]
    Cancelled { label: String },
}

impl EffectError {
    /// Wrap any displayable failure, e.g. a transport error.
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self::Failed(reason.to_string())
    }
}

/// Outcome of an effect's work.
pub type EffectResult = Result<(), EffectError>;

/// Future returned by an effect producer.
pub type EffectFuture = BoxFuture<'static, EffectResult>;

type Producer<S, A> = Box<dyn FnOnce(EffectContext<S, A>) -> EffectFuture + Send>;

/// An asynchronous action producer (a "thunk").
///
/// The producer receives an [`EffectContext`] and may dispatch any number
/// of commands while or after it performs its work: typically a `started`
/// command, then either `succeeded(payload)` or `failed(reason)`.
///
/// Effects carry no built-in cancellation. A producer that must be
/// cancellable checks its own token before dispatching its result.
pub struct Effect<S, A> {
    label: String,
    producer: Producer<S, A>,
}

impl<S, A> Effect<S, A> {
    /// Label used in logs and as the action kind.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<S, A> Effect<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    pub fn new<F, Fut>(label: impl Into<String>, producer: F) -> Self
    where
        F: FnOnce(EffectContext<S, A>) -> Fut + Send + 'static,
        Fut: Future<Output = EffectResult> + Send + 'static,
    {
        Self {
            label: label.into(),
            producer: Box::new(move |context| producer(context).boxed()),
        }
    }

    /// Start the producer. Its future does the actual work.
    pub(crate) fn run(self, context: EffectContext<S, A>) -> EffectFuture {
        (self.producer)(context)
    }
}

/// Capabilities handed to a running effect: `dispatch` and `get_state`.
pub struct EffectContext<S, A> {
    store: Store<S, A>,
}

impl<S, A> Clone for EffectContext<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S, A> EffectContext<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    pub(crate) fn new(store: Store<S, A>) -> Self {
        Self { store }
    }

    /// Dispatch a command through the full middleware chain.
    pub fn dispatch(&self, command: A) -> Result<Dispatched, StoreError> {
        self.store.dispatch(command)
    }

    /// Dispatch a follow-up effect.
    pub fn dispatch_effect(&self, effect: Effect<S, A>) -> Result<Dispatched, StoreError> {
        self.store.dispatch_effect(effect)
    }

    /// Snapshot of the state at the time of the call.
    pub fn get_state(&self) -> Arc<S> {
        self.store.get_state()
    }
}
