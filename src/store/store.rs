//! The store: current snapshot, dispatch, and subscriber notification.

use crate::core::{Action, Command, DispatchHistory, Reducer};
use crate::effects::{Effect, EffectHandle};
use crate::middleware::{Middleware, Next};
use crate::store::config::StoreConfig;
use crate::store::error::StoreError;
use crate::store::subscription::{Listener, Subscribers, Subscription};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Outcome of a `dispatch` call.
#[derive(Debug)]
pub enum Dispatched {
    /// The command was reduced and subscribers were notified
    Applied { changed: bool },

    /// Another dispatch was in flight; the command is applied by it
    /// once its current notification pass completes
    Queued,

    /// An effect was started; the handle resolves when it finishes
    Pending(EffectHandle),

    /// A middleware stopped the action before it reached the reducer
    Blocked,
}

impl Dispatched {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn into_handle(self) -> Option<EffectHandle> {
        match self {
            Self::Pending(handle) => Some(handle),
            _ => None,
        }
    }
}

struct DispatchQueue<A> {
    active: bool,
    pending: VecDeque<A>,
}

struct Inner<S, A> {
    config: StoreConfig,
    state: RwLock<Arc<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    subscribers: Arc<Mutex<Subscribers>>,
    queue: Mutex<DispatchQueue<A>>,
    history: Option<Mutex<DispatchHistory>>,
}

/// Owned handle to a state container.
///
/// Cloning is cheap and every clone refers to the same store. The state is
/// only replaced through `dispatch`; readers get immutable `Arc` snapshots.
///
/// # Dispatch ordering
///
/// A command dispatched while no other dispatch is in flight is applied
/// synchronously: on return, `get_state` reflects it and every subscriber
/// registered when the notification pass started has run once, in
/// registration order.
///
/// A command dispatched while another one is being reduced or notified
/// (from a subscriber, or from an effect on another thread) still passes
/// through the middleware right away, but its reduction is queued. The
/// in-flight dispatch applies queued commands in FIFO order after its own
/// notification pass, so passes never interleave. The nested call returns
/// [`Dispatched::Queued`].
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    pub(crate) fn from_parts(
        initial: Arc<S>,
        reducer: Box<dyn Reducer<S, A>>,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
        config: StoreConfig,
        history: Option<DispatchHistory>,
    ) -> Self {
        let history = match (config.history_limit, history) {
            (Some(limit), Some(restored)) => Some(Mutex::new(restored.rebound(limit))),
            (Some(limit), None) => Some(Mutex::new(DispatchHistory::with_limit(limit))),
            (None, _) => None,
        };

        debug!(
            store = %config.name,
            middleware = middleware.len(),
            history = history.is_some(),
            "Store created"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                state: RwLock::new(initial),
                reducer,
                middleware,
                subscribers: Arc::new(Mutex::new(Subscribers::default())),
                queue: Mutex::new(DispatchQueue {
                    active: false,
                    pending: VecDeque::new(),
                }),
                history,
            }),
        }
    }

    /// Current snapshot. O(1), no side effects.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read())
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, selector: impl FnOnce(&S) -> T) -> T {
        selector(&self.get_state())
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Dispatch a plain command.
    pub fn dispatch(&self, command: A) -> Result<Dispatched, StoreError> {
        self.dispatch_action(Action::Command(command))
    }

    /// Dispatch an asynchronous producer.
    pub fn dispatch_effect(&self, effect: Effect<S, A>) -> Result<Dispatched, StoreError> {
        self.dispatch_action(Action::Effect(effect))
    }

    /// Run any action through the middleware chain.
    pub fn dispatch_action(&self, action: Action<S, A>) -> Result<Dispatched, StoreError> {
        Next::new(self, &self.inner.middleware).run(action)
    }

    /// Register a listener called after every applied command.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.subscribers.lock().add(Arc::new(listener));
        Subscription::new(id, &self.inner.subscribers)
    }

    /// Register a shared listener at most once.
    ///
    /// Subscribing the same `Arc` again returns a handle to the existing
    /// registration instead of adding a second one.
    pub fn subscribe_shared(&self, listener: Listener) -> Subscription {
        let id = self.inner.subscribers.lock().add_shared(listener);
        Subscription::new(id, &self.inner.subscribers)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Copy of the dispatch history, if enabled in the config.
    pub fn history(&self) -> Option<DispatchHistory> {
        self.inner
            .history
            .as_ref()
            .map(|history| history.lock().clone())
    }

    /// Bottom of the middleware chain.
    pub(crate) fn apply(&self, action: Action<S, A>) -> Result<Dispatched, StoreError> {
        match action {
            Action::Command(command) => self.apply_command(command),
            Action::Effect(effect) => Err(StoreError::UnhandledEffect {
                label: effect.label().to_string(),
            }),
        }
    }

    fn apply_command(&self, command: A) -> Result<Dispatched, StoreError> {
        {
            let mut queue = self.inner.queue.lock();
            if queue.active {
                trace!(
                    store = %self.inner.config.name,
                    kind = command.kind(),
                    "Dispatch in flight, queueing command"
                );
                queue.pending.push_back(command);
                return Ok(Dispatched::Queued);
            }
            queue.active = true;
        }

        let _guard = ActiveGuard {
            queue: &self.inner.queue,
        };

        let result = self.reduce_and_notify(&command);
        while let Some(queued) = self.next_queued() {
            // Rejections are already logged; the caller of a queued command got `Queued`.
            let _ = self.reduce_and_notify(&queued);
        }

        result.map(|changed| Dispatched::Applied { changed })
    }

    fn next_queued(&self) -> Option<A> {
        let mut queue = self.inner.queue.lock();
        let next = queue.pending.pop_front();
        if next.is_none() {
            queue.active = false;
        }
        next
    }

    fn reduce_and_notify(&self, command: &A) -> Result<bool, StoreError> {
        let previous = self.get_state();
        let next = match self.inner.reducer.reduce(&previous, command) {
            Ok(next) => next,
            Err(err) => {
                warn!(
                    store = %self.inner.config.name,
                    kind = command.kind(),
                    error = %err,
                    "Reducer rejected command, state unchanged"
                );
                return Err(err.into());
            }
        };

        let changed = !Arc::ptr_eq(&previous, &next);
        if changed {
            *self.inner.state.write() = next;
        }
        if let Some(history) = &self.inner.history {
            history.lock().record(command.kind(), changed);
        }

        debug!(
            store = %self.inner.config.name,
            kind = command.kind(),
            changed,
            "Applied command"
        );

        self.notify();
        Ok(changed)
    }

    fn notify(&self) {
        let listeners = self.inner.subscribers.lock().snapshot();
        for (position, listener) in listeners.iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener())) {
                error!(
                    store = %self.inner.config.name,
                    subscriber = position,
                    reason = %panic_message(payload.as_ref()),
                    "Subscriber panicked"
                );
            }
        }
    }
}

/// Releases the dispatch slot if a reducer panics mid-dispatch.
///
/// Commands queued behind the panicking dispatch are dropped with it.
struct ActiveGuard<'a, A> {
    queue: &'a Mutex<DispatchQueue<A>>,
}

impl<A> Drop for ActiveGuard<'_, A> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut queue = self.queue.lock();
            queue.active = false;
            queue.pending.clear();
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
