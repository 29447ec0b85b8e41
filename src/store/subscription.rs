//! Subscriber registry and unsubscribe handles.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Callback invoked after every applied command.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Insertion-ordered list of listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Add unless the same listener is already registered.
    pub(crate) fn add_shared(&mut self, listener: Listener) -> u64 {
        match self
            .entries
            .iter()
            .find(|(_, existing)| Arc::ptr_eq(existing, &listener))
        {
            Some((id, _)) => *id,
            None => self.add(listener),
        }
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Listeners registered right now, in order.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `Store::subscribe`.
///
/// Dropping it keeps the subscription alive; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Arc<Mutex<Subscribers>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Remove exactly this registration.
    ///
    /// Returns `false` if it was already removed or the store is gone.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.lock().remove(self.id),
            None => false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}
