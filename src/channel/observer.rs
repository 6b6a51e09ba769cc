//! Typed notification interface for channel events.
//!
//! DESIGN
//! ======
//! Observers are held in a small registry owned by the channel. Each
//! notification takes a snapshot of the registry and calls observers outside
//! the lock, so an observer may unsubscribe itself (or others) from inside a
//! callback. A removal takes effect from the next notification on.
//!
//! Once the channel reaches `Closed` the registry delivers `on_close`, then
//! releases every observer and refuses new ones. Nothing is delivered after
//! that point.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde_json::Value;

use super::ChannelError;
use super::state::ChannelState;

/// Receiver of channel notifications. Every method defaults to a no-op.
///
/// Calls arrive from the channel's connection task, one at a time, in the
/// order the transport produced them.
pub trait ChannelObserver: Send + Sync {
    /// One inbound JSON document.
    fn on_message(&self, _message: &Value) {}
    fn on_open(&self) {}
    fn on_close(&self) {}
    fn on_error(&self, _error: &ChannelError) {}
    /// Every accepted state transition, including `Idle -> Connecting`.
    fn on_state(&self, _from: ChannelState, _to: ChannelState) {}
}

/// Adapter turning a closure into a message-only observer.
pub struct OnMessage<F>(pub F);

impl<F> ChannelObserver for OnMessage<F>
where
    F: Fn(&Value) + Send + Sync,
{
    fn on_message(&self, message: &Value) {
        (self.0)(message);
    }
}

type Entry = (u64, Arc<dyn ChannelObserver>);

#[derive(Default)]
pub(crate) struct Dispatcher {
    observers: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    released: AtomicBool,
}

impl Dispatcher {
    /// Register an observer. Returns `None` once the dispatcher is released.
    pub(crate) fn add(&self, observer: Arc<dyn ChannelObserver>) -> Option<u64> {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        if self.released.load(Ordering::Acquire) {
            return None;
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        observers.push((id, observer));
        Some(id)
    }

    pub(crate) fn remove(&self, id: u64) {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers.retain(|(entry, _)| *entry != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn ChannelObserver>> {
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    pub(crate) fn message(&self, message: &Value) {
        for observer in self.snapshot() {
            observer.on_message(message);
        }
    }

    pub(crate) fn open(&self) {
        for observer in self.snapshot() {
            observer.on_open();
        }
    }

    pub(crate) fn error(&self, error: &ChannelError) {
        for observer in self.snapshot() {
            observer.on_error(error);
        }
    }

    pub(crate) fn state(&self, from: ChannelState, to: ChannelState) {
        for observer in self.snapshot() {
            observer.on_state(from, to);
        }
    }

    /// Deliver `on_close` and drop every observer.
    ///
    /// Release happens under the same guard as the final snapshot, so no
    /// observer can be added in between and miss `on_close`.
    pub(crate) fn close_and_release(&self) {
        let released = {
            let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
            self.released.store(true, Ordering::Release);
            std::mem::take(&mut *observers)
        };
        for (_, observer) in released {
            observer.on_close();
        }
    }
}

/// Handle returned by [`super::ChannelHandle::subscribe`].
///
/// Dropping the subscription unsubscribes it.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: Option<u64>,
    dispatcher: Weak<Dispatcher>,
}

impl Subscription {
    pub(crate) fn new(id: Option<u64>, dispatcher: &Arc<Dispatcher>) -> Self {
        Self { id, dispatcher: Arc::downgrade(dispatcher) }
    }

    /// `false` when the channel was already closed at subscribe time, or
    /// has since released its observers.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        self.dispatcher.upgrade().is_some_and(|d| {
            d.observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .any(|(entry, _)| *entry == id)
        })
    }

    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let (Some(id), Some(dispatcher)) = (self.id.take(), self.dispatcher.upgrade()) {
            dispatcher.remove(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "observer_test.rs"]
mod tests;
