//! Channel provider: one owned channel per context, send-only access for
//! everyone else.
//!
//! DESIGN
//! ======
//! `ChannelContext` is an explicit, clonable slot passed to whatever needs to
//! talk to the camera service. `ChannelProvider` is the single owner of the
//! underlying `ChannelHandle`; while it is mounted the slot holds a `Sender`,
//! which can queue JSON but cannot close or otherwise drive the connection.
//! Mounting a second provider into an occupied slot is refused.
//!
//! The slot lock is never held while the channel notifies observers, so an
//! observer may read the context from any callback. During `mount` the slot
//! is reserved: a concurrent mount is refused, while `use_channel` still
//! reports `NoProvider` until the sender is published.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::channel::{ChannelHandle, ChannelObserver, ChannelOptions, ChannelState, SendError, Shared};
use crate::router::LogObserver;

/// Wiring mistakes around the provider. These indicate a bug in the caller,
/// not a runtime or network condition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("no channel provider is mounted in this context")]
    NoProvider,
    #[error("a channel provider is already mounted in this context")]
    AlreadyMounted,
}

/// Send-only capability handed to consumers of a mounted provider.
#[derive(Clone)]
pub struct Sender {
    shared: Arc<Shared>,
}

impl Sender {
    /// Queue `payload` as one JSON text frame.
    ///
    /// # Errors
    ///
    /// [`SendError::NotOpen`] when the channel is not open and
    /// [`SendError::Closing`] once the owner asked to close; nothing is sent.
    pub fn send_json<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), SendError> {
        self.shared.send_json(payload)
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.shared.state()
    }
}

#[derive(Default)]
enum Slot {
    #[default]
    Vacant,
    /// A provider is between its occupancy check and publishing its sender.
    Mounting,
    Mounted(Sender),
}

/// Scoped slot through which descendants reach the mounted provider.
#[derive(Clone, Default)]
pub struct ChannelContext {
    slot: Arc<Mutex<Slot>>,
}

impl ChannelContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the send capability of the mounted provider.
    ///
    /// # Errors
    ///
    /// [`UsageError::NoProvider`] when nothing is mounted (or it was
    /// unmounted).
    pub fn use_channel(&self) -> Result<Sender, UsageError> {
        match &*self.lock() {
            Slot::Mounted(sender) => Ok(sender.clone()),
            Slot::Vacant | Slot::Mounting => Err(UsageError::NoProvider),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(*self.lock(), Slot::Mounted(_))
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive owner of the dashboard's channel.
///
/// Dropping the provider closes the channel and empties the context.
pub struct ChannelProvider {
    ctx: ChannelContext,
    handle: ChannelHandle,
}

impl ChannelProvider {
    /// Connect to `endpoint` and publish the sender into `ctx`.
    ///
    /// Every inbound message is logged; `observers` receive the same
    /// notifications after the logger.
    ///
    /// # Errors
    ///
    /// [`UsageError::AlreadyMounted`] when `ctx` already has a provider.
    /// Connection problems are not errors here; they surface through the
    /// channel state and `on_error`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn mount(
        ctx: &ChannelContext,
        endpoint: &str,
        observers: Vec<Arc<dyn ChannelObserver>>,
    ) -> Result<Self, UsageError> {
        let reservation = Reservation::take(ctx).inspect_err(|_| {
            tracing::error!(%endpoint, "refusing to mount a second channel provider");
        })?;

        let mut options = ChannelOptions::new().observer(Arc::new(LogObserver));
        for observer in observers {
            options = options.observer(observer);
        }
        // Observers run inside `connect`; the slot must not be locked here.
        let handle = ChannelHandle::connect(endpoint, options);
        reservation.publish(Sender { shared: handle.shared() });

        tracing::info!(channel = %handle.id(), "channel provider mounted");
        Ok(Self { ctx: ctx.clone(), handle })
    }

    #[must_use]
    pub fn sender(&self) -> Sender {
        Sender { shared: self.handle.shared() }
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.handle.state()
    }

    /// Owner-side subscription; see [`ChannelHandle::subscribe`].
    pub fn subscribe(&self, observer: Arc<dyn ChannelObserver>) -> crate::channel::Subscription {
        self.handle.subscribe(observer)
    }

    /// Wait up to `limit` for the channel to open.
    ///
    /// # Errors
    ///
    /// Returns the state the channel was in when waiting stopped.
    pub async fn wait_open(&self, limit: Duration) -> Result<(), ChannelState> {
        match tokio::time::timeout(limit, self.handle.opened()).await {
            Ok(result) => result,
            Err(_) => Err(self.handle.state()),
        }
    }

    /// Resolves once the channel reaches `Closed`.
    pub async fn closed(&self) {
        self.handle.closed().await;
    }

    /// Close the channel, wait for it to finish, and empty the context.
    pub async fn unmount(self) {
        self.handle.close();
        self.handle.closed().await;
        tracing::info!(channel = %self.handle.id(), "channel provider unmounted");
        // Drop clears the slot.
    }
}

impl Drop for ChannelProvider {
    fn drop(&mut self) {
        self.handle.close();
        let mut slot = self.ctx.lock();
        if matches!(&*slot, Slot::Mounted(s) if Arc::ptr_eq(&s.shared, &self.handle.shared())) {
            *slot = Slot::Vacant;
        }
    }
}

/// Claim on a vacant slot. Dropped unpublished (e.g. `connect` panicked
/// outside a runtime), it frees the slot again.
struct Reservation<'a> {
    ctx: &'a ChannelContext,
    published: bool,
}

impl<'a> Reservation<'a> {
    fn take(ctx: &'a ChannelContext) -> Result<Self, UsageError> {
        let mut slot = ctx.lock();
        if !matches!(*slot, Slot::Vacant) {
            return Err(UsageError::AlreadyMounted);
        }
        *slot = Slot::Mounting;
        Ok(Self { ctx, published: false })
    }

    fn publish(mut self, sender: Sender) {
        *self.ctx.lock() = Slot::Mounted(sender);
        self.published = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.published {
            *self.ctx.lock() = Slot::Vacant;
        }
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
