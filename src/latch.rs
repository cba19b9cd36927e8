//! Single-resolution latch.
//!
//! DESIGN
//! ======
//! The first `resolve` wins and every later call is a no-op. Readers that
//! start waiting before resolution and readers that arrive afterwards all
//! observe the same value. Waiting never subscribes anything new; it clones a
//! shared receiver.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::Shared;

struct Slot<T> {
    sender: Option<oneshot::Sender<T>>,
    value: Option<T>,
}

pub struct Latch<T: Clone> {
    slot: Mutex<Slot<T>>,
    receiver: Shared<oneshot::Receiver<T>>,
}

impl<T: Clone> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Latch<T> {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            slot: Mutex::new(Slot { sender: Some(sender), value: None }),
            receiver: receiver.shared(),
        }
    }

    /// Store `value` if the latch is still open. Returns `true` only for the
    /// call that actually resolved it.
    pub fn resolve(&self, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = slot.sender.take() else {
            return false;
        };
        slot.value = Some(value.clone());
        // Waiters hold clones of the shared receiver, so the send cannot
        // observe a dropped receiver while `self` is alive.
        let _ = sender.send(value);
        true
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// The resolved value, without waiting.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    /// Wait for the resolved value.
    ///
    /// The returned future does not borrow the latch. If the latch is dropped
    /// without ever resolving, the future stays pending.
    pub fn wait(&self) -> impl Future<Output = T> + use<T> {
        let receiver = self.receiver.clone();
        async move {
            match receiver.await {
                Ok(value) => value,
                Err(oneshot::Canceled) => futures::future::pending().await,
            }
        }
    }
}

#[cfg(test)]
#[path = "latch_test.rs"]
mod tests;
