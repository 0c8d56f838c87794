use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::{SendError, Shared};

/// The sending half of a channel created by [`crate::channel::bounded`],
/// [`crate::channel::unbounded`], or [`crate::channel::lockfree`].
///
/// `Clone`-able: every clone shares the same underlying queue, giving
/// true multi-producer fan-in rather than each clone owning an
/// independent channel.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Sender<T> {
    pub(super) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Sends `value`. Blocks if the channel is bounded and full;
    /// returns `Err` with the value if the channel is already closed.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.shared.send(value)
    }

    /// Closes the channel: wakes every blocked sender and receiver.
    /// Idempotent.
    pub fn close(&self) {
        self.shared.close();
    }

    /// `true` while the channel is open.
    pub fn is_runnable(&self) -> bool {
        self.shared.is_runnable()
    }

    /// Number of items currently buffered.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.shared.senders.fetch_add(1, Ordering::Relaxed);
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if self.shared.senders.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.close();
        }
    }
}
