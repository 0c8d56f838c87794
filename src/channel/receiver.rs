use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::Shared;

/// The receiving half of a channel created by [`crate::channel::bounded`],
/// [`crate::channel::unbounded`], or [`crate::channel::lockfree`].
///
/// `Clone`-able: clones fan out over the same queue, so each item is
/// delivered to exactly one `recv` call across all clones, not to every
/// clone — this is a multi-consumer work queue, not a broadcast.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Receiver<T> {
    pub(super) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared }
    }

    /// Blocks until an item is available or the channel is closed and
    /// drained.
    pub fn recv(&self) -> Option<T> {
        self.shared.recv()
    }

    /// Never blocks: `None` if nothing is immediately available,
    /// regardless of whether the channel is still open.
    pub fn try_recv(&self) -> Option<T> {
        self.shared.try_recv()
    }

    /// Drains everything immediately available without blocking.
    pub fn try_iter(&self) -> TryIter<'_, T> {
        TryIter { receiver: self }
    }

    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_runnable(&self) -> bool {
        self.shared.is_runnable()
    }

    /// `true` while the channel is open (a `recv` may eventually yield
    /// an item, even with nothing buffered yet), or there is buffered
    /// data left to drain after close.
    pub fn is_readable(&self) -> bool {
        self.shared.is_readable()
    }

    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.shared.receivers.fetch_add(1, Ordering::Relaxed);
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        if self.shared.receivers.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.close();
        }
    }
}

/// Owned iterator over a [`Receiver`]: blocks on each `next()` until an
/// item arrives, then terminates once the channel is closed and drained.
impl<T> Iterator for Receiver<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

impl<T> IntoIterator for &Receiver<T> {
    type Item = T;
    type IntoIter = Receiver<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.clone()
    }
}

/// Non-blocking iterator returned by [`Receiver::try_iter`]: stops at
/// the first moment nothing is immediately available, even if the
/// channel is still open and more items could arrive later.
pub struct TryIter<'a, T> {
    receiver: &'a Receiver<T>,
}

impl<'a, T> Iterator for TryIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.try_recv()
    }
}
