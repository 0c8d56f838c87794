//! Channel facade (C4): one API over a bounded, unbounded, or lock-free
//! queue.
//!
//! [`bounded`], [`unbounded`], and [`lockfree`] all return the same
//! `(Sender<T>, Receiver<T>)` pair type; the backend living behind them
//! is an internal enum, not something the caller names. Both halves are
//! `Clone`, giving true multi-producer multi-consumer fan-out: cloning
//! a `Sender` or `Receiver` shares the same underlying queue rather than
//! creating an independent one.
//!
//! The channel closes itself once the last `Sender` *or* the last
//! `Receiver` is dropped — whichever happens first — so a consumer that
//! gives up early unblocks any producers still waiting on a full bounded
//! channel, and a producer that gives up lets consumers drain and then
//! see end-of-stream.
pub mod error;
mod receiver;
mod sender;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use error::SendError;
pub use receiver::Receiver;
pub use sender::Sender;

use crate::queue::lockfree::LockFreeQueue;
use crate::queue::locked::{Bounded, ThreadSafeQueue, Unbounded};

enum Backend<T> {
    Bounded(ThreadSafeQueue<T, Bounded<T>>),
    Unbounded(ThreadSafeQueue<T, Unbounded<T>>),
    LockFree(LockFreeQueue<T>),
}

impl<T> Backend<T> {
    fn send(&self, value: T) -> Result<(), SendError<T>> {
        match self {
            Backend::Bounded(q) => match q.push_back(value) {
                None => Ok(()),
                Some(rejected) => Err(SendError(rejected)),
            },
            Backend::Unbounded(q) => match q.push_back(value) {
                None => Ok(()),
                Some(rejected) => Err(SendError(rejected)),
            },
            Backend::LockFree(q) => match q.push(value) {
                None => Ok(()),
                Some(rejected) => Err(SendError(rejected)),
            },
        }
    }

    fn recv(&self) -> Option<T> {
        match self {
            Backend::Bounded(q) => q.pop_front(),
            Backend::Unbounded(q) => q.pop_front(),
            Backend::LockFree(q) => q.pop(),
        }
    }

    fn try_recv(&self) -> Option<T> {
        match self {
            Backend::Bounded(q) => q.try_pop(),
            Backend::Unbounded(q) => q.try_pop(),
            Backend::LockFree(q) => q.try_pop(),
        }
    }

    fn close(&self) {
        match self {
            Backend::Bounded(q) => q.close(),
            Backend::Unbounded(q) => q.close(),
            Backend::LockFree(q) => q.close(),
        }
    }

    fn is_runnable(&self) -> bool {
        match self {
            Backend::Bounded(q) => q.is_runnable(),
            Backend::Unbounded(q) => q.is_runnable(),
            Backend::LockFree(q) => q.is_runnable(),
        }
    }

    fn is_readable(&self) -> bool {
        match self {
            Backend::Bounded(q) => q.is_readable(),
            Backend::Unbounded(q) => q.is_readable(),
            Backend::LockFree(q) => q.is_readable(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Backend::Bounded(q) => q.len(),
            Backend::Unbounded(q) => q.len(),
            Backend::LockFree(q) => q.len(),
        }
    }
}

pub(crate) struct Shared<T> {
    backend: Backend<T>,
    senders: AtomicUsize,
    receivers: AtomicUsize,
}

impl<T> Shared<T> {
    pub(crate) fn send(&self, value: T) -> Result<(), SendError<T>> {
        if !self.backend.is_runnable() {
            return Err(SendError(value));
        }
        self.backend.send(value)
    }

    pub(crate) fn recv(&self) -> Option<T> {
        self.backend.recv()
    }

    pub(crate) fn try_recv(&self) -> Option<T> {
        self.backend.try_recv()
    }

    pub(crate) fn close(&self) {
        self.backend.close();
    }

    pub(crate) fn is_runnable(&self) -> bool {
        self.backend.is_runnable()
    }

    pub(crate) fn is_readable(&self) -> bool {
        self.backend.is_readable()
    }

    pub(crate) fn len(&self) -> usize {
        self.backend.len()
    }
}

fn pair<T>(backend: Backend<T>) -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        backend,
        senders: AtomicUsize::new(1),
        receivers: AtomicUsize::new(1),
    });
    (Sender::new(shared.clone()), Receiver::new(shared))
}

/// Creates a bounded channel backed by a ring buffer of the given
/// capacity. `send` blocks while the buffer is full.
pub fn bounded<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    pair(Backend::Bounded(ThreadSafeQueue::new(Bounded::new(capacity))))
}

/// Creates an unbounded channel backed by a growable deque. `send`
/// never blocks.
pub fn unbounded<T>() -> (Sender<T>, Receiver<T>) {
    pair(Backend::Unbounded(ThreadSafeQueue::new(Unbounded::default())))
}

/// Creates an unbounded, lock-free channel. `send` never blocks;
/// `recv` sleeps-and-retries rather than parking on a condvar.
pub fn lockfree<T>() -> (Sender<T>, Receiver<T>) {
    pair(Backend::LockFree(LockFreeQueue::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn bounded_conservation() {
        let (tx, rx) = bounded(4);
        for i in 0..4 {
            tx.send(i).unwrap();
        }
        tx.close();
        let received: Vec<_> = rx.into_iter().collect();
        assert_eq!(received, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unbounded_conservation() {
        let (tx, rx) = unbounded();
        for i in 0..10 {
            tx.send(i).unwrap();
        }
        tx.close();
        let received: Vec<_> = rx.into_iter().collect();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn lockfree_conservation() {
        let (tx, rx) = lockfree();
        for i in 0..10 {
            tx.send(i).unwrap();
        }
        tx.close();
        let received: Vec<_> = rx.into_iter().collect();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn send_after_close_is_rejected() {
        let (tx, _rx) = unbounded();
        tx.close();
        assert!(tx.send(1).is_err());
    }

    #[test]
    fn dropping_last_receiver_closes_channel_for_sender() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert!(tx.send(1).is_err());
    }

    #[test]
    fn dropping_last_sender_lets_receiver_drain_then_end() {
        let (tx, rx) = unbounded();
        tx.send(1).unwrap();
        drop(tx);
        assert_eq!(rx.recv(), Some(1));
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn multiple_producers_all_items_conserved() {
        let (tx, rx) = unbounded();
        let producers: Vec<_> = (0..4)
            .map(|t| {
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        tx.send(t * 50 + i).unwrap();
                    }
                })
            })
            .collect();
        drop(tx);
        for p in producers {
            p.join().unwrap();
        }
        let mut received: Vec<_> = rx.into_iter().collect();
        received.sort_unstable();
        assert_eq!(received, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn try_recv_never_blocks_on_empty_open_channel() {
        let (_tx, rx) = unbounded::<i32>();
        assert_eq!(rx.try_recv(), None);
    }
}
