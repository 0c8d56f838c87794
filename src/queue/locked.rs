//! Mutex+condvar thread-safe queue (C2).
//!
//! [`ThreadSafeQueue`] is a blocking MPMC FIFO: pushers block while the
//! queue is full (bounded backing only), poppers block while it is empty,
//! and [`close`](ThreadSafeQueue::close) wakes every waiter so they can
//! observe the queue is no longer runnable instead of sleeping forever.
//!
//! Blocking is implemented with [`Condvar::wait_while`], which re-checks
//! its predicate under the lock after every wakeup, so spurious wakeups
//! and the thundering herd from `notify_all` are both handled correctly.
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::queue::Backing;
use crate::ring::RingBuffer;

/// Bounded backing store: a fixed-capacity ring buffer that refuses
/// pushes once full.
pub(crate) struct Bounded<T>(RingBuffer<T>);

impl<T> Bounded<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self(RingBuffer::new(capacity))
    }
}

impl<T> Backing<T> for Bounded<T> {
    fn push(&mut self, value: T) {
        self.0.push(value);
    }

    fn pop(&mut self) -> T {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_full(&self) -> bool {
        self.0.is_full()
    }
}

/// Unbounded backing store: a growable deque that never refuses a push.
#[derive(Default)]
pub(crate) struct Unbounded<T>(VecDeque<T>);

impl<T> Backing<T> for Unbounded<T> {
    fn push(&mut self, value: T) {
        self.0.push_back(value);
    }

    fn pop(&mut self) -> T {
        self.0.pop_front().expect("pop on an empty Unbounded queue")
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_full(&self) -> bool {
        false
    }
}

struct State<T, B: Backing<T>> {
    backing: B,
    open: bool,
    _marker: std::marker::PhantomData<T>,
}

/// A blocking MPMC queue over a pluggable [`Backing`] store.
///
/// Mirrors the `ThreadSafe<Container, Mutex>` wrapper the locked channel
/// backend is built from: one mutex guards the backing store and one
/// condvar wakes waiters on every push, pop, and close.
pub(crate) struct ThreadSafeQueue<T, B: Backing<T>> {
    state: Mutex<State<T, B>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T, B: Backing<T>> ThreadSafeQueue<T, B> {
    pub(crate) fn new(backing: B) -> Self {
        Self {
            state: Mutex::new(State {
                backing,
                open: true,
                _marker: std::marker::PhantomData,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Blocks while the queue is full and open, then pushes. Returns
    /// the value back, unpushed, if the queue was closed first.
    pub(crate) fn push_back(&self, value: T) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        state = self
            .not_full
            .wait_while(state, |s| s.open && s.backing.is_full())
            .unwrap();
        if !state.open {
            return Some(value);
        }
        state.backing.push(value);
        self.not_empty.notify_all();
        None
    }

    /// Blocks while the queue is empty and open, then pops. Returns
    /// `None` once the queue is closed and drained.
    pub(crate) fn pop_front(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        state = self
            .not_empty
            .wait_while(state, |s| s.open && s.backing.len() == 0)
            .unwrap();
        if state.backing.len() == 0 {
            return None;
        }
        let value = state.backing.pop();
        self.not_full.notify_all();
        Some(value)
    }

    /// Non-blocking pop: `None` if the lock isn't immediately available
    /// or the queue is currently empty, regardless of whether it is
    /// still open.
    pub(crate) fn try_pop(&self) -> Option<T> {
        let mut state = self.state.try_lock().ok()?;
        if state.backing.len() == 0 {
            return None;
        }
        let value = state.backing.pop();
        self.not_full.notify_all();
        Some(value)
    }

    /// Marks the queue closed and wakes every blocked pusher and
    /// popper. Idempotent.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = false;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// `true` while the queue is open, i.e. still accepting pushes.
    pub(crate) fn is_runnable(&self) -> bool {
        self.state.lock().unwrap().open
    }

    /// `true` while the queue is open (a pop may eventually yield an
    /// item even if none is buffered yet), or there is buffered data
    /// to drain.
    pub(crate) fn is_readable(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.open || state.backing.len() > 0
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().unwrap().backing.len()
    }
}
