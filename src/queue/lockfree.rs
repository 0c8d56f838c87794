//! Lock-free MPMC singly-linked queue (C3).
//!
//! A head-pointer/tail-pointer queue driven entirely by CAS, with a
//! `runnable` liveness flag standing in for a mutex's "open" bit. The
//! design favors simplicity over strict linearizability: pushers race
//! on the tail CAS and poppers race on the head CAS, but there is a
//! brief window where a pusher has won the tail CAS and not yet linked
//! `prev.next`, during which the queue looks empty to a racing popper.
//! [`pop`](LockFreeQueue::pop) papers over that window with a short
//! sleep-then-retry loop rather than a fence, on the theory that this
//! queue's callers (the channel facade, the worker pool) already treat
//! "nothing ready yet" and "genuinely empty" as indistinguishable.
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_utils::CachePadded;

/// Delay between pop retries: long enough on most platforms, but macOS's
/// scheduler has much coarser sleep granularity, so it gets a longer one
/// to avoid spinning hot while waiting on the OS to honor a short sleep.
#[cfg(target_os = "macos")]
pub(crate) const PREVENT_DEADLOCK: Duration = Duration::from_micros(300);
#[cfg(not(target_os = "macos"))]
pub(crate) const PREVENT_DEADLOCK: Duration = Duration::from_micros(5);

struct Node<T> {
    data: Option<T>,
    next: AtomicPtr<Node<T>>,
}

impl<T> Node<T> {
    fn new(data: T) -> *mut Self {
        Box::into_raw(Box::new(Self {
            data: Some(data),
            next: AtomicPtr::new(ptr::null_mut()),
        }))
    }
}

/// A lock-free MPMC queue with `close()`-then-drain semantics.
///
/// Grounded on the bare head/tail CAS queue described for the lock-free
/// channel backend: no dummy node, immediate reclamation by the popping
/// thread, `Relaxed` counters and liveness flag, `AcqRel`/`Acquire` on
/// the pointer CAS.
pub(crate) struct LockFreeQueue<T> {
    head: CachePadded<AtomicPtr<Node<T>>>,
    tail: CachePadded<AtomicPtr<Node<T>>>,
    size: CachePadded<AtomicUsize>,
    runnable: CachePadded<AtomicBool>,
}

unsafe impl<T: Send> Send for LockFreeQueue<T> {}
unsafe impl<T: Send> Sync for LockFreeQueue<T> {}

impl<T> LockFreeQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            head: CachePadded::new(AtomicPtr::new(ptr::null_mut())),
            tail: CachePadded::new(AtomicPtr::new(ptr::null_mut())),
            size: CachePadded::new(AtomicUsize::new(0)),
            runnable: CachePadded::new(AtomicBool::new(true)),
        }
    }

    /// Enqueues `value`. Returns it back, unqueued, if the queue was
    /// already closed — mirrors the no-send-after-close behavior of the
    /// locked backend, which would otherwise block forever on a queue
    /// nobody will drain.
    pub(crate) fn push(&self, value: T) -> Option<T> {
        if !self.runnable.load(Ordering::Relaxed) {
            return Some(value);
        }
        let node = Node::new(value);
        loop {
            let prev = self.tail.load(Ordering::Acquire);
            if self
                .tail
                .compare_exchange(prev, node, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if prev.is_null() {
                    self.head.store(node, Ordering::Release);
                } else {
                    // Safety: `prev` was the tail and no other thread frees
                    // a node except the popper that has already advanced
                    // head past it, which cannot be `prev` since `prev`
                    // was still reachable as tail an instant ago.
                    unsafe { (*prev).next.store(node, Ordering::Release) };
                }
                self.size.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        }
    }

    /// Blocks (via sleep-then-retry) until an item is available or the
    /// queue is closed and drained.
    pub(crate) fn pop(&self) -> Option<T> {
        loop {
            thread::sleep(PREVENT_DEADLOCK);
            let node = self.head.load(Ordering::Acquire);
            if node.is_null() {
                if !self.is_readable() {
                    return None;
                }
                continue;
            }
            // Safety: `node` was read from `head` and not yet freed; only
            // the thread that wins the CAS below may free it.
            let next = unsafe { (*node).next.load(Ordering::Acquire) };
            if self
                .head
                .compare_exchange(node, next, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }
            if next.is_null() {
                let _ = self.tail.compare_exchange(
                    node,
                    ptr::null_mut(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
            }
            self.size.fetch_sub(1, Ordering::Relaxed);
            // Safety: this thread won the head CAS, so it has sole
            // ownership of `node` and is the only thread that will ever
            // free it.
            let mut boxed = unsafe { Box::from_raw(node) };
            return boxed.data.take();
        }
    }

    /// One non-blocking attempt at the CAS step of [`pop`](Self::pop).
    /// Returns `None` both on a transient miss and on closed+drained,
    /// indistinguishably — callers that need to tell the two apart
    /// should check [`is_readable`](Self::is_readable) first.
    pub(crate) fn try_pop(&self) -> Option<T> {
        let node = self.head.load(Ordering::Acquire);
        if node.is_null() {
            return None;
        }
        let next = unsafe { (*node).next.load(Ordering::Acquire) };
        if self
            .head
            .compare_exchange(node, next, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        if next.is_null() {
            let _ =
                self.tail
                    .compare_exchange(node, ptr::null_mut(), Ordering::AcqRel, Ordering::Acquire);
        }
        self.size.fetch_sub(1, Ordering::Relaxed);
        let mut boxed = unsafe { Box::from_raw(node) };
        boxed.data.take()
    }

    pub(crate) fn close(&self) {
        self.runnable.store(false, Ordering::Relaxed);
    }

    pub(crate) fn is_runnable(&self) -> bool {
        self.runnable.load(Ordering::Relaxed)
    }

    /// `true` if the queue is still open, or still has nodes to drain.
    pub(crate) fn is_readable(&self) -> bool {
        self.is_runnable() || !self.head.load(Ordering::Acquire).is_null()
    }

    pub(crate) fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}

impl<T> Drop for LockFreeQueue<T> {
    fn drop(&mut self) {
        let mut node = *self.head.get_mut();
        while !node.is_null() {
            // Safety: sole owner at drop time, nodes form a simple chain.
            let boxed = unsafe { Box::from_raw(node) };
            node = boxed.next.load(Ordering::Relaxed);
        }
    }
}
