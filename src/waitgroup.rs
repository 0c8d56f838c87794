//! Counting wait group (C6).
use std::sync::atomic::{AtomicUsize, Ordering};

/// A counter that lets one or more threads wait for a group of tasks
/// to finish. Unlike `std::sync::Barrier`, the expected count does not
/// need to be known up front — callers `add` as work is discovered and
/// `done` as it completes, which is what lets a fan-out/fan-in pipeline
/// (see the directory-size demo) close its result channel the moment
/// the last branch finishes, without knowing the tree shape in advance.
#[derive(Default)]
pub struct WaitGroup {
    count: AtomicUsize,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// Registers one more outstanding unit of work. Returns the new
    /// count.
    pub fn add(&self) -> usize {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Marks one unit of work complete. Returns the new count; a
    /// return of `0` means this was the last outstanding unit.
    ///
    /// # Panics (debug only)
    /// Panics if called more times than [`add`](Self::add) — a
    /// balanced-calls contract violation that would otherwise wrap the
    /// counter and hang every future [`wait`](Self::wait) forever.
    pub fn done(&self) -> usize {
        let prev = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "WaitGroup::done called more often than add");
        prev - 1
    }

    /// Spins, yielding to the scheduler between checks, until the
    /// count reaches zero.
    pub fn wait(&self) {
        while self.count.load(Ordering::Acquire) != 0 {
            std::thread::yield_now();
        }
    }

    /// Waits, then runs `f`, returning its result.
    pub fn wait_then<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.wait();
        f()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wait_returns_once_all_added_work_is_done() {
        let wg = Arc::new(WaitGroup::new());
        for _ in 0..4 {
            wg.add();
        }
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let wg = wg.clone();
                thread::spawn(move || {
                    wg.done();
                })
            })
            .collect();
        wg.wait();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn done_returning_zero_signals_last_completion() {
        let wg = WaitGroup::new();
        wg.add();
        wg.add();
        assert_eq!(wg.done(), 1);
        assert_eq!(wg.done(), 0);
    }

    #[test]
    fn wait_then_runs_closure_after_waiting() {
        let wg = WaitGroup::new();
        wg.add();
        wg.done();
        let result = wg.wait_then(|| 42);
        assert_eq!(result, 42);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn done_without_matching_add_panics_in_debug() {
        let wg = WaitGroup::new();
        wg.done();
    }
}
