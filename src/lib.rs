//! A small structured-concurrency toolkit built on `std::thread`.
//!
//! ```text
//!   Sender<T> ---\                      /--- Receiver<T>
//!                 \                    /
//!                  [ bounded | unbounded | lock-free queue ]
//!                 /                    \
//!   Sender<T> ---/                      \--- Receiver<T>
//! ```
//!
//! Three pieces compose into most of what's here:
//!
//! - [`channel`]: multi-producer multi-consumer channels, in three
//!   flavors — [`channel::bounded`] (ring-buffer-backed, blocks when
//!   full), [`channel::unbounded`] (growable, never blocks on send),
//!   and [`channel::lockfree`] (CAS-based, no mutex anywhere).
//! - [`pool`]: a fixed-size [`pool::WorkerPool`] that dispatches
//!   submitted closures over an internal channel and hands back a
//!   [`pool::TaskHandle`] per submission.
//! - [`select`] and [`waitgroup`]: [`select::select`] waits on several
//!   channels at once and runs the first ready arm's action;
//!   [`waitgroup::WaitGroup`] lets a fan-out of work signal when the
//!   last branch has finished.
//!
//! # Example
//!
//! ```
//! use fanout::channel;
//!
//! let (tx, rx) = channel::unbounded();
//! tx.send(1).unwrap();
//! tx.send(2).unwrap();
//! tx.close();
//! assert_eq!(rx.recv(), Some(1));
//! assert_eq!(rx.recv(), Some(2));
//! assert_eq!(rx.recv(), None);
//! ```
//!
//! None of these primitives integrate with an async runtime — every
//! blocking operation parks or spins an OS thread, never a task.

pub mod channel;
pub mod pool;
pub mod select;
pub mod waitgroup;

mod queue;
mod ring;

pub use pool::{JoinError, PoolClosed, TaskHandle, WorkerPool};
pub use select::{case, case_unit, default_case, select as select_once};
pub use waitgroup::WaitGroup;
