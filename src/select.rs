//! Single-shot multi-channel select (C6).
//!
//! `select` busy-waits until some arm is ready, then runs exactly one
//! arm's action — it does not retry, so a caller after a steady stream
//! of events wraps it in their own `loop`. A `default` arm is always
//! ready and short-circuits the wait entirely; it is how a caller gets
//! a non-blocking poll, or a "tick" cadence by sleeping inside its own
//! action (see the ticker demo).
use crate::channel::Receiver;

/// A single arm of a [`select`] call: a channel paired with an action
/// to run on the item it yields (or with no argument, for
/// [`case_unit`]).
pub struct Case<'a> {
    poll: Box<dyn Fn() -> bool + 'a>,
    fire: Box<dyn FnOnce() -> bool + 'a>,
}

/// Builds a `select` arm whose action receives the item the channel
/// yields.
pub fn case<'a, T, F>(channel: &'a Receiver<T>, action: F) -> Case<'a>
where
    F: FnOnce(T) + 'a,
{
    let mut action = Some(action);
    Case {
        poll: Box::new(|| channel.is_readable()),
        fire: Box::new(move || match channel.try_recv() {
            Some(item) => {
                if let Some(action) = action.take() {
                    action(item);
                }
                true
            }
            None => false,
        }),
    }
}

/// Builds a `select` arm whose action ignores the item the channel
/// yields (or takes no argument at all).
pub fn case_unit<'a, T, F>(channel: &'a Receiver<T>, action: F) -> Case<'a>
where
    F: FnOnce() + 'a,
{
    let mut action = Some(action);
    Case {
        poll: Box::new(|| channel.is_readable()),
        fire: Box::new(move || match channel.try_recv() {
            Some(_item) => {
                if let Some(action) = action.take() {
                    action();
                }
                true
            }
            None => false,
        }),
    }
}

/// Builds the synthetic always-ready `default` arm. At most one may be
/// passed to a given [`select`] call.
pub fn default_case<'a, F>(action: F) -> Case<'a>
where
    F: FnOnce() + 'a,
{
    let mut action = Some(action);
    Case {
        poll: Box::new(|| true),
        fire: Box::new(move || {
            if let Some(action) = action.take() {
                action();
            }
            true
        }),
    }
}

/// Waits for at least one arm to become ready, then runs the first
/// ready arm's action, in declaration order, and returns. A `default`
/// arm (built with [`default_case`]) is always ready, so its presence
/// guarantees `select` never blocks — put it last so real arms get
/// priority when both are ready.
///
/// Panics if `cases` is empty.
pub fn select(cases: Vec<Case<'_>>) {
    assert!(!cases.is_empty(), "select requires at least one arm");
    while !cases.iter().any(|case| (case.poll)()) {}
    for case in cases {
        if (case.fire)() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    #[test]
    fn fires_the_ready_arm() {
        let (tx, rx) = channel::unbounded::<i32>();
        tx.send(7).unwrap();
        let received = AtomicI32::new(0);
        select(vec![case(&rx, |item| received.store(item, Ordering::SeqCst))]);
        assert_eq!(received.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn prefers_declaration_order_among_ready_arms() {
        let (tx_a, rx_a) = channel::unbounded::<i32>();
        let (tx_b, rx_b) = channel::unbounded::<i32>();
        tx_a.send(1).unwrap();
        tx_b.send(2).unwrap();
        let fired = AtomicI32::new(0);
        select(vec![
            case(&rx_a, |_| fired.store(1, Ordering::SeqCst)),
            case(&rx_b, |_| fired.store(2, Ordering::SeqCst)),
        ]);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_arm_fires_when_nothing_else_is_ready() {
        let (_tx, rx) = channel::unbounded::<i32>();
        let fired = AtomicBool::new(false);
        select(vec![
            case_unit(&rx, || panic!("should not fire")),
            default_case(|| fired.store(true, Ordering::SeqCst)),
        ]);
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn real_arm_wins_over_default_when_both_ready() {
        let (tx, rx) = channel::unbounded::<i32>();
        tx.send(5).unwrap();
        let fired = AtomicI32::new(0);
        select(vec![
            case(&rx, |_| fired.store(1, Ordering::SeqCst)),
            default_case(|| fired.store(2, Ordering::SeqCst)),
        ]);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
