//! `select` over a repeating tick channel and a one-shot timeout,
//! falling through to a `default` arm when neither is ready yet.
use std::thread;
use std::time::Duration;

use fanout::channel::{self, Receiver};
use fanout::select::{case, case_unit, default_case, select};
use fanout::WorkerPool;

/// Spawns a background task that pushes a tick every `period` until the
/// returned channel is closed.
fn ticker(pool: &WorkerPool, period: Duration) -> Receiver<()> {
    let (tx, rx) = channel::unbounded();
    let _ = pool.submit(move || {
        while tx.is_runnable() {
            thread::sleep(period);
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Spawns a background task that fires once after `delay`.
fn after(pool: &WorkerPool, delay: Duration) -> Receiver<()> {
    let (tx, rx) = channel::unbounded();
    let _ = pool.submit(move || {
        thread::sleep(delay);
        let _ = tx.send(());
    });
    rx
}

fn main() {
    let pool = WorkerPool::new(2);
    let tick = ticker(&pool, Duration::from_millis(100));
    let boom = after(&pool, Duration::from_millis(500));

    let mut running = true;
    while running {
        select(vec![
            case_unit(&tick, || println!("tick.")),
            case_unit(&boom, || {
                println!("boom!");
                running = false;
            }),
            default_case(|| {
                print!(".");
                thread::sleep(Duration::from_millis(50));
            }),
        ]);
    }
    tick.close();
}
