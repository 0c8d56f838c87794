//! Throughput comparison across this crate's three channel backends
//! and `crossbeam-channel`, single producer / single consumer.
use criterion::{criterion_group, criterion_main, Criterion};
use std::thread;

use fanout::channel;

const MESSAGES: usize = 50_000;

fn bench_bounded(c: &mut Criterion) {
    c.bench_function("bounded/send_recv", |b| {
        b.iter(|| {
            let (tx, rx) = channel::bounded(1024);
            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(i).unwrap();
                }
            });
            for _ in 0..MESSAGES {
                rx.recv().unwrap();
            }
            producer.join().unwrap();
        });
    });
}

fn bench_unbounded(c: &mut Criterion) {
    c.bench_function("unbounded/send_recv", |b| {
        b.iter(|| {
            let (tx, rx) = channel::unbounded();
            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(i).unwrap();
                }
            });
            for _ in 0..MESSAGES {
                rx.recv().unwrap();
            }
            producer.join().unwrap();
        });
    });
}

fn bench_lockfree(c: &mut Criterion) {
    c.bench_function("lockfree/send_recv", |b| {
        b.iter(|| {
            let (tx, rx) = channel::lockfree();
            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(i).unwrap();
                }
            });
            for _ in 0..MESSAGES {
                rx.recv().unwrap();
            }
            producer.join().unwrap();
        });
    });
}

fn bench_crossbeam(c: &mut Criterion) {
    c.bench_function("crossbeam_channel/send_recv", |b| {
        b.iter(|| {
            let (tx, rx) = crossbeam_channel::bounded(1024);
            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(i).unwrap();
                }
            });
            for _ in 0..MESSAGES {
                rx.recv().unwrap();
            }
            producer.join().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_bounded,
    bench_unbounded,
    bench_lockfree,
    bench_crossbeam
);
criterion_main!(benches);
