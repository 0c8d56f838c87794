//! Recursively sums file sizes under a directory, fanning subdirectory
//! work out to a [`WorkerPool`] and fanning the partial sums back in
//! through a channel, closing it the moment the last outstanding
//! branch finishes.
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use fanout::channel::{self, Sender};
use fanout::{WaitGroup, WorkerPool};

/// Counts one unit of work done; closes `results` if that was the last
/// outstanding unit anywhere in the tree. Every call site that adds a
/// unit (the root call, every scheduled subdirectory task) must pair it
/// with exactly one call to `finish`, since the channel closes on
/// whichever call happens to observe the counter hit zero.
fn finish(wg: &WaitGroup, results: &Sender<u64>) {
    if wg.done() == 0 {
        results.close();
    }
}

fn walk(path: PathBuf, pool: &Arc<WorkerPool>, wg: &Arc<WaitGroup>, results: &Sender<u64>) {
    let metadata = match fs::symlink_metadata(&path) {
        Ok(metadata) => metadata,
        Err(_) => return,
    };

    if metadata.is_file() {
        let _ = results.send(metadata.len());
        return;
    }

    if !metadata.is_dir() {
        return;
    }

    let entries = match fs::read_dir(&path) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut own_total = 0u64;
    for entry in entries.flatten() {
        let entry_path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_file() {
            own_total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        } else if file_type.is_dir() {
            wg.add();
            let results = results.clone();
            let wg = wg.clone();
            let pool = pool.clone();
            // Recursion happens inside the submitted task itself, so each
            // directory level fans out onto the pool instead of blocking a
            // worker thread waiting on its children.
            let _ = pool.submit(move || {
                walk(entry_path, &pool, &wg, &results);
                wg.done();
            });
        }
    }
    let _ = results.send(own_total);
}

/// Sums the sizes of every regular file reachable from `root`.
pub fn par_sizeof_dir(root: PathBuf, pool: Arc<WorkerPool>) -> u64 {
    let (tx, rx) = channel::unbounded::<u64>();
    let wg = Arc::new(WaitGroup::new());
    wg.add();

    walk(root, &pool, &wg, &tx);
    if wg.done() == 0 {
        tx.close();
    }
    drop(tx);

    let mut total = 0u64;
    for size in &rx {
        total += size;
    }
    total
}

fn sizeof_dir(path: &Path) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return 0,
    };
    if metadata.is_file() {
        return metadata.len();
    }
    if !metadata.is_dir() {
        return 0;
    }
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| sizeof_dir(&entry.path()))
        .sum()
}

fn main() -> ExitCode {
    let Some(given) = env::args().nth(1) else {
        eprintln!("Usage: dir_size [DIR_PATH]");
        return ExitCode::FAILURE;
    };
    let path = PathBuf::from(given);
    if !path.is_dir() {
        eprintln!("invalid directory path");
        return ExitCode::FAILURE;
    }

    let serial = {
        let start = std::time::Instant::now();
        let size = sizeof_dir(&path);
        (size, start.elapsed())
    };
    println!("serial size: {} / time: {:?}", serial.0, serial.1);

    let parallel = {
        let pool = Arc::new(WorkerPool::default());
        let start = std::time::Instant::now();
        let size = par_sizeof_dir(path, pool);
        (size, start.elapsed())
    };
    println!("parallel size: {} / time: {:?}", parallel.0, parallel.1);

    ExitCode::SUCCESS
}
