//! Concurrent storage access tests
//!
//! Several `cart` processes can touch the same data directory at once. Each
//! thread here opens its own `JsonFileStorage`, like a separate process would,
//! and the writes must serialize through the sidecar lock file.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use shopcart_core::adapters::json_file::STORAGE_FILENAME;
use shopcart_core::adapters::JsonFileStorage;
use shopcart_core::ports::KeyValueStorage;

/// Keep this realistic: a shell plus a couple of one-shot commands
const THREAD_COUNT: usize = 4;

const ITERATIONS_PER_THREAD: usize = 5;

/// Writers on separate keys never lose each other's slots
#[test]
fn test_concurrent_writers_keep_every_key() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let error_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            let error_count = Arc::clone(&error_count);

            thread::spawn(move || {
                let storage = JsonFileStorage::new(&dir).unwrap();
                barrier.wait();

                for i in 0..ITERATIONS_PER_THREAD {
                    if let Err(e) = storage.set(&format!("slot-{}", thread_id), &i.to_string()) {
                        eprintln!("Thread {} write {} failed: {}", thread_id, i, e);
                        error_count.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(error_count.load(Ordering::SeqCst), 0);

    let storage = JsonFileStorage::new(&dir).unwrap();
    let last = (ITERATIONS_PER_THREAD - 1).to_string();
    for thread_id in 0..THREAD_COUNT {
        assert_eq!(
            storage.get(&format!("slot-{}", thread_id)).unwrap(),
            Some(last.clone()),
            "slot-{} lost an update",
            thread_id
        );
    }
}

/// Readers running alongside a writer always see a complete file
#[test]
fn test_readers_never_see_partial_writes() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let big = "x".repeat(64 * 1024);

    JsonFileStorage::new(&dir).unwrap().set("cart", &big).unwrap();

    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let dir = dir.clone();
        let big = big.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let storage = JsonFileStorage::new(&dir).unwrap();
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                storage.set("cart", &big).unwrap();
            }
        })
    };

    let reader = {
        let dir = dir.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let storage = JsonFileStorage::new(&dir).unwrap();
            barrier.wait();
            for _ in 0..ITERATIONS_PER_THREAD {
                let value = storage.get("cart").unwrap();
                assert_eq!(value.map(|v| v.len()), Some(64 * 1024));
            }
        })
    };

    writer.join().expect("Writer panicked");
    reader.join().expect("Reader panicked");

    let content = std::fs::read_to_string(dir.join(STORAGE_FILENAME)).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
}
