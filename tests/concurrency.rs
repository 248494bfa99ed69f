//! Shared filter behavior under concurrent access

#![cfg(feature = "concurrent")]

use bloomkit::{Backend, BloomError, BloomFilter, SharedBloomFilter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_adds_are_all_visible() {
    let filter = Arc::new(SharedBloomFilter::<u64>::new(80_000, 0.01, Backend::Dense).unwrap());

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for i in 0..10_000 {
                    filter.add(&(t * 10_000 + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!((0..80_000u64).all(|i| filter.contains(&i)));
    let estimate = filter.estimated_cardinality() as f64;
    assert!((estimate - 80_000.0).abs() < 4_000.0, "estimate {}", estimate);
}

#[test]
fn test_readers_run_alongside_writers() {
    let filter = Arc::new(SharedBloomFilter::<str>::new(10_000, 0.01, Backend::Compressed).unwrap());
    filter.add("always-there");
    let done = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for _ in 0..4 {
            let (filter, done) = (Arc::clone(&filter), Arc::clone(&done));
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    assert!(filter.contains("always-there"));
                }
            });
        }

        let writer = Arc::clone(&filter);
        scope.spawn(move || {
            for i in 0..5_000 {
                writer.add(&format!("key-{}", i));
            }
            done.store(true, Ordering::Release);
        });
    });

    assert!((0..5_000).all(|i| filter.contains(&format!("key-{}", i))));
}

#[test]
fn test_opposing_merges_do_not_deadlock() {
    let a = Arc::new(SharedBloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap());
    let b = Arc::new(SharedBloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap());
    a.add("from-a");
    b.add("from-b");

    thread::scope(|scope| {
        for round in 0..16 {
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            scope.spawn(move || {
                for _ in 0..100 {
                    if round % 2 == 0 {
                        a.merge(&b).unwrap();
                        assert!(a.maybe_superset_of(&b).is_ok());
                    } else {
                        b.intersect(&a).unwrap();
                        assert!(b.maybe_subset_of(&a).is_ok());
                    }
                }
            });
        }
    });

    assert!(a.contains("from-a"));
}

#[test]
fn test_self_merge_is_rejected() {
    let filter = SharedBloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    filter.add("x");

    let err = filter.merge(&filter).unwrap_err();
    assert!(matches!(err, BloomError::IncompatibleFilters { ref reason } if reason == "self-merge"));
    assert!(filter.maybe_subset_of(&filter).unwrap());
}

#[test]
fn test_shared_merges_plain_filter() {
    let shared = SharedBloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    let mut plain = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    plain.add("plain");

    shared.merge_filter(&plain).unwrap();
    assert!(shared.contains("plain"));

    let wrong_backend = BloomFilter::<str>::new(1_000, 0.01, Backend::Compressed).unwrap();
    assert!(matches!(
        shared.intersect_filter(&wrong_backend),
        Err(BloomError::UnsupportedOperation { .. })
    ));
    assert!(shared.contains("plain"));
}

#[test]
fn test_filter_moves_between_threads() {
    let mut filter = BloomFilter::<String>::new(1_000, 0.01, Backend::Compressed).unwrap();
    filter.add(&"before".to_string());

    let filter = thread::spawn(move || {
        filter.add(&"inside".to_string());
        filter
    })
    .join()
    .unwrap();

    assert!(filter.contains(&"before".to_string()));
    assert!(filter.contains(&"inside".to_string()));
}
