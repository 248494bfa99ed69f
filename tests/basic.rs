//! Basic tests - construction, insertion and lookup through the public API

use bloomkit::decompose::{ByteSink, DefaultDecomposer};
use bloomkit::hash::{default_hash_function, Murmur3HashFunction};
use bloomkit::{Backend, BloomError, BloomFilter, BloomFilterBuilder};
use std::sync::Arc;

#[test]
fn test_basic_insert_and_find() {
    let mut filter = BloomFilter::<String>::new(100, 0.01, Backend::Dense).unwrap();

    filter.add(&"test-item".to_string());

    assert!(
        filter.contains(&"test-item".to_string()),
        "Should find the item we just added"
    );
}

#[test]
fn test_batch_operations() {
    let mut filter = BloomFilter::<String>::new(1000, 0.01, Backend::Compressed).unwrap();

    let items: Vec<String> = vec!["apple", "banana", "cherry"]
        .into_iter()
        .map(String::from)
        .collect();

    assert!(filter.add_all(&items));

    for item in &items {
        assert!(filter.contains(item), "Should find {}", item);
    }
    assert!(filter.contains_all(&items));
}

#[test]
fn test_no_false_negatives() {
    for backend in [Backend::Dense, Backend::Compressed] {
        let mut filter = BloomFilter::<u64>::new(1000, 0.01, backend).unwrap();

        for i in 0..1000 {
            filter.add(&i);
        }

        for i in 0..1000 {
            assert!(filter.contains(&i), "False negative for {} on {}", i, backend);
        }
    }
}

#[test]
fn test_reference_sizing() {
    let cases = [
        (1_000, 0.01, 9_586, 7),
        (1_000, 0.1, 4_793, 3),
        (1_000, 0.001, 14_378, 10),
        (1_000_000, 0.01, 9_585_059, 7),
    ];
    for (n, fpp, m, k) in cases {
        let filter = BloomFilter::<str>::new(n, fpp, Backend::Compressed).unwrap();
        assert_eq!(filter.num_bits(), m, "m for n={} fpp={}", n, fpp);
        assert_eq!(filter.num_hashes(), k, "k for n={} fpp={}", n, fpp);
    }
}

#[test]
fn test_invalid_construction() {
    assert!(matches!(
        BloomFilter::<str>::new(0, 0.01, Backend::Dense),
        Err(BloomError::InvalidItemCount { .. })
    ));

    let err = BloomFilter::<str>::new(100, 1.0, Backend::Dense).unwrap_err();
    assert!(format!("{err}").contains("1"));
}

#[test]
fn test_compressed_size_limit() {
    // 2^32 bits is the largest compressed filter; one more is rejected
    let result = BloomFilter::<str>::with_params(
        (1usize << 32) + 1,
        3,
        Backend::Compressed,
        default_hash_function(),
        Arc::new(DefaultDecomposer),
    );
    assert!(matches!(result, Err(BloomError::InvalidFilterSize { .. })));
}

#[test]
fn test_add_return_value() {
    let mut filter = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    assert!(filter.add("first"));
    assert!(!filter.add("first"), "repeat add should change no bits");
    assert!(!filter.add_all(["first"]));
}

#[test]
fn test_bytes_match_string_items() {
    let mut filter = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    filter.add("bytes");
    assert!(filter.contains_bytes(b"bytes"));

    let mut raw = BloomFilter::<[u8]>::new(1_000, 0.01, Backend::Dense).unwrap();
    raw.add(b"bytes");
    assert_eq!(raw.bits(), filter.bits());
}

#[test]
fn test_struct_items_with_closure_decomposer() {
    struct Order {
        id: u64,
        region: &'static str,
    }

    let decompose_order = |order: &Order, sink: &mut ByteSink| {
        sink.put_u64(order.id).put_str(order.region);
    };
    let mut orders = BloomFilter::<Order>::with_parts(
        1_000,
        0.01,
        Backend::Dense,
        Arc::new(Murmur3HashFunction::new()),
        Arc::new(decompose_order),
    )
    .unwrap();

    orders.add(&Order { id: 1, region: "eu" });
    assert!(orders.contains(&Order { id: 1, region: "eu" }));
    assert!(!orders.contains(&Order { id: 1, region: "us" }));
}

#[test]
fn test_statistics() {
    let mut filter = BloomFilter::<u32>::new(10_000, 0.01, Backend::Dense).unwrap();
    assert_eq!(filter.count_set_bits(), 0);
    assert_eq!(filter.fill_ratio(), 0.0);
    assert_eq!(filter.estimated_cardinality(), 0);

    for i in 0..1_000u32 {
        filter.add(&i);
    }
    assert!(filter.count_set_bits() <= 1_000 * filter.num_hashes());
    let estimate = filter.estimated_cardinality();
    assert!((950..=1_050).contains(&estimate), "estimate {}", estimate);
    assert!(filter.memory_usage() >= filter.num_bits() / 8);
}

#[test]
fn test_clear_then_reuse() {
    let mut filter = BloomFilter::<str>::new(100, 0.01, Backend::Compressed).unwrap();
    filter.add("a");
    filter.clear();
    assert!(filter.is_empty());
    assert!(filter.add("a"));
}

#[test]
fn test_close_is_idempotent_and_drop_safe() {
    let mut filter = BloomFilter::<str>::new(100, 0.01, Backend::Dense).unwrap();
    filter.add("a");
    filter.close().unwrap();
    filter.close().unwrap();
    assert!(filter.is_closed());
    assert!(!filter.contains("a"));
    drop(filter);

    // dropped without an explicit close
    let filter = BloomFilter::<str>::new(100, 0.01, Backend::Compressed).unwrap();
    drop(filter);
}

#[test]
fn test_charset_round_trip() {
    let mut filter = BloomFilter::<str>::new(100, 0.01, Backend::Dense).unwrap();
    filter.set_charset("utf-16le").unwrap();
    assert_eq!(filter.charset().to_string(), "UTF-16LE");

    let err = filter.set_charset("no-such-charset").unwrap_err();
    assert!(format!("{err}").contains("no-such-charset"));
}

#[test]
fn test_builder_matches_constructor() {
    let built: BloomFilter<str> = BloomFilterBuilder::new()
        .expected_insertions(5_000)
        .false_positive_probability(0.02)
        .backend(Backend::Compressed)
        .build()
        .unwrap();
    let direct = BloomFilter::<str>::new(5_000, 0.02, Backend::Compressed).unwrap();

    assert_eq!(built.num_bits(), direct.num_bits());
    assert_eq!(built.num_hashes(), direct.num_hashes());
    assert!(built.is_compatible_with(&direct));
}
