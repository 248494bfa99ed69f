//! Dense and compressed backends must be interchangeable bit for bit

use bloomkit::core::{BitArray, BitStorage};
use bloomkit::{Backend, BloomError, BloomFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_keys(seed: u64, count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| format!("{:032x}", rng.gen::<u128>()))
        .collect()
}

#[test]
fn test_backends_agree_bit_for_bit() {
    let mut dense = BloomFilter::<str>::new(50_000, 0.01, Backend::Dense).unwrap();
    let mut compressed = BloomFilter::<str>::new(50_000, 0.01, Backend::Compressed).unwrap();

    for key in random_keys(7, 20_000) {
        assert_eq!(dense.add(&key), compressed.add(&key));
    }

    let dense_ones: Vec<usize> = dense.bits().iter_ones().collect();
    let compressed_ones: Vec<usize> = compressed.bits().iter_ones().collect();
    assert_eq!(dense_ones, compressed_ones);

    for index in 0..dense.num_bits() {
        assert_eq!(dense.bits().get(index), compressed.bits().get(index));
    }

    for probe in random_keys(8, 20_000) {
        assert_eq!(dense.contains(&probe), compressed.contains(&probe));
    }
    assert_eq!(dense.count_set_bits(), compressed.count_set_bits());
}

#[test]
fn test_cross_backend_merge_is_unsupported() {
    let mut dense = BloomFilter::<str>::new(1_000, 0.01, Backend::Dense).unwrap();
    let mut compressed = BloomFilter::<str>::new(1_000, 0.01, Backend::Compressed).unwrap();
    dense.add("d");
    compressed.add("c");

    assert!(dense.is_compatible_with(&compressed));

    let before = dense.bits().clone();
    let err = dense.merge(&compressed).unwrap_err();
    assert!(matches!(err, BloomError::UnsupportedOperation { .. }));
    assert_eq!(dense.bits(), &before);

    let err = compressed.intersect(&dense).unwrap_err();
    assert!(matches!(err, BloomError::UnsupportedOperation { .. }));
    assert!(compressed.contains("c"));
}

#[test]
fn test_storage_level_mismatch() {
    let mut dense = BitStorage::new(Backend::Dense, 128).unwrap();
    let compressed = BitStorage::new(Backend::Compressed, 128).unwrap();

    let err = dense.or(&compressed).unwrap_err();
    assert!(format!("{err}").contains("dense and compressed"));
}

#[test]
fn test_compressed_set_get_clear_every_index() {
    const SIZE: usize = 1_000_000;
    let mut bits = BitStorage::new(Backend::Compressed, SIZE).unwrap();

    for index in 0..SIZE {
        assert!(!bits.get(index));
        assert!(bits.set(index));
        assert!(bits.get(index));
        bits.clear(index);
        assert!(!bits.get(index));
    }
    assert_eq!(bits.count_ones(), 0);
}

#[test]
fn test_compressed_is_smaller_when_sparse() {
    let mut dense = BloomFilter::<str>::new(1_000_000, 0.01, Backend::Dense).unwrap();
    let mut compressed = BloomFilter::<str>::new(1_000_000, 0.01, Backend::Compressed).unwrap();
    for key in random_keys(1, 100) {
        dense.add(&key);
        compressed.add(&key);
    }
    assert!(compressed.memory_usage() < dense.memory_usage() / 10);
}

#[test]
fn test_backend_names() {
    assert_eq!("roaring".parse::<Backend>().unwrap(), Backend::Compressed);
    assert_eq!("BitSet".parse::<Backend>().unwrap(), Backend::Dense);
    assert_eq!(Backend::default(), Backend::Dense);
    assert!("sparse".parse::<Backend>().is_err());
}
