//! Observed false positive rates stay near the configured target

use bloomkit::decompose::DefaultDecomposer;
use bloomkit::hash::{HashFunction, Murmur3HashFunction};
use bloomkit::{Backend, BloomFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

/// Random 128-bit keys rendered like UUIDs, disjoint from `exclude`.
fn uuid_like_keys(rng: &mut StdRng, count: usize, exclude: &HashSet<String>) -> Vec<String> {
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let value: u128 = rng.gen();
        let key = format!(
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (value >> 96) as u32,
            (value >> 80) as u16,
            (value >> 64) as u16,
            (value >> 48) as u16,
            value & 0xffff_ffff_ffff
        );
        if !exclude.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn observed_rate(filter: &BloomFilter<str>, probes: &[String]) -> f64 {
    let hits = probes.iter().filter(|probe| filter.contains(probe)).count();
    hits as f64 / probes.len() as f64
}

#[test]
fn test_rate_at_capacity_one_million() {
    const N: usize = 1_000_000;
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let inserted = uuid_like_keys(&mut rng, N, &HashSet::new());
    let inserted_set: HashSet<String> = inserted.iter().cloned().collect();
    let probes = uuid_like_keys(&mut rng, N, &inserted_set);

    let mut filter = BloomFilter::<str>::new(N, 0.01, Backend::Dense).unwrap();
    for key in &inserted {
        filter.add(key);
    }

    assert!(inserted.iter().all(|key| filter.contains(key)));
    let rate = observed_rate(&filter, &probes);
    assert!(rate < 0.02, "observed false positive rate {}", rate);
}

#[test]
fn test_rate_for_several_targets() {
    for (fpp, backend) in [
        (0.1, Backend::Dense),
        (0.01, Backend::Compressed),
        (0.001, Backend::Dense),
    ] {
        let mut rng = StdRng::seed_from_u64(42);
        let inserted = uuid_like_keys(&mut rng, 20_000, &HashSet::new());
        let inserted_set: HashSet<String> = inserted.iter().cloned().collect();
        let probes = uuid_like_keys(&mut rng, 100_000, &inserted_set);

        let mut filter = BloomFilter::<str>::new(20_000, fpp, backend).unwrap();
        for key in &inserted {
            filter.add(key);
        }

        let rate = observed_rate(&filter, &probes);
        assert!(rate < fpp * 2.0, "fpp {} observed {}", fpp, rate);
        let theoretical = filter.false_positive_probability(inserted.len());
        assert!((theoretical - fpp).abs() < fpp * 0.2, "fpp {} theoretical {}", fpp, theoretical);
    }
}

#[test]
fn test_rate_grows_past_capacity() {
    let mut rng = StdRng::seed_from_u64(3);
    let keys = uuid_like_keys(&mut rng, 40_000, &HashSet::new());
    let (inserted, probes) = keys.split_at(20_000);

    let mut filter = BloomFilter::<str>::new(5_000, 0.01, Backend::Dense).unwrap();
    for key in inserted {
        filter.add(key);
    }

    let rate = observed_rate(&filter, probes);
    assert!(rate > 0.1, "overfilled filter observed {}", rate);
    assert!(filter.fill_ratio() > 0.9);
}

#[test]
fn test_seeded_hash_functions_disagree() {
    let seeded = |seed| {
        let hasher: Arc<dyn HashFunction> = Arc::new(Murmur3HashFunction::with_seed(seed));
        BloomFilter::<str>::with_parts(1_000, 0.01, Backend::Dense, hasher, Arc::new(DefaultDecomposer))
            .unwrap()
    };
    let mut a = seeded(1);
    let mut b = seeded(2);
    a.add("same");
    b.add("same");

    assert!(a.is_compatible_with(&b));
    assert_ne!(a.bits(), b.bits());
}
