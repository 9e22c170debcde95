//! Correctness and invariant tests for freqsketch
//!
//! These tests verify the frequency-bound invariants, merge semantics and
//! the documented scenarios end to end. They complement the unit tests in
//! each module by focusing on properties that must always hold.
//!
//! Set `RUST_LOG=freqsketch=debug` to see rebalance events.

use std::collections::HashMap;

use freqsketch::frequency::{Counter, CounterConfig, FrequentItems};
use freqsketch::select;
use freqsketch::traits::{FrequencySketch, HeavyHitters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Pareto};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded<K: std::hash::Hash + Eq>(capacity: usize, seed: u64) -> Counter<K> {
    Counter::with_seed(CounterConfig::new(capacity), seed).unwrap()
}

/// Assert every key's true count lies within its bounds and the bound width is the offset
fn assert_bounds_hold(counter: &Counter<u64>, truth: &HashMap<u64, u64>) {
    for (&key, &count) in truth {
        let bounds = counter.frequency(&key);
        assert!(
            bounds.contains(count),
            "key {} has true count {} outside bounds {:?}",
            key,
            count,
            bounds
        );
        assert_eq!(bounds.width(), counter.offset());
    }
}

// ============================================================================
// Selector
// ============================================================================

mod selector {
    use super::*;

    #[test]
    fn matches_sorted_for_every_rank() {
        let mut rng = StdRng::seed_from_u64(17);
        let data: Vec<u64> = (0..128).map(|_| rng.gen_range(0..=32)).collect();
        let mut truth = data.clone();
        truth.sort_unstable();

        let mut scratch = data.clone();
        for k in 0..data.len() {
            assert_eq!(select(&mut scratch, k).unwrap(), truth[k]);
        }
    }

    #[test]
    fn rejects_out_of_range_rank() {
        let mut data = vec![4u64, 2, 9];
        assert!(select(&mut data, 3).is_err());
        assert!(select(&mut data, usize::MAX).is_err());
    }
}

// ============================================================================
// Counter
// ============================================================================

mod counter {
    use super::*;

    #[test]
    fn exact_without_eviction() {
        let mut counter = seeded::<u64>(1024, 1);
        let mut rng = StdRng::seed_from_u64(2);
        let mut truth = HashMap::new();

        for _ in 0..(1 << 12) {
            let key = rng.gen_range(0..1024u64);
            let weight = rng.gen_range(0..=(1u64 << 20));
            counter.update(key, weight);
            *truth.entry(key).or_insert(0) += weight;
        }

        assert_eq!(counter.offset(), 0);
        for (key, bounds) in counter.items() {
            assert!(bounds.is_exact());
            assert_eq!(bounds.lower, truth[key]);
        }
    }

    #[test]
    fn bounds_hold_under_eviction() {
        init_tracing();
        let config = CounterConfig::new(32).sample_size(16).order(4);
        let mut counter = Counter::with_seed(config, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let mut truth = HashMap::new();

        for _ in 0..20_000 {
            let key = rng.gen_range(0..500u64);
            let weight = rng.gen_range(1..100u64);
            counter.update(key, weight);
            *truth.entry(key).or_insert(0) += weight;
            assert!(counter.num_tracked() <= 32);
        }

        assert!(counter.offset() > 0);
        assert_bounds_hold(&counter, &truth);
    }

    #[test]
    fn length_is_total_weight() {
        let mut counter = seeded::<u64>(8, 9);
        let mut total = 0;
        for i in 0..5_000u64 {
            let weight = (i * 7) % 31;
            counter.update(i % 101, weight);
            total += weight;
        }
        assert_eq!(counter.len(), total);
    }

    #[test]
    fn top_k_scenario() {
        let mut counter = seeded::<String>(5, 21);
        counter.update("foo".to_string(), 100);
        for i in 0..5u64 {
            counter.update(i.to_string(), (i + 1) * 1000);
        }

        assert!(!counter.contains("foo"));
        assert!(counter.contains("4"));
        assert!(counter.offset() >= 100);
        assert_eq!(counter.frequency("foo"), (0, counter.offset()));
    }

    #[test]
    fn pareto_top_ten() {
        init_tracing();
        let mut counter = seeded::<u64>(128, 0x5eed);
        let mut rng = StdRng::seed_from_u64(0xdecaf);
        let pareto = Pareto::new(1.0, 0.7).unwrap();
        let mut truth: HashMap<u64, u64> = HashMap::new();

        for _ in 0..(1 << 15) {
            let key = pareto.sample(&mut rng) as u64;
            let weight = rng.gen_range(0..=(1u64 << 20));
            counter.update(key, weight);
            *truth.entry(key).or_insert(0) += weight;
        }
        assert!(truth.len() > 128);

        let mut expected: Vec<_> = truth.iter().map(|(&k, &v)| (k, v)).collect();
        expected.sort_by(|a, b| b.1.cmp(&a.1));
        let estimated = counter.top_k(10);

        for ((true_key, true_count), (key, bounds)) in expected.iter().zip(&estimated) {
            assert_eq!(true_key, key);
            let error = true_count.abs_diff(bounds.lower) as f64;
            assert!(
                error <= 0.15 * *true_count as f64,
                "key {} estimated {} vs true {}",
                key,
                bounds.lower,
                true_count
            );
        }
        assert_bounds_hold(&counter, &truth);
    }

    #[test]
    fn clear_resets_completely() {
        let mut counter = seeded::<u64>(4, 3);
        for i in 0..100u64 {
            counter.update(i, i + 1);
        }

        counter.clear();

        assert_eq!(counter.num_tracked(), 0);
        assert_eq!(counter.len(), 0);
        assert_eq!(counter.offset(), 0);
        assert!(!counter.contains(&99));
    }

    #[test]
    fn signed_updates() {
        let mut counter = seeded::<&str>(4, 3);
        counter.try_update("a", 10).unwrap();
        counter.try_update("a", 0).unwrap();
        assert!(counter.try_update("a", i64::MIN).is_err());
        assert_eq!(counter.frequency("a"), (10, 10));
        assert_eq!(counter.len(), 10);
    }
}

// ============================================================================
// Merge
// ============================================================================

mod merge {
    use super::*;

    #[test]
    fn scenario_from_two_counters() {
        let mut a = seeded::<&str>(16, 1);
        let mut b = seeded::<&str>(16, 2);
        a.update("foo", 100);
        b.update("foo", 100);
        b.update("bar", 100);

        let mut merged = a.clone();
        merged.merge(&b);

        assert_eq!(merged.frequency("foo"), (200, 200));
        assert_eq!(merged.frequency("bar"), (100, 100));
        assert_eq!(a.frequency("foo"), (100, 100));
    }

    #[test]
    fn length_is_sum_of_inputs() {
        let mut a = seeded::<u64>(16, 1);
        let mut b = seeded::<u64>(8, 2);
        for i in 0..1_000u64 {
            a.update(i % 40, 3);
            b.update(i % 70, 5);
        }
        let (len_a, len_b) = (a.len(), b.len());

        a.merge(&b);

        assert_eq!(a.len(), len_a + len_b);
        assert!(a.num_tracked() <= 16);
    }

    #[test]
    fn bounds_hold_across_merge() {
        let config = CounterConfig::new(24).sample_size(12).order(6);
        let mut a = Counter::with_seed(config, 31).unwrap();
        let mut b = Counter::with_seed(config, 32).unwrap();
        let mut rng = StdRng::seed_from_u64(33);
        let mut truth = HashMap::new();

        for i in 0..10_000u64 {
            let key = rng.gen_range(0..200u64);
            let weight = rng.gen_range(1..50u64);
            if i % 2 == 0 {
                a.update(key, weight);
            } else {
                b.update(key, weight);
            }
            *truth.entry(key).or_insert(0) += weight;
        }

        a.merge(&b);

        assert_bounds_hold(&a, &truth);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut counter = seeded::<u64>(4, 8);
        for i in 0..50u64 {
            counter.update(i % 9, i + 1);
        }
        let before = counter.clone();

        counter.merge(&seeded(4, 9));

        assert_eq!(counter.len(), before.len());
        assert_eq!(counter.offset(), before.offset());
        assert_eq!(counter.num_tracked(), before.num_tracked());
        for (key, bounds) in before.items() {
            assert_eq!(counter.frequency(key), bounds);
        }
    }

    #[test]
    fn merge_empty_into_empty() {
        let mut a = seeded::<u64>(4, 1);
        a.merge(&seeded(4, 2));
        assert!(a.is_empty());
        assert_eq!(a.offset(), 0);
    }

    #[test]
    fn sharded_ingestion() {
        // One counter per worker, merged over a channel
        let (tx, rx) = std::sync::mpsc::channel();
        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    let mut counter = seeded::<u64>(64, worker);
                    for i in 0..1_000u64 {
                        counter.update(i % 10, 1);
                    }
                    tx.send(counter).unwrap();
                })
            })
            .collect();
        drop(tx);

        let mut total = seeded::<u64>(64, 99);
        for counter in rx {
            total.merge(&counter);
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(total.len(), 4_000);
        for key in 0..10u64 {
            assert_eq!(total.frequency(&key), (400, 400));
        }
    }
}

// ============================================================================
// FrequentItems
// ============================================================================

mod frequent_items {
    use super::*;

    #[test]
    fn union_leaves_inputs_untouched() {
        let mut s = FrequentItems::with_counter(seeded::<&str>(8, 1));
        let mut o = FrequentItems::with_counter(seeded::<&str>(8, 2));
        s.update(&"foo", 100);
        o.update(&"foo", 100);

        let mut m = s.union(&o).unwrap();
        assert_eq!(s.frequency_of(&"foo"), (100, 100));
        assert_eq!(m.len(), 200);
        assert_eq!(m.frequency_of(&"foo"), (200, 200));

        m.update(&"bar", 100);
        s.merge_into(&m).unwrap();
        assert_eq!(s.frequency_of(&"foo"), (300, 300));
        assert_eq!(s.frequency_of(&"bar"), (100, 100));
        assert_eq!(m.frequency_of(&"foo"), (200, 200));
    }

    #[test]
    fn view_matches_counter() {
        let mut s = FrequentItems::with_counter(seeded::<u64>(8, 4));
        s.extend((0..40u64).map(|i| (i % 12, i + 1)));

        let counter = s.counter();
        assert_eq!(s.len(), counter.len());
        assert_eq!(s.tracked_keys().count(), counter.num_tracked());
        for key in 0..12u64 {
            assert_eq!(s.contains(&key), counter.is_tracked(&key));
            assert_eq!(s.frequency_of(&key), counter.frequency(&key));
        }
        for (key, bounds) in s.items() {
            assert_eq!(bounds.width(), FrequencySketch::offset(counter));
            assert!(s.contains(key));
        }
    }
}
