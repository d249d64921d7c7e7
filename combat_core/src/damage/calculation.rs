//! Damage formulas shared by every calculator

use rand::{Rng, RngCore};

/// Reduce `damage` by `percentage` percent, never below zero
pub fn reduce_damage_by_percentage(damage: f64, percentage: f64) -> f64 {
    let reduction = damage * percentage / 100.0;
    (damage - reduction).max(0.0)
}

/// Randomize `damage` uniformly within ±`percent`%
///
/// Zero damage stays zero.
pub fn apply_random_deviation(damage: f64, percent: f64, rng: &mut dyn RngCore) -> f64 {
    if damage == 0.0 {
        return damage;
    }
    let deviation = (damage * percent / 100.0).abs();
    if deviation == 0.0 {
        return damage;
    }
    rng.gen_range((damage - deviation)..=(damage + deviation))
}

/// Pick an index with probability proportional to its weight
///
/// Negative weights count as zero. Returns None for an empty list or when
/// every weight is zero.
pub fn extract_index_with_probability(weights: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let chosen = rng.gen_range(0.0..total);
    let mut running = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        running += weight.max(0.0);
        if chosen < running {
            return Some(index);
        }
    }

    // Float rounding can leave `chosen` a hair above the last running sum
    weights.iter().rposition(|w| *w > 0.0)
}

/// Roll a percentage chance in [0, 100)
pub fn roll_percentage(chance: f64, rng: &mut dyn RngCore) -> bool {
    if chance <= 0.0 {
        return false;
    }
    rng.gen_range(0.0..100.0) < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn test_reduce_by_percentage() {
        assert!((reduce_damage_by_percentage(100.0, 30.0) - 70.0).abs() < 1e-9);
        assert!((reduce_damage_by_percentage(100.0, 100.0) - 0.0).abs() < 1e-9);
        assert!((reduce_damage_by_percentage(100.0, 250.0) - 0.0).abs() < 1e-9);
        // negative defense amplifies
        assert!((reduce_damage_by_percentage(100.0, -50.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_damage_not_randomized() {
        let mut rng = make_test_rng();
        assert_eq!(apply_random_deviation(0.0, 5.0, &mut rng), 0.0);
    }

    #[test]
    fn test_empty_weights() {
        let mut rng = make_test_rng();
        assert_eq!(extract_index_with_probability(&[], &mut rng), None);
        assert_eq!(extract_index_with_probability(&[0.0, -1.0], &mut rng), None);
    }

    #[test]
    fn test_zero_weight_never_chosen() {
        let mut rng = make_test_rng();
        for _ in 0..1000 {
            let index = extract_index_with_probability(&[0.0, 1.0, 0.0], &mut rng);
            assert_eq!(index, Some(1));
        }
    }

    #[test]
    fn test_weighted_frequency_converges() {
        let mut rng = make_test_rng();
        let weights = [1.0, 3.0, 6.0];
        let mut counts = [0usize; 3];
        let trials = 100_000;

        for _ in 0..trials {
            if let Some(index) = extract_index_with_probability(&weights, &mut rng) {
                counts[index] += 1;
            }
        }

        for (count, weight) in counts.iter().zip(weights.iter()) {
            let observed = *count as f64 / trials as f64;
            let expected = weight / 10.0;
            assert!((observed - expected).abs() < 0.01, "observed {} expected {}", observed, expected);
        }
    }

    #[test]
    fn test_roll_percentage_bounds() {
        let mut rng = make_test_rng();
        for _ in 0..1000 {
            assert!(roll_percentage(100.0, &mut rng));
            assert!(!roll_percentage(0.0, &mut rng));
        }
    }

    proptest! {
        #[test]
        fn prop_reduction_never_negative(damage in 0.0f64..10_000.0, pct in -100.0f64..1_000.0) {
            prop_assert!(reduce_damage_by_percentage(damage, pct) >= 0.0);
        }

        #[test]
        fn prop_deviation_within_band(damage in 0.1f64..10_000.0, pct in 0.0f64..50.0, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = apply_random_deviation(damage, pct, &mut rng);
            let band = damage * pct / 100.0;
            prop_assert!(result >= damage - band - 1e-9);
            prop_assert!(result <= damage + band + 1e-9);
        }

        #[test]
        fn prop_weighted_index_in_bounds(weights in proptest::collection::vec(0.0f64..10.0, 1..16), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(index) = extract_index_with_probability(&weights, &mut rng) {
                prop_assert!(index < weights.len());
                prop_assert!(weights[index] > 0.0);
            }
        }
    }
}
