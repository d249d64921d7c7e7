//! StatValue - Flat → Increased → More attribute value

use serde::{Deserialize, Serialize};

/// An attribute value following the Flat → Increased → More model
///
/// Final value is `(base + flat) × (1 + increased) × Π(1 + more)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub flat: f64,
    /// Sum of increased% as decimal (0.40 = 40%)
    #[serde(default)]
    pub increased: f64,
    /// More% multipliers as decimals
    #[serde(default)]
    pub more: Vec<f64>,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            ..Default::default()
        }
    }

    pub fn compute(&self) -> f64 {
        (self.base + self.flat) * self.total_increased_multiplier() * self.total_more_multiplier()
    }

    /// Compute with an extra layer of modifiers stacked on top
    pub fn compute_with(&self, extra: &StatValue) -> f64 {
        let flat = self.base + self.flat + extra.base + extra.flat;
        let increased = 1.0 + self.increased + extra.increased;
        let more: f64 = self
            .more
            .iter()
            .chain(extra.more.iter())
            .map(|m| 1.0 + m)
            .product();
        flat * increased * more
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    pub fn add_more(&mut self, value: f64) {
        self.more.push(value);
    }

    /// Merge another value's bonuses into this one (base is added as flat)
    pub fn merge(&mut self, other: &StatValue) {
        self.flat += other.base + other.flat;
        self.increased += other.increased;
        self.more.extend_from_slice(&other.more);
    }

    pub fn total_increased_multiplier(&self) -> f64 {
        1.0 + self.increased
    }

    pub fn total_more_multiplier(&self) -> f64 {
        self.more.iter().map(|m| 1.0 + m).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_full_formula() {
        // (100 + 50) × (1 + 0.70) × (1.20 × 1.15)
        let mut stat = StatValue::with_base(100.0);
        stat.add_flat(50.0);
        stat.add_increased(0.40);
        stat.add_increased(0.30);
        stat.add_more(0.20);
        stat.add_more(0.15);

        let expected = 150.0 * 1.70 * (1.20 * 1.15);
        assert!((stat.compute() - expected).abs() < 0.01);
    }

    #[test]
    fn test_more_stacks_multiplicatively() {
        let mut stat = StatValue::with_base(100.0);
        stat.add_more(0.20);
        stat.add_more(0.30);
        assert!((stat.compute() - 156.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_with_extra_layer() {
        let stat = StatValue::with_base(20.0);
        let extra = StatValue {
            flat: 10.0,
            increased: 0.5,
            ..Default::default()
        };
        // (20 + 10) × 1.5
        assert!((stat.compute_with(&extra) - 45.0).abs() < 1e-9);
        // the base value itself is untouched
        assert!((stat.compute() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge() {
        let mut total = StatValue::default();
        total.merge(&StatValue::with_base(5.0));
        total.merge(&StatValue {
            more: vec![1.0],
            ..Default::default()
        });
        assert!((total.compute() - 10.0).abs() < 1e-9);
    }
}
