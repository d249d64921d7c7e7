//! Statistic - Depletable resource (health, stamina, stagger resistance)

use serde::{Deserialize, Serialize};

/// A depletable value with a maximum, a floor and passive regeneration
///
/// The floor defaults to zero. Stagger-style statistics may configure a
/// negative floor so heavy hits can be detected once they are driven below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub current: f64,
    pub max: f64,
    #[serde(default)]
    pub floor: f64,
    #[serde(default)]
    pub regen_per_second: f64,
}

impl Statistic {
    /// A full statistic with no regeneration
    pub fn new(max: f64) -> Self {
        Statistic {
            current: max,
            max,
            floor: 0.0,
            regen_per_second: 0.0,
        }
    }

    pub fn with_regen(mut self, per_second: f64) -> Self {
        self.regen_per_second = per_second;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor.min(self.max);
        self.current = self.current.max(self.floor);
        self
    }

    /// Subtract `amount` (negative restores), clamped to `[floor, max]`
    pub fn consume(&mut self, amount: f64) {
        self.current = (self.current - amount).clamp(self.floor, self.max);
    }

    pub fn regenerate(&mut self, delta: f64) {
        if self.regen_per_second != 0.0 {
            self.consume(-self.regen_per_second * delta);
        }
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Current value as percentage of max
    pub fn percent(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max * 100.0).clamp(0.0, 100.0)
    }
}
