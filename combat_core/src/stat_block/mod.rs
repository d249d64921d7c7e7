//! StatBlock - Attribute and statistic component of a combatant
//!
//! Attributes are long-lived values (strength, defense, crit chance) that feed
//! damage formulas. Statistics are depletable resources (health, stamina,
//! stagger resistance) consumed by hits and restored by regeneration.

mod modifier;
mod stat_value;
mod statistic;

pub use modifier::{AttributeBonus, AttributeModifier, BonusKind, ModifierHandle};
pub use stat_value::StatValue;
pub use statistic::Statistic;

use crate::tag::GameplayTag;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A change to apply to a named attribute or statistic
///
/// Positive values are consumed (subtracted), negative values restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDelta {
    pub attribute: GameplayTag,
    pub value: f64,
}

impl AttributeDelta {
    pub fn new(attribute: impl Into<GameplayTag>, value: f64) -> Self {
        AttributeDelta {
            attribute: attribute.into(),
            value,
        }
    }
}

/// Attributes, statistics and temporary modifiers of one entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    attributes: HashMap<GameplayTag, StatValue>,
    #[serde(default)]
    statistics: HashMap<GameplayTag, Statistic>,
    #[serde(skip)]
    modifiers: Vec<(ModifierHandle, AttributeModifier)>,
    #[serde(skip)]
    next_handle: u64,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: impl Into<GameplayTag>, base: f64) -> Self {
        self.set_attribute_base(attribute, base);
        self
    }

    pub fn with_statistic(mut self, statistic: impl Into<GameplayTag>, value: Statistic) -> Self {
        self.statistics.insert(statistic.into(), value);
        self
    }

    pub fn set_attribute_base(&mut self, attribute: impl Into<GameplayTag>, base: f64) {
        self.attributes
            .entry(attribute.into())
            .or_default()
            .base = base;
    }

    pub fn attribute_mut(&mut self, attribute: impl Into<GameplayTag>) -> &mut StatValue {
        self.attributes.entry(attribute.into()).or_default()
    }

    pub fn has_attribute(&self, attribute: &GameplayTag) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Current attribute value including active modifiers (0 when unknown)
    pub fn attribute_value(&self, attribute: &GameplayTag) -> f64 {
        let mut layer = StatValue::default();
        for (_, modifier) in &self.modifiers {
            modifier.layer_for(attribute, &mut layer);
        }
        match self.attributes.get(attribute) {
            Some(value) => value.compute_with(&layer),
            None => layer.compute(),
        }
    }

    pub fn has_statistic(&self, statistic: &GameplayTag) -> bool {
        self.statistics.contains_key(statistic)
    }

    pub fn statistic(&self, statistic: &GameplayTag) -> Option<&Statistic> {
        self.statistics.get(statistic)
    }

    pub fn statistic_mut(&mut self, statistic: &GameplayTag) -> Option<&mut Statistic> {
        self.statistics.get_mut(statistic)
    }

    /// Current value of a statistic (0 when unknown)
    pub fn statistic_current(&self, statistic: &GameplayTag) -> f64 {
        self.statistics.get(statistic).map(|s| s.current).unwrap_or(0.0)
    }

    /// Max value of a statistic (0 when unknown)
    pub fn statistic_max(&self, statistic: &GameplayTag) -> f64 {
        self.statistics.get(statistic).map(|s| s.max).unwrap_or(0.0)
    }

    /// Consume from a statistic, returns false if it doesn't exist
    pub fn consume_statistic(&mut self, statistic: &GameplayTag, amount: f64) -> bool {
        match self.statistics.get_mut(statistic) {
            Some(stat) => {
                stat.consume(amount);
                true
            }
            None => false,
        }
    }

    /// Consume every delta that names a known statistic
    ///
    /// Returns the deltas that didn't match a statistic so the caller can route
    /// them elsewhere.
    pub fn consume_statistics<'a>(&mut self, deltas: &'a [AttributeDelta]) -> Vec<&'a AttributeDelta> {
        let mut unmatched = Vec::new();
        for delta in deltas {
            if !self.consume_statistic(&delta.attribute, delta.value) {
                unmatched.push(delta);
            }
        }
        unmatched
    }

    pub fn regenerate(&mut self, delta: f64) {
        for stat in self.statistics.values_mut() {
            stat.regenerate(delta);
        }
    }

    pub fn add_modifier(&mut self, modifier: AttributeModifier) -> ModifierHandle {
        self.next_handle += 1;
        let handle = ModifierHandle(self.next_handle);
        debug!("adding attribute modifier {:?} ({} bonuses)", handle, modifier.bonuses.len());
        self.modifiers.push((handle, modifier));
        handle
    }

    pub fn remove_modifier(&mut self, handle: ModifierHandle) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|(h, _)| *h != handle);
        before != self.modifiers.len()
    }

    pub fn active_modifier_count(&self) -> usize {
        self.modifiers.len()
    }
}
