//! AbilitySystem - Numeric attributes and gameplay cues
//!
//! This is the second attribute backend a combatant can carry, next to the
//! StatBlock. Attributes here are plain numbers with a base and a current
//! value; damage and costs move the current value directly.

use crate::stat_block::AttributeDelta;
use crate::tag::GameplayTag;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A numeric attribute with base and current value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericAttribute {
    pub base: f64,
    pub current: f64,
}

impl NumericAttribute {
    pub fn new(value: f64) -> Self {
        NumericAttribute {
            base: value,
            current: value,
        }
    }
}

/// Numeric attributes plus active gameplay cues
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilitySystem {
    #[serde(default)]
    attributes: HashMap<GameplayTag, NumericAttribute>,
    /// Active cues with a reference count
    #[serde(skip)]
    cues: HashMap<GameplayTag, u32>,
}

impl AbilitySystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: impl Into<GameplayTag>, value: f64) -> Self {
        self.set_numeric(attribute, value);
        self
    }

    /// Set both base and current value
    pub fn set_numeric(&mut self, attribute: impl Into<GameplayTag>, value: f64) {
        self.attributes.insert(attribute.into(), NumericAttribute::new(value));
    }

    pub fn has_attribute(&self, attribute: &GameplayTag) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Current value of an attribute (0 when unknown)
    pub fn numeric(&self, attribute: &GameplayTag) -> f64 {
        self.attributes.get(attribute).map(|a| a.current).unwrap_or(0.0)
    }

    /// Current value, or None when the attribute doesn't exist
    pub fn try_numeric(&self, attribute: &GameplayTag) -> Option<f64> {
        self.attributes.get(attribute).map(|a| a.current)
    }

    /// Subtract a delta from an attribute, returns false if it doesn't exist
    pub fn apply_delta(&mut self, delta: &AttributeDelta) -> bool {
        match self.attributes.get_mut(&delta.attribute) {
            Some(attr) => {
                attr.current -= delta.value;
                true
            }
            None => false,
        }
    }

    /// Restore every attribute to its base value
    pub fn reset(&mut self) {
        for attr in self.attributes.values_mut() {
            attr.current = attr.base;
        }
    }

    pub fn add_cue(&mut self, cue: &GameplayTag) {
        if cue.is_valid() {
            *self.cues.entry(cue.clone()).or_insert(0) += 1;
        }
    }

    pub fn remove_cue(&mut self, cue: &GameplayTag) {
        if let Some(count) = self.cues.get_mut(cue) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.cues.remove(cue);
            }
        }
    }

    pub fn has_cue(&self, cue: &GameplayTag) -> bool {
        self.cues.contains_key(cue)
    }
}
