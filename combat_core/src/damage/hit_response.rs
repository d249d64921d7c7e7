//! Hit response candidates - weighted reactions a receiver may play

use super::{DamageEvent, DamageTypeRegistry};
use crate::tag::GameplayTag;
use crate::types::ActionDirection;
use serde::{Deserialize, Serialize};

/// A reaction the receiver can play when hit, with its selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitResponseChance {
    pub action: GameplayTag,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub allowed_direction: ActionDirection,
    /// Damage classes (and their children) that may trigger this reaction
    #[serde(default)]
    pub allowed_damage_types: Vec<GameplayTag>,
}

fn default_weight() -> f64 {
    1.0
}

impl HitResponseChance {
    pub fn new(action: impl Into<GameplayTag>, weight: f64) -> Self {
        HitResponseChance {
            action: action.into(),
            weight,
            allowed_direction: ActionDirection::EveryDirection,
            allowed_damage_types: Vec::new(),
        }
    }

    pub fn from_direction(mut self, direction: ActionDirection) -> Self {
        self.allowed_direction = direction;
        self
    }

    pub fn for_damage_type(mut self, damage_type: impl Into<GameplayTag>) -> Self {
        self.allowed_damage_types.push(damage_type.into());
        self
    }

    /// Whether this reaction applies to the event's direction and damage class
    ///
    /// A candidate with no allowed damage types never applies.
    pub fn applies_to(&self, event: &DamageEvent, registry: &DamageTypeRegistry) -> bool {
        if !self.allowed_direction.allows(event.direction) {
            return false;
        }
        match &event.damage_type {
            Some(damage_type) => registry.is_child_of_any(damage_type, &self.allowed_damage_types),
            None => false,
        }
    }
}
