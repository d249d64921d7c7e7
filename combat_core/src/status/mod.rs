//! Status effects - Timed effects on combatants (burning, fortified, stunned)

mod active;
mod manager;
mod types;

pub use active::{ActiveStatusEffect, EffectTarget, StatusEvent};
pub use manager::StatusEffectManager;
pub use types::{StatusEffectDef, StatusEffectKind};

use crate::stat_block::{AttributeBonus, AttributeDelta, AttributeModifier};
use crate::tag::GameplayTag;
use std::collections::HashMap;

/// Status effect definitions keyed by tag
#[derive(Debug, Clone, Default)]
pub struct StatusEffectRegistry {
    defs: HashMap<GameplayTag, StatusEffectDef>,
}

impl StatusEffectRegistry {
    pub fn new() -> Self {
        StatusEffectRegistry { defs: HashMap::new() }
    }

    pub fn register(&mut self, def: StatusEffectDef) {
        self.defs.insert(def.tag.clone(), def);
    }

    pub fn get(&self, tag: &GameplayTag) -> Option<&StatusEffectDef> {
        self.defs.get(tag)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Burning, bleeding, fortified and exhausted
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Fire DoT, reapplying restarts the burn
        registry.register(
            StatusEffectDef::damage_over_time(
                "Status.Burning",
                3.0,
                3,
                vec![AttributeDelta::new("Statistics.Health", 4.0)],
            )
            .with_cue("Cue.Burning")
            .retriggerable(),
        );

        registry.register(StatusEffectDef::damage_over_time(
            "Status.Bleeding",
            5.0,
            5,
            vec![AttributeDelta::new("Statistics.Health", 2.0)],
        ));

        registry.register(
            StatusEffectDef::for_duration(
                "Status.Fortified",
                5.0,
                AttributeModifier::new()
                    .with_bonus(AttributeBonus::flat("Attributes.Defense", 20.0))
                    .with_bonus(AttributeBonus::increased("Attributes.BlockDefense", 0.25)),
            )
            .retriggerable(),
        );

        registry.register(StatusEffectDef::instant(
            "Status.Exhausted",
            vec![AttributeDelta::new("Statistics.Stamina", 30.0)],
        ));

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = StatusEffectRegistry::with_defaults();
        assert_eq!(registry.len(), 4);

        let burning = registry.get(&"Status.Burning".into()).unwrap();
        assert!(burning.retriggerable);
        assert!(matches!(burning.kind, StatusEffectKind::DamageOverTime { trigger_count: 3, .. }));
        assert!(registry.get(&"Status.Unknown".into()).is_none());
    }
}
