//! DamageType - Per-class scaling tables and the damage class hierarchy

use crate::tag::GameplayTag;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attribute contributing to damage, with a weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageInfluence {
    pub attribute: GameplayTag,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,
}

impl DamageInfluence {
    pub fn new(attribute: impl Into<GameplayTag>, scaling_factor: f64) -> Self {
        DamageInfluence {
            attribute: attribute.into(),
            scaling_factor,
        }
    }
}

fn default_scaling_factor() -> f64 {
    1.0
}

/// Attack contributions from the dealer and defense percentages from the receiver
///
/// Total damage is raised by the sum of every attack attribute × factor. Each
/// defense entry then reduces it by (attribute × factor) percent, so a scaled
/// defense of 30 removes 30% and anything ≥ 100 removes everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageInfluences {
    #[serde(default)]
    pub attack: Vec<DamageInfluence>,
    #[serde(default)]
    pub defense: Vec<DamageInfluence>,
}

impl DamageInfluences {
    pub fn is_empty(&self) -> bool {
        self.attack.is_empty() && self.defense.is_empty()
    }
}

/// Immutable description of a class of damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageType {
    pub tag: GameplayTag,
    /// Parent class, in addition to the tag's own dotted hierarchy
    #[serde(default)]
    pub parent: Option<GameplayTag>,
    /// How much this damage wears down stagger resistance
    #[serde(default = "default_stagger_multiplier")]
    pub stagger_multiplier: f64,
    #[serde(default)]
    pub damage_tags: Vec<GameplayTag>,
    /// Scaling over StatBlock attributes
    #[serde(default)]
    pub stat_scaling: DamageInfluences,
    /// Scaling over AbilitySystem attributes
    #[serde(default)]
    pub ability_scaling: DamageInfluences,
}

fn default_stagger_multiplier() -> f64 {
    1.0
}

impl DamageType {
    pub fn new(tag: impl Into<GameplayTag>) -> Self {
        DamageType {
            tag: tag.into(),
            parent: None,
            stagger_multiplier: 1.0,
            damage_tags: Vec::new(),
            stat_scaling: DamageInfluences::default(),
            ability_scaling: DamageInfluences::default(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<GameplayTag>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_stagger_multiplier(mut self, multiplier: f64) -> Self {
        self.stagger_multiplier = multiplier;
        self
    }

    pub fn with_stat_scaling(mut self, scaling: DamageInfluences) -> Self {
        self.stat_scaling = scaling;
        self
    }

    pub fn with_ability_scaling(mut self, scaling: DamageInfluences) -> Self {
        self.ability_scaling = scaling;
        self
    }
}

/// Registry of damage types keyed by tag
#[derive(Debug, Clone, Default)]
pub struct DamageTypeRegistry {
    types: HashMap<GameplayTag, DamageType>,
}

const MAX_HIERARCHY_DEPTH: usize = 32;

impl DamageTypeRegistry {
    pub fn new() -> Self {
        DamageTypeRegistry {
            types: HashMap::new(),
        }
    }

    pub fn register(&mut self, damage_type: DamageType) {
        self.types.insert(damage_type.tag.clone(), damage_type);
    }

    pub fn get(&self, tag: &GameplayTag) -> Option<&DamageType> {
        self.types.get(tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether `child` is `ancestor` or derives from it
    ///
    /// Follows both registered parents and the dotted tag hierarchy.
    pub fn is_child_of(&self, child: &GameplayTag, ancestor: &GameplayTag) -> bool {
        let mut current = Some(child.clone());
        let mut depth = 0;
        while let Some(tag) = current {
            if tag.matches(ancestor) {
                return true;
            }
            depth += 1;
            if depth > MAX_HIERARCHY_DEPTH {
                return false;
            }
            current = self.get(&tag).and_then(|t| t.parent.clone());
        }
        false
    }

    /// Whether `child` derives from any of `ancestors`
    pub fn is_child_of_any(&self, child: &GameplayTag, ancestors: &[GameplayTag]) -> bool {
        ancestors.iter().any(|a| self.is_child_of(child, a))
    }

    /// The stock damage classes: melee, ranged, area, spell and fall
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DamageType::new("DamageType"));
        registry.register(DamageType::new("DamageType.Melee"));
        registry.register(DamageType::new("DamageType.Ranged").with_stagger_multiplier(0.5));
        registry.register(DamageType::new("DamageType.Area").with_stagger_multiplier(1.5));
        registry.register(DamageType::new("DamageType.Spell").with_stagger_multiplier(0.75));
        registry.register(DamageType::new("DamageType.Fall").with_stagger_multiplier(0.0));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_by_tag_hierarchy() {
        let registry = DamageTypeRegistry::with_defaults();
        assert!(registry.is_child_of(&"DamageType.Melee".into(), &"DamageType".into()));
        assert!(registry.is_child_of(&"DamageType.Melee".into(), &"DamageType.Melee".into()));
        assert!(!registry.is_child_of(&"DamageType.Melee".into(), &"DamageType.Ranged".into()));
    }

    #[test]
    fn test_child_by_registered_parent() {
        let mut registry = DamageTypeRegistry::with_defaults();
        registry.register(DamageType::new("Fire.Slash").with_parent("DamageType.Melee"));

        assert!(registry.is_child_of(&"Fire.Slash".into(), &"DamageType.Melee".into()));
        assert!(registry.is_child_of(&"Fire.Slash".into(), &"DamageType".into()));
        assert!(registry.is_child_of(&"Fire.Slash".into(), &"Fire".into()));
        assert!(!registry.is_child_of(&"Fire.Slash".into(), &"DamageType.Spell".into()));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut registry = DamageTypeRegistry::new();
        registry.register(DamageType::new("A").with_parent("B"));
        registry.register(DamageType::new("B").with_parent("A"));
        assert!(!registry.is_child_of(&"A".into(), &"C".into()));
    }

    #[test]
    fn test_parse_damage_type() {
        let toml = r#"
tag = "DamageType.Melee.Heavy"
stagger_multiplier = 2.0

[[stat_scaling.attack]]
attribute = "Attributes.Strength"
scaling_factor = 0.5

[[stat_scaling.defense]]
attribute = "Attributes.Defense"
"#;
        let damage_type: DamageType = toml::from_str(toml).unwrap();
        assert!((damage_type.stagger_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(damage_type.stat_scaling.attack.len(), 1);
        assert!((damage_type.stat_scaling.defense[0].scaling_factor - 1.0).abs() < f64::EPSILON);
        assert!(damage_type.ability_scaling.is_empty());
    }
}
