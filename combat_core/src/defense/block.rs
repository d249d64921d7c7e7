//! Block profiles - what a shield, weapon or bare guard can stop

use crate::stat_block::AttributeModifier;
use crate::tag::GameplayTag;
use crate::types::ActionDirection;
use serde::{Deserialize, Serialize};

/// Blocking capabilities of one piece of equipment (or an innate guard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockProfile {
    /// Attribute bonuses active while defending with this profile
    #[serde(default)]
    pub defending_modifier: AttributeModifier,
    #[serde(default)]
    pub block_direction: ActionDirection,
    /// Max horizontal angle between the receiver's forward and the attacker
    #[serde(default = "default_max_block_angle")]
    pub max_block_angle_degrees: f32,
    #[serde(default)]
    pub blockable_damage_types: Vec<GameplayTag>,
    #[serde(default)]
    pub can_parry: bool,
    /// Scales how much of the blocked damage the damaged resource pays
    #[serde(default = "default_damaged_multiplier")]
    pub damaged_statistic_multiplier: f64,
    #[serde(default)]
    pub counterable_damage_types: Vec<GameplayTag>,
}

fn default_max_block_angle() -> f32 {
    90.0
}

fn default_damaged_multiplier() -> f64 {
    1.0
}

impl Default for BlockProfile {
    fn default() -> Self {
        BlockProfile {
            defending_modifier: AttributeModifier::default(),
            block_direction: ActionDirection::EveryDirection,
            max_block_angle_degrees: default_max_block_angle(),
            blockable_damage_types: Vec::new(),
            can_parry: false,
            damaged_statistic_multiplier: default_damaged_multiplier(),
            counterable_damage_types: Vec::new(),
        }
    }
}

impl BlockProfile {
    pub fn blocking(damage_type: impl Into<GameplayTag>) -> Self {
        BlockProfile {
            blockable_damage_types: vec![damage_type.into()],
            ..Default::default()
        }
    }

    pub fn with_parry(mut self) -> Self {
        self.can_parry = true;
        self
    }

    pub fn with_counter(mut self, damage_type: impl Into<GameplayTag>) -> Self {
        self.counterable_damage_types.push(damage_type.into());
        self
    }

    pub fn with_direction(mut self, direction: ActionDirection) -> Self {
        self.block_direction = direction;
        self
    }

    pub fn with_damaged_multiplier(mut self, multiplier: f64) -> Self {
        self.damaged_statistic_multiplier = multiplier;
        self
    }

    pub fn with_modifier(mut self, modifier: AttributeModifier) -> Self {
        self.defending_modifier = modifier;
        self
    }
}

/// Where a block profile is equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardSlot {
    MainHand,
    OffHand,
    Innate,
}

/// The block profiles a combatant currently carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    #[serde(default)]
    pub main_hand: Option<BlockProfile>,
    #[serde(default)]
    pub off_hand: Option<BlockProfile>,
    #[serde(default)]
    pub innate: Option<BlockProfile>,
}

impl Loadout {
    /// Off hand first, then main hand, then the innate guard
    pub fn best(&self) -> Option<&BlockProfile> {
        self.off_hand
            .as_ref()
            .or(self.main_hand.as_ref())
            .or(self.innate.as_ref())
    }

    pub fn set(&mut self, slot: GuardSlot, profile: Option<BlockProfile>) {
        match slot {
            GuardSlot::MainHand => self.main_hand = profile,
            GuardSlot::OffHand => self.off_hand = profile,
            GuardSlot::Innate => self.innate = profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_profile_priority() {
        let mut loadout = Loadout::default();
        assert!(loadout.best().is_none());

        loadout.set(GuardSlot::Innate, Some(BlockProfile::blocking("DamageType.Melee")));
        loadout.set(GuardSlot::MainHand, Some(BlockProfile::blocking("DamageType").with_parry()));
        assert!(loadout.best().map(|p| p.can_parry).unwrap_or(false));

        loadout.set(GuardSlot::OffHand, Some(BlockProfile::blocking("DamageType.Ranged")));
        let best = loadout.best().unwrap();
        assert_eq!(best.blockable_damage_types, vec![GameplayTag::from("DamageType.Ranged")]);
    }

    #[test]
    fn test_parse_profile_defaults() {
        let profile: BlockProfile = toml::from_str(r#"blockable_damage_types = ["DamageType.Melee"]"#).unwrap();
        assert!((profile.max_block_angle_degrees - 90.0).abs() < f32::EPSILON);
        assert!((profile.damaged_statistic_multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(profile.block_direction, ActionDirection::EveryDirection);
    }
}
