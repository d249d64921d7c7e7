//! StatDamageCalculator - Damage from StatBlock attributes and statistics

use super::pipeline::{self, AttributeSource};
use super::{CalculatorTuning, DamageCalculator, HitContext};
use crate::combat::Combatant;
use crate::damage::{DamageEvent, DamageInfluences, DamageType, DamageTypeRegistry};
use crate::tag::GameplayTag;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Crit chance for a family of damage types, read from a dealer attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalChance {
    pub damage_type: GameplayTag,
    pub attribute: GameplayTag,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,
}

fn default_scaling_factor() -> f64 {
    1.0
}

impl CriticalChance {
    pub fn new(damage_type: impl Into<GameplayTag>, attribute: impl Into<GameplayTag>, scaling_factor: f64) -> Self {
        CriticalChance {
            damage_type: damage_type.into(),
            attribute: attribute.into(),
            scaling_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDamageCalculator {
    #[serde(default)]
    pub tuning: CalculatorTuning,
    /// First entry whose damage type covers the hit wins
    #[serde(default)]
    pub critical_chance: Vec<CriticalChance>,
    #[serde(default = "default_stagger_statistic")]
    pub stagger_resistance_statistic: GameplayTag,
    /// Receiver attribute read as a percent reduction on blocked hits
    #[serde(default = "default_block_defense")]
    pub block_defense_attribute: GameplayTag,
}

fn default_stagger_statistic() -> GameplayTag {
    GameplayTag::from("Statistics.StaggerResistance")
}

fn default_block_defense() -> GameplayTag {
    GameplayTag::from("Attributes.BlockDefense")
}

impl Default for StatDamageCalculator {
    fn default() -> Self {
        StatDamageCalculator {
            tuning: CalculatorTuning::default(),
            critical_chance: Vec::new(),
            stagger_resistance_statistic: default_stagger_statistic(),
            block_defense_attribute: default_block_defense(),
        }
    }
}

impl AttributeSource for StatDamageCalculator {
    fn tuning(&self) -> &CalculatorTuning {
        &self.tuning
    }

    fn scaling<'t>(&self, damage_type: &'t DamageType) -> &'t DamageInfluences {
        &damage_type.stat_scaling
    }

    fn attribute(&self, combatant: &Combatant, attribute: &GameplayTag) -> f64 {
        combatant.stats.attribute_value(attribute)
    }

    fn crit_chance(&self, dealer: &Combatant, damage_type: &DamageType, registry: &DamageTypeRegistry) -> f64 {
        self.critical_chance
            .iter()
            .find(|c| registry.is_child_of(&damage_type.tag, &c.damage_type))
            .map(|c| dealer.stats.attribute_value(&c.attribute) * c.scaling_factor)
            .unwrap_or(0.0)
    }

    fn stagger_resistance(&self, receiver: &Combatant) -> Option<(f64, f64)> {
        receiver
            .stats
            .statistic(&self.stagger_resistance_statistic)
            .map(|s| (s.current, s.max))
    }

    fn stagger_delta_tag(&self) -> Option<&GameplayTag> {
        Some(&self.stagger_resistance_statistic).filter(|t| t.is_valid())
    }

    fn block_damaged_tag(&self, receiver: &Combatant) -> Option<GameplayTag> {
        receiver
            .defense
            .as_ref()
            .and_then(|stance| stance.config.damaged_resource.tag())
            .cloned()
    }

    fn block_defense(&self, receiver: &Combatant) -> f64 {
        receiver.stats.attribute_value(&self.block_defense_attribute)
    }
}

impl DamageCalculator for StatDamageCalculator {
    fn is_critical_damage(&self, event: &DamageEvent, ctx: &HitContext<'_>, rng: &mut dyn RngCore) -> bool {
        pipeline::is_critical(self, event, ctx, rng)
    }

    fn evaluate_hit_response_action(
        &self,
        event: &DamageEvent,
        ctx: &mut HitContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<GameplayTag> {
        pipeline::evaluate_hit_response(self, event, ctx, rng)
    }

    fn calculate_final_damage(&self, event: &mut DamageEvent, ctx: &HitContext<'_>, rng: &mut dyn RngCore) -> f64 {
        pipeline::final_damage(self, event, ctx, rng)
    }
}
