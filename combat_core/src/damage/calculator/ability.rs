//! AbilityDamageCalculator - Damage from AbilitySystem attributes

use super::pipeline::{self, AttributeSource};
use super::{CalculatorTuning, DamageCalculator, HitContext};
use crate::combat::Combatant;
use crate::damage::{DamageEvent, DamageInfluences, DamageType, DamageTypeRegistry};
use crate::tag::GameplayTag;
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDamageCalculator {
    #[serde(default)]
    pub tuning: CalculatorTuning,
    /// Dealer attribute holding crit chance in percent
    #[serde(default = "default_crit_chance")]
    pub crit_chance_attribute: GameplayTag,
    #[serde(default = "default_blocking_defense")]
    pub blocking_defense_attribute: GameplayTag,
    #[serde(default = "default_stagger_resistance")]
    pub stagger_resistance_attribute: GameplayTag,
    #[serde(default = "default_max_stagger_resistance")]
    pub max_stagger_resistance_attribute: GameplayTag,
    /// Attribute charged with stagger damage, defaults to the resistance itself
    #[serde(default)]
    pub stagger_resistance_data_tag: Option<GameplayTag>,
    /// Attribute charged on block, defaults to the stance's damaged resource
    #[serde(default)]
    pub block_damaged_data_tag: Option<GameplayTag>,
}

fn default_crit_chance() -> GameplayTag {
    GameplayTag::from("Attributes.CritChance")
}

fn default_blocking_defense() -> GameplayTag {
    GameplayTag::from("Attributes.BlockDefense")
}

fn default_stagger_resistance() -> GameplayTag {
    GameplayTag::from("Attributes.Posture")
}

fn default_max_stagger_resistance() -> GameplayTag {
    GameplayTag::from("Attributes.MaxPosture")
}

impl Default for AbilityDamageCalculator {
    fn default() -> Self {
        AbilityDamageCalculator {
            tuning: CalculatorTuning::default(),
            crit_chance_attribute: default_crit_chance(),
            blocking_defense_attribute: default_blocking_defense(),
            stagger_resistance_attribute: default_stagger_resistance(),
            max_stagger_resistance_attribute: default_max_stagger_resistance(),
            stagger_resistance_data_tag: None,
            block_damaged_data_tag: None,
        }
    }
}

impl AttributeSource for AbilityDamageCalculator {
    fn tuning(&self) -> &CalculatorTuning {
        &self.tuning
    }

    fn scaling<'t>(&self, damage_type: &'t DamageType) -> &'t DamageInfluences {
        &damage_type.ability_scaling
    }

    fn attribute(&self, combatant: &Combatant, attribute: &GameplayTag) -> f64 {
        combatant.abilities.numeric(attribute)
    }

    fn crit_chance(&self, dealer: &Combatant, _damage_type: &DamageType, _registry: &DamageTypeRegistry) -> f64 {
        dealer.abilities.numeric(&self.crit_chance_attribute)
    }

    fn stagger_resistance(&self, receiver: &Combatant) -> Option<(f64, f64)> {
        let current = receiver.abilities.try_numeric(&self.stagger_resistance_attribute)?;
        let max = receiver
            .abilities
            .try_numeric(&self.max_stagger_resistance_attribute)
            .unwrap_or(current);
        Some((current, max))
    }

    fn stagger_delta_tag(&self) -> Option<&GameplayTag> {
        let tag = self
            .stagger_resistance_data_tag
            .as_ref()
            .unwrap_or(&self.stagger_resistance_attribute);
        Some(tag).filter(|t| t.is_valid())
    }

    fn block_damaged_tag(&self, receiver: &Combatant) -> Option<GameplayTag> {
        match &self.block_damaged_data_tag {
            Some(tag) if tag.is_valid() => Some(tag.clone()),
            _ => receiver
                .defense
                .as_ref()
                .and_then(|stance| stance.config.damaged_resource.tag())
                .cloned(),
        }
    }

    fn block_defense(&self, receiver: &Combatant) -> f64 {
        receiver.abilities.numeric(&self.blocking_defense_attribute)
    }
}

impl DamageCalculator for AbilityDamageCalculator {
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
