//! Damage calculators - Critical rolls, hit reactions and final damage
//!
//! Three strategies share one trait:
//! - `BaseDamageCalculator` passes raw damage through untouched
//! - `StatDamageCalculator` scales from StatBlock attributes and statistics
//! - `AbilityDamageCalculator` scales from AbilitySystem attributes

mod ability;
mod base;
mod pipeline;
mod stat;
mod tuning;

pub use ability::AbilityDamageCalculator;
pub use base::BaseDamageCalculator;
pub use stat::{CriticalChance, StatDamageCalculator};
pub use tuning::{CalculatorTuning, ZoneMultiplier};

use super::{DamageEvent, DamageEventError, DamageType, DamageTypeRegistry};
use crate::combat::Combatant;
use crate::config::CombatSettings;
use crate::tag::GameplayTag;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a calculator may look at while evaluating one hit
pub struct HitContext<'a> {
    pub dealer: Option<&'a Combatant>,
    /// Mutable so the receiver's defense stance can react
    pub receiver: Option<&'a mut Combatant>,
    pub damage_types: &'a DamageTypeRegistry,
    pub settings: &'a CombatSettings,
}

impl<'a> HitContext<'a> {
    /// Validate the event against this context and look up its damage type
    pub fn resolve_damage_type(&self, event: &DamageEvent) -> Result<&'a DamageType, DamageEventError> {
        let class = event.validate()?;
        if self.receiver.is_none() {
            return Err(DamageEventError::MissingReceiver);
        }
        if self.dealer.is_none() {
            return Err(DamageEventError::MissingDealer);
        }
        let registry: &'a DamageTypeRegistry = self.damage_types;
        registry
            .get(class)
            .ok_or_else(|| DamageEventError::UnknownDamageClass(class.clone()))
    }
}

/// A damage formula
pub trait DamageCalculator: fmt::Debug + Send + Sync {
    fn is_critical_damage(&self, event: &DamageEvent, ctx: &HitContext<'_>, rng: &mut dyn RngCore) -> bool;

    /// Pick the receiver's reaction to this hit, None for no reaction
    fn evaluate_hit_response_action(
        &self,
        event: &DamageEvent,
        ctx: &mut HitContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<GameplayTag>;

    /// Final damage to apply to health
    ///
    /// Secondary costs (stagger, block stamina) are appended to the event's
    /// `affected_attributes`.
    fn calculate_final_damage(&self, event: &mut DamageEvent, ctx: &HitContext<'_>, rng: &mut dyn RngCore) -> f64;
}

/// Which calculator to build, as written in config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculatorConfig {
    Base,
    Stat(StatDamageCalculator),
    Ability(AbilityDamageCalculator),
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig::Stat(StatDamageCalculator::default())
    }
}

impl CalculatorConfig {
    pub fn build(self) -> Box<dyn DamageCalculator> {
        match self {
            CalculatorConfig::Base => Box::new(BaseDamageCalculator),
            CalculatorConfig::Stat(calculator) => Box::new(calculator),
            CalculatorConfig::Ability(calculator) => Box::new(calculator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculator_config() {
        let stat: CalculatorConfig = toml::from_str(
            r#"
kind = "stat"
stagger_resistance_statistic = "Statistics.Poise"

[tuning]
crit_multiplier = 2.0
"#,
        )
        .unwrap();
        match stat {
            CalculatorConfig::Stat(calculator) => {
                assert_eq!(calculator.stagger_resistance_statistic, GameplayTag::from("Statistics.Poise"));
                assert!((calculator.tuning.crit_multiplier - 2.0).abs() < f64::EPSILON);
            }
            other => panic!("expected stat calculator, got {:?}", other),
        }

        let base: CalculatorConfig = toml::from_str(r#"kind = "base""#).unwrap();
        assert!(matches!(base, CalculatorConfig::Base));

        let ability: CalculatorConfig = toml::from_str(r#"kind = "ability""#).unwrap();
        assert!(matches!(ability, CalculatorConfig::Ability(_)));
    }

    #[test]
    fn test_resolve_damage_type_errors() {
        let registry = DamageTypeRegistry::with_defaults();
        let settings = CombatSettings::default();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = Combatant::new("enemy", "Enemy");

        let ctx = HitContext {
            dealer: Some(&dealer),
            receiver: Some(&mut receiver),
            damage_types: &registry,
            settings: &settings,
        };
        let unknown = DamageEvent::new(10.0)
            .with_dealer("player")
            .with_receiver("enemy")
            .with_damage_type("DamageType.Psychic");
        assert_eq!(
            ctx.resolve_damage_type(&unknown).err(),
            Some(DamageEventError::UnknownDamageClass("DamageType.Psychic".into()))
        );

        let known = unknown.clone().with_damage_type("DamageType.Melee");
        assert!(ctx.resolve_damage_type(&known).is_ok());

        let ctx = HitContext {
            dealer: None,
            receiver: None,
            damage_types: &registry,
            settings: &settings,
        };
        assert_eq!(ctx.resolve_damage_type(&known).err(), Some(DamageEventError::MissingReceiver));
    }
}
