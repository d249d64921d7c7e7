//! Combatant templates - Declarative fighters loaded from TOML

use super::ConfigError;
use crate::ability::AbilitySystem;
use crate::combat::Combatant;
use crate::damage::HitResponseChance;
use crate::defense::{DefenseStance, DefenseStanceConfig, Loadout};
use crate::stat_block::{StatBlock, Statistic};
use crate::tag::GameplayTag;
use crate::types::{ActorId, Placement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A depletable statistic as written in config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticTemplate {
    pub max: f64,
    /// Starting value, full when omitted
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub floor: f64,
    #[serde(default)]
    pub regen_per_second: f64,
}

impl StatisticTemplate {
    pub fn build(&self) -> Statistic {
        let mut stat = Statistic::new(self.max)
            .with_floor(self.floor)
            .with_regen(self.regen_per_second);
        if let Some(current) = self.current {
            stat.current = current.clamp(stat.floor, stat.max);
        }
        stat
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenseTemplate {
    #[serde(default)]
    pub config: DefenseStanceConfig,
    #[serde(default)]
    pub loadout: Loadout,
    /// Raise the guard as soon as the combatant is built
    #[serde(default)]
    pub start_defending: bool,
}

/// Everything needed to build a `Combatant`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub id: ActorId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub immortal: bool,
    #[serde(default)]
    pub statistics: BTreeMap<GameplayTag, StatisticTemplate>,
    /// StatBlock attribute base values
    #[serde(default)]
    pub attributes: BTreeMap<GameplayTag, f64>,
    /// AbilitySystem numeric attributes
    #[serde(default)]
    pub ability_attributes: BTreeMap<GameplayTag, f64>,
    #[serde(default)]
    pub defense: Option<DefenseTemplate>,
    #[serde(default)]
    pub hit_responses: Vec<HitResponseChance>,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl CombatantTemplate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.0.is_empty() {
            return Err(ConfigError::ValidationError("combatant without an id".to_string()));
        }
        for (tag, stat) in &self.statistics {
            if stat.max < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{}: statistic {} has negative max {}",
                    self.id, tag, stat.max
                )));
            }
        }
        for response in &self.hit_responses {
            if response.weight < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{}: hit response {} has negative weight",
                    self.id, response.action
                )));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Combatant {
        let mut stats = StatBlock::new();
        for (tag, stat) in &self.statistics {
            stats = stats.with_statistic(tag.clone(), stat.build());
        }
        for (tag, base) in &self.attributes {
            stats = stats.with_attribute(tag.clone(), *base);
        }

        let mut abilities = AbilitySystem::new();
        for (tag, value) in &self.ability_attributes {
            abilities.set_numeric(tag.clone(), *value);
        }

        let name = self.name.clone().unwrap_or_else(|| self.id.to_string());
        let mut combatant = Combatant::new(self.id.clone(), name)
            .with_stats(stats)
            .with_abilities(abilities);
        combatant.immortal = self.immortal;
        combatant.hit_responses = self.hit_responses.clone();
        combatant.placement = self.placement;

        if let Some(defense) = &self.defense {
            combatant.defense = Some(DefenseStance::new(defense.config.clone(), defense.loadout.clone()));
            if defense.start_defending {
                combatant.start_defending();
            }
        }
        combatant
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatantsConfig {
    #[serde(default)]
    pub combatants: Vec<CombatantTemplate>,
}

/// Load combatant templates from a TOML file
pub fn load_combatants(path: &Path) -> Result<Vec<CombatantTemplate>, ConfigError> {
    let config: CombatantsConfig = super::load_toml(path)?;
    for template in &config.combatants {
        template.validate()?;
    }
    Ok(config.combatants)
}

/// Load combatant templates from a TOML string
pub fn parse_combatants(content: &str) -> Result<Vec<CombatantTemplate>, ConfigError> {
    let config: CombatantsConfig = super::parse_toml(content)?;
    for template in &config.combatants {
        template.validate()?;
    }
    Ok(config.combatants)
}
