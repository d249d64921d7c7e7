//! Tuning shared by the attribute-driven calculators

use crate::tag::GameplayTag;
use crate::types::DamageZone;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Damage multiplier for one body zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneMultiplier {
    pub zone: DamageZone,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorTuning {
    /// Final damage multiplier per chosen reaction (a block might take 20%)
    #[serde(default)]
    pub hit_response_multipliers: HashMap<GameplayTag, f64>,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Reaction forced when stagger resistance collapses
    #[serde(default)]
    pub heavy_hit_reaction: Option<GameplayTag>,
    /// Heavy hits trigger once resistance drops below -multiplier × max
    #[serde(default = "default_heavy_hit_multiplier")]
    pub heavy_hit_multiplier: f64,
    /// Final damage is randomized within ±percent
    #[serde(default = "default_random_deviation")]
    pub random_deviation_percent: f64,
    #[serde(default)]
    pub zone_multipliers: Vec<ZoneMultiplier>,
}

fn default_crit_multiplier() -> f64 {
    1.5
}

fn default_heavy_hit_multiplier() -> f64 {
    4.0
}

fn default_random_deviation() -> f64 {
    5.0
}

impl Default for CalculatorTuning {
    fn default() -> Self {
        CalculatorTuning {
            hit_response_multipliers: HashMap::new(),
            crit_multiplier: default_crit_multiplier(),
            heavy_hit_reaction: None,
            heavy_hit_multiplier: default_heavy_hit_multiplier(),
            random_deviation_percent: default_random_deviation(),
            zone_multipliers: Vec::new(),
        }
    }
}

impl CalculatorTuning {
    /// Multiplier for `zone`, 1.0 when not configured
    pub fn zone_multiplier(&self, zone: DamageZone) -> f64 {
        self.zone_multipliers
            .iter()
            .find(|z| z.zone == zone)
            .map(|z| z.multiplier)
            .unwrap_or(1.0)
    }

    /// Multiplier for the chosen reaction, 1.0 when none applies
    pub fn hit_response_multiplier(&self, reaction: Option<&GameplayTag>) -> f64 {
        reaction
            .and_then(|r| self.hit_response_multipliers.get(r))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn heavy_hit_reaction(&self) -> Option<&GameplayTag> {
        self.heavy_hit_reaction.as_ref().filter(|t| t.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tuning() {
        let toml = r#"
crit_multiplier = 2.0
heavy_hit_reaction = "Actions.Hit.Heavy"

[hit_response_multipliers]
"Actions.Block" = 0.25

[[zone_multipliers]]
zone = "critical"
multiplier = 1.5
"#;
        let tuning: CalculatorTuning = toml::from_str(toml).unwrap();
        assert!((tuning.crit_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((tuning.heavy_hit_multiplier - 4.0).abs() < f64::EPSILON);
        assert!((tuning.random_deviation_percent - 5.0).abs() < f64::EPSILON);
        assert!((tuning.zone_multiplier(DamageZone::Critical) - 1.5).abs() < f64::EPSILON);
        assert!((tuning.zone_multiplier(DamageZone::Normal) - 1.0).abs() < f64::EPSILON);

        let block = GameplayTag::from("Actions.Block");
        assert!((tuning.hit_response_multiplier(Some(&block)) - 0.25).abs() < f64::EPSILON);
        assert!((tuning.hit_response_multiplier(None) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_heavy_hit_reaction_ignored() {
        let tuning = CalculatorTuning {
            heavy_hit_reaction: Some(GameplayTag::none()),
            ..Default::default()
        };
        assert!(tuning.heavy_hit_reaction().is_none());
    }
}
