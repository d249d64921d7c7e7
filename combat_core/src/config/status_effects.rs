//! Status effect definition loading

use super::ConfigError;
use crate::status::{StatusEffectDef, StatusEffectKind, StatusEffectRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for status effect definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffectsConfig {
    /// Start from the stock effects before adding these
    #[serde(default)]
    pub include_defaults: bool,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectDef>,
}

fn validate(def: &StatusEffectDef) -> Result<(), ConfigError> {
    if !def.tag.is_valid() {
        return Err(ConfigError::ValidationError("status effect without a tag".to_string()));
    }
    let duration = match &def.kind {
        StatusEffectKind::Instant { .. } => return Ok(()),
        StatusEffectKind::ForDuration { duration, .. } => *duration,
        StatusEffectKind::DamageOverTime { duration, .. } => *duration,
    };
    if duration <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "status effect {} needs a positive duration, got {}",
            def.tag, duration
        )));
    }
    Ok(())
}

impl StatusEffectsConfig {
    pub fn into_registry(self) -> Result<StatusEffectRegistry, ConfigError> {
        let mut registry = if self.include_defaults {
            StatusEffectRegistry::with_defaults()
        } else {
            StatusEffectRegistry::new()
        };
        for def in self.status_effects {
            validate(&def)?;
            registry.register(def);
        }
        Ok(registry)
    }
}

/// Load status effects from a TOML file
pub fn load_status_effects(path: &Path) -> Result<StatusEffectRegistry, ConfigError> {
    let config: StatusEffectsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load status effects from a TOML string
pub fn parse_status_effects(content: &str) -> Result<StatusEffectRegistry, ConfigError> {
    let config: StatusEffectsConfig = super::parse_toml(content)?;
    config.into_registry()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_effects() {
        let toml = r#"
[[status_effects]]
tag = "Status.Poisoned"
cue = "Cue.Poison"

[status_effects.kind]
type = "damage_over_time"
duration = 6.0
trigger_count = 6

[[status_effects.kind.deltas]]
attribute = "Statistics.Health"
value = 1.5

[[status_effects]]
tag = "Status.Hardened"
retriggerable = true

[status_effects.kind]
type = "for_duration"
duration = 8.0

[[status_effects.kind.modifier.bonuses]]
attribute = "Attributes.Defense"
kind = "increased"
value = 0.3
"#;
        let registry = parse_status_effects(toml).unwrap();
        assert_eq!(registry.len(), 2);
        let hardened = registry.get(&"Status.Hardened".into()).unwrap();
        assert!(hardened.retriggerable);
    }

    #[test]
    fn test_defaults_extended() {
        let toml = r#"
include_defaults = true

[[status_effects]]
tag = "Status.Dazed"

[status_effects.kind]
type = "instant"
"#;
        let registry = parse_status_effects(toml).unwrap();
        assert_eq!(registry.len(), StatusEffectRegistry::with_defaults().len() + 1);
        assert!(registry.get(&"Status.Burning".into()).is_some());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let toml = r#"
[[status_effects]]
tag = "Status.Broken"

[status_effects.kind]
type = "for_duration"
duration = 0.0
"#;
        assert!(matches!(parse_status_effects(toml), Err(ConfigError::ValidationError(_))));
    }
}
