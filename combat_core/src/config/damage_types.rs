//! Damage type table loading

use super::ConfigError;
use crate::damage::{DamageType, DamageTypeRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for damage type definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageTypesConfig {
    /// Start from the stock classes before adding these
    #[serde(default)]
    pub include_defaults: bool,
    #[serde(default)]
    pub damage_types: Vec<DamageType>,
}

impl DamageTypesConfig {
    pub fn into_registry(self) -> Result<DamageTypeRegistry, ConfigError> {
        let mut registry = if self.include_defaults {
            DamageTypeRegistry::with_defaults()
        } else {
            DamageTypeRegistry::new()
        };
        for damage_type in self.damage_types {
            if !damage_type.tag.is_valid() {
                return Err(ConfigError::ValidationError("damage type without a tag".to_string()));
            }
            registry.register(damage_type);
        }
        Ok(registry)
    }
}

/// Load damage types from a TOML file
pub fn load_damage_types(path: &Path) -> Result<DamageTypeRegistry, ConfigError> {
    let config: DamageTypesConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load damage types from a TOML string
pub fn parse_damage_types(content: &str) -> Result<DamageTypeRegistry, ConfigError> {
    let config: DamageTypesConfig = super::parse_toml(content)?;
    config.into_registry()
}
