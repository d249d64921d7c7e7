//! combat_core - Combat rules for action games
//!
//! This library provides:
//! - StatBlock / AbilitySystem: Attributes and depletable statistics
//! - DamageCalculator: Base, stat-driven and ability-driven damage formulas
//! - DefenseStance: Blocking, parrying and counter attacks
//! - StatusEffectManager: Instant, timed and damage-over-time effects
//! - Hit Resolution: Applying a hit to a combatant and reporting the outcome

pub mod ability;
pub mod actions;
pub mod combat;
pub mod config;
pub mod damage;
pub mod defense;
pub mod prelude;
pub mod stat_block;
pub mod status;
pub mod tag;
pub mod types;

// Re-export core types for convenience
pub use ability::AbilitySystem;
pub use actions::ActionState;
pub use combat::{resolve_hit, resolve_hit_with_rng, Arena, CombatResult, CombatRules, Combatant, IncomingHit};
pub use config::{CombatSettings, CombatantTemplate, ConfigError};
pub use damage::{CalculatorConfig, DamageCalculator, DamageEvent, DamageType, DamageTypeRegistry, HitResponseChance};
pub use defense::{BlockProfile, DefenseStance, DefenseStanceConfig, Loadout};
pub use stat_block::{AttributeDelta, StatBlock, Statistic};
pub use status::{StatusEffectDef, StatusEffectManager, StatusEffectRegistry};
pub use tag::GameplayTag;
pub use types::{ActorId, DamageZone, Direction};
