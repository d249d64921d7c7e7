//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::ability::AbilitySystem;
pub use crate::actions::ActionState;
pub use crate::stat_block::{AttributeDelta, AttributeModifier, StatBlock, Statistic};
pub use crate::tag::GameplayTag;
pub use crate::types::{ActionDirection, ActionPriority, ActorId, DamageZone, Direction, Placement};

// Damage system
pub use crate::damage::{CalculatorConfig, DamageCalculator, DamageEvent, DamageTypeRegistry, HitResponseChance};

// Defense
pub use crate::defense::{BlockOutcome, BlockProfile, DefenseStance, DefenseStanceConfig, Loadout};

// Status effects
pub use crate::status::{StatusEffectDef, StatusEffectRegistry, StatusEvent};

// Combat
pub use crate::combat::{Arena, CombatResult, Combatant, IncomingHit};

// Config
pub use crate::config::{CombatSettings, CombatantTemplate};
