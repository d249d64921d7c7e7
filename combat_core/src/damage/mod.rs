//! Damage system - Damage types, damage events and the calculators that resolve them

pub mod calculation;
mod calculator;
mod damage_type;
mod event;
mod hit_response;

pub use calculation::{apply_random_deviation, extract_index_with_probability, reduce_damage_by_percentage};
pub use calculator::{
    AbilityDamageCalculator, BaseDamageCalculator, CalculatorConfig, CalculatorTuning, CriticalChance,
    DamageCalculator, HitContext, StatDamageCalculator, ZoneMultiplier,
};
pub use damage_type::{DamageInfluence, DamageInfluences, DamageType, DamageTypeRegistry};
pub use event::{DamageEvent, DamageEventError};
pub use hit_response::HitResponseChance;
