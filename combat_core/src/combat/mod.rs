//! Combat resolution - Apply hits to combatants and run their clocks

mod arena;
mod combatant;
mod resolution;
mod result;

pub use arena::{Arena, TickReport};
pub use combatant::Combatant;
pub use resolution::{resolve_hit, resolve_hit_with_rng, CombatRules, IncomingHit};
pub use result::CombatResult;
