//! Defense system - Block profiles and the defense stance

mod block;
mod stance;

pub use block::{BlockProfile, GuardSlot, Loadout};
pub use stance::{BlockOutcome, DamagedResource, Defender, DefenseStance, DefenseStanceConfig, StanceEvent};
