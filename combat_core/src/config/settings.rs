//! Engine-wide combat settings

use crate::tag::GameplayTag;
use crate::types::ActionPriority;
use serde::{Deserialize, Serialize};

/// Tags and timings every combatant shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSettings {
    /// Reaction used when a combatant has no hit responses of its own
    #[serde(default = "default_hit_state")]
    pub default_hit_state: GameplayTag,
    /// Statistic (or ability attribute) that final damage is taken from
    #[serde(default = "default_health")]
    pub health: GameplayTag,
    /// How long a triggered hit reaction keeps the receiver busy
    #[serde(default = "default_reaction_duration")]
    pub reaction_duration: f64,
    #[serde(default = "default_reaction_priority")]
    pub reaction_priority: ActionPriority,
}

fn default_hit_state() -> GameplayTag {
    GameplayTag::from("Actions.Hit")
}

fn default_health() -> GameplayTag {
    GameplayTag::from("Statistics.Health")
}

fn default_reaction_duration() -> f64 {
    0.6
}

fn default_reaction_priority() -> ActionPriority {
    ActionPriority::Highest
}

impl Default for CombatSettings {
    fn default() -> Self {
        CombatSettings {
            default_hit_state: default_hit_state(),
            health: default_health(),
            reaction_duration: default_reaction_duration(),
            reaction_priority: default_reaction_priority(),
        }
    }
}
