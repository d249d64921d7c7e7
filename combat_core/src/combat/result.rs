//! CombatResult - Outcome of one resolved hit

use crate::damage::DamageEvent;
use crate::defense::StanceEvent;
use crate::tag::GameplayTag;
use serde::{Deserialize, Serialize};

/// Result of resolving a hit against a combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatResult {
    /// The fully evaluated event (crit, reaction, final damage, side costs)
    pub event: DamageEvent,
    /// Damage as it arrived, before any formula
    pub raw_damage: f64,
    /// Damage taken from health
    pub total_damage: f64,

    // === State Changes ===
    pub health_before: f64,
    pub health_after: f64,

    // === Flags ===
    /// The receiver was already dead and the hit did nothing
    pub ignored: bool,
    /// The hit was stopped by a block, parry or counter
    pub guarded: bool,
    pub is_killing_blow: bool,

    /// Notifications from the receiver's defense stance
    #[serde(default)]
    pub stance_events: Vec<StanceEvent>,
    /// Status effects applied by this hit
    #[serde(default)]
    pub applied_status_effects: Vec<GameplayTag>,
}

impl CombatResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_critical(&self) -> bool {
        self.event.is_critical
    }

    pub fn hit_response(&self) -> Option<&GameplayTag> {
        self.event.hit_response.as_ref()
    }

    /// Damage removed (or added, when negative) by the formulas
    pub fn total_mitigated(&self) -> f64 {
        self.raw_damage - self.total_damage
    }

    pub fn health_change(&self) -> f64 {
        self.health_after - self.health_before
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.ignored {
            return "No effect".to_string();
        }

        let mut parts = Vec::new();
        parts.push(format!("{:.0} damage taken", self.total_damage));

        if self.is_critical() {
            parts.push("CRITICAL".to_string());
        }
        if let Some(reaction) = self.hit_response() {
            parts.push(format!("reacts with {}", reaction));
        }
        if self.guarded {
            parts.push(format!("{:.0} guarded", self.total_mitigated().max(0.0)));
        }
        for status in &self.applied_status_effects {
            parts.push(format!("applies {}", status));
        }
        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }

        parts.join(", ")
    }
}
