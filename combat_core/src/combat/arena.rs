//! Arena - Combatants sharing one rule set and one clock

use super::resolution::{resolve_hit_with_rng, CombatRules, IncomingHit};
use super::result::CombatResult;
use super::Combatant;
use crate::config::CombatSettings;
use crate::damage::{DamageCalculator, DamageTypeRegistry};
use crate::status::{StatusEffectRegistry, StatusEvent};
use crate::tag::GameplayTag;
use crate::types::ActorId;
use log::{info, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What happened during one arena tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub status_events: Vec<(ActorId, StatusEvent)>,
    /// Combatants killed by status effects this tick
    pub deaths: Vec<ActorId>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.status_events.is_empty() && self.deaths.is_empty()
    }
}

#[derive(Debug)]
pub struct Arena {
    combatants: BTreeMap<ActorId, Combatant>,
    calculator: Box<dyn DamageCalculator>,
    damage_types: DamageTypeRegistry,
    status_effects: StatusEffectRegistry,
    settings: CombatSettings,
    elapsed: f64,
}

impl Arena {
    pub fn new(
        calculator: Box<dyn DamageCalculator>,
        damage_types: DamageTypeRegistry,
        status_effects: StatusEffectRegistry,
        settings: CombatSettings,
    ) -> Self {
        Arena {
            combatants: BTreeMap::new(),
            calculator,
            damage_types,
            status_effects,
            settings,
            elapsed: 0.0,
        }
    }

    /// Add a combatant, replacing any with the same id
    pub fn spawn(&mut self, combatant: Combatant) -> ActorId {
        let id = combatant.id.clone();
        if self.combatants.insert(id.clone(), combatant).is_some() {
            warn!("replaced combatant {}", id);
        }
        id
    }

    pub fn get(&self, id: &ActorId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    pub fn get_mut(&mut self, id: &ActorId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ActorId> {
        self.combatants.keys()
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn alive_count(&self) -> usize {
        self.combatants.values().filter(|c| c.alive).count()
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }

    pub fn damage_types(&self) -> &DamageTypeRegistry {
        &self.damage_types
    }

    pub fn status_registry(&self) -> &StatusEffectRegistry {
        &self.status_effects
    }

    /// Seconds of simulated time so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Resolve a hit from `dealer` on `receiver`
    ///
    /// Returns `None` when the receiver is unknown. An unknown dealer still
    /// lands the hit, unmodified by any formula.
    pub fn apply_hit(
        &mut self,
        dealer: &ActorId,
        receiver: &ActorId,
        hit: &IncomingHit,
        rng: &mut dyn RngCore,
    ) -> Option<CombatResult> {
        let Some(mut target) = self.combatants.remove(receiver) else {
            warn!("hit on unknown combatant {}", receiver);
            return None;
        };

        // Self-inflicted hits read the attacker side from a snapshot
        let snapshot = (dealer == receiver).then(|| target.clone());
        let attacker = match &snapshot {
            Some(own) => Some(own),
            None => self.combatants.get(dealer),
        };
        if attacker.is_none() {
            warn!("hit from unknown combatant {}", dealer);
        }

        let rules = CombatRules {
            calculator: self.calculator.as_ref(),
            damage_types: &self.damage_types,
            status_effects: &self.status_effects,
            settings: &self.settings,
        };
        let result = resolve_hit_with_rng(rules, attacker, &mut target, hit, rng);
        if result.is_killing_blow {
            info!("{} was slain by {}", target.name, dealer);
        }

        self.combatants.insert(receiver.clone(), target);
        Some(result)
    }

    /// Apply a registered status effect directly
    pub fn apply_status(&mut self, target: &ActorId, status: &GameplayTag, instigator: Option<ActorId>) -> bool {
        let Some(def) = self.status_effects.get(status) else {
            warn!("unknown status effect {}", status);
            return false;
        };
        match self.combatants.get_mut(target) {
            Some(combatant) if combatant.alive => combatant.add_status_effect(def, instigator),
            _ => false,
        }
    }

    /// Advance every living combatant by `dt` seconds
    pub fn tick(&mut self, dt: f64) -> TickReport {
        self.elapsed += dt;
        let mut report = TickReport::default();

        for (id, combatant) in self.combatants.iter_mut() {
            if !combatant.alive {
                continue;
            }
            combatant.tick(dt);
            for event in combatant.status_effects.drain_events() {
                report.status_events.push((id.clone(), event));
            }
            if !combatant.immortal && combatant.is_health_depleted(&self.settings) {
                combatant.die();
                for event in combatant.status_effects.drain_events() {
                    report.status_events.push((id.clone(), event));
                }
                info!("{} succumbed at {:.2}s", combatant.name, self.elapsed);
                report.deaths.push(id.clone());
            }
        }

        report
    }
}
