//! Combatant - Everything the rules know about one fighter

use crate::ability::AbilitySystem;
use crate::actions::ActionState;
use crate::config::CombatSettings;
use crate::damage::HitResponseChance;
use crate::defense::{Defender, DefenseStance};
use crate::stat_block::{AttributeDelta, StatBlock};
use crate::status::{EffectTarget, StatusEffectDef, StatusEffectManager};
use crate::tag::GameplayTag;
use crate::types::{ActorId, Placement};
use log::debug;

#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: ActorId,
    pub name: String,
    pub alive: bool,
    /// Takes hits and reacts, but never loses health
    pub immortal: bool,
    pub stats: StatBlock,
    pub abilities: AbilitySystem,
    pub actions: ActionState,
    pub defense: Option<DefenseStance>,
    pub status_effects: StatusEffectManager,
    pub hit_responses: Vec<HitResponseChance>,
    pub placement: Option<Placement>,
}

impl Combatant {
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        Combatant {
            id: id.into(),
            name: name.into(),
            alive: true,
            immortal: false,
            stats: StatBlock::new(),
            abilities: AbilitySystem::new(),
            actions: ActionState::new(),
            defense: None,
            status_effects: StatusEffectManager::new(),
            hit_responses: Vec::new(),
            placement: None,
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_abilities(mut self, abilities: AbilitySystem) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_defense(mut self, stance: DefenseStance) -> Self {
        self.defense = Some(stance);
        self
    }

    pub fn with_hit_response(mut self, response: HitResponseChance) -> Self {
        self.hit_responses.push(response);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Borrow the defense stance next to the parts of us it checks a hit against
    pub fn split_defense(&mut self) -> Option<(&mut DefenseStance, Defender<'_>)> {
        let stance = self.defense.as_mut()?;
        let defender = Defender {
            stats: &mut self.stats,
            abilities: &self.abilities,
            actions: &self.actions,
            placement: self.placement,
        };
        Some((stance, defender))
    }

    pub fn effect_target(&mut self) -> EffectTarget<'_> {
        EffectTarget {
            stats: &mut self.stats,
            abilities: &mut self.abilities,
        }
    }

    pub fn start_defending(&mut self) -> bool {
        match self.defense.as_mut() {
            Some(stance) => stance.start_defending(&mut self.stats, &self.abilities),
            None => false,
        }
    }

    pub fn stop_defending(&mut self) -> bool {
        match self.defense.as_mut() {
            Some(stance) => stance.stop_defending(&mut self.stats),
            None => false,
        }
    }

    pub fn start_parry(&mut self) -> bool {
        match self.defense.as_mut() {
            Some(stance) => stance.start_parry(&mut self.stats, &self.abilities),
            None => false,
        }
    }

    pub fn stop_parry(&mut self) {
        if let Some(stance) = self.defense.as_mut() {
            stance.stop_parry(&mut self.stats);
        }
    }

    pub fn set_counter_window(&mut self, open: bool) {
        if let Some(stance) = self.defense.as_mut() {
            stance.set_counter_window(open);
        }
    }

    pub fn is_defending(&self) -> bool {
        self.defense.as_ref().map(|s| s.is_defending()).unwrap_or(false)
    }

    /// Whether `action` is one of our guard reactions (block, parry, counter)
    pub fn is_guard_reaction(&self, action: &GameplayTag) -> bool {
        match &self.defense {
            Some(stance) => {
                let config = &stance.config;
                action == &config.block_action || action == &config.parry_action || action == &config.counter_action
            }
            None => false,
        }
    }

    /// Current health, read from a statistic or else an ability attribute
    ///
    /// Zero when health isn't tracked at all.
    pub fn health(&self, settings: &CombatSettings) -> f64 {
        self.try_health(settings).unwrap_or(0.0)
    }

    /// Current health, None when neither a statistic nor an attribute holds it
    pub fn try_health(&self, settings: &CombatSettings) -> Option<f64> {
        match self.stats.statistic(&settings.health) {
            Some(stat) => Some(stat.current),
            None => self.abilities.try_numeric(&settings.health),
        }
    }

    /// Untracked health never runs out
    pub fn is_health_depleted(&self, settings: &CombatSettings) -> bool {
        self.try_health(settings).map(|health| health <= 0.0).unwrap_or(false)
    }

    /// Consume deltas from statistics first, then ability attributes
    pub fn apply_deltas(&mut self, deltas: &[AttributeDelta]) {
        self.effect_target().apply_deltas(deltas);
    }

    pub fn add_status_effect(&mut self, def: &StatusEffectDef, instigator: Option<ActorId>) -> bool {
        let mut target = EffectTarget {
            stats: &mut self.stats,
            abilities: &mut self.abilities,
        };
        self.status_effects.add_status_effect(def, instigator, &mut target)
    }

    pub fn remove_status_effect(&mut self, tag: &GameplayTag) -> bool {
        let mut target = EffectTarget {
            stats: &mut self.stats,
            abilities: &mut self.abilities,
        };
        self.status_effects.remove_status_effect(tag, &mut target)
    }

    /// Advance regeneration, timed actions and status effects
    pub fn tick(&mut self, dt: f64) {
        if !self.alive {
            return;
        }
        self.stats.regenerate(dt);
        self.actions.tick(dt);
        let mut target = EffectTarget {
            stats: &mut self.stats,
            abilities: &mut self.abilities,
        };
        self.status_effects.tick(dt, &mut target);
    }

    /// Mark as dead, dropping the guard and every status effect
    pub fn die(&mut self) {
        if !self.alive {
            return;
        }
        debug!("{} died", self.name);
        self.alive = false;
        self.stop_defending();
        self.actions.finish();
        let mut target = EffectTarget {
            stats: &mut self.stats,
            abilities: &mut self.abilities,
        };
        self.status_effects.clear(&mut target);
    }
}
