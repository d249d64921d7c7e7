//! StatusEffectManager - The set of status effects active on one combatant

use super::active::{ActiveStatusEffect, EffectTarget, StatusEvent};
use super::{StatusEffectDef, StatusEffectRegistry};
use crate::tag::GameplayTag;
use crate::types::ActorId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Active effects keyed by tag, at most one per tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffectManager {
    active: Vec<ActiveStatusEffect>,
    #[serde(skip)]
    events: Vec<StatusEvent>,
}

impl StatusEffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect
    ///
    /// If the tag is already active the effect is retriggered when the
    /// definition allows it and ignored otherwise. Returns whether anything
    /// happened.
    pub fn add_status_effect(
        &mut self,
        def: &StatusEffectDef,
        instigator: Option<ActorId>,
        target: &mut EffectTarget<'_>,
    ) -> bool {
        if !def.tag.is_valid() {
            warn!("ignoring status effect without a tag");
            return false;
        }

        if let Some(existing) = self.active.iter_mut().find(|e| e.tag() == &def.tag) {
            if !def.retriggerable {
                debug!("status {} already active", def.tag);
                return false;
            }
            existing.instigator = instigator;
            existing.retrigger(target, &mut self.events);
            return true;
        }

        let mut effect = ActiveStatusEffect::new(def.clone(), instigator);
        effect.start(target, &mut self.events);
        if effect.is_finished() {
            effect.end(target, &mut self.events);
        } else {
            self.active.push(effect);
        }
        true
    }

    /// Apply an effect by tag from a registry
    pub fn add_from_registry(
        &mut self,
        registry: &StatusEffectRegistry,
        tag: &GameplayTag,
        instigator: Option<ActorId>,
        target: &mut EffectTarget<'_>,
    ) -> bool {
        match registry.get(tag) {
            Some(def) => self.add_status_effect(def, instigator, target),
            None => {
                warn!("unknown status effect {}", tag);
                false
            }
        }
    }

    /// End an active effect early
    pub fn remove_status_effect(&mut self, tag: &GameplayTag, target: &mut EffectTarget<'_>) -> bool {
        let Some(index) = self.active.iter().position(|e| e.tag() == tag) else {
            return false;
        };
        let mut effect = self.active.remove(index);
        self.events.push(StatusEvent::Removed(tag.clone()));
        effect.end(target, &mut self.events);
        true
    }

    /// End every active effect
    pub fn clear(&mut self, target: &mut EffectTarget<'_>) {
        for mut effect in std::mem::take(&mut self.active) {
            self.events.push(StatusEvent::Removed(effect.tag().clone()));
            effect.end(target, &mut self.events);
        }
    }

    /// Advance every effect by `dt` seconds and drop the ones that expired
    pub fn tick(&mut self, dt: f64, target: &mut EffectTarget<'_>) {
        for effect in self.active.iter_mut() {
            effect.advance(dt, target, &mut self.events);
        }

        let (finished, running): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(|e| e.is_finished());
        self.active = running;
        for mut effect in finished {
            effect.end(target, &mut self.events);
        }
    }

    pub fn is_affected_by(&self, tag: &GameplayTag) -> bool {
        self.active.iter().any(|e| e.tag() == tag)
    }

    pub fn get(&self, tag: &GameplayTag) -> Option<&ActiveStatusEffect> {
        self.active.iter().find(|e| e.tag() == tag)
    }

    pub fn active_tags(&self) -> Vec<GameplayTag> {
        self.active.iter().map(|e| e.tag().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<StatusEvent> {
        std::mem::take(&mut self.events)
    }
}
