//! ActiveStatusEffect - One running status effect and its timers

use super::{StatusEffectDef, StatusEffectKind};
use crate::ability::AbilitySystem;
use crate::stat_block::{AttributeDelta, ModifierHandle, StatBlock};
use crate::tag::GameplayTag;
use crate::types::ActorId;
use log::debug;
use serde::{Deserialize, Serialize};

/// Slack for timers accumulated from many small float steps
const TIMER_EPSILON: f64 = 1e-9;

/// The attribute components a status effect acts on
pub struct EffectTarget<'a> {
    pub stats: &'a mut StatBlock,
    pub abilities: &'a mut AbilitySystem,
}

impl EffectTarget<'_> {
    /// Consume deltas from statistics first, then ability attributes
    pub fn apply_deltas(&mut self, deltas: &[AttributeDelta]) {
        for delta in self.stats.consume_statistics(deltas) {
            if !self.abilities.apply_delta(delta) {
                debug!("status delta on unknown attribute {}", delta.attribute);
            }
        }
    }
}

/// Lifecycle notifications from the status effect manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "tag", rename_all = "snake_case")]
pub enum StatusEvent {
    Started(GameplayTag),
    Triggered(GameplayTag),
    Retriggered(GameplayTag),
    Removed(GameplayTag),
    Ended(GameplayTag),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveStatusEffect {
    pub def: StatusEffectDef,
    pub instigator: Option<ActorId>,
    /// Seconds until the effect expires (ForDuration)
    remaining: f64,
    /// Seconds until the next trigger (DamageOverTime)
    until_next_trigger: f64,
    triggers_left: u32,
    #[serde(skip)]
    modifier: Option<ModifierHandle>,
    finished: bool,
}

impl ActiveStatusEffect {
    pub fn new(def: StatusEffectDef, instigator: Option<ActorId>) -> Self {
        ActiveStatusEffect {
            def,
            instigator,
            remaining: 0.0,
            until_next_trigger: 0.0,
            triggers_left: 0,
            modifier: None,
            finished: false,
        }
    }

    pub fn tag(&self) -> &GameplayTag {
        &self.def.tag
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds left before a ForDuration effect expires
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn triggers_left(&self) -> u32 {
        self.triggers_left
    }

    pub(crate) fn start(&mut self, target: &mut EffectTarget<'_>, events: &mut Vec<StatusEvent>) {
        if let Some(cue) = &self.def.cue {
            target.abilities.add_cue(cue);
        }
        events.push(StatusEvent::Started(self.def.tag.clone()));

        match &self.def.kind {
            StatusEffectKind::Instant { .. } => {
                self.trigger(target, events);
                self.finished = true;
            }
            StatusEffectKind::ForDuration { .. } => self.trigger(target, events),
            StatusEffectKind::DamageOverTime { trigger_count: 0, .. } => {
                self.trigger(target, events);
                self.finished = true;
            }
            StatusEffectKind::DamageOverTime { .. } => self.arm_schedule(),
        }
    }

    pub(crate) fn retrigger(&mut self, target: &mut EffectTarget<'_>, events: &mut Vec<StatusEvent>) {
        events.push(StatusEvent::Retriggered(self.def.tag.clone()));
        match &self.def.kind {
            StatusEffectKind::DamageOverTime { .. } => {
                self.trigger(target, events);
                self.arm_schedule();
            }
            _ => self.trigger(target, events),
        }
    }

    /// Apply one trigger of the effect
    fn trigger(&mut self, target: &mut EffectTarget<'_>, events: &mut Vec<StatusEvent>) {
        match &self.def.kind {
            StatusEffectKind::Instant { deltas } | StatusEffectKind::DamageOverTime { deltas, .. } => {
                target.apply_deltas(deltas);
            }
            StatusEffectKind::ForDuration { duration, modifier } => {
                if let Some(handle) = self.modifier.take() {
                    target.stats.remove_modifier(handle);
                }
                if !modifier.is_empty() {
                    self.modifier = Some(target.stats.add_modifier(modifier.clone()));
                }
                self.remaining = *duration;
            }
        }
        events.push(StatusEvent::Triggered(self.def.tag.clone()));
    }

    fn arm_schedule(&mut self) {
        if let StatusEffectKind::DamageOverTime {
            duration,
            trigger_count,
            ..
        } = &self.def.kind
        {
            self.triggers_left = *trigger_count;
            self.until_next_trigger = duration / f64::from((*trigger_count).max(1));
        }
    }

    /// Advance timers by `dt` seconds, firing any triggers that come due
    pub(crate) fn advance(&mut self, dt: f64, target: &mut EffectTarget<'_>, events: &mut Vec<StatusEvent>) {
        if self.finished {
            return;
        }
        match &self.def.kind {
            StatusEffectKind::Instant { .. } => self.finished = true,
            StatusEffectKind::ForDuration { .. } => {
                self.remaining -= dt;
                if self.remaining <= TIMER_EPSILON {
                    self.finished = true;
                }
            }
            StatusEffectKind::DamageOverTime {
                duration,
                trigger_count,
                ..
            } => {
                let interval = duration / f64::from((*trigger_count).max(1));
                self.until_next_trigger -= dt;
                while self.triggers_left > 0 && self.until_next_trigger <= TIMER_EPSILON {
                    self.triggers_left -= 1;
                    self.until_next_trigger += interval;
                    self.trigger(target, events);
                }
                if self.triggers_left == 0 {
                    self.finished = true;
                }
            }
        }
    }

    pub(crate) fn end(&mut self, target: &mut EffectTarget<'_>, events: &mut Vec<StatusEvent>) {
        if let Some(handle) = self.modifier.take() {
            target.stats.remove_modifier(handle);
        }
        if let Some(cue) = &self.def.cue {
            target.abilities.remove_cue(cue);
        }
        self.finished = true;
        events.push(StatusEvent::Ended(self.def.tag.clone()));
    }
}
