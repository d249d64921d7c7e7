//! ActionState - Which action a combatant is performing

use crate::tag::GameplayTag;
use crate::types::ActionPriority;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The action currently playing on a combatant and the actions it may not start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionState {
    current: Option<(GameplayTag, ActionPriority)>,
    /// Seconds until the current action finishes on its own
    #[serde(default)]
    remaining: Option<f64>,
    #[serde(default)]
    locked: HashSet<GameplayTag>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `action` may start (not locked and not the empty tag)
    pub fn can_execute(&self, action: &GameplayTag) -> bool {
        action.is_valid() && !self.locked.iter().any(|l| action.matches(l))
    }

    /// Start an action, replacing whatever was playing
    pub fn trigger(&mut self, action: GameplayTag, priority: ActionPriority) -> bool {
        if !self.can_execute(&action) {
            return false;
        }
        self.current = Some((action, priority));
        self.remaining = None;
        true
    }

    /// Start an action that finishes by itself after `seconds`
    pub fn trigger_for(&mut self, action: GameplayTag, priority: ActionPriority, seconds: f64) -> bool {
        if !self.trigger(action, priority) {
            return false;
        }
        self.remaining = Some(seconds);
        true
    }

    pub fn finish(&mut self) {
        self.current = None;
        self.remaining = None;
    }

    /// Count down a timed action
    pub fn tick(&mut self, dt: f64) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.finish();
            }
        }
    }

    pub fn is_performing_action(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_action(&self) -> Option<&GameplayTag> {
        self.current.as_ref().map(|(tag, _)| tag)
    }

    pub fn current_priority(&self) -> Option<ActionPriority> {
        self.current.as_ref().map(|(_, priority)| *priority)
    }

    /// Lock an action (and its children) from starting
    pub fn lock(&mut self, action: GameplayTag) {
        self.locked.insert(action);
    }

    pub fn unlock(&mut self, action: &GameplayTag) {
        self.locked.remove(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_and_finish() {
        let mut actions = ActionState::new();
        assert!(actions.trigger("Actions.Attack".into(), ActionPriority::High));
        assert_eq!(actions.current_action(), Some(&GameplayTag::from("Actions.Attack")));
        assert_eq!(actions.current_priority(), Some(ActionPriority::High));

        actions.finish();
        assert!(!actions.is_performing_action());
    }

    #[test]
    fn test_locked_children() {
        let mut actions = ActionState::new();
        actions.lock("Actions.Counter".into());
        assert!(!actions.can_execute(&"Actions.Counter.Riposte".into()));
        assert!(actions.can_execute(&"Actions.Block".into()));
        assert!(!actions.trigger("Actions.Counter".into(), ActionPriority::High));

        actions.unlock(&"Actions.Counter".into());
        assert!(actions.can_execute(&"Actions.Counter".into()));
    }

    #[test]
    fn test_timed_action_expires() {
        let mut actions = ActionState::new();
        assert!(actions.trigger_for("Actions.Hit".into(), ActionPriority::Highest, 0.5));
        actions.tick(0.3);
        assert!(actions.is_performing_action());
        actions.tick(0.3);
        assert!(!actions.is_performing_action());

        // untimed actions stay until finished
        actions.trigger("Actions.Block".into(), ActionPriority::Medium);
        actions.tick(10.0);
        assert!(actions.is_performing_action());
    }

    #[test]
    fn test_empty_tag_not_executable() {
        let actions = ActionState::new();
        assert!(!actions.can_execute(&GameplayTag::none()));
    }
}
