//! DamageEvent - One hit, from its dealer to its receiver

use crate::stat_block::AttributeDelta;
use crate::tag::GameplayTag;
use crate::types::{ActorId, DamageZone, Direction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a damage event can't be evaluated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DamageEventError {
    #[error("missing damage receiver")]
    MissingReceiver,
    #[error("missing damage dealer")]
    MissingDealer,
    #[error("missing damage class")]
    MissingDamageClass,
    #[error("damage class {0} is not registered")]
    UnknownDamageClass(GameplayTag),
}

/// A single hit, created per event and consumed by a calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageEvent {
    pub dealer: Option<ActorId>,
    pub receiver: Option<ActorId>,
    pub damage_type: Option<GameplayTag>,
    /// Incoming damage; replaced by the calculated damage once resolved
    pub final_damage: f64,
    pub zone: DamageZone,
    pub direction: Direction,
    pub is_critical: bool,
    /// Reaction chosen for the receiver
    pub hit_response: Option<GameplayTag>,
    #[serde(default)]
    pub damage_tags: Vec<GameplayTag>,
    /// Secondary attributes to consume on the receiver (stamina on block, posture)
    #[serde(default)]
    pub affected_attributes: Vec<AttributeDelta>,
    #[serde(default)]
    pub context: Option<String>,
}

impl DamageEvent {
    pub fn new(damage: f64) -> Self {
        DamageEvent {
            final_damage: damage,
            ..Default::default()
        }
    }

    pub fn with_dealer(mut self, dealer: impl Into<ActorId>) -> Self {
        self.dealer = Some(dealer.into());
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<ActorId>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_damage_type(mut self, damage_type: impl Into<GameplayTag>) -> Self {
        self.damage_type = Some(damage_type.into());
        self
    }

    pub fn with_zone(mut self, zone: DamageZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    pub fn with_hit_response(mut self, action: impl Into<GameplayTag>) -> Self {
        self.hit_response = Some(action.into());
        self
    }

    /// Check that receiver, dealer and damage class are all set
    pub fn validate(&self) -> Result<&GameplayTag, DamageEventError> {
        if self.receiver.is_none() {
            return Err(DamageEventError::MissingReceiver);
        }
        if self.dealer.is_none() {
            return Err(DamageEventError::MissingDealer);
        }
        match &self.damage_type {
            Some(tag) if tag.is_valid() => Ok(tag),
            _ => Err(DamageEventError::MissingDamageClass),
        }
    }

    /// Whether the chosen reaction is exactly `action`
    pub fn is_hit_response(&self, action: &GameplayTag) -> bool {
        action.is_valid() && self.hit_response.as_ref() == Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_order() {
        let event = DamageEvent::new(10.0);
        assert_eq!(event.validate(), Err(DamageEventError::MissingReceiver));

        let event = event.with_receiver("enemy");
        assert_eq!(event.validate(), Err(DamageEventError::MissingDealer));

        let event = event.with_dealer("player");
        assert_eq!(event.validate(), Err(DamageEventError::MissingDamageClass));

        let event = event.with_damage_type("DamageType.Melee");
        assert_eq!(event.validate(), Ok(&GameplayTag::from("DamageType.Melee")));
    }

    #[test]
    fn test_empty_damage_class_is_missing() {
        let event = DamageEvent::new(10.0)
            .with_receiver("enemy")
            .with_dealer("player")
            .with_damage_type(GameplayTag::none());
        assert_eq!(event.validate(), Err(DamageEventError::MissingDamageClass));
    }

    #[test]
    fn test_is_hit_response() {
        let event = DamageEvent::new(1.0).with_hit_response("Actions.Block");
        assert!(event.is_hit_response(&"Actions.Block".into()));
        assert!(!event.is_hit_response(&"Actions.Parry".into()));
        assert!(!DamageEvent::new(1.0).is_hit_response(&GameplayTag::none()));
    }
}
