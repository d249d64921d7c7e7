//! Core types shared across the combat rules

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier of a combatant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        ActorId(s.to_string())
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        ActorId(s)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction an incoming hit arrives from, relative to the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Front,
    Back,
    Left,
    Right,
    FrontRight,
    BackRight,
    BackLeft,
    FrontLeft,
}

impl Direction {
    /// Classify `to_attacker` into one of 8 sectors around `forward`
    ///
    /// Only the horizontal plane (x, y) is considered. Degenerate vectors fall
    /// back to `Front`.
    pub fn from_vectors(forward: Vec3, to_attacker: Vec3) -> Self {
        let forward = Vec3::new(forward.x, forward.y, 0.0).normalize_or_zero();
        let to_attacker = Vec3::new(to_attacker.x, to_attacker.y, 0.0).normalize_or_zero();
        if forward == Vec3::ZERO || to_attacker == Vec3::ZERO {
            return Direction::Front;
        }

        // Signed angle, positive towards the receiver's right (z-up, right-handed)
        let cross = forward.x * to_attacker.y - forward.y * to_attacker.x;
        let dot = forward.dot(to_attacker);
        let angle = (-cross).atan2(dot).to_degrees();
        Self::from_angle(angle)
    }

    /// Classify a signed angle in degrees, positive towards the right
    ///
    /// Left and right sectors mirror each other, boundaries included.
    pub fn from_angle(angle: f32) -> Self {
        let right = angle > 0.0;
        match angle.abs() {
            a if a <= 22.5 => Direction::Front,
            a if a < 67.5 => {
                if right {
                    Direction::FrontRight
                } else {
                    Direction::FrontLeft
                }
            }
            a if a < 112.5 => {
                if right {
                    Direction::Right
                } else {
                    Direction::Left
                }
            }
            a if a < 157.5 => {
                if right {
                    Direction::BackRight
                } else {
                    Direction::BackLeft
                }
            }
            _ => Direction::Back,
        }
    }
}

/// Direction filter used by hit reactions and block profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDirection {
    Front,
    Back,
    Left,
    Right,
    FrontRight,
    BackRight,
    BackLeft,
    FrontLeft,
    #[default]
    EveryDirection,
}

impl ActionDirection {
    /// Whether a hit from `direction` passes this filter
    pub fn allows(&self, direction: Direction) -> bool {
        let required = match self {
            ActionDirection::EveryDirection => return true,
            ActionDirection::Front => Direction::Front,
            ActionDirection::Back => Direction::Back,
            ActionDirection::Left => Direction::Left,
            ActionDirection::Right => Direction::Right,
            ActionDirection::FrontRight => Direction::FrontRight,
            ActionDirection::BackRight => Direction::BackRight,
            ActionDirection::BackLeft => Direction::BackLeft,
            ActionDirection::FrontLeft => Direction::FrontLeft,
        };
        required == direction
    }
}

/// Body zone a hit landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageZone {
    #[default]
    Normal,
    HighDefense,
    Critical,
}

/// Priority of an executing action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Low,
    #[default]
    Medium,
    High,
    Highest,
}

/// World placement of a combatant, used for direction and block-angle checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Placement {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Placement { position, forward }
    }

    /// Horizontal angle in degrees between our forward and the direction to `other`
    pub fn angle_to(&self, other: Vec3) -> f32 {
        let to_other = Vec3::new(other.x - self.position.x, other.y - self.position.y, 0.0).normalize_or_zero();
        let forward = Vec3::new(self.forward.x, self.forward.y, 0.0).normalize_or_zero();
        let dot = forward.dot(to_other).clamp(-1.0, 1.0);
        dot.acos().to_degrees()
    }

    /// Direction a hit from `attacker` arrives from
    pub fn direction_from(&self, attacker: Vec3) -> Direction {
        Direction::from_vectors(self.forward, attacker - self.position)
    }
}
