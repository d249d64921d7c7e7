//! Attribute modifiers applied for a while and removed by handle

use super::StatValue;
use crate::tag::GameplayTag;
use serde::{Deserialize, Serialize};

/// Handle returned when a modifier is added to a StatBlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierHandle(pub(crate) u64);

/// How a bonus combines with the attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    #[default]
    Flat,
    /// Additive percentage as decimal
    Increased,
    /// Multiplicative percentage as decimal
    More,
}

/// A single attribute bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeBonus {
    pub attribute: GameplayTag,
    #[serde(default)]
    pub kind: BonusKind,
    pub value: f64,
}

impl AttributeBonus {
    pub fn flat(attribute: impl Into<GameplayTag>, value: f64) -> Self {
        AttributeBonus {
            attribute: attribute.into(),
            kind: BonusKind::Flat,
            value,
        }
    }

    pub fn increased(attribute: impl Into<GameplayTag>, value: f64) -> Self {
        AttributeBonus {
            attribute: attribute.into(),
            kind: BonusKind::Increased,
            value,
        }
    }

    pub fn more(attribute: impl Into<GameplayTag>, value: f64) -> Self {
        AttributeBonus {
            attribute: attribute.into(),
            kind: BonusKind::More,
            value,
        }
    }

    pub(crate) fn apply_to(&self, value: &mut StatValue) {
        match self.kind {
            BonusKind::Flat => value.add_flat(self.value),
            BonusKind::Increased => value.add_increased(self.value),
            BonusKind::More => value.add_more(self.value),
        }
    }
}

/// A set of bonuses applied and removed together (a guard stance, a buff)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    #[serde(default)]
    pub bonuses: Vec<AttributeBonus>,
}

impl AttributeModifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bonus(mut self, bonus: AttributeBonus) -> Self {
        self.bonuses.push(bonus);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    /// Sum of this modifier's bonuses for one attribute
    pub(crate) fn layer_for(&self, attribute: &GameplayTag, layer: &mut StatValue) {
        for bonus in self.bonuses.iter().filter(|b| &b.attribute == attribute) {
            bonus.apply_to(layer);
        }
    }
}
