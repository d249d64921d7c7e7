//! Status effect definitions

use crate::stat_block::{AttributeDelta, AttributeModifier};
use crate::tag::GameplayTag;
use serde::{Deserialize, Serialize};

/// How a status effect behaves over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEffectKind {
    /// Applies its deltas once and ends
    Instant {
        #[serde(default)]
        deltas: Vec<AttributeDelta>,
    },
    /// Holds an attribute modifier until the duration runs out
    ForDuration {
        #[serde(default = "default_for_duration")]
        duration: f64,
        #[serde(default)]
        modifier: AttributeModifier,
    },
    /// Applies its deltas `trigger_count` times, evenly spaced over the duration
    DamageOverTime {
        #[serde(default = "default_dot_duration")]
        duration: f64,
        #[serde(default = "default_trigger_count")]
        trigger_count: u32,
        #[serde(default)]
        deltas: Vec<AttributeDelta>,
    },
}

fn default_for_duration() -> f64 {
    5.0
}

fn default_dot_duration() -> f64 {
    3.0
}

fn default_trigger_count() -> u32 {
    3
}

/// A status effect as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectDef {
    pub tag: GameplayTag,
    /// Cue shown on the target while the effect is active
    #[serde(default)]
    pub cue: Option<GameplayTag>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Reapplying restarts the effect instead of being ignored
    #[serde(default)]
    pub retriggerable: bool,
    pub kind: StatusEffectKind,
}

impl StatusEffectDef {
    pub fn instant(tag: impl Into<GameplayTag>, deltas: Vec<AttributeDelta>) -> Self {
        Self::with_kind(tag, StatusEffectKind::Instant { deltas })
    }

    pub fn for_duration(tag: impl Into<GameplayTag>, duration: f64, modifier: AttributeModifier) -> Self {
        Self::with_kind(tag, StatusEffectKind::ForDuration { duration, modifier })
    }

    pub fn damage_over_time(
        tag: impl Into<GameplayTag>,
        duration: f64,
        trigger_count: u32,
        deltas: Vec<AttributeDelta>,
    ) -> Self {
        Self::with_kind(
            tag,
            StatusEffectKind::DamageOverTime {
                duration,
                trigger_count,
                deltas,
            },
        )
    }

    fn with_kind(tag: impl Into<GameplayTag>, kind: StatusEffectKind) -> Self {
        StatusEffectDef {
            tag: tag.into(),
            cue: None,
            icon: None,
            retriggerable: false,
            kind,
        }
    }

    pub fn with_cue(mut self, cue: impl Into<GameplayTag>) -> Self {
        self.cue = Some(cue.into());
        self
    }

    pub fn retriggerable(mut self) -> Self {
        self.retriggerable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds_with_defaults() {
        let toml = r#"
tag = "Status.Burning"
cue = "Cue.Fire"
retriggerable = true

[kind]
type = "damage_over_time"

[[kind.deltas]]
attribute = "Statistics.Health"
value = 4.0
"#;
        let def: StatusEffectDef = toml::from_str(toml).unwrap();
        assert!(def.retriggerable);
        match def.kind {
            StatusEffectKind::DamageOverTime {
                duration,
                trigger_count,
                deltas,
            } => {
                assert!((duration - 3.0).abs() < f64::EPSILON);
                assert_eq!(trigger_count, 3);
                assert_eq!(deltas.len(), 1);
            }
            other => panic!("unexpected kind {:?}", other),
        }

        let buff: StatusEffectDef = toml::from_str(
            r#"
tag = "Status.Guarded"
[kind]
type = "for_duration"
"#,
        )
        .unwrap();
        assert!(matches!(buff.kind, StatusEffectKind::ForDuration { duration, .. } if (duration - 5.0).abs() < f64::EPSILON));
        assert!(!buff.retriggerable);
    }
}
