//! GameplayTag - Hierarchical dotted identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hierarchical identifier such as `"Actions.Hit.Heavy"`
///
/// Tags identify actions, statistics, attributes, statuses, damage types and
/// cues. The empty tag means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameplayTag(String);

impl GameplayTag {
    /// Create a tag from any string-like value
    pub fn new(name: impl Into<String>) -> Self {
        GameplayTag(name.into())
    }

    /// The empty tag
    pub fn none() -> Self {
        GameplayTag(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    /// True when `self` equals `parent` or sits below it in the hierarchy
    ///
    /// `"Actions.Hit.Heavy"` matches `"Actions.Hit"` and `"Actions"`, but not
    /// `"Actions.Hi"`. Nothing matches the empty tag.
    pub fn matches(&self, parent: &GameplayTag) -> bool {
        if parent.is_none() || self.is_none() {
            return false;
        }
        match self.0.strip_prefix(parent.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }

    /// The direct parent tag, if any
    pub fn parent(&self) -> Option<GameplayTag> {
        self.0.rsplit_once('.').map(|(parent, _)| GameplayTag::new(parent))
    }
}

impl From<&str> for GameplayTag {
    fn from(s: &str) -> Self {
        GameplayTag(s.to_string())
    }
}

impl From<String> for GameplayTag {
    fn from(s: String) -> Self {
        GameplayTag(s)
    }
}

impl fmt::Display for GameplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "<none>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
