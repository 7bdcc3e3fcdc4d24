use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a sprite in a world.
///
/// Ids are handed out sequentially by the owning world so that two runs with
/// the same seed and layout assign the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a sprite is an inert item or an acting creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    Item,
    Actor,
}

impl fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => f.write_str("item"),
            Self::Actor => f.write_str("actor"),
        }
    }
}

/// Per-spawn property overrides handed to the entity factory.
///
/// BTreeMap keeps the key order stable for hashing and diagnostics.
pub type Overrides = BTreeMap<String, serde_json::Value>;
