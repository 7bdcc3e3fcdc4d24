//! Shared identifiers and value types used across the delve crates.

mod types;

pub use types::{EntityId, Overrides, SpriteKind};
