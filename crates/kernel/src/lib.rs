//! World Kernel: voxel terrain, sprite placement, append-only event log, replay.
//!
//! # Invariants
//! - Every sprite is owned by exactly one of {a world cell, a container}.
//! - A world cell holds at most one sprite.
//! - All state mutations flow through explicit operations and are logged.
//! - Entity ids are sequential, so identical operation sequences produce
//!   identical worlds.

pub mod error;
pub mod query;
pub mod terrain;
pub mod world;

pub use error::WorldError;
pub use query::{WorldMut, WorldQuery};
pub use terrain::{Placement, Sprite, Terrain};
pub use world::{Location, SpriteData, VoxelWorld, WorldEvent};

pub fn crate_info() -> &'static str {
    "delve-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
