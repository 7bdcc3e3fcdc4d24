//! The narrow query surface that placement and spawning read through.

use crate::error::WorldError;
use crate::terrain::{Sprite, Terrain};
use delve_common::EntityId;
use delve_coords::{BoundingBox, Coord};

/// Read-only view of a world.
pub trait WorldQuery {
    /// The map's extent.
    fn bounds(&self) -> BoundingBox;

    fn in_map(&self, c: Coord) -> bool {
        self.bounds().contains(c)
    }

    /// Terrain at `c`. Cells outside the map read as [`Terrain::Solid`].
    fn terrain(&self, c: Coord) -> Terrain;

    /// The sprite standing in cell `c`, if any.
    fn occupant(&self, c: Coord) -> Option<EntityId>;

    /// In the map, open air, and unoccupied.
    fn is_empty(&self, c: Coord) -> bool {
        self.in_map(c) && self.terrain(c) == Terrain::Air && self.occupant(c).is_none()
    }

    /// In the map and not solid. Occupants do not block passage.
    fn is_passable(&self, c: Coord) -> bool {
        self.in_map(c) && self.terrain(c) != Terrain::Solid
    }
}

/// A world that sprites can be added to.
pub trait WorldMut: WorldQuery {
    /// Place `sprite` in cell `at` and return its new id.
    fn add_sprite(&mut self, sprite: Sprite, at: Coord) -> Result<EntityId, WorldError>;

    /// World position of a sprite placed directly in a cell.
    fn position(&self, id: EntityId) -> Option<Coord>;
}
