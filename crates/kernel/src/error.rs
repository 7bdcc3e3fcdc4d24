use delve_common::EntityId;
use delve_coords::Coord;

/// Errors from world mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("world bounds must contain at least one cell")]
    InvalidBounds,
    #[error("{0} is outside the map")]
    OutOfBounds(Coord),
    #[error("{at} is already occupied by {by}")]
    Occupied { at: Coord, by: EntityId },
    #[error("entity {0} not found")]
    UnknownEntity(EntityId),
    #[error("entity {0} is not placed in the world")]
    NotInWorld(EntityId),
    #[error("entity {0} cannot be stashed inside itself")]
    ContainmentCycle(EntityId),
}
