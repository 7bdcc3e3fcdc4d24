use crate::query::WorldQuery;
use delve_common::{Overrides, SpriteKind};
use delve_coords::Coord;
use serde::{Deserialize, Serialize};

/// What fills a cell before any sprite is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Air,
    Solid,
    Water,
}

impl Terrain {
    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::Air => 0,
            Self::Solid => 1,
            Self::Water => 2,
        }
    }
}

/// Where a sprite may legally stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Any empty cell.
    #[default]
    Open,
    /// Inside solid ground.
    Embedded,
    /// An empty cell resting on solid ground.
    Floor,
    /// An empty cell hanging from solid ground.
    Ceiling,
    /// An unoccupied water cell.
    Liquid,
}

impl Placement {
    /// The legality predicate for this rule at `at`.
    pub fn permits(self, at: Coord, world: &dyn WorldQuery) -> bool {
        match self {
            Self::Open => world.is_empty(at),
            Self::Embedded => {
                world.in_map(at) && world.terrain(at) == Terrain::Solid && world.occupant(at).is_none()
            }
            Self::Floor => world.is_empty(at) && world.terrain(at.below()) == Terrain::Solid,
            Self::Ceiling => world.is_empty(at) && world.terrain(at.above()) == Terrain::Solid,
            Self::Liquid => {
                world.in_map(at) && world.terrain(at) == Terrain::Water && world.occupant(at).is_none()
            }
        }
    }
}

/// A placeable entity before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub name: String,
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl Sprite {
    pub fn item(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            kind: SpriteKind::Item,
            name: name.into(),
            placement,
            overrides: Overrides::new(),
        }
    }

    pub fn actor(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            kind: SpriteKind::Actor,
            name: name.into(),
            placement,
            overrides: Overrides::new(),
        }
    }

    /// Merge `overrides` on top of the current ones.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        self.overrides
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn can_spawn_at(&self, at: Coord, world: &dyn WorldQuery) -> bool {
        self.placement.permits(at, world)
    }
}
