use delve_common::{EntityId, SpriteKind};
use delve_coords::{BoundingBox, CoordSet};
use delve_kernel::{Location, Terrain, VoxelWorld, WorldQuery};
use std::collections::BTreeMap;

/// World inspector for developer tooling.
///
/// Read-only queries against a populated world, for the CLI and tests.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &VoxelWorld) -> WorldSummary {
        let bounds = world.bounds();
        let mut terrain = TerrainCounts::default();
        let mut cells = bounds.coords();
        for c in cells.iter() {
            match world.terrain(c) {
                Terrain::Air => terrain.air += 1,
                Terrain::Solid => terrain.solid += 1,
                Terrain::Water => terrain.water += 1,
            }
        }

        let mut by_name = BTreeMap::new();
        let (mut items, mut actors, mut contained) = (0, 0, 0);
        for data in world.sprites().values() {
            *by_name.entry(data.sprite.name.clone()).or_insert(0) += 1;
            match data.sprite.kind {
                SpriteKind::Item => items += 1,
                SpriteKind::Actor => actors += 1,
            }
            if matches!(data.location, Location::Container(_)) {
                contained += 1;
            }
        }

        WorldSummary {
            bounds,
            terrain,
            items,
            actors,
            contained,
            by_name,
            events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    pub fn inspect_sprite(world: &VoxelWorld, id: EntityId) -> Option<SpriteInfo> {
        world.get(id).map(|data| SpriteInfo {
            id,
            kind: data.sprite.kind,
            name: data.sprite.name.clone(),
            location: data.location,
        })
    }

    /// All sprite ids, in id order.
    pub fn list_sprites(world: &VoxelWorld) -> Vec<EntityId> {
        world.sprites().keys().copied().collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainCounts {
    pub air: usize,
    pub solid: usize,
    pub water: usize,
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub bounds: BoundingBox,
    pub terrain: TerrainCounts,
    pub items: usize,
    pub actors: usize,
    /// Sprites held by another sprite rather than a cell.
    pub contained: usize,
    pub by_name: BTreeMap<String, usize>,
    pub events: usize,
    pub state_hash: u64,
}

impl WorldSummary {
    pub fn sprite_count(&self) -> usize {
        self.items + self.actors
    }
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "World: {}..{} air={} solid={} water={}",
            self.bounds.min, self.bounds.max, self.terrain.air, self.terrain.solid, self.terrain.water
        )?;
        writeln!(
            f,
            "Sprites: {} (items={} actors={} contained={}) events={} hash={:016x}",
            self.sprite_count(),
            self.items,
            self.actors,
            self.contained,
            self.events,
            self.state_hash
        )?;
        for (name, n) in &self.by_name {
            writeln!(f, "  {name}: {n}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single sprite.
#[derive(Debug, Clone)]
pub struct SpriteInfo {
    pub id: EntityId,
    pub kind: SpriteKind,
    pub name: String,
    pub location: Location,
}

impl std::fmt::Display for SpriteInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Location::World(at) => write!(f, "Sprite {} {} '{}' at {at}", self.id, self.kind, self.name),
            Location::Container(c) => {
                write!(f, "Sprite {} {} '{}' inside {c}", self.id, self.kind, self.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_coords::Coord;
    use delve_kernel::{Placement, Sprite};

    fn world() -> VoxelWorld {
        let mut w = VoxelWorld::new(BoundingBox::from_origin_size(0, 0, 0, 4, 4, 2)).unwrap();
        w.fill(BoundingBox::from_origin_size(0, 0, 0, 4, 4, 1), Terrain::Solid);
        w.set_terrain(Coord::new(0, 0, 1), Terrain::Water).unwrap();
        w
    }

    #[test]
    fn summary_empty_world() {
        let summary = WorldInspector::summary(&world());
        assert_eq!(summary.terrain, TerrainCounts { air: 15, solid: 16, water: 1 });
        assert_eq!(summary.sprite_count(), 0);
        assert_eq!(summary.events, 2);
    }

    #[test]
    fn summary_counts_sprites() {
        let mut w = world();
        let crab = w.add_sprite(Sprite::actor("crab", Placement::Floor), Coord::new(1, 1, 1)).unwrap();
        let pearl = w.add_sprite(Sprite::item("pearl", Placement::Open), Coord::new(2, 1, 1)).unwrap();
        w.add_sprite(Sprite::item("pearl", Placement::Open), Coord::new(3, 1, 1)).unwrap();
        w.stash(pearl, crab).unwrap();

        let summary = WorldInspector::summary(&w);
        assert_eq!((summary.items, summary.actors, summary.contained), (2, 1, 1));
        assert_eq!(summary.by_name["pearl"], 2);
        assert_eq!(summary.state_hash, w.state_hash());
        assert!(summary.to_string().contains("pearl: 2"));
    }

    #[test]
    fn inspect_sprite_found_and_missing() {
        let mut w = world();
        let id = w.add_sprite(Sprite::actor("crab", Placement::Floor), Coord::new(1, 2, 1)).unwrap();
        let info = WorldInspector::inspect_sprite(&w, id).unwrap();
        assert_eq!(info.location, Location::World(Coord::new(1, 2, 1)));
        assert_eq!(info.to_string(), "Sprite #1 actor 'crab' at (1, 2, 1)");
        assert!(WorldInspector::inspect_sprite(&w, EntityId(99)).is_none());
    }

    #[test]
    fn list_sprites_in_id_order() {
        let mut w = world();
        let a = w.add_sprite(Sprite::item("a", Placement::Open), Coord::new(0, 1, 1)).unwrap();
        let b = w.add_sprite(Sprite::item("b", Placement::Open), Coord::new(0, 2, 1)).unwrap();
        assert_eq!(WorldInspector::list_sprites(&w), vec![a, b]);
    }
}
