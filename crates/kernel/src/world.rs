use crate::error::WorldError;
use crate::query::{WorldMut, WorldQuery};
use crate::terrain::{Sprite, Terrain};
use delve_common::EntityId;
use delve_coords::{BoundingBox, Coord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An event record produced by every mutation to the world.
///
/// Replaying the log into a fresh world of the same bounds reproduces the
/// world exactly, ids included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    TerrainSet { at: Coord, terrain: Terrain },
    TerrainFilled { region: BoundingBox, terrain: Terrain },
    SpriteAdded { id: EntityId, sprite: Sprite, at: Coord },
    SpriteRemoved { id: EntityId },
    /// Sprite moved out of its cell (or container) into a container.
    SpriteStashed { id: EntityId, container: EntityId },
}

/// Who owns a sprite: a world cell or another sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    World(Coord),
    Container(EntityId),
}

/// Per-sprite data stored in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub sprite: Sprite,
    pub location: Location,
}

/// A dense voxel world.
///
/// Terrain is stored per cell over a fixed [`BoundingBox`]. Sprites live in
/// a BTreeMap for deterministic iteration, with a cell index for occupancy.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    bounds: BoundingBox,
    terrain: Vec<Terrain>,
    sprites: BTreeMap<EntityId, SpriteData>,
    occupants: HashMap<Coord, EntityId>,
    next_id: u64,
    /// Append-only event log of all mutations.
    event_log: Vec<WorldEvent>,
}

impl VoxelWorld {
    /// An all-air world covering `bounds`.
    pub fn new(bounds: BoundingBox) -> Result<Self, WorldError> {
        if bounds.is_empty() {
            return Err(WorldError::InvalidBounds);
        }
        Ok(Self {
            bounds,
            terrain: vec![Terrain::Air; bounds.volume()],
            sprites: BTreeMap::new(),
            occupants: HashMap::new(),
            next_id: 1,
            event_log: Vec::new(),
        })
    }

    fn index(&self, c: Coord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let size = self.bounds.size();
        let d = c.minus(self.bounds.min);
        Some(d.x as usize + size.x as usize * (d.y as usize + size.y as usize * d.z as usize))
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// All sprites, in id order.
    pub fn sprites(&self) -> &BTreeMap<EntityId, SpriteData> {
        &self.sprites
    }

    pub fn get(&self, id: EntityId) -> Option<&SpriteData> {
        self.sprites.get(&id)
    }

    pub fn location(&self, id: EntityId) -> Option<Location> {
        self.sprites.get(&id).map(|d| d.location)
    }

    /// The cell a sprite stands in. Fails for sprites inside a container.
    pub fn position_of(&self, id: EntityId) -> Result<Coord, WorldError> {
        match self.location(id) {
            Some(Location::World(at)) => Ok(at),
            Some(Location::Container(_)) => Err(WorldError::NotInWorld(id)),
            None => Err(WorldError::UnknownEntity(id)),
        }
    }

    /// Sprites held directly by `container`, in id order.
    pub fn contents(&self, container: EntityId) -> Vec<EntityId> {
        self.sprites
            .iter()
            .filter(|(_, d)| d.location == Location::Container(container))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub fn set_terrain(&mut self, at: Coord, terrain: Terrain) -> Result<(), WorldError> {
        let i = self.index(at).ok_or(WorldError::OutOfBounds(at))?;
        self.terrain[i] = terrain;
        self.event_log.push(WorldEvent::TerrainSet { at, terrain });
        Ok(())
    }

    /// Set every cell of `region` that lies in the map. Returns the number of
    /// cells written.
    pub fn fill(&mut self, region: BoundingBox, terrain: Terrain) -> usize {
        let mut clipped = region;
        clipped.intersect(&self.bounds);
        if clipped.is_empty() {
            return 0;
        }
        for z in clipped.min.z..=clipped.max.z {
            for y in clipped.min.y..=clipped.max.y {
                for x in clipped.min.x..=clipped.max.x {
                    if let Some(i) = self.index(Coord::new(x, y, z)) {
                        self.terrain[i] = terrain;
                    }
                }
            }
        }
        tracing::trace!(?clipped, ?terrain, "filled terrain");
        self.event_log.push(WorldEvent::TerrainFilled {
            region: clipped,
            terrain,
        });
        clipped.volume()
    }

    /// Place `sprite` in the empty-of-sprites cell `at`.
    ///
    /// Terrain is not checked here: placement rules are the caller's concern.
    pub fn add_sprite(&mut self, sprite: Sprite, at: Coord) -> Result<EntityId, WorldError> {
        let id = EntityId(self.next_id);
        self.insert_sprite(id, sprite.clone(), at)?;
        self.event_log.push(WorldEvent::SpriteAdded { id, sprite, at });
        Ok(id)
    }

    fn insert_sprite(&mut self, id: EntityId, sprite: Sprite, at: Coord) -> Result<(), WorldError> {
        if !self.bounds.contains(at) {
            return Err(WorldError::OutOfBounds(at));
        }
        if let Some(&by) = self.occupants.get(&at) {
            return Err(WorldError::Occupied { at, by });
        }
        tracing::trace!(%id, name = %sprite.name, %at, "sprite added");
        self.occupants.insert(at, id);
        self.sprites.insert(
            id,
            SpriteData {
                sprite,
                location: Location::World(at),
            },
        );
        self.next_id = self.next_id.max(id.0 + 1);
        Ok(())
    }

    /// Remove a sprite and everything it contains.
    pub fn remove_sprite(&mut self, id: EntityId) -> Result<Sprite, WorldError> {
        let sprite = self.detach(id)?;
        self.event_log.push(WorldEvent::SpriteRemoved { id });
        Ok(sprite)
    }

    fn detach(&mut self, id: EntityId) -> Result<Sprite, WorldError> {
        for inner in self.contents(id) {
            self.detach(inner)?;
        }
        let data = self.sprites.remove(&id).ok_or(WorldError::UnknownEntity(id))?;
        if let Location::World(at) = data.location {
            self.occupants.remove(&at);
        }
        Ok(data.sprite)
    }

    /// Move `item` into `container`, freeing its cell.
    ///
    /// A sprite cannot contain itself, directly or through nesting.
    pub fn stash(&mut self, item: EntityId, container: EntityId) -> Result<(), WorldError> {
        self.move_into(item, container)?;
        self.event_log.push(WorldEvent::SpriteStashed { id: item, container });
        Ok(())
    }

    fn move_into(&mut self, item: EntityId, container: EntityId) -> Result<(), WorldError> {
        if !self.sprites.contains_key(&container) {
            return Err(WorldError::UnknownEntity(container));
        }
        // Walk up from the container; meeting `item` would create a cycle.
        let mut owner = Some(container);
        while let Some(o) = owner {
            if o == item {
                return Err(WorldError::ContainmentCycle(item));
            }
            owner = match self.location(o) {
                Some(Location::Container(c)) => Some(c),
                _ => None,
            };
        }
        let data = self
            .sprites
            .get_mut(&item)
            .ok_or(WorldError::UnknownEntity(item))?;
        if let Location::World(at) = data.location {
            self.occupants.remove(&at);
        }
        data.location = Location::Container(container);
        Ok(())
    }

    /// Reconstruct a world from `events` (for replay).
    pub fn replay(bounds: BoundingBox, events: &[WorldEvent]) -> Result<Self, WorldError> {
        let mut world = Self::new(bounds)?;
        for event in events {
            match event {
                WorldEvent::TerrainSet { at, terrain } => {
                    let i = world.index(*at).ok_or(WorldError::OutOfBounds(*at))?;
                    world.terrain[i] = *terrain;
                }
                WorldEvent::TerrainFilled { region, terrain } => {
                    world.fill(*region, *terrain);
                }
                WorldEvent::SpriteAdded { id, sprite, at } => {
                    world.insert_sprite(*id, sprite.clone(), *at)?;
                }
                WorldEvent::SpriteRemoved { id } => {
                    world.detach(*id)?;
                }
                WorldEvent::SpriteStashed { id, container } => {
                    world.move_into(*id, *container)?;
                }
            }
        }
        world.event_log.clear();
        Ok(world)
    }

    /// Compute a deterministic hash of the world state for comparison.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_coord = |h: &mut u64, c: Coord| {
            for v in c.to_array() {
                mix(h, &v.to_le_bytes());
            }
        };
        mix_coord(&mut h, self.bounds.min);
        mix_coord(&mut h, self.bounds.max);
        for t in &self.terrain {
            mix(&mut h, &[t.tag()]);
        }
        for (id, data) in &self.sprites {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, data.sprite.name.as_bytes());
            match data.location {
                Location::World(at) => {
                    mix(&mut h, &[0]);
                    mix_coord(&mut h, at);
                }
                Location::Container(c) => {
                    mix(&mut h, &[1]);
                    mix(&mut h, &c.0.to_le_bytes());
                }
            }
        }
        h
    }
}

impl WorldQuery for VoxelWorld {
    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn terrain(&self, c: Coord) -> Terrain {
        self.index(c).map_or(Terrain::Solid, |i| self.terrain[i])
    }

    fn occupant(&self, c: Coord) -> Option<EntityId> {
        self.occupants.get(&c).copied()
    }
}

impl WorldMut for VoxelWorld {
    fn add_sprite(&mut self, sprite: Sprite, at: Coord) -> Result<EntityId, WorldError> {
        VoxelWorld::add_sprite(self, sprite, at)
    }

    fn position(&self, id: EntityId) -> Option<Coord> {
        self.position_of(id).ok()
    }
}
