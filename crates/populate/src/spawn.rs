//! The spawn engine: resolve a pop definition against a region of the world.

use crate::config::SpawnConfig;
use crate::error::PopError;
use crate::factory::EntityFactory;
use crate::generate::{GeneratePops, generate_pops};
use crate::grammar::{PopDef, PopKind};
use crate::record::SpawnRecord;
use crate::registry::PopRegistry;
use delve_common::EntityId;
use delve_coords::{
    ArrayCoordSet, BoundingBox, Coord, CoordSet, NearbyCoords, RandomSource, Spread, SpreadCoords,
};
use delve_kernel::{Sprite, WorldMut, WorldQuery};
use std::collections::HashSet;
use tracing::{debug, info_span, trace, warn};

/// State shared by one spawn-tree evaluation.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    /// Coordinates no later placement in this evaluation may use.
    pub reserved: HashSet<Coord>,
    /// Placed sprites, in placement order.
    pub spawned: Vec<EntityId>,
    root: PopDef,
}

impl SpawnContext {
    pub fn new(root: PopDef) -> Self {
        Self {
            reserved: HashSet::new(),
            spawned: Vec::new(),
            root,
        }
    }

    pub fn root(&self) -> &PopDef {
        &self.root
    }
}

/// Result of a top-level spawn.
#[derive(Debug, Clone)]
pub struct SpawnOutcome {
    pub record: SpawnRecord,
    pub spawned: Vec<EntityId>,
    pub reserved: HashSet<Coord>,
}

/// Places pop definitions into a world.
///
/// One spawner owns one random stream; every roll, shuffle and pick of the
/// evaluations it runs is drawn from it in order.
pub struct Spawner<'a, W: WorldMut> {
    world: &'a mut W,
    registry: &'a PopRegistry,
    factory: &'a dyn EntityFactory,
    rng: RandomSource,
    config: SpawnConfig,
}

impl<'a, W: WorldMut> Spawner<'a, W> {
    pub fn new(
        world: &'a mut W,
        registry: &'a PopRegistry,
        factory: &'a dyn EntityFactory,
        config: SpawnConfig,
    ) -> Self {
        Self {
            rng: RandomSource::from_seed(config.seed),
            world,
            registry,
            factory,
            config,
        }
    }

    /// Draw from an existing stream instead of one seeded from the config.
    pub fn with_rng(mut self, rng: RandomSource) -> Self {
        self.rng = rng;
        self
    }

    pub fn world(&self) -> &W {
        self.world
    }

    pub fn rng(&self) -> &RandomSource {
        &self.rng
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Lazily expand `def` into leaf requests using this spawner's stream.
    pub fn generate_pops<'d>(&self, def: &'d PopDef) -> GeneratePops<'d>
    where
        'a: 'd,
    {
        generate_pops(def, self.registry, &self.rng)
    }

    /// How many candidates of `region` a search may examine.
    fn search_cap(&self, region: &dyn CoordSet) -> usize {
        if region.potentially_unbounded() {
            self.config.unbounded_cap
        } else {
            usize::MAX
        }
    }

    /// Place `sprite` at the first unreserved coordinate of `region` where
    /// the factory allows it.
    ///
    /// Returns `Ok(None)` when no such coordinate exists. Unbounded regions
    /// are searched nearest-first up to the configured cap and are never
    /// randomized.
    pub fn spawn_sprite(
        &mut self,
        sprite: Sprite,
        region: &mut dyn CoordSet,
        ctx: &mut SpawnContext,
        def: &PopDef,
        randomize: bool,
    ) -> Result<Option<EntityId>, PopError> {
        if randomize && !region.potentially_unbounded() {
            region.randomize(&self.rng, true)?;
        }
        let cap = self.search_cap(region);
        region.rewind();
        let mut found = None;
        for _ in 0..cap {
            let Some(c) = region.next_coord() else { break };
            if ctx.reserved.contains(&c) {
                continue;
            }
            if self
                .factory
                .can_spawn_at(&sprite, c, &*self.world, def, &ctx.root)
            {
                found = Some(c);
                break;
            }
        }
        let Some(at) = found else {
            warn!(pop = %def.label(), name = %sprite.name, "no legal coordinate");
            return Ok(None);
        };
        let name = sprite.name.clone();
        let id = self.world.add_sprite(sprite, at)?;
        ctx.reserved.insert(at);
        ctx.spawned.push(id);
        debug!(%id, %name, %at, "placed sprite");
        Ok(Some(id))
    }

    /// Prototype sprites for every leaf reachable under `def`.
    fn prototypes(&self, def: &PopDef) -> Result<Vec<Sprite>, PopError> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        self.collect_prototypes(def, &mut out, &mut visited)?;
        Ok(out)
    }

    fn collect_prototypes<'d>(
        &self,
        def: &'d PopDef,
        out: &mut Vec<Sprite>,
        visited: &mut HashSet<&'d str>,
    ) -> Result<(), PopError>
    where
        'a: 'd,
    {
        match &def.kind {
            PopKind::Item { .. } | PopKind::Role { .. } => {
                if let Some(req) = def.request() {
                    out.push(self.factory.create(&req)?);
                }
            }
            PopKind::Ref(name) => {
                if visited.insert(name.as_str()) {
                    let registry: &'a PopRegistry = self.registry;
                    self.collect_prototypes(registry.resolve(name)?, out, visited)?;
                }
            }
            PopKind::PickOne(alts) => {
                for a in alts {
                    self.collect_prototypes(&a.def, out, visited)?;
                }
            }
            PopKind::PickEach(children) => {
                for c in children {
                    self.collect_prototypes(c, out, visited)?;
                }
            }
        }
        Ok(())
    }

    /// Find a contiguous, legal, unreserved footprint of `def.size` cells
    /// inside `region`.
    ///
    /// A cell is legal when any leaf reachable under `def` could stand there.
    /// Each legal starting cell not already swept by an earlier flood is
    /// tried in region order; the first flood that reaches the target size
    /// wins and is returned in randomized order. Returns `Ok(None)` for
    /// unsized definitions and when no footprint exists.
    pub fn find_spawn_region(
        &mut self,
        def: &PopDef,
        region: &mut dyn CoordSet,
        ctx: &SpawnContext,
    ) -> Result<Option<ArrayCoordSet>, PopError> {
        let Some(size) = def.size else {
            return Ok(None);
        };
        let size = size.resolve(&self.rng)? as usize;
        if size == 0 {
            return Err(PopError::ZeroSize(def.label()));
        }
        let prototypes = self.prototypes(def)?;
        if prototypes.is_empty() {
            return Ok(None);
        }

        let cap = self.search_cap(region);
        let mut starts = Vec::new();
        region.rewind();
        while starts.len() < cap {
            match region.next_coord() {
                Some(c) => starts.push(c),
                None => break,
            }
        }

        let world: &W = self.world;
        let factory = self.factory;
        let legal = |c: Coord| {
            !ctx.reserved.contains(&c)
                && world.in_map(c)
                && prototypes
                    .iter()
                    .any(|p| factory.can_spawn_at(p, c, world, def, &ctx.root))
        };
        let domain: &dyn CoordSet = region;
        let mut tried: HashSet<Coord> = HashSet::new();
        for start in starts {
            if tried.contains(&start) || !legal(start) {
                continue;
            }
            let mut flood = SpreadCoords::new(start, |c| {
                if legal(c) { Spread::Accept } else { Spread::Block }
            })
            .with_domain(domain);
            let mut footprint = Vec::with_capacity(size);
            while footprint.len() < size {
                match flood.next_coord() {
                    Some(c) => footprint.push(c),
                    None => break,
                }
            }
            if footprint.len() == size {
                trace!(pop = %def.label(), %start, size, "found footprint");
                let mut found = ArrayCoordSet::new(footprint);
                found.randomize(&self.rng, true)?;
                return Ok(Some(found));
            }
            tried.extend(footprint);
        }
        Ok(None)
    }

    /// One repetition of `def` inside `region`.
    pub fn spawn_pop_def_instance(
        &mut self,
        def: &PopDef,
        region: &mut dyn CoordSet,
        ctx: &mut SpawnContext,
        record: &mut SpawnRecord,
    ) -> Result<(), PopError> {
        let mut sub: ArrayCoordSet;
        let mut footprint: Option<Vec<Coord>> = None;
        let region: &mut dyn CoordSet = if def.size.is_some() {
            match self.find_spawn_region(def, region, ctx)? {
                Some(found) => {
                    footprint = Some(found.as_slice().to_vec());
                    sub = found;
                    &mut sub
                }
                None => {
                    warn!(pop = %def.label(), size = ?def.size, "no contiguous region");
                    return Ok(());
                }
            }
        } else {
            region
        };

        match &def.kind {
            PopKind::Item { .. } | PopKind::Role { .. } => {
                if let Some(req) = def.request() {
                    let sprite = self.factory.create(&req)?;
                    if let Some(id) = self.spawn_sprite(sprite, region, ctx, def, false)? {
                        record.entities.push(id);
                    }
                }
            }
            PopKind::Ref(name) => {
                let registry: &'a PopRegistry = self.registry;
                let target = registry.resolve(name)?;
                let child = self.spawn_pops_with(target, region, ctx, false)?;
                record.push_child(child);
            }
            PopKind::PickOne(alts) => {
                let weights: Vec<f64> = alts.iter().map(|a| a.weight).collect();
                let i = self.rng.weighted(&weights).ok_or(PopError::EmptyPickOne)?;
                let child = self.spawn_pops_with(&alts[i].def, region, ctx, false)?;
                record.push_child(child);
            }
            PopKind::PickEach(children) => {
                for c in children {
                    let child = self.spawn_pops_with(c, region, ctx, false)?;
                    record.push_child(child);
                }
            }
        }

        if let Some(cells) = footprint {
            ctx.reserved.extend(cells);
        }
        Ok(())
    }

    /// Evaluate `def` inside `region` within an existing evaluation.
    ///
    /// `count` is resolved once; on each repetition every `chance` entry is
    /// rolled and each pass runs one instance.
    pub fn spawn_pops_with(
        &mut self,
        def: &PopDef,
        region: &mut dyn CoordSet,
        ctx: &mut SpawnContext,
        randomize: bool,
    ) -> Result<SpawnRecord, PopError> {
        if randomize && !region.potentially_unbounded() {
            region.randomize(&self.rng, true)?;
        }
        let mut record = SpawnRecord::new(def.label());
        let (spawned_before, reserved_before) = (ctx.spawned.len(), ctx.reserved.len());
        let reps = def.count.resolve(&self.rng)?;
        for rep in 0..reps {
            let passes = def.chance.passes(&self.rng);
            if passes == 0 {
                trace!(pop = %def.label(), rep, "chance roll failed");
            }
            for _ in 0..passes {
                record.start_repetition();
                self.spawn_pop_def_instance(def, region, ctx, &mut record)?;
            }
        }
        record.sprites = ctx.spawned.len() - spawned_before;
        record.coords = ctx.reserved.len() - reserved_before;
        record.finish();
        Ok(record)
    }

    /// Evaluate `def` inside `region` as a fresh spawn tree.
    pub fn spawn_pops(
        &mut self,
        def: &PopDef,
        region: &mut dyn CoordSet,
        randomize: bool,
    ) -> Result<SpawnOutcome, PopError> {
        let _span = info_span!("spawn_pops", pop = %def.label()).entered();
        def.validate()?;
        let mut ctx = SpawnContext::new(def.clone());
        let record = self.spawn_pops_with(def, region, &mut ctx, randomize)?;
        debug!(sprites = record.sprites, coords = record.coords, "spawn finished");
        Ok(SpawnOutcome {
            record,
            spawned: ctx.spawned,
            reserved: ctx.reserved,
        })
    }

    /// Spawn around the sprite `anchor`, between `min_radius` and
    /// `max_radius` octahedral steps away. `None` searches outward without
    /// limit, up to the configured cap.
    pub fn spawn_nearby(
        &mut self,
        anchor: EntityId,
        def: &PopDef,
        min_radius: i32,
        max_radius: Option<i32>,
    ) -> Result<SpawnOutcome, PopError> {
        let origin = self
            .world
            .position(anchor)
            .ok_or(PopError::AnchorNotPlaced(anchor))?;
        let mut region = NearbyCoords::new(origin, min_radius, max_radius);
        let randomize = self.config.randomize_regions;
        self.spawn_pops(def, &mut region, randomize)
    }

    /// Spawn inside `bbox`, clipped to the map.
    pub fn spawn_in_bounding_box(
        &mut self,
        def: &PopDef,
        bbox: BoundingBox,
    ) -> Result<SpawnOutcome, PopError> {
        let mut zone = bbox;
        zone.intersect(&self.world.bounds());
        let mut region = zone.coords();
        let randomize = self.config.randomize_regions;
        self.spawn_pops(def, &mut region, randomize)
    }
}
