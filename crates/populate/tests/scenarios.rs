use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};

use delve_coords::{ArrayCoordSet, BoundingBox, Coord, CoordSet, RandomSource};
use delve_kernel::{Placement, Terrain, VoxelWorld, WorldMut, WorldQuery};
use delve_populate::{
    Catalog, Content, Count, EntityFactory, PopDef, PopRegistry, SpawnConfig, SpawnContext, Spawner,
    generate_pops,
};
use proptest::prelude::*;

fn catalog() -> Catalog {
    Catalog::new()
        .with_role("crab", Placement::Open)
        .with_role("fish", Placement::Liquid)
        .with_item("coral", Placement::Floor)
}

fn empty_world(n: i32) -> VoxelWorld {
    VoxelWorld::new(BoundingBox::from_origin_size(0, 0, 0, n, n, n)).unwrap()
}

/// A 12x12x6 basin: solid floor, a 6x6x2 water pool on it, air above.
fn basin() -> VoxelWorld {
    let mut w = VoxelWorld::new(BoundingBox::from_origin_size(0, 0, 0, 12, 12, 6)).unwrap();
    w.fill(BoundingBox::from_origin_size(0, 0, 0, 12, 12, 1), Terrain::Solid);
    w.fill(BoundingBox::from_origin_size(3, 3, 1, 6, 6, 2), Terrain::Water);
    w
}

#[test]
fn three_crabs_in_an_empty_box() {
    let mut world = empty_world(10);
    let (reg, cat) = (PopRegistry::new(), catalog());
    let mut spawner = Spawner::new(&mut world, &reg, &cat, SpawnConfig::default());
    let def = PopDef::role("crab").with_count(Count::between(3, 3));
    let out = spawner
        .spawn_in_bounding_box(&def, BoundingBox::from_origin_size(0, 0, 0, 10, 10, 10))
        .unwrap();

    assert_eq!(out.record.sprites, 3);
    assert_eq!(out.spawned.len(), 3);
    let cells: HashSet<Coord> = out
        .spawned
        .iter()
        .map(|&id| spawner.world().position(id).unwrap())
        .collect();
    assert_eq!(cells.len(), 3);
    assert!(out.spawned.iter().all(|&id| spawner.world().get(id).unwrap().sprite.name == "crab"));
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with warnings captured, returning its result and the log text.
fn with_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (out, text)
}

#[test]
fn n_sprites_fill_exactly_n_legal_cells() {
    let n = 5;
    let row: Vec<Coord> = (0..n).map(|x| Coord::new(x, 0, 0)).collect();
    for requested in [n as u32, n as u32 + 1] {
        let mut world = empty_world(6);
        let (reg, cat) = (PopRegistry::new(), catalog());
        let mut spawner = Spawner::new(&mut world, &reg, &cat, SpawnConfig::default());
        let def = PopDef::role("crab").with_count(Count::exactly(requested));
        let mut region = ArrayCoordSet::new(row.clone());
        let (out, logs) = with_warnings(|| spawner.spawn_pops(&def, &mut region, true).unwrap());

        assert_eq!(out.spawned.len(), n as usize);
        assert_eq!(out.reserved, row.iter().copied().collect::<HashSet<_>>());
        assert_eq!(out.record.sprites, n as usize);
        assert_eq!(out.record.entities.len(), n as usize);
        let warnings = logs.matches("no legal coordinate").count();
        assert_eq!(warnings, requested as usize - n as usize, "logs: {logs}");
    }
}

#[test]
fn sized_region_is_contiguous_and_legal() {
    let mut world = empty_world(8);
    let (reg, cat) = (PopRegistry::new(), catalog());
    let mut spawner = Spawner::new(&mut world, &reg, &cat, SpawnConfig::default());
    let def = PopDef::role("crab").with_size(Count::exactly(5));
    let ctx = SpawnContext::new(def.clone());
    let mut region = BoundingBox::from_origin_size(0, 0, 0, 8, 8, 8).coords();
    let found = spawner.find_spawn_region(&def, &mut region, &ctx).unwrap().unwrap();
    let cells = found.as_slice();
    assert_eq!(cells.len(), 5);
    let crab = cat.create_actor("crab", &Default::default()).unwrap();
    for &c in cells {
        assert!(crab.can_spawn_at(c, spawner.world()));
        assert!(
            cells.iter().any(|&o| o != c && o.distance_to(c) == 1),
            "{c} has no neighbour in the footprint"
        );
    }
}

#[test]
fn fish_count_range_generates_two_requests() {
    let def = PopDef::role("fish").with_count(Count::between(2, 2));
    let reqs: Vec<_> = generate_pops(&def, &PopRegistry::new(), &RandomSource::from_seed(0))
        .map(Result::unwrap)
        .collect();
    assert_eq!(reqs.len(), 2);
    assert!(reqs.iter().all(|r| r.name == "fish"));
}

#[test]
fn shoal_lands_in_the_pool_and_does_not_overlap() {
    let content = Content::from_yaml_str(
        r#"
roles:
  fish: { placement: liquid }
  crab: { placement: floor }
pops:
  shoal: { role: fish, count: 2, size: 4 }
  reef:
    pick_each:
      - { pop: shoal, count: 2 }
      - { role: crab, count: [2, 4] }
"#,
    )
    .unwrap();
    let mut world = basin();
    let bounds = world.bounds();
    let mut spawner = Spawner::new(&mut world, &content.registry, &content.catalog, content.config.clone());
    let reef = content.registry.get("reef").unwrap();
    let out = spawner.spawn_in_bounding_box(reef, bounds).unwrap();

    let world = spawner.world();
    let mut fish = 0;
    let mut seen = HashSet::new();
    for &id in &out.spawned {
        let data = world.get(id).unwrap();
        let at = world.position(id).unwrap();
        assert!(seen.insert(at), "two sprites at {at}");
        match data.sprite.name.as_str() {
            "fish" => {
                fish += 1;
                assert_eq!(world.terrain(at), Terrain::Water);
            }
            "crab" => assert_eq!(world.terrain(at.below()), Terrain::Solid),
            other => panic!("unexpected sprite {other}"),
        }
    }
    assert_eq!(fish, 4);
    // Four disjoint 4-cell shoal footprints, each holding its fish, plus one cell per crab.
    assert_eq!(out.reserved.len(), 16 + out.spawned.len() - fish);
}

#[test]
fn same_seed_same_world() {
    let run = |seed: u64| {
        let mut world = basin();
        let bounds = world.bounds();
        let (reg, cat) = (PopRegistry::new(), catalog());
        let cfg = SpawnConfig {
            seed,
            ..SpawnConfig::default()
        };
        let mut spawner = Spawner::new(&mut world, &reg, &cat, cfg);
        let def = PopDef::pick_each([
            PopDef::role("crab").with_count(Count::between(2, 6)),
            PopDef::item("coral").with_count(Count::between(1, 4)).with_size(Count::exactly(3)),
        ])
        .with_count(Count::exactly(3));
        spawner.spawn_in_bounding_box(&def, bounds).unwrap();
        world.state_hash()
    };
    assert_eq!(run(21), run(21));
}

#[test]
fn replay_reproduces_a_populated_world() {
    let mut world = basin();
    let bounds = world.bounds();
    let (reg, cat) = (PopRegistry::new(), catalog());
    let mut spawner = Spawner::new(&mut world, &reg, &cat, SpawnConfig::default());
    let def = PopDef::role("fish").with_count(Count::exactly(10));
    spawner.spawn_in_bounding_box(&def, bounds).unwrap();
    let replayed = VoxelWorld::replay(bounds, world.events()).unwrap();
    assert_eq!(replayed.state_hash(), world.state_hash());
    assert_eq!(replayed.sprite_count(), 10);
}

proptest! {
    #[test]
    fn placements_never_collide(seed in 0u64..500, count in 1u32..40) {
        let mut world = empty_world(4);
        let (reg, cat) = (PopRegistry::new(), catalog());
        let cfg = SpawnConfig { seed, ..SpawnConfig::default() };
        let mut spawner = Spawner::new(&mut world, &reg, &cat, cfg);
        let def = PopDef::role("crab").with_count(Count::exactly(count));
        let out = spawner
            .spawn_in_bounding_box(&def, BoundingBox::from_origin_size(0, 0, 0, 4, 4, 4))
            .unwrap();
        prop_assert_eq!(out.spawned.len(), (count as usize).min(64));
        prop_assert_eq!(spawner.world().sprite_count(), out.spawned.len());
        let mut region = BoundingBox::from_origin_size(0, 0, 0, 4, 4, 4).coords();
        let free = region.iter().filter(|&c| spawner.world().is_empty(c)).count();
        prop_assert_eq!(free, 64 - out.spawned.len());
    }
}

#[test]
fn demo_pack_loads_and_populates() {
    let content = Content::from_yaml_str(include_str!("../../../demos/reef.yaml")).unwrap();
    assert_eq!(content.config.seed, 7);
    let mut world = basin();
    let bounds = world.bounds();
    let mut spawner = Spawner::new(&mut world, &content.registry, &content.catalog, content.config.clone());
    let out = spawner
        .spawn_in_bounding_box(content.registry.get("reef").unwrap(), bounds)
        .unwrap();
    assert_eq!(out.record.pop, "pick_each(4)");
    assert_eq!(out.record.sprites, out.spawned.len());
    assert!(!out.spawned.is_empty());
}
