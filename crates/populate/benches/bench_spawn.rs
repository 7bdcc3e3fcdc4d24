use std::hint::black_box;
use std::time::Instant;

use delve_coords::{BoundingBox, RandomSource};
use delve_kernel::{Placement, Terrain, VoxelWorld, WorldQuery};
use delve_populate::{Catalog, Count, PopDef, PopRegistry, SpawnConfig, Spawner, generate_pops};

fn make_world(side: i32) -> VoxelWorld {
    let bounds = BoundingBox::from_origin_size(0, 0, 0, side, side, side);
    let mut world = VoxelWorld::new(bounds).expect("non-empty bounds");
    world.fill(BoundingBox::from_origin_size(0, 0, 0, side, side, 1), Terrain::Solid);
    world.fill(BoundingBox::from_origin_size(0, 0, 1, side / 2, side, side / 2), Terrain::Water);
    world
}

fn catalog() -> Catalog {
    Catalog::new()
        .with_role("crab", Placement::Floor)
        .with_role("fish", Placement::Liquid)
        .with_item("pearl", Placement::Open)
}

fn reef(crabs: u32) -> PopDef {
    PopDef::pick_each([
        PopDef::role("crab").with_count(Count::exactly(crabs)),
        PopDef::role("fish").with_count(Count::exactly(4)).with_size(Count::exactly(8)),
        PopDef::item("pearl").with_count(Count::between(1, 3)),
    ])
}

fn bench_flat_spawn(side: i32, count: u32, iterations: usize) {
    let registry = PopRegistry::new();
    let catalog = catalog();
    let def = PopDef::role("crab").with_count(Count::exactly(count));

    let start = Instant::now();
    for i in 0..iterations {
        let mut world = make_world(side);
        let bounds = world.bounds();
        let config = SpawnConfig {
            seed: i as u64,
            ..SpawnConfig::default()
        };
        let mut spawner = Spawner::new(&mut world, &registry, &catalog, config);
        let _ = black_box(spawner.spawn_in_bounding_box(black_box(&def), bounds));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  flat spawn ({side}^3 world, {count} sprites, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_sized_spawn(side: i32, reps: u32, iterations: usize) {
    let registry = PopRegistry::new();
    let catalog = catalog();
    let def = reef(6).with_count(Count::exactly(reps));

    let start = Instant::now();
    for i in 0..iterations {
        let mut world = make_world(side);
        let bounds = world.bounds();
        let config = SpawnConfig {
            seed: i as u64,
            ..SpawnConfig::default()
        };
        let mut spawner = Spawner::new(&mut world, &registry, &catalog, config);
        let _ = black_box(spawner.spawn_in_bounding_box(black_box(&def), bounds));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  reef spawn ({side}^3 world, {reps} reps, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_generate(reps: u32, iterations: usize) {
    let registry = PopRegistry::new();
    let def = reef(6).with_count(Count::exactly(reps));
    let rng = RandomSource::from_seed(1);

    let start = Instant::now();
    for _ in 0..iterations {
        let n = generate_pops(black_box(&def), &registry, &rng).count();
        black_box(n);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate_pops ({reps} reps, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Spawn Benchmarks ===\n");

    println!("Flat spawn into a bounding box:");
    bench_flat_spawn(16, 10, 200);
    bench_flat_spawn(16, 100, 100);
    bench_flat_spawn(32, 1000, 10);

    println!("\nSized reef spawn (footprint search):");
    bench_sized_spawn(16, 1, 100);
    bench_sized_spawn(32, 10, 10);

    println!("\nRequest generation:");
    bench_generate(10, 10000);
    bench_generate(1000, 100);

    println!("\n=== Done ===");
}
