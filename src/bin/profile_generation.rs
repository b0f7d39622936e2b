//! Profiling tool for world and local map generation

use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use seeded_world::region::{RegionCache, RegionKey};
use seeded_world::{MapGenerator, MapStatistics, WorldState};

fn percent(part: Duration, total: Duration) -> f64 {
    100.0 * part.as_secs_f64() / total.as_secs_f64().max(f64::EPSILON)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let width = 512;
    let height = 512;
    let seed = 1337u64;

    println!("=== Performance Profiling ===");
    println!("World size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let generator = MapGenerator::new(seed);

    // World map
    let start = Instant::now();
    let world = generator.generate_world_map(width, height);
    let world_time = start.elapsed();
    println!("World map generation: {:?}", world_time);

    let start = Instant::now();
    let stats = MapStatistics::collect(world.tiles());
    let stats_time = start.elapsed();
    println!("Statistics: {:?}", stats_time);
    println!("{}", stats.summary());
    println!();

    // Single local region
    let start = Instant::now();
    let _local = generator.generate_region(RegionKey::new(3, 3));
    let region_time = start.elapsed();
    println!("Single region (64x64): {:?}", region_time);

    // Parallel neighborhood preload
    let mut cache = RegionCache::new();
    let start = Instant::now();
    cache.preload_neighborhood(RegionKey::new(4, 4), &generator, RegionKey::grid_extent(width, height));
    let preload_time = start.elapsed();
    println!("Neighborhood preload ({} regions): {:?}", cache.len(), preload_time);

    // Session walk across region boundaries
    let mut state = WorldState::new(seed, "profile");
    let start = Instant::now();
    state.generate_world(width, height);
    let mut moved = 0;
    for step in 0..2000 {
        let offset: (i32, i32) = if step % 2 == 0 { (16, 0) } else { (0, 16) };
        if state.move_player(offset) || state.move_player((-offset.0, -offset.1)) {
            moved += 1;
        }
    }
    let walk_time = start.elapsed();
    println!("Session walk ({} successful moves): {:?}", moved, walk_time);
    println!("Cache: {}", state.cache().stats().summary());

    // Summary
    let total = world_time + stats_time + region_time + preload_time + walk_time;
    println!("\n=== Summary ===");
    println!("World map:   {:>8.2}% ({:?})", percent(world_time, total), world_time);
    println!("Statistics:  {:>8.2}% ({:?})", percent(stats_time, total), stats_time);
    println!("Region:      {:>8.2}% ({:?})", percent(region_time, total), region_time);
    println!("Preload:     {:>8.2}% ({:?})", percent(preload_time, total), preload_time);
    println!("Walk:        {:>8.2}% ({:?})", percent(walk_time, total), walk_time);
    println!("─────────────────────────────────");
    println!("Total:       {:?}", total);
}
