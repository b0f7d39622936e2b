//! World and local map synthesis.
//!
//! The world tier samples low-frequency noise per cell, biases it toward
//! land, adds mountain detail and forces a ring of water along the map
//! border. The local tier samples the finer fields for one region and stamps
//! every tile with its global coordinate.
//!
//! Every cell is a pure function of `(seed, coordinate)`, so grids are built
//! in parallel and a region can be dropped and regenerated identically.

use std::time::Instant;

use tracing::debug;

use super::types::{LocalMap, MapTile, WorldMap};
use crate::classify::{TileClassifier, Tier};
use crate::noise_field::{NoiseField, NoiseLayer};
use crate::params::GenerationParams;
use crate::region::{RegionKey, REGION_SIZE};
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;

/// Generates world and local maps for one seed
#[derive(Clone)]
pub struct MapGenerator {
    seed: u64,
    params: GenerationParams,
    noise: NoiseField,
    classifier: TileClassifier,
}

impl MapGenerator {
    /// Create a generator with default parameters
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, GenerationParams::default())
    }

    pub fn with_params(seed: u64, params: GenerationParams) -> Self {
        let noise = NoiseField::new(WorldSeeds::from_master(seed), &params);
        let classifier = TileClassifier::new(seed, params.clone());
        Self {
            seed,
            params,
            noise,
            classifier,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Generate the coarse world map.
    pub fn generate_world_map(&self, width: usize, height: usize) -> WorldMap {
        let start = Instant::now();
        let tiles = Tilemap::generate_par(width, height, |x, y| self.world_tile(x, y, width, height));

        debug!(
            seed = self.seed,
            width,
            height,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generated world map"
        );
        WorldMap::new(self.seed, tiles)
    }

    fn world_tile(&self, x: usize, y: usize, width: usize, height: usize) -> MapTile {
        let p = &self.params;
        let fx = x as f64;
        let fy = y as f64;

        // Base continents
        let raw = self.noise.sample(NoiseLayer::Height, fx / p.world_scale, fy / p.world_scale);

        // Mountain detail, only its positive half counts
        let mountain = self.noise.sample(NoiseLayer::Mountain, fx / p.mountain_scale, fy / p.mountain_scale);
        let influence = mountain.max(0.0) * p.world_influence_factor;

        // Shift toward land, then add mountains
        let mut h = raw * p.land_bias_factor + p.land_bias_offset;
        h += influence * p.world_mountain_weight;

        let temperature = self
            .noise
            .sample(NoiseLayer::Temperature, fx / p.temperature_scale, fy / p.temperature_scale);

        h = self.apply_border_water(h, x, y, width, height);
        h = h.clamp(-1.0, 1.0);

        let (gx, gy) = (x as i32, y as i32);
        let kind = self.classifier.classify_tile(gx, gy, h, influence, temperature, Tier::World);

        MapTile {
            x: gx,
            y: gy,
            height: h as f32,
            temperature: temperature as f32,
            kind,
        }
    }

    /// Blend height toward the border water level as a cell nears the edge.
    /// Weight is 1.0 on the edge itself and falls linearly to 0.0 at
    /// `border_threshold` cells in.
    fn apply_border_water(&self, h: f64, x: usize, y: usize, width: usize, height: usize) -> f64 {
        let threshold = self.params.border_threshold;
        let border_distance = x.min(y).min(width - 1 - x).min(height - 1 - y);

        if border_distance >= threshold {
            return h;
        }

        let water_influence = (threshold - border_distance) as f64 / threshold as f64;
        h * (1.0 - water_influence) + self.params.border_water_level * water_influence
    }

    /// Generate the local map of `region` at `REGION_SIZE x REGION_SIZE`.
    pub fn generate_region(&self, region: RegionKey) -> LocalMap {
        self.generate_local_map(region, REGION_SIZE as usize, REGION_SIZE as usize)
    }

    /// Generate a local map for a region.
    ///
    /// The noise domain of a region starts at `region * region_extent`; the
    /// finer local scales make one region expand into full local detail.
    /// Tiles are stamped with `region * size + offset` as their global
    /// coordinate.
    pub fn generate_local_map(&self, region: RegionKey, local_width: usize, local_height: usize) -> LocalMap {
        let start = Instant::now();
        let tiles = Tilemap::generate_par(local_width, local_height, |lx, ly| {
            self.local_tile(region, lx, ly, local_width, local_height)
        });

        debug!(
            %region,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generated local map"
        );
        LocalMap::new(region, tiles)
    }

    fn local_tile(&self, region: RegionKey, lx: usize, ly: usize, local_width: usize, local_height: usize) -> MapTile {
        let p = &self.params;
        let px = region.x as f64 * p.region_extent + lx as f64;
        let py = region.y as f64 * p.region_extent + ly as f64;

        let raw = self.noise.sample(NoiseLayer::LocalHeight, px / p.local_scale, py / p.local_scale);

        let mountain = self
            .noise
            .sample(NoiseLayer::Mountain, px / p.local_mountain_scale, py / p.local_mountain_scale);
        let influence = mountain.max(0.0) * p.local_influence_factor;

        let h = (raw * p.local_height_weight + influence * p.local_mountain_weight).clamp(-1.0, 1.0);

        let temperature = self.noise.sample(
            NoiseLayer::Temperature,
            px / p.local_temperature_scale,
            py / p.local_temperature_scale,
        );

        let gx = region.x * local_width as i32 + lx as i32;
        let gy = region.y * local_height as i32 + ly as i32;
        let kind = self.classifier.classify_tile(gx, gy, h, influence, temperature, Tier::Local);

        MapTile {
            x: gx,
            y: gy,
            height: h as f32,
            temperature: temperature as f32,
            kind,
        }
    }
}
