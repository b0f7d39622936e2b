//! Generation parameters and configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Tunable constants for world and local map synthesis.
///
/// Scales are divisors applied to cell coordinates before sampling noise:
/// a larger scale means broader features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    // =========================================================================
    // World tier
    // =========================================================================

    /// Height field scale on the world tier (broad continents)
    pub world_scale: f64,
    /// Mountain-detail scale on the world tier
    pub mountain_scale: f64,
    /// Temperature scale on the world tier
    pub temperature_scale: f64,

    /// Raw height is remapped as `height * land_bias_factor + land_bias_offset`
    /// so land dominates over ocean
    pub land_bias_factor: f64,
    pub land_bias_offset: f64,
    /// Weight of the mountain influence added to world height
    pub world_mountain_weight: f64,

    /// Cells closer than this to any edge are pulled toward water
    pub border_threshold: usize,
    /// Height the border blend converges to at the very edge
    pub border_water_level: f64,

    // =========================================================================
    // Local tier
    // =========================================================================

    /// Height field scale on the local tier (fine detail)
    pub local_scale: f64,
    /// Mountain-detail scale on the local tier
    pub local_mountain_scale: f64,
    /// Temperature scale on the local tier
    pub local_temperature_scale: f64,
    /// World-space extent of one region in the local noise domain
    pub region_extent: f64,
    /// Local height blend: `height * local_height_weight + influence * local_mountain_weight`
    pub local_height_weight: f64,
    pub local_mountain_weight: f64,

    // =========================================================================
    // Mountain influence
    // =========================================================================

    /// World influence is `max(0, mountain) * world_influence_factor`
    pub world_influence_factor: f64,
    /// Local influence is `max(0, mountain) * local_influence_factor`
    pub local_influence_factor: f64,

    // =========================================================================
    // Rare features
    // =========================================================================

    /// Chance that a Sand tile becomes an Arena
    pub arena_chance: f64,
    /// Arenas need a temperature above this
    pub arena_min_temperature: f64,

    /// Grass -> Forest (small hill)
    pub hill_chance: f64,
    pub hill_min_height: f64,
    /// Forest -> Grass (clearing)
    pub clearing_chance: f64,
    pub clearing_min_height: f64,
    /// ShallowWater -> Sand (tiny island)
    pub island_chance: f64,
    pub island_min_height: f64,

    // =========================================================================
    // Noise octaves
    // =========================================================================

    pub height_octaves: u32,
    pub local_height_octaves: u32,
    pub temperature_octaves: u32,
    pub mountain_octaves: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            world_scale: 80.0,
            mountain_scale: 40.0,
            temperature_scale: 100.0,
            land_bias_factor: 0.7,
            land_bias_offset: 0.3,
            world_mountain_weight: 0.3,
            border_threshold: 5,
            border_water_level: -0.5,

            local_scale: 8.0,
            local_mountain_scale: 5.0,
            local_temperature_scale: 15.0,
            region_extent: 200.0,
            local_height_weight: 0.6,
            local_mountain_weight: 0.4,

            world_influence_factor: 0.5,
            local_influence_factor: 0.4,

            arena_chance: 0.05,
            arena_min_temperature: 0.3,
            hill_chance: 0.15,
            hill_min_height: 0.25,
            clearing_chance: 0.10,
            clearing_min_height: 0.35,
            island_chance: 0.08,
            island_min_height: -0.15,

            height_octaves: 3,
            local_height_octaves: 10,
            temperature_octaves: 3,
            mountain_octaves: 5,
        }
    }
}

impl GenerationParams {
    /// Load parameters from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ParamsError> {
        let contents = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ParamsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Dimensions of the coarse world map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { width: 128, height: 128 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: GenerationParams =
            serde_json::from_str(r#"{ "world_scale": 120.0, "border_threshold": 8 }"#).unwrap();

        assert_eq!(params.world_scale, 120.0);
        assert_eq!(params.border_threshold, 8);
        assert_eq!(params.local_scale, GenerationParams::default().local_scale);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "arena_chance": 0.2 }}"#).unwrap();

        let params = GenerationParams::from_json_file(&path).unwrap();
        assert_eq!(params.arena_chance, 0.2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationParams::from_json_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ParamsError::Io { .. })));
    }
}
