//! Summary statistics over a tile grid.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::MapTile;
use crate::terrain::TemperatureCategory;
use crate::tilemap::Tilemap;

/// Counts and ranges describing a generated map
#[derive(Clone, Debug, Serialize)]
pub struct MapStatistics {
    pub total_tiles: usize,
    /// Tiles per terrain kind, keyed by display name
    pub terrain_counts: BTreeMap<String, usize>,
    pub terrain_percentages: BTreeMap<String, f64>,
    /// Tiles per temperature band, keyed by band name
    pub temperature_counts: BTreeMap<String, usize>,
    pub temperature_percentages: BTreeMap<String, f64>,
    pub average_height: f64,
    pub min_height: f32,
    pub max_height: f32,
    pub average_temperature: f64,
    pub min_temperature: f32,
    pub max_temperature: f32,
}

impl MapStatistics {
    pub fn collect(tiles: &Tilemap<MapTile>) -> Self {
        let mut terrain_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut temperature_counts: BTreeMap<String, usize> = BTreeMap::new();

        let mut height_sum = 0.0f64;
        let mut min_height = f32::MAX;
        let mut max_height = f32::MIN;
        let mut temp_sum = 0.0f64;
        let mut min_temperature = f32::MAX;
        let mut max_temperature = f32::MIN;

        for tile in tiles.values() {
            *terrain_counts.entry(tile.kind.name().to_string()).or_default() += 1;
            let band: TemperatureCategory = tile.temperature_category();
            *temperature_counts.entry(band.name().to_string()).or_default() += 1;

            height_sum += tile.height as f64;
            min_height = min_height.min(tile.height);
            max_height = max_height.max(tile.height);
            temp_sum += tile.temperature as f64;
            min_temperature = min_temperature.min(tile.temperature);
            max_temperature = max_temperature.max(tile.temperature);
        }

        let total = tiles.len();
        if total == 0 {
            min_height = 0.0;
            max_height = 0.0;
            min_temperature = 0.0;
            max_temperature = 0.0;
        }
        let denom = total.max(1) as f64;

        let percentages = |counts: &BTreeMap<String, usize>| -> BTreeMap<String, f64> {
            counts
                .iter()
                .map(|(name, &count)| (name.clone(), count as f64 / denom * 100.0))
                .collect()
        };

        Self {
            total_tiles: total,
            terrain_percentages: percentages(&terrain_counts),
            temperature_percentages: percentages(&temperature_counts),
            terrain_counts,
            temperature_counts,
            average_height: height_sum / denom,
            min_height,
            max_height,
            average_temperature: temp_sum / denom,
            min_temperature,
            max_temperature,
        }
    }

    /// Multi-line human readable report
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Total tiles: {}", self.total_tiles), "Terrain:".to_string()];
        for (name, count) in &self.terrain_counts {
            lines.push(format!(
                "  {:<14} {:>6} ({:>5.1}%)",
                name, count, self.terrain_percentages[name]
            ));
        }
        lines.push("Temperature:".to_string());
        for (name, count) in &self.temperature_counts {
            lines.push(format!(
                "  {:<14} {:>6} ({:>5.1}%)",
                name, count, self.temperature_percentages[name]
            ));
        }
        lines.push(format!(
            "Height: avg {:.3}, min {:.3}, max {:.3}",
            self.average_height, self.min_height, self.max_height
        ));
        lines.push(format!(
            "Temperature: avg {:.3}, min {:.3}, max {:.3}",
            self.average_temperature, self.min_temperature, self.max_temperature
        ));
        lines.join("\n")
    }
}
