//! Core grid types for both resolution tiers.
//!
//! Both tiers store plain `MapTile` values in a flat row-major `Tilemap`;
//! tiles carry their global coordinate so local tiles are addressable in the
//! same space as the world map.

use serde::Serialize;

use crate::region::RegionKey;
use crate::terrain::{TemperatureCategory, TerrainKind};
use crate::tilemap::Tilemap;

/// One grid cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MapTile {
    /// Global X coordinate
    pub x: i32,
    /// Global Y coordinate
    pub y: i32,
    /// Normalized height (-1.0 to 1.0)
    pub height: f32,
    /// Normalized temperature (-1.0 cold to 1.0 hot)
    pub temperature: f32,
    pub kind: TerrainKind,
}

impl MapTile {
    pub fn temperature_category(&self) -> TemperatureCategory {
        TemperatureCategory::from_value(self.temperature)
    }

    pub fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }

    /// RGB color for rendering (kind tinted by temperature)
    pub fn color(&self) -> (u8, u8, u8) {
        self.kind.color(self.temperature_category())
    }

    pub fn ascii_char(&self) -> char {
        self.kind.ascii_char()
    }
}

/// The coarse global grid, fixed at generation time
#[derive(Clone, Debug, PartialEq)]
pub struct WorldMap {
    /// Master seed the map was generated from
    pub seed: u64,
    tiles: Tilemap<MapTile>,
}

impl WorldMap {
    pub fn new(seed: u64, tiles: Tilemap<MapTile>) -> Self {
        Self { seed, tiles }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    /// Check `(x, y)` against `[0, width) x [0, height)`
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.tiles.contains(x, y)
    }

    /// Bounds-checked tile access
    pub fn get(&self, x: i32, y: i32) -> Option<&MapTile> {
        self.tiles.get_signed(x, y)
    }

    pub fn tiles(&self) -> &Tilemap<MapTile> {
        &self.tiles
    }
}

/// Fine-grained detail for one region
#[derive(Clone, Debug, PartialEq)]
pub struct LocalMap {
    pub region: RegionKey,
    tiles: Tilemap<MapTile>,
}

impl LocalMap {
    pub fn new(region: RegionKey, tiles: Tilemap<MapTile>) -> Self {
        Self { region, tiles }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    /// Tile at local offset `(lx, ly)`
    pub fn get(&self, lx: usize, ly: usize) -> Option<&MapTile> {
        self.tiles.get(lx, ly)
    }

    /// Tile stamped with global coordinate `(x, y)`, if it lies in this region
    pub fn tile_at_global(&self, x: i32, y: i32) -> Option<&MapTile> {
        let lx = x - self.region.x * self.width() as i32;
        let ly = y - self.region.y * self.height() as i32;
        self.tiles.get_signed(lx, ly)
    }

    pub fn tiles(&self) -> &Tilemap<MapTile> {
        &self.tiles
    }
}
