//! Session-scoped world state.
//!
//! `WorldState` owns the world map, the player position and the region
//! cache. It places the player on generation, validates moves against the
//! world map, keeps the local map of the player's region resident and
//! saves/restores the minimal state a session needs: seed, position,
//! session name and the caller's player blob.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{MoveError, PersistenceError};
use crate::map::{LocalMap, MapGenerator, MapTile, WorldMap};
use crate::params::{GenerationParams, WorldConfig};
use crate::persistence::{SaveFile, SaveStore};
use crate::region::{RegionCache, RegionKey};
use crate::terrain::{TemperatureCategory, TerrainKind};

/// Cardinal step directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> &'static [Self] {
        &[Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Unit offset, y grows downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(MoveError::InvalidDirection(s.to_string())),
        }
    }
}

/// A move request: a cardinal step or an explicit offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Step(Direction),
    Offset(i32, i32),
}

impl Movement {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Movement::Step(direction) => direction.delta(),
            Movement::Offset(dx, dy) => (*dx, *dy),
        }
    }

    /// Parse `"up"`/`"down"`/`"left"`/`"right"` or `"dx,dy"`
    pub fn parse(s: &str) -> Result<Self, MoveError> {
        if let Ok(direction) = s.parse::<Direction>() {
            return Ok(Movement::Step(direction));
        }
        let invalid = || MoveError::InvalidDirection(s.to_string());
        let (dx, dy) = s.split_once(',').ok_or_else(invalid)?;
        let dx = dx.trim().parse().map_err(|_| invalid())?;
        let dy = dy.trim().parse().map_err(|_| invalid())?;
        Ok(Movement::Offset(dx, dy))
    }
}

impl From<Direction> for Movement {
    fn from(direction: Direction) -> Self {
        Movement::Step(direction)
    }
}

impl From<(i32, i32)> for Movement {
    fn from((dx, dy): (i32, i32)) -> Self {
        Movement::Offset(dx, dy)
    }
}

/// Result of a successful move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: (i32, i32),
    /// The move crossed a region boundary and the new region was loaded
    pub region_changed: bool,
}

/// How the spawn position was found
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpawnPlacement {
    /// Square ring search around the map centre
    Ring,
    /// Row-major scan of the whole map
    Scan,
    /// No walkable tile exists; the player is parked at (0, 0)
    Degenerate,
}

impl fmt::Display for SpawnPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpawnPlacement::Ring => "ring",
            SpawnPlacement::Scan => "scan",
            SpawnPlacement::Degenerate => "degenerate",
        };
        f.write_str(name)
    }
}

/// Which region's local map is active
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionState {
    NoRegionLoaded,
    RegionLoaded(RegionKey),
}

/// The tile under the player
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TerrainInfo {
    pub position: (i32, i32),
    pub kind: TerrainKind,
    pub name: &'static str,
    pub height: f32,
    pub temperature: f32,
    pub temperature_category: TemperatureCategory,
    pub color: (u8, u8, u8),
}

impl TerrainInfo {
    fn from_tile(tile: &MapTile) -> Self {
        Self {
            position: (tile.x, tile.y),
            kind: tile.kind,
            name: tile.kind.name(),
            height: tile.height,
            temperature: tile.temperature,
            temperature_category: tile.temperature_category(),
            color: tile.color(),
        }
    }
}

/// A tile near the player, relative to the player's position
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NearbyTile {
    pub dx: i32,
    pub dy: i32,
    pub kind: TerrainKind,
    pub name: &'static str,
    pub walkable: bool,
}

/// First walkable tile: square rings around the centre (up to
/// `min(width, height) / 4` rings), then a row-major scan, then `(0, 0)`.
pub fn find_spawn(map: &WorldMap) -> ((i32, i32), SpawnPlacement) {
    let (width, height) = (map.width() as i32, map.height() as i32);
    let (cx, cy) = (width / 2, height / 2);
    let radius = width.min(height) / 4;
    let walkable = |x: i32, y: i32| map.get(x, y).is_some_and(MapTile::is_walkable);

    for distance in 0..radius {
        for dy in -distance..=distance {
            for dx in -distance..=distance {
                // Ring perimeter only
                if dx.abs() < distance && dy.abs() < distance {
                    continue;
                }
                if walkable(cx + dx, cy + dy) {
                    return ((cx + dx, cy + dy), SpawnPlacement::Ring);
                }
            }
        }
    }

    for y in 0..height {
        for x in 0..width {
            if walkable(x, y) {
                return ((x, y), SpawnPlacement::Scan);
            }
        }
    }

    ((0, 0), SpawnPlacement::Degenerate)
}

/// World, player position and region cache for one session
pub struct WorldState {
    seed: u64,
    session_id: String,
    config: WorldConfig,
    params: GenerationParams,
    generator: MapGenerator,
    world_map: Option<WorldMap>,
    position: (i32, i32),
    region_state: RegionState,
    cache: RegionCache,
    player_data: Value,
}

impl WorldState {
    /// Create an empty session. Call `generate_world` or `load_game` next.
    pub fn new(seed: u64, session_id: impl Into<String>) -> Self {
        Self::with_config(seed, session_id, WorldConfig::default(), GenerationParams::default())
    }

    pub fn with_config(
        seed: u64,
        session_id: impl Into<String>,
        config: WorldConfig,
        params: GenerationParams,
    ) -> Self {
        Self {
            seed,
            session_id: session_id.into(),
            config,
            generator: MapGenerator::with_params(seed, params.clone()),
            params,
            world_map: None,
            position: (0, 0),
            region_state: RegionState::NoRegionLoaded,
            cache: RegionCache::new(),
            player_data: Value::Object(Default::default()),
        }
    }

    /// Generate the world at the configured size
    pub fn generate(&mut self) -> SpawnPlacement {
        let WorldConfig { width, height } = self.config;
        self.generate_world(width, height)
    }

    /// Build the world map, place the player on the first walkable tile found
    /// and load the spawn region.
    pub fn generate_world(&mut self, width: usize, height: usize) -> SpawnPlacement {
        let start = Instant::now();
        self.config = WorldConfig { width, height };

        let map = self.generator.generate_world_map(width, height);
        let (position, placement) = find_spawn(&map);
        if placement == SpawnPlacement::Degenerate {
            warn!(seed = self.seed, width, height, "no walkable tile in world, placing player at (0, 0)");
        }

        self.world_map = Some(map);
        self.position = position;
        self.cache.clear();
        self.region_state = RegionState::NoRegionLoaded;
        self.load_local_map();

        info!(
            seed = self.seed,
            width,
            height,
            x = position.0,
            y = position.1,
            %placement,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generated world"
        );
        placement
    }

    /// Move the player, reporting why a move was rejected.
    ///
    /// On success the position is committed and, if the move crossed a region
    /// boundary, the new region's local map is fetched. A rejected move leaves
    /// the state untouched.
    pub fn try_move(&mut self, movement: impl Into<Movement>) -> Result<MoveOutcome, MoveError> {
        let map = self.world_map.as_ref().ok_or(MoveError::NoWorld)?;
        let (dx, dy) = movement.into().delta();
        let x = self.position.0.saturating_add(dx);
        let y = self.position.1.saturating_add(dy);

        let tile = map.get(x, y).ok_or(MoveError::InvalidCoordinate { x, y })?;
        if !tile.is_walkable() {
            return Err(MoveError::Blocked { x, y, kind: tile.kind });
        }

        self.position = (x, y);
        let region_changed = self.region_state != RegionState::RegionLoaded(RegionKey::containing(x, y));
        if region_changed {
            self.load_local_map();
        }

        Ok(MoveOutcome {
            position: self.position,
            region_changed,
        })
    }

    /// Boolean form of `try_move`
    pub fn move_player(&mut self, movement: impl Into<Movement>) -> bool {
        self.try_move(movement).is_ok()
    }

    /// Move by a textual direction (`"up"`, `"3,-1"`, ...). Unknown
    /// directions fail like any other rejected move.
    pub fn move_by_name(&mut self, direction: &str) -> bool {
        Movement::parse(direction).is_ok_and(|movement| self.move_player(movement))
    }

    /// Make the player's region current, generating it if needed.
    /// Returns `None` before a world exists.
    pub fn load_local_map(&mut self) -> Option<Arc<LocalMap>> {
        self.world_map.as_ref()?;
        let key = RegionKey::containing(self.position.0, self.position.1);
        let map = self.cache.get(key, &self.generator);
        self.region_state = RegionState::RegionLoaded(key);
        Some(map)
    }

    /// Local map of the player's region, loading it if needed
    pub fn current_local_map(&mut self) -> Option<Arc<LocalMap>> {
        let key = RegionKey::containing(self.position.0, self.position.1);
        if self.region_state == RegionState::RegionLoaded(key) {
            if let Some(map) = self.cache.peek(&key) {
                return Some(Arc::clone(map));
            }
        }
        self.load_local_map()
    }

    /// Fine-grained tile under the player
    pub fn current_local_tile(&mut self) -> Option<MapTile> {
        let (x, y) = self.position;
        self.current_local_map()?.tile_at_global(x, y).copied()
    }

    /// Generate the 3x3 block of regions around the player in the background
    /// of the current one
    pub fn preload_neighborhood(&mut self) {
        if self.world_map.is_none() {
            return;
        }
        let center = RegionKey::containing(self.position.0, self.position.1);
        let extent = RegionKey::grid_extent(self.config.width, self.config.height);
        self.cache.preload_neighborhood(center, &self.generator, extent);
        self.region_state = RegionState::RegionLoaded(center);
    }

    pub fn current_terrain_info(&self) -> Option<TerrainInfo> {
        let (x, y) = self.position;
        self.world_map.as_ref()?.get(x, y).map(TerrainInfo::from_tile)
    }

    /// Tiles within `radius` (Chebyshev) of the player, excluding the player's
    /// own tile, row by row. The window is clamped to the map edges.
    pub fn nearby_terrain_info(&self, radius: u32) -> Vec<NearbyTile> {
        let Some(map) = self.world_map.as_ref() else {
            return Vec::new();
        };
        let r = i64::from(radius);
        let (px, py) = (i64::from(self.position.0), i64::from(self.position.1));
        let (x0, x1) = ((px - r).max(0), (px + r).min(map.width() as i64 - 1));
        let (y0, y1) = ((py - r).max(0), (py + r).min(map.height() as i64 - 1));

        let mut nearby = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                if (x, y) == (px, py) {
                    continue;
                }
                if let Some(tile) = map.get(x as i32, y as i32) {
                    nearby.push(NearbyTile {
                        dx: (x - px) as i32,
                        dy: (y - py) as i32,
                        kind: tile.kind,
                        name: tile.kind.name(),
                        walkable: tile.is_walkable(),
                    });
                }
            }
        }
        nearby
    }

    /// Snapshot of the persistent part of the session
    pub fn to_save(&self) -> SaveFile {
        SaveFile::new(self.seed, self.position, self.player_data.clone(), self.session_id.clone())
    }

    /// Save under this session's name
    pub fn save_game(&self, store: &impl SaveStore) -> Result<(), PersistenceError> {
        store.save(&self.session_id, &self.to_save())
    }

    /// Load this session's save
    pub fn load_game(&mut self, store: &impl SaveStore) -> Result<(), PersistenceError> {
        let session = self.session_id.clone();
        self.load_session(store, &session)
    }

    /// Load a named session: regenerate the world from the saved seed at the
    /// configured size, then restore the position and player data.
    ///
    /// The save is read and validated and the world rebuilt before anything
    /// is replaced, so on failure the live state is unchanged.
    pub fn load_session(&mut self, store: &impl SaveStore, session: &str) -> Result<(), PersistenceError> {
        let result = self.try_load_session(store, session);
        if let Err(err) = &result {
            warn!(session, error = %err, "failed to load session");
        }
        result
    }

    fn try_load_session(&mut self, store: &impl SaveStore, session: &str) -> Result<(), PersistenceError> {
        let save = store.load(session)?;
        let (x, y) = save.position();
        let WorldConfig { width, height } = self.config;

        let generator = MapGenerator::with_params(save.world.seed, self.params.clone());
        let map = generator.generate_world_map(width, height);
        let tile = map
            .get(x, y)
            .ok_or(PersistenceError::InvalidPosition { x, y, width, height })?;
        if !tile.is_walkable() {
            warn!(session, x, y, kind = %tile.kind, "loaded position is not walkable");
        }

        self.seed = save.world.seed;
        self.session_id = save.session_name.unwrap_or_else(|| session.to_string());
        self.generator = generator;
        self.world_map = Some(map);
        self.position = (x, y);
        self.player_data = save.player;
        self.cache.clear();
        self.region_state = RegionState::NoRegionLoaded;
        self.load_local_map();

        info!(session, seed = self.seed, x, y, "loaded session");
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> WorldConfig {
        self.config
    }

    pub fn generator(&self) -> &MapGenerator {
        &self.generator
    }

    pub fn world_map(&self) -> Option<&WorldMap> {
        self.world_map.as_ref()
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn region_state(&self) -> RegionState {
        self.region_state
    }

    pub fn cache(&self) -> &RegionCache {
        &self.cache
    }

    pub fn player_data(&self) -> &Value {
        &self.player_data
    }

    pub fn set_player_data(&mut self, data: Value) {
        self.player_data = data;
    }
}
