//! Seeded two-tier world generation library
//!
//! A coarse world map and per-region local detail, both pure functions of a
//! single seed, plus the session state that walks a player across them and
//! persists just enough to rebuild everything.
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod classify;
pub mod error;
pub mod map;
pub mod noise_field;
pub mod params;
pub mod persistence;
pub mod region;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod world;

pub use error::{MoveError, ParamsError, PersistenceError};
pub use map::{LocalMap, MapGenerator, MapStatistics, MapTile, WorldMap};
pub use params::{GenerationParams, WorldConfig};
pub use persistence::{FileStore, SaveFile, SaveStore};
pub use region::{RegionCache, RegionKey, CACHE_LIMIT, REGION_SIZE};
pub use terrain::{TemperatureCategory, TerrainKind};
pub use world::{Direction, Movement, SpawnPlacement, WorldState};
