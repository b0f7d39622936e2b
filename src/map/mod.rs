//! Map generation for both resolution tiers.
//!
//! The world tier is a coarse global grid (one cell ~ 1 km) generated once per
//! session. The local tier is a fine grid (one cell ~ 5 m) generated per
//! region on demand.
//!
//! # Example
//!
//! ```
//! use seeded_world::map::MapGenerator;
//! use seeded_world::region::RegionKey;
//!
//! let generator = MapGenerator::new(42);
//! let world = generator.generate_world_map(64, 64);
//! let local = generator.generate_region(RegionKey::new(0, 0));
//!
//! assert_eq!(world.width(), 64);
//! assert_eq!(local.get(10, 5).map(|t| (t.x, t.y)), Some((10, 5)));
//! ```

mod generation;
mod stats;
mod types;

pub use generation::MapGenerator;
pub use stats::MapStatistics;
pub use types::{LocalMap, MapTile, WorldMap};
