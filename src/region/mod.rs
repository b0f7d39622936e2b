//! Region addressing and the on-demand local map cache.
//!
//! The world is split into `REGION_SIZE x REGION_SIZE` regions. The local
//! detail of a region is generated when first visited and kept in a small
//! locality-biased cache around the player.

mod cache;
mod coords;

pub use cache::{CacheStats, RegionCache, CACHE_LIMIT, KEEP_FLOOR};
pub use coords::{local_offset, RegionKey, REGION_SIZE};
