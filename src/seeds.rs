//! Seed management for world generation
//!
//! Derives one seed per noise layer from a single master seed, and provides
//! pure per-coordinate hashes for the rare random decisions made while
//! classifying tiles (arenas, local biome variation).
//!
//! Nothing here touches a shared random stream: every draw is a function of
//! `(seed, x, y, purpose)`, so tiles can be generated in any order, on any
//! thread, and a dropped region regenerates identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed offset of the coarse height layer
pub const HEIGHT_SEED_OFFSET: u64 = 0;
/// Seed offset of the fine (local tier) height layer
pub const LOCAL_HEIGHT_SEED_OFFSET: u64 = 1000;
/// Seed offset of the temperature layer
pub const TEMPERATURE_SEED_OFFSET: u64 = 2000;
/// Seed offset of the mountain-detail layer
pub const MOUNTAIN_SEED_OFFSET: u64 = 3000;

/// Seeds for every noise layer.
///
/// Each layer gets its own seed derived from the master so that layers stay
/// independent even when sampled at the same coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSeeds {
    /// Master seed (the only value that is persisted)
    pub master: u64,
    /// Coarse height field (continents)
    pub height: u64,
    /// Fine height field (local detail)
    pub local_height: u64,
    /// Temperature field
    pub temperature: u64,
    /// Mountain-detail field
    pub mountain: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all layer seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            height: master.wrapping_add(HEIGHT_SEED_OFFSET),
            local_height: master.wrapping_add(LOCAL_HEIGHT_SEED_OFFSET),
            temperature: master.wrapping_add(TEMPERATURE_SEED_OFFSET),
            mountain: master.wrapping_add(MOUNTAIN_SEED_OFFSET),
        }
    }
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, height: {}, local_height: {}, temperature: {}, mountain: {} }}",
            self.master, self.height, self.local_height, self.temperature, self.mountain,
        )
    }
}

/// What a per-coordinate draw is used for.
///
/// Every rule gets its own tag so draws for different rules at the same
/// coordinate are uncorrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RollPurpose {
    /// Arena placement on the world tier
    WorldArena,
    /// Arena placement on the local tier
    LocalArena,
    /// Grass raised into a small forested hill
    SmallHill,
    /// Forest opened into a grass clearing
    ForestClearing,
    /// Shallow water raised into a sand islet
    TinyIsland,
}

impl RollPurpose {
    fn tag(self) -> u64 {
        match self {
            RollPurpose::WorldArena => 0xA4E7_A001,
            RollPurpose::LocalArena => 0xA4E7_A002,
            RollPurpose::SmallHill => 0x5EED_B001,
            RollPurpose::ForestClearing => 0x5EED_B002,
            RollPurpose::TinyIsland => 0x5EED_B003,
        }
    }
}

/// Hash a seed, a coordinate and a purpose into a new seed.
///
/// Splitmix64-style mixing: each input is folded in and then avalanched so
/// neighbouring coordinates produce unrelated values.
pub fn coord_hash(seed: u64, x: i32, y: i32, purpose: RollPurpose) -> u64 {
    let mut hash = seed ^ purpose.tag();

    hash = hash.wrapping_add(x as i64 as u64);
    hash ^= hash >> 30;
    hash = hash.wrapping_mul(0xbf58476d1ce4e5b9);

    hash = hash.wrapping_add(y as i64 as u64);
    hash ^= hash >> 27;
    hash = hash.wrapping_mul(0x94d049bb133111eb);

    hash = hash.wrapping_add(purpose.tag());
    hash ^= hash >> 31;
    hash = hash.wrapping_mul(0xbf58476d1ce4e5b9);

    hash ^= hash >> 33;
    hash
}

/// Uniform draw in `[0, 1)` for a coordinate, reproducible from its inputs alone.
pub fn coord_roll(seed: u64, x: i32, y: i32, purpose: RollPurpose) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(coord_hash(seed, x, y, purpose));
    rng.gen::<f64>()
}
