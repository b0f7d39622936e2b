//! Region cache with locality-biased eviction
//!
//! Keeps the local maps of recently visited regions resident. When the cache
//! grows past its limit it drops regions outside the 3x3 block around the
//! current region, farthest first, until a small floor of entries remains.
//! Locality dominates recency: a region next to the player is never evicted
//! in favour of one visited more recently but farther away.
//!
//! Local maps are pure functions of `(seed, region)`, so eviction is
//! lossless: a dropped region regenerates identically on the next visit.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use super::coords::RegionKey;
use crate::map::{LocalMap, MapGenerator};

/// Maximum number of resident regions
pub const CACHE_LIMIT: usize = 9;

/// Eviction stops once this many regions remain
pub const KEEP_FLOOR: usize = 5;

/// Cache statistics for monitoring
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    /// Regions resident right now
    pub resident: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Hits: {} | Misses: {} | Rate: {:.1}% | Evictions: {} | Resident: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions,
            self.resident
        )
    }
}

/// Cached region with its last access tick
struct CachedRegion {
    map: Arc<LocalMap>,
    last_access: u64,
}

/// Bounded mapping from region to its materialized local map
pub struct RegionCache {
    regions: HashMap<RegionKey, CachedRegion>,
    limit: usize,
    keep_floor: usize,
    /// Region the player is in; never evicted
    current: Option<RegionKey>,
    /// Monotonic access counter (breaks distance ties, oldest first)
    clock: u64,
    stats: CacheStats,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionCache {
    pub fn new() -> Self {
        Self::with_limits(CACHE_LIMIT, KEEP_FLOOR)
    }

    /// Custom limits. The floor is capped at the limit.
    pub fn with_limits(limit: usize, keep_floor: usize) -> Self {
        Self {
            regions: HashMap::with_capacity(limit + 1),
            limit,
            keep_floor: keep_floor.min(limit),
            current: None,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Get the local map of `key`, generating it on a miss.
    ///
    /// `key` becomes the current region; an eviction pass runs afterwards if
    /// the cache is over its limit.
    pub fn get(&mut self, key: RegionKey, generator: &MapGenerator) -> Arc<LocalMap> {
        self.clock += 1;
        self.current = Some(key);

        let map = match self.regions.get_mut(&key) {
            Some(cached) => {
                cached.last_access = self.clock;
                self.stats.hits += 1;
                debug!(%key, "region cache hit");
                Arc::clone(&cached.map)
            }
            None => {
                self.stats.misses += 1;
                debug!(%key, "region cache miss, generating");
                let map = Arc::new(generator.generate_region(key));
                self.regions.insert(
                    key,
                    CachedRegion {
                        map: Arc::clone(&map),
                        last_access: self.clock,
                    },
                );
                map
            }
        };

        self.evict_distant();
        map
    }

    /// Resident map of `key`, without generating or touching it
    pub fn peek(&self, key: &RegionKey) -> Option<&Arc<LocalMap>> {
        self.regions.get(key).map(|cached| &cached.map)
    }

    /// Generate every missing region of the 3x3 block around `center` that
    /// lies inside a `regions_x x regions_y` grid.
    ///
    /// Missing regions are generated in parallel, then inserted here, so the
    /// cache itself only ever has one writer. `center` becomes the current
    /// region.
    pub fn preload_neighborhood(
        &mut self,
        center: RegionKey,
        generator: &MapGenerator,
        (regions_x, regions_y): (i32, i32),
    ) {
        let missing: Vec<RegionKey> = center
            .neighborhood()
            .filter(|k| k.x >= 0 && k.y >= 0 && k.x < regions_x && k.y < regions_y)
            .filter(|k| !self.regions.contains_key(k))
            .collect();

        let generated: Vec<(RegionKey, LocalMap)> = missing
            .par_iter()
            .map(|&key| (key, generator.generate_region(key)))
            .collect();

        self.clock += 1;
        self.current = Some(center);
        self.stats.misses += generated.len();
        for (key, map) in generated {
            self.regions.insert(
                key,
                CachedRegion {
                    map: Arc::new(map),
                    last_access: self.clock,
                },
            );
        }
        debug!(%center, preloaded = missing.len(), "preloaded region neighborhood");

        self.evict_distant();
    }

    /// Drop regions outside the current 3x3 block when over the limit:
    /// farthest first, then least recently used, stopping at the floor.
    fn evict_distant(&mut self) {
        if self.regions.len() <= self.limit {
            return;
        }
        let Some(current) = self.current else {
            return;
        };

        let mut candidates: Vec<(RegionKey, i32, u64)> = self
            .regions
            .iter()
            .map(|(key, cached)| (*key, current.chebyshev(key), cached.last_access))
            .filter(|&(_, distance, _)| distance > 1)
            .collect();

        candidates.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.2.cmp(&b.2))
                .then_with(|| a.0.cmp(&b.0))
        });

        let before = self.regions.len();
        for (key, _, _) in candidates {
            if self.regions.len() <= self.keep_floor {
                break;
            }
            self.regions.remove(&key);
        }

        let evicted = before - self.regions.len();
        self.stats.evictions += evicted;
        debug!(%current, evicted, resident = self.regions.len(), "region cache eviction pass");
    }

    pub fn contains(&self, key: &RegionKey) -> bool {
        self.regions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Region most recently requested
    pub fn current(&self) -> Option<RegionKey> {
        self.current
    }

    /// Resident region keys, sorted
    pub fn cached_regions(&self) -> Vec<RegionKey> {
        let mut keys: Vec<RegionKey> = self.regions.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resident: self.regions.len(),
            ..self.stats
        }
    }

    /// Drop everything (e.g. when the world is regenerated)
    pub fn clear(&mut self) {
        self.regions.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> MapGenerator {
        MapGenerator::new(42)
    }

    #[test]
    fn test_miss_then_hit() {
        let gen = generator();
        let mut cache = RegionCache::new();

        let first = cache.get(RegionKey::new(0, 0), &gen);
        let second = cache.get(RegionKey::new(0, 0), &gen);

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.resident), (1, 1, 1));
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_neighborhood_fits_without_eviction() {
        let gen = generator();
        let mut cache = RegionCache::new();
        let center = RegionKey::new(5, 5);

        for key in center.neighborhood() {
            cache.get(key, &gen);
        }
        cache.get(center, &gen);

        assert_eq!(cache.len(), 9);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_far_jump_trims_to_floor() {
        let gen = generator();
        let mut cache = RegionCache::new();

        for key in RegionKey::new(1, 1).neighborhood() {
            cache.get(key, &gen);
        }
        let far = RegionKey::new(10, 10);
        cache.get(far, &gen);

        // 10 entries, 9 of them far: evict down to the floor
        assert_eq!(cache.len(), KEEP_FLOOR);
        assert!(cache.contains(&far));
        assert_eq!(cache.stats().evictions, 10 - KEEP_FLOOR);
    }

    #[test]
    fn test_neighbors_survive_eviction() {
        let gen = generator();
        let mut cache = RegionCache::new();

        // Far regions first, then a full neighborhood around (20, 20)
        let path: Vec<RegionKey> = (0..4)
            .map(|x| RegionKey::new(x, 0))
            .chain(RegionKey::new(20, 20).neighborhood())
            .collect();

        for key in path {
            let near_before: Vec<RegionKey> = cache
                .cached_regions()
                .into_iter()
                .filter(|k| k.chebyshev(&key) <= 1)
                .collect();
            cache.get(key, &gen);
            for near in near_before {
                assert!(cache.contains(&near), "{} was evicted while next to {}", near, key);
            }
            assert!(cache.len() <= CACHE_LIMIT);
        }
        assert!(cache.stats().evictions > 0);
    }

    #[test]
    fn test_farthest_evicted_first() {
        let gen = generator();
        let mut cache = RegionCache::with_limits(3, 2);

        cache.get(RegionKey::new(9, 0), &gen);
        cache.get(RegionKey::new(4, 0), &gen);
        cache.get(RegionKey::new(6, 0), &gen);
        // Current (0,0): distances 9, 4, 6 -> evict (9,0) then (6,0)
        cache.get(RegionKey::new(0, 0), &gen);

        assert_eq!(cache.cached_regions(), vec![RegionKey::new(0, 0), RegionKey::new(4, 0)]);
    }

    #[test]
    fn test_bounded_along_long_walk() {
        let gen = generator();
        let mut cache = RegionCache::new();

        // A zig-zag walk over many regions
        let path: Vec<RegionKey> = (0..12)
            .flat_map(|x| (0..3).map(move |y| RegionKey::new(x, if x % 2 == 0 { y } else { 2 - y })))
            .collect();
        for key in path {
            cache.get(key, &gen);
            assert!(cache.len() <= CACHE_LIMIT);
            assert!(cache.contains(&key));
            assert_eq!(cache.current(), Some(key));
        }
    }

    #[test]
    fn test_eviction_is_lossless() {
        let gen = generator();
        let mut cache = RegionCache::new();
        let home = RegionKey::new(0, 0);

        let first = cache.get(home, &gen);
        for x in 0..10 {
            cache.get(RegionKey::new(30 + x, 30), &gen);
        }
        assert!(!cache.contains(&home));

        // The evicted Arc is still usable, and regeneration matches it
        let regenerated = cache.get(home, &gen);
        assert!(!Arc::ptr_eq(&first, &regenerated));
        assert_eq!(*first, *regenerated);
    }

    #[test]
    fn test_preload_neighborhood_respects_bounds() {
        let gen = generator();
        let mut cache = RegionCache::new();

        cache.preload_neighborhood(RegionKey::new(0, 0), &gen, (2, 2));
        assert_eq!(
            cache.cached_regions(),
            vec![RegionKey::new(0, 0), RegionKey::new(0, 1), RegionKey::new(1, 0), RegionKey::new(1, 1)]
        );
        assert_eq!(cache.current(), Some(RegionKey::new(0, 0)));
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn test_preload_keeps_limit() {
        let gen = generator();
        let mut cache = RegionCache::new();

        cache.preload_neighborhood(RegionKey::new(1, 1), &gen, (10, 10));
        assert_eq!(cache.len(), 9);
        cache.preload_neighborhood(RegionKey::new(5, 5), &gen, (10, 10));
        assert!(cache.len() <= CACHE_LIMIT);
        for key in RegionKey::new(5, 5).neighborhood() {
            assert!(cache.contains(&key));
        }
    }

    #[test]
    fn test_clear() {
        let gen = generator();
        let mut cache = RegionCache::new();
        cache.get(RegionKey::new(0, 0), &gen);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.current(), None);
    }
}
