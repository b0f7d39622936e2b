//! Region addressing between the world tier and the local tier.
//!
//! A region is a `REGION_SIZE x REGION_SIZE` block of world coordinates whose
//! local detail is generated and cached as a unit.

use serde::{Deserialize, Serialize};

/// Side of a region, in world-tier cells
pub const REGION_SIZE: i32 = 64;

/// Identity of a region: `(floor(x / REGION_SIZE), floor(y / REGION_SIZE))`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey {
    pub x: i32,
    pub y: i32,
}

impl RegionKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The region containing global coordinate `(x, y)`. Uses floor division,
    /// so negative coordinates map to negative regions.
    pub fn containing(x: i32, y: i32) -> Self {
        Self {
            x: x.div_euclid(REGION_SIZE),
            y: y.div_euclid(REGION_SIZE),
        }
    }

    /// Global coordinate of this region's top-left cell
    pub fn origin(&self) -> (i32, i32) {
        (self.x * REGION_SIZE, self.y * REGION_SIZE)
    }

    /// Chebyshev distance in regions
    pub fn chebyshev(&self, other: &RegionKey) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The 3x3 block centred on this region, row by row
    pub fn neighborhood(&self) -> impl Iterator<Item = RegionKey> {
        let RegionKey { x, y } = *self;
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| RegionKey::new(x + dx, y + dy)))
    }

    /// Number of regions needed to cover a `width x height` world
    pub fn grid_extent(width: usize, height: usize) -> (i32, i32) {
        let size = REGION_SIZE as usize;
        (width.div_ceil(size) as i32, height.div_ceil(size) as i32)
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region({},{})", self.x, self.y)
    }
}

/// Offset of global coordinate `(x, y)` inside its region, in `[0, REGION_SIZE)`
pub fn local_offset(x: i32, y: i32) -> (usize, usize) {
    (x.rem_euclid(REGION_SIZE) as usize, y.rem_euclid(REGION_SIZE) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_of_coordinates() {
        assert_eq!(RegionKey::containing(0, 0), RegionKey::new(0, 0));
        assert_eq!(RegionKey::containing(63, 63), RegionKey::new(0, 0));
        assert_eq!(RegionKey::containing(64, 127), RegionKey::new(1, 1));
        assert_eq!(RegionKey::containing(100, 200), RegionKey::new(1, 3));
        assert_eq!(RegionKey::containing(-1, -64), RegionKey::new(-1, -1));
        assert_eq!(RegionKey::containing(-65, 0), RegionKey::new(-2, 0));
    }

    #[test]
    fn test_offset_round_trip() {
        for &(x, y) in &[(0, 0), (100, 200), (63, 64), (-1, -1), (-130, 5)] {
            let key = RegionKey::containing(x, y);
            let (ox, oy) = key.origin();
            let (lx, ly) = local_offset(x, y);
            assert_eq!((ox + lx as i32, oy + ly as i32), (x, y));
        }
    }

    #[test]
    fn test_chebyshev_distance() {
        let center = RegionKey::new(2, 2);
        assert_eq!(center.chebyshev(&RegionKey::new(2, 2)), 0);
        assert_eq!(center.chebyshev(&RegionKey::new(3, 1)), 1);
        assert_eq!(center.chebyshev(&RegionKey::new(0, 3)), 2);
    }

    #[test]
    fn test_neighborhood_is_3x3() {
        let center = RegionKey::new(0, 0);
        let keys: Vec<_> = center.neighborhood().collect();
        assert_eq!(keys.len(), 9);
        assert!(keys.iter().all(|k| center.chebyshev(k) <= 1));
        assert!(keys.contains(&RegionKey::new(-1, -1)));
        assert!(keys.contains(&RegionKey::new(1, 1)));
    }

    #[test]
    fn test_grid_extent_rounds_up() {
        assert_eq!(RegionKey::grid_extent(128, 128), (2, 2));
        assert_eq!(RegionKey::grid_extent(130, 64), (3, 1));
        assert_eq!(RegionKey::grid_extent(20, 20), (1, 1));
    }
}
