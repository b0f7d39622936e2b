//! Terrain classification rules.
//!
//! Maps a sampled height (with mountain influence already folded in) to a
//! terrain kind, then applies the rare per-coordinate overrides: arenas on
//! warm sand, and on the local tier small hills, forest clearings and sand
//! islets. Every random decision is a `coord_roll`, so classifying the same
//! tile twice always gives the same answer.

use crate::params::GenerationParams;
use crate::seeds::{coord_roll, RollPurpose};
use crate::terrain::TerrainKind;

/// Resolution tier a tile belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Coarse world map
    World,
    /// Fine per-region map; enables chasms and biome variation
    Local,
}

/// Strong local mountain signal turns would-be forest into mountains
const FOREST_MOUNTAIN_INFLUENCE: f64 = 0.3;

/// Primary height-threshold classification.
pub fn classify(height: f64, mountain_influence: f64, tier: Tier) -> TerrainKind {
    if tier == Tier::Local && height < -0.85 {
        return TerrainKind::DeepChasm;
    }

    if height < -0.55 {
        TerrainKind::DeepOcean
    } else if height < -0.25 {
        TerrainKind::Ocean
    } else if height < -0.05 {
        TerrainKind::ShallowWater
    } else if height < 0.15 {
        TerrainKind::Sand
    } else if height < 0.35 {
        TerrainKind::Grass
    } else if height < 0.55 {
        if mountain_influence > FOREST_MOUNTAIN_INFLUENCE {
            TerrainKind::Mountains
        } else {
            TerrainKind::Forest
        }
    } else if height < 0.75 {
        TerrainKind::Mountains
    } else {
        TerrainKind::SnowPeaks
    }
}

/// Rare arena override: only sand, only when warm, only when the roll is low.
pub fn apply_arena(kind: TerrainKind, temperature: f64, roll: f64, params: &GenerationParams) -> TerrainKind {
    if kind == TerrainKind::Sand && roll < params.arena_chance && temperature > params.arena_min_temperature {
        TerrainKind::Arena
    } else {
        kind
    }
}

/// Local-only biome variation. `roll` is drawn lazily for the rule that
/// applies to `kind`, each rule with its own purpose tag.
pub fn apply_local_variation(
    kind: TerrainKind,
    height: f64,
    params: &GenerationParams,
    roll: impl Fn(RollPurpose) -> f64,
) -> TerrainKind {
    match kind {
        TerrainKind::Grass if height > params.hill_min_height => {
            if roll(RollPurpose::SmallHill) < params.hill_chance {
                TerrainKind::Forest
            } else {
                kind
            }
        }
        TerrainKind::Forest if height > params.clearing_min_height => {
            if roll(RollPurpose::ForestClearing) < params.clearing_chance {
                TerrainKind::Grass
            } else {
                kind
            }
        }
        TerrainKind::ShallowWater if height > params.island_min_height => {
            if roll(RollPurpose::TinyIsland) < params.island_chance {
                TerrainKind::Sand
            } else {
                kind
            }
        }
        _ => kind,
    }
}

/// Full classification pipeline for one tile, keyed by the world's master seed.
#[derive(Clone, Debug)]
pub struct TileClassifier {
    seed: u64,
    params: GenerationParams,
}

impl TileClassifier {
    pub fn new(seed: u64, params: GenerationParams) -> Self {
        Self { seed, params }
    }

    /// Classify a tile at global coordinate `(x, y)` on the given tier.
    pub fn classify_tile(
        &self,
        x: i32,
        y: i32,
        height: f64,
        mountain_influence: f64,
        temperature: f64,
        tier: Tier,
    ) -> TerrainKind {
        let kind = classify(height, mountain_influence, tier);

        let arena_purpose = match tier {
            Tier::World => RollPurpose::WorldArena,
            Tier::Local => RollPurpose::LocalArena,
        };
        let kind = if kind == TerrainKind::Sand {
            apply_arena(kind, temperature, coord_roll(self.seed, x, y, arena_purpose), &self.params)
        } else {
            kind
        };

        match tier {
            Tier::World => kind,
            Tier::Local => apply_local_variation(kind, height, &self.params, |purpose| {
                coord_roll(self.seed, x, y, purpose)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_thresholds() {
        let cases = [
            (-0.9, TerrainKind::DeepOcean),
            (-0.55, TerrainKind::Ocean),
            (-0.3, TerrainKind::Ocean),
            (-0.25, TerrainKind::ShallowWater),
            (-0.05, TerrainKind::Sand),
            (0.15, TerrainKind::Grass),
            (0.35, TerrainKind::Forest),
            (0.55, TerrainKind::Mountains),
            (0.75, TerrainKind::SnowPeaks),
            (1.0, TerrainKind::SnowPeaks),
        ];
        for (height, expected) in cases {
            assert_eq!(classify(height, 0.0, Tier::World), expected, "height {}", height);
        }
    }

    #[test]
    fn test_chasm_only_on_local_tier() {
        assert_eq!(classify(-0.9, 0.0, Tier::Local), TerrainKind::DeepChasm);
        assert_eq!(classify(-0.9, 0.0, Tier::World), TerrainKind::DeepOcean);
        assert_eq!(classify(-0.85, 0.0, Tier::Local), TerrainKind::DeepOcean);
    }

    #[test]
    fn test_mountains_preempt_forest() {
        assert_eq!(classify(0.45, 0.3, Tier::World), TerrainKind::Forest);
        assert_eq!(classify(0.45, 0.31, Tier::World), TerrainKind::Mountains);
        // Influence does not matter outside the forest band
        assert_eq!(classify(0.25, 0.5, Tier::World), TerrainKind::Grass);
    }

    #[test]
    fn test_arena_needs_sand_warmth_and_low_roll() {
        let params = GenerationParams::default();

        assert_eq!(apply_arena(TerrainKind::Sand, 0.5, 0.01, &params), TerrainKind::Arena);
        assert_eq!(apply_arena(TerrainKind::Sand, 0.2, 0.01, &params), TerrainKind::Sand);
        assert_eq!(apply_arena(TerrainKind::Sand, 0.5, 0.06, &params), TerrainKind::Sand);
        assert_eq!(apply_arena(TerrainKind::Grass, 0.9, 0.0, &params), TerrainKind::Grass);
    }

    #[test]
    fn test_local_variation_rules() {
        let params = GenerationParams::default();
        let always = |_| 0.0;
        let never = |_| 0.99;

        assert_eq!(apply_local_variation(TerrainKind::Grass, 0.3, &params, always), TerrainKind::Forest);
        assert_eq!(apply_local_variation(TerrainKind::Grass, 0.2, &params, always), TerrainKind::Grass);
        assert_eq!(apply_local_variation(TerrainKind::Forest, 0.4, &params, always), TerrainKind::Grass);
        assert_eq!(apply_local_variation(TerrainKind::ShallowWater, -0.1, &params, always), TerrainKind::Sand);
        assert_eq!(apply_local_variation(TerrainKind::ShallowWater, -0.2, &params, always), TerrainKind::ShallowWater);
        assert_eq!(apply_local_variation(TerrainKind::Grass, 0.3, &params, never), TerrainKind::Grass);
        assert_eq!(apply_local_variation(TerrainKind::Sand, 0.0, &params, always), TerrainKind::Sand);
    }

    #[test]
    fn test_each_rule_uses_its_own_purpose() {
        let params = GenerationParams::default();
        let hill_only = |purpose| if purpose == RollPurpose::SmallHill { 0.0 } else { 0.99 };

        assert_eq!(apply_local_variation(TerrainKind::Grass, 0.3, &params, hill_only), TerrainKind::Forest);
        assert_eq!(apply_local_variation(TerrainKind::Forest, 0.4, &params, hill_only), TerrainKind::Forest);
    }

    #[test]
    fn test_world_tier_has_no_variation() {
        let classifier = TileClassifier::new(42, GenerationParams::default());
        for x in 0..200 {
            let kind = classifier.classify_tile(x, 3, 0.3, 0.0, 0.0, Tier::World);
            assert_eq!(kind, TerrainKind::Grass);
        }
    }

    #[test]
    fn test_tile_classification_is_reproducible() {
        let classifier = TileClassifier::new(42, GenerationParams::default());
        for x in 0..100 {
            for y in 0..10 {
                let a = classifier.classify_tile(x, y, 0.05, 0.0, 0.9, Tier::Local);
                let b = classifier.classify_tile(x, y, 0.05, 0.0, 0.9, Tier::Local);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_arenas_are_rare_on_warm_sand() {
        let classifier = TileClassifier::new(42, GenerationParams::default());
        let arenas = (0..100)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .filter(|&(x, y)| classifier.classify_tile(x, y, 0.05, 0.0, 0.9, Tier::World) == TerrainKind::Arena)
            .count();
        assert!(arenas > 300 && arenas < 700, "unexpected arena count {}", arenas);
    }
}
