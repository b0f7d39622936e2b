//! Seeded coherent-noise layers.
//!
//! Four independent fields are sampled while building maps: a low-frequency
//! height field for the world tier, a high-frequency height field for the
//! local tier, a temperature field and a mountain-detail field that sits
//! between the two. Each is fractal Perlin noise with its own seed, so
//! `sample(layer, x, y)` is a pure function of `(seed, layer, x, y)`.

use noise::{NoiseFn, Perlin};

use crate::params::GenerationParams;
use crate::seeds::WorldSeeds;

/// Which field to sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseLayer {
    /// Broad continents (world tier)
    Height,
    /// Fine relief (local tier)
    LocalHeight,
    /// Temperature on both tiers
    Temperature,
    /// Mountain detail on both tiers
    Mountain,
}

impl NoiseLayer {
    pub fn all() -> &'static [Self] {
        &[Self::Height, Self::LocalHeight, Self::Temperature, Self::Mountain]
    }
}

/// Fold a 64-bit seed into the 32 bits a Perlin source takes, so the high
/// half still changes the field.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// One fractal layer: a Perlin source plus its octave count.
#[derive(Clone)]
struct FractalLayer {
    source: Perlin,
    octaves: u32,
}

impl FractalLayer {
    fn new(seed: u64, octaves: u32) -> Self {
        Self {
            source: Perlin::new(fold_seed(seed)),
            octaves: octaves.max(1),
        }
    }

    fn sample(&self, x: f64, y: f64) -> f64 {
        fbm_noise(&self.source, x, y, self.octaves, 0.5, 2.0).clamp(-1.0, 1.0)
    }
}

/// The full family of seeded noise fields for one world.
#[derive(Clone)]
pub struct NoiseField {
    seeds: WorldSeeds,
    height: FractalLayer,
    local_height: FractalLayer,
    temperature: FractalLayer,
    mountain: FractalLayer,
}

impl NoiseField {
    pub fn new(seeds: WorldSeeds, params: &GenerationParams) -> Self {
        Self {
            seeds,
            height: FractalLayer::new(seeds.height, params.height_octaves),
            local_height: FractalLayer::new(seeds.local_height, params.local_height_octaves),
            temperature: FractalLayer::new(seeds.temperature, params.temperature_octaves),
            mountain: FractalLayer::new(seeds.mountain, params.mountain_octaves),
        }
    }

    /// Build every layer from a master seed with default parameters.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(WorldSeeds::from_master(seed), &GenerationParams::default())
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    /// Sample a layer at a point. Always returns a value in `[-1, 1]`.
    pub fn sample(&self, layer: NoiseLayer, x: f64, y: f64) -> f64 {
        match layer {
            NoiseLayer::Height => self.height.sample(x, y),
            NoiseLayer::LocalHeight => self.local_height.sample(x, y),
            NoiseLayer::Temperature => self.temperature.sample(x, y),
            NoiseLayer::Mountain => self.mountain.sample(x, y),
        }
    }
}

/// Fractional Brownian Motion noise, normalised by the summed amplitude.
fn fbm_noise(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_is_deterministic() {
        let a = NoiseField::from_seed(42);
        let b = NoiseField::from_seed(42);

        for &layer in NoiseLayer::all() {
            for i in 0..50 {
                let x = i as f64 * 0.37 - 5.0;
                let y = i as f64 * 0.11 + 3.0;
                assert_eq!(a.sample(layer, x, y).to_bits(), b.sample(layer, x, y).to_bits());
            }
        }
    }

    #[test]
    fn test_samples_stay_in_range() {
        let field = NoiseField::from_seed(7);
        for &layer in NoiseLayer::all() {
            for i in 0..200 {
                let v = field.sample(layer, i as f64 * 0.731, i as f64 * -0.293);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_layers_are_independent() {
        let field = NoiseField::from_seed(42);
        let differing = (0..100)
            .filter(|&i| {
                let x = 0.5 + i as f64 * 0.21;
                let y = 0.25 + i as f64 * 0.17;
                field.sample(NoiseLayer::Height, x, y) != field.sample(NoiseLayer::Temperature, x, y)
            })
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn test_different_seeds_give_different_fields() {
        let a = NoiseField::from_seed(1);
        let b = NoiseField::from_seed(2);
        let differing = (0..100)
            .filter(|&i| {
                let p = 0.3 + i as f64 * 0.47;
                a.sample(NoiseLayer::Height, p, p * 0.5) != b.sample(NoiseLayer::Height, p, p * 0.5)
            })
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn test_high_seed_bits_change_field() {
        let low = 42u64;
        let high = low + (1 << 32);
        assert_ne!(fold_seed(low), fold_seed(high));

        let a = NoiseField::from_seed(low);
        let b = NoiseField::from_seed(high);
        let differing = (0..100)
            .filter(|&i| {
                let p = 0.3 + i as f64 * 0.47;
                a.sample(NoiseLayer::Height, p, p * 0.5) != b.sample(NoiseLayer::Height, p, p * 0.5)
            })
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn test_field_is_coherent() {
        // Nearby samples should be close for a smooth field
        let field = NoiseField::from_seed(3);
        let base = field.sample(NoiseLayer::Height, 10.3, 4.7);
        let near = field.sample(NoiseLayer::Height, 10.301, 4.701);
        assert!((base - near).abs() < 0.05);
    }
}
