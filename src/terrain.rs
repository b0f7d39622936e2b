//! Terrain categories and their display attributes.
//!
//! Defines the closed set of terrain kinds a tile can have, the temperature
//! bands used to tint them, and lookup tables for walkability, color and
//! ASCII symbols.

use serde::{Deserialize, Serialize};

/// Discrete biome/feature category of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    // Water
    DeepOcean,
    Ocean,
    ShallowWater,

    // Land
    Sand,
    Grass,
    Forest,
    Mountains,
    SnowPeaks,

    // Special
    Arena,
    /// Only produced on the local tier
    DeepChasm,
}

impl TerrainKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::DeepOcean,
            Self::Ocean,
            Self::ShallowWater,
            Self::Sand,
            Self::Grass,
            Self::Forest,
            Self::Mountains,
            Self::SnowPeaks,
            Self::Arena,
            Self::DeepChasm,
        ]
    }

    /// Whether the player may stand on this terrain
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TerrainKind::DeepOcean | TerrainKind::Ocean | TerrainKind::DeepChasm)
    }

    /// Ocean-class and shallow water
    pub fn is_water(&self) -> bool {
        matches!(self, TerrainKind::DeepOcean | TerrainKind::Ocean | TerrainKind::ShallowWater)
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            TerrainKind::DeepOcean => "Deep Ocean",
            TerrainKind::Ocean => "Ocean",
            TerrainKind::ShallowWater => "Shallow Water",
            TerrainKind::Sand => "Sand",
            TerrainKind::Grass => "Grass",
            TerrainKind::Forest => "Forest",
            TerrainKind::Mountains => "Mountains",
            TerrainKind::SnowPeaks => "Snow Peaks",
            TerrainKind::Arena => "Combat Arena",
            TerrainKind::DeepChasm => "Deep Chasm",
        }
    }

    /// ASCII character for terminal display
    pub fn ascii_char(&self) -> char {
        match self {
            TerrainKind::DeepOcean => '~',
            TerrainKind::Ocean => '~',
            TerrainKind::ShallowWater => '.',
            TerrainKind::Sand => 's',
            TerrainKind::Grass => 'g',
            TerrainKind::Forest => 'f',
            TerrainKind::Mountains => '^',
            TerrainKind::SnowPeaks => 'A',
            TerrainKind::Arena => '@',
            TerrainKind::DeepChasm => '#',
        }
    }

    /// RGB color for rendering, tinted by temperature where the kind allows it.
    /// Water, peaks, arenas and chasms ignore temperature.
    pub fn color(&self, temperature: TemperatureCategory) -> (u8, u8, u8) {
        use TemperatureCategory::*;

        match self {
            TerrainKind::DeepOcean => (0, 20, 60),
            TerrainKind::Ocean => (20, 80, 150),
            TerrainKind::ShallowWater => (100, 150, 200),

            TerrainKind::Sand => match temperature {
                Frozen | Cold | Cool => (180, 160, 100),
                Temperate => (210, 180, 80),
                Warm | Hot => (240, 200, 60),
            },
            TerrainKind::Grass => match temperature {
                Frozen | Cold | Cool => (80, 120, 60),
                Temperate => (100, 180, 80),
                Warm | Hot => (120, 200, 60),
            },
            TerrainKind::Forest => match temperature {
                Frozen | Cold | Cool => (40, 80, 40),
                Temperate => (60, 120, 40),
                Warm | Hot => (80, 140, 50),
            },
            // Snow-gray when cold, volcanic brown when hot
            TerrainKind::Mountains => match temperature {
                Frozen | Cold => (150, 150, 180),
                Warm | Hot => (120, 60, 20),
                Cool | Temperate => (140, 100, 60),
            },

            TerrainKind::SnowPeaks => (240, 240, 255),
            TerrainKind::Arena => (200, 140, 40),
            TerrainKind::DeepChasm => (40, 20, 30),
        }
    }
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Temperature band of a normalized temperature in `[-1, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemperatureCategory {
    Frozen,
    Cold,
    Cool,
    Temperate,
    Warm,
    Hot,
}

impl TemperatureCategory {
    pub fn all() -> &'static [Self] {
        &[Self::Frozen, Self::Cold, Self::Cool, Self::Temperate, Self::Warm, Self::Hot]
    }

    pub fn from_value(temperature: f32) -> Self {
        if temperature < -0.5 {
            TemperatureCategory::Frozen
        } else if temperature < -0.1 {
            TemperatureCategory::Cold
        } else if temperature < 0.2 {
            TemperatureCategory::Cool
        } else if temperature < 0.5 {
            TemperatureCategory::Temperate
        } else if temperature < 0.8 {
            TemperatureCategory::Warm
        } else {
            TemperatureCategory::Hot
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureCategory::Frozen => "frozen",
            TemperatureCategory::Cold => "cold",
            TemperatureCategory::Cool => "cool",
            TemperatureCategory::Temperate => "temperate",
            TemperatureCategory::Warm => "warm",
            TemperatureCategory::Hot => "hot",
        }
    }
}
