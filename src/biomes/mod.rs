//! Biome classification.
//!
//! Maps (elevation, temperature, moisture) to one of sixteen Whittaker-style
//! categories. The thresholds are fixed constants: planets classified with
//! the same inputs must produce the same biome everywhere.

use serde::{Deserialize, Serialize};

/// Depth below sea level at which ocean becomes deep ocean.
pub const DEEP_OCEAN_DEPTH: f32 = 0.05;
/// Normalised land height below which land is beach.
pub const BEACH_LAND_HEIGHT: f32 = 0.02;
/// Normalised land height above which land is mountain.
pub const MOUNTAIN_LAND_HEIGHT: f32 = 0.7;
/// Temperature (°C) below which water and land freeze.
pub const FREEZING_TEMPERATURE: f32 = -10.0;

/// Biome classification. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    Ocean = 0,
    DeepOcean,
    Ice,
    Tundra,
    BorealForest,
    TemperateGrassland,
    TemperateForest,
    TemperateRainforest,
    Shrubland,
    Desert,
    Savanna,
    TropicalForest,
    TropicalRainforest,
    Wetland,
    Mountain,
    Beach,
}

impl Biome {
    pub const COUNT: usize = 16;

    pub const ALL: [Biome; Biome::COUNT] = [
        Biome::Ocean,
        Biome::DeepOcean,
        Biome::Ice,
        Biome::Tundra,
        Biome::BorealForest,
        Biome::TemperateGrassland,
        Biome::TemperateForest,
        Biome::TemperateRainforest,
        Biome::Shrubland,
        Biome::Desert,
        Biome::Savanna,
        Biome::TropicalForest,
        Biome::TropicalRainforest,
        Biome::Wetland,
        Biome::Mountain,
        Biome::Beach,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Biome> {
        Biome::ALL.get(value as usize).copied()
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::DeepOcean => "Deep Ocean",
            Biome::Ice => "Ice",
            Biome::Tundra => "Tundra",
            Biome::BorealForest => "Boreal Forest",
            Biome::TemperateGrassland => "Temperate Grassland",
            Biome::TemperateForest => "Temperate Forest",
            Biome::TemperateRainforest => "Temperate Rainforest",
            Biome::Shrubland => "Shrubland",
            Biome::Desert => "Desert",
            Biome::Savanna => "Savanna",
            Biome::TropicalForest => "Tropical Forest",
            Biome::TropicalRainforest => "Tropical Rainforest",
            Biome::Wetland => "Wetland",
            Biome::Mountain => "Mountain",
            Biome::Beach => "Beach",
        }
    }

    /// Fixed display color.
    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [28, 107, 160],
            Biome::DeepOcean => [15, 60, 110],
            Biome::Ice => [220, 235, 245],
            Biome::Tundra => [180, 200, 190],
            Biome::BorealForest => [40, 100, 60],
            Biome::TemperateGrassland => [140, 175, 80],
            Biome::TemperateForest => [50, 130, 50],
            Biome::TemperateRainforest => [30, 100, 80],
            Biome::Shrubland => [165, 155, 95],
            Biome::Desert => [210, 190, 140],
            Biome::Savanna => [185, 175, 95],
            Biome::TropicalForest => [35, 120, 45],
            Biome::TropicalRainforest => [20, 90, 35],
            Biome::Wetland => [80, 130, 110],
            Biome::Mountain => [140, 140, 145],
            Biome::Beach => [220, 210, 165],
        }
    }
}

/// Classifies one cell. First matching rule wins.
///
/// # Arguments
/// * `elevation` - Normalised elevation in [0, 1]
/// * `temperature` - Annual mean in °C
/// * `moisture` - Relative moisture in [0, 1]
/// * `sea_level` - Elevation separating water from land
pub fn classify(elevation: f32, temperature: f32, moisture: f32, sea_level: f32) -> Biome {
    if elevation < sea_level - DEEP_OCEAN_DEPTH {
        return Biome::DeepOcean;
    }
    if elevation < sea_level {
        // Shallow water freezes over; deep ocean does not.
        return if temperature < FREEZING_TEMPERATURE {
            Biome::Ice
        } else {
            Biome::Ocean
        };
    }

    let land_height = (elevation - sea_level) / (1.0 - sea_level);
    if land_height < BEACH_LAND_HEIGHT {
        return Biome::Beach;
    }
    if land_height > MOUNTAIN_LAND_HEIGHT {
        return Biome::Mountain;
    }
    if temperature < FREEZING_TEMPERATURE {
        return Biome::Ice;
    }

    match temperature {
        t if t < 0.0 => Biome::Tundra,
        t if t < 10.0 => {
            if moisture > 0.5 {
                Biome::BorealForest
            } else {
                Biome::Tundra
            }
        }
        t if t < 20.0 => match moisture {
            m if m > 0.7 => Biome::TemperateRainforest,
            m if m > 0.4 => Biome::TemperateForest,
            m if m > 0.2 => Biome::Shrubland,
            _ => Biome::TemperateGrassland,
        },
        t if t < 30.0 => match moisture {
            m if m > 0.65 => Biome::TropicalRainforest,
            m if m > 0.35 => Biome::TropicalForest,
            m if m > 0.15 => Biome::Savanna,
            _ => Biome::Desert,
        },
        _ => match moisture {
            m if m > 0.85 => Biome::Wetland,
            m if m > 0.6 => Biome::TropicalRainforest,
            m if m > 0.3 => Biome::Savanna,
            _ => Biome::Desert,
        },
    }
}
