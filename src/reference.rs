//! Static reference tables for crops, soils and seasons.
//!
//! Each categorical key is a fixed enum; the tables are `match` arms so
//! they are read-only by construction. Unknown names resolve to a default
//! profile rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Biology parameters for a crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProfile {
    /// Fraction 0–1; ×200 gives the target rainfall in mm.
    pub water_need: f64,
    /// °C
    pub temp_optimal: f64,
    /// Fraction 0–1
    pub soil_preference: f64,
}

/// Physical properties of a soil type, each 0–1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilProfile {
    pub fertility: f64,
    pub drainage: f64,
    pub nutrient_retention: f64,
}

impl SoilProfile {
    /// Weighted quality used by both the estimator and the ranker.
    pub fn quality(&self) -> f64 {
        self.fertility * 0.4 + self.drainage * 0.3 + self.nutrient_retention * 0.3
    }
}

/// Seasonal multipliers. Not bounded to 0–1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProfile {
    pub temp_factor: f64,
    pub rainfall_factor: f64,
    pub sunlight_factor: f64,
}

pub const DEFAULT_CROP_PROFILE: CropProfile = CropProfile {
    water_need: 0.75,
    temp_optimal: 25.0,
    soil_preference: 0.7,
};

pub const DEFAULT_SOIL_PROFILE: SoilProfile = SoilProfile {
    fertility: 0.7,
    drainage: 0.7,
    nutrient_retention: 0.7,
};

pub const DEFAULT_SEASON_PROFILE: SeasonProfile = SeasonProfile {
    temp_factor: 1.0,
    rainfall_factor: 1.0,
    sunlight_factor: 1.0,
};

// ---------------------------------------------------------------------------
// Crop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
    Sugarcane,
    Cotton,
    Soybeans,
    Potatoes,
    Tomatoes,
    Onions,
    Chillies,
}

impl Crop {
    /// All crops in table order. Ranking ties and feature encoding rely
    /// on this order.
    pub const ALL: &'static [Crop] = &[
        Crop::Rice,
        Crop::Wheat,
        Crop::Maize,
        Crop::Sugarcane,
        Crop::Cotton,
        Crop::Soybeans,
        Crop::Potatoes,
        Crop::Tomatoes,
        Crop::Onions,
        Crop::Chillies,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Rice => "Rice",
            Crop::Wheat => "Wheat",
            Crop::Maize => "Maize",
            Crop::Sugarcane => "Sugarcane",
            Crop::Cotton => "Cotton",
            Crop::Soybeans => "Soybeans",
            Crop::Potatoes => "Potatoes",
            Crop::Tomatoes => "Tomatoes",
            Crop::Onions => "Onions",
            Crop::Chillies => "Chillies",
        }
    }

    /// Exact, case-sensitive lookup by table name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn profile(&self) -> CropProfile {
        let (water_need, temp_optimal, soil_preference) = match self {
            Crop::Rice => (0.9, 25.0, 0.8),
            Crop::Wheat => (0.7, 20.0, 0.7),
            Crop::Maize => (0.8, 24.0, 0.9),
            Crop::Sugarcane => (0.85, 27.0, 0.75),
            Crop::Cotton => (0.6, 28.0, 0.6),
            Crop::Soybeans => (0.75, 26.0, 0.85),
            Crop::Potatoes => (0.8, 18.0, 0.7),
            Crop::Tomatoes => (0.7, 24.0, 0.8),
            Crop::Onions => (0.6, 22.0, 0.65),
            Crop::Chillies => (0.65, 25.0, 0.7),
        };
        CropProfile { water_need, temp_optimal, soil_preference }
    }

    /// Reference yield in kg per hectare under ideal conditions.
    pub fn base_yield(&self) -> f64 {
        match self {
            Crop::Rice => 4000.0,
            Crop::Wheat => 3500.0,
            Crop::Maize => 5000.0,
            Crop::Sugarcane => 70000.0,
            Crop::Cotton => 500.0,
            Crop::Soybeans => 2500.0,
            Crop::Potatoes => 25000.0,
            Crop::Tomatoes => 40000.0,
            Crop::Onions => 20000.0,
            Crop::Chillies => 15000.0,
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Crop profile by name, or the default profile.
pub fn crop_profile(name: &str) -> CropProfile {
    Crop::from_name(name)
        .map(|c| c.profile())
        .unwrap_or(DEFAULT_CROP_PROFILE)
}

/// Base yield by name, or the mean over the table.
pub fn base_yield(name: &str) -> f64 {
    match Crop::from_name(name) {
        Some(crop) => crop.base_yield(),
        None => {
            let total: f64 = Crop::ALL.iter().map(|c| c.base_yield()).sum();
            total / Crop::ALL.len() as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Soil
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Loamy,
    Clay,
    Sandy,
    Silt,
    Black,
    Red,
}

impl SoilType {
    pub const ALL: &'static [SoilType] = &[
        SoilType::Loamy,
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Silt,
        SoilType::Black,
        SoilType::Red,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub fn profile(&self) -> SoilProfile {
        let (fertility, drainage, nutrient_retention) = match self {
            SoilType::Loamy => (0.9, 0.9, 0.85),
            SoilType::Clay => (0.7, 0.5, 0.9),
            SoilType::Sandy => (0.5, 0.9, 0.4),
            SoilType::Silt => (0.8, 0.7, 0.7),
            SoilType::Black => (0.9, 0.6, 0.9),
            SoilType::Red => (0.6, 0.7, 0.6),
        };
        SoilProfile { fertility, drainage, nutrient_retention }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn soil_profile(name: &str) -> SoilProfile {
    SoilType::from_name(name)
        .map(|s| s.profile())
        .unwrap_or(DEFAULT_SOIL_PROFILE)
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Rabi,
    Kharif,
    Zaid,
}

impl Season {
    pub const ALL: &'static [Season] = &[Season::Rabi, Season::Kharif, Season::Zaid];

    pub fn name(&self) -> &'static str {
        match self {
            Season::Rabi => "Rabi",
            Season::Kharif => "Kharif",
            Season::Zaid => "Zaid",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub fn profile(&self) -> SeasonProfile {
        let (temp_factor, rainfall_factor, sunlight_factor) = match self {
            Season::Rabi => (0.8, 0.7, 0.9),
            Season::Kharif => (1.0, 1.0, 0.8),
            Season::Zaid => (1.2, 0.5, 1.1),
        };
        SeasonProfile { temp_factor, rainfall_factor, sunlight_factor }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn season_profile(name: &str) -> SeasonProfile {
    Season::from_name(name)
        .map(|s| s.profile())
        .unwrap_or(DEFAULT_SEASON_PROFILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
