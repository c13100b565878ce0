//! Heuristic yield estimator.
//!
//! Closed-form yield from crop, soil and season reference tables plus the
//! resolved weather. Used whenever no trained regressor is loaded. The
//! only non-determinism is a final ±5% jitter drawn from the supplied RNG.

use rand::Rng;

use crate::reference::{base_yield, crop_profile, season_profile, soil_profile};
use crate::types::{WeatherReading, YieldError};

pub const ACRES_PER_HECTARE: f64 = 2.47105;

/// Rainfall (mm) represented by a water need of 1.0.
pub const WATER_NEED_SCALE_MM: f64 = 200.0;

/// The multipliers behind one estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldFactors {
    /// kg/ha
    pub base_yield: f64,
    /// 0.5–1.0
    pub temp_effect: f64,
    /// 0.5–1.0
    pub water_effect: f64,
    /// 0.6–1.0
    pub soil_suitability: f64,
    pub season_effect: f64,
    pub land_hectares: f64,
}

impl YieldFactors {
    pub fn compute(
        crop: &str,
        season: &str,
        soil_type: &str,
        area_acres: f64,
        weather: &WeatherReading,
    ) -> Self {
        let crop_p = crop_profile(crop);
        let soil_p = soil_profile(soil_type);
        let season_p = season_profile(season);

        let temp_diff = (weather.temperature() - crop_p.temp_optimal).abs();
        let temp_effect = (1.0 - temp_diff / 30.0).max(0.5);

        let water_need_mm = crop_p.water_need * WATER_NEED_SCALE_MM;
        let rainfall_diff = (weather.rainfall() - water_need_mm).abs();
        let water_effect = (1.0 - rainfall_diff / 200.0).max(0.5);

        let soil_suitability = 0.6 + 0.4 * soil_p.quality();

        let season_effect = season_p.temp_factor * 0.4
            + season_p.rainfall_factor * 0.4
            + season_p.sunlight_factor * 0.2;

        Self {
            base_yield: base_yield(crop),
            temp_effect,
            water_effect,
            soil_suitability,
            season_effect,
            land_hectares: area_acres / ACRES_PER_HECTARE,
        }
    }

    /// Yield in kg before jitter, rounded half-to-even.
    pub fn total(&self) -> Result<i64, YieldError> {
        let per_hectare = self.base_yield
            * self.temp_effect
            * self.water_effect
            * self.soil_suitability
            * self.season_effect;
        to_kg(per_hectare * self.land_hectares)
    }
}

/// Deterministic estimate, before jitter.
pub fn baseline_yield(
    crop: &str,
    season: &str,
    soil_type: &str,
    area_acres: f64,
    weather: &WeatherReading,
) -> Result<i64, YieldError> {
    YieldFactors::compute(crop, season, soil_type, area_acres, weather).total()
}

/// Estimated yield in kg with a uniform jitter in [0.95, 1.05).
pub fn estimate<R: Rng + ?Sized>(
    crop: &str,
    season: &str,
    soil_type: &str,
    area_acres: f64,
    weather: &WeatherReading,
    rng: &mut R,
) -> Result<i64, YieldError> {
    let raw = baseline_yield(crop, season, soil_type, area_acres, weather)?;
    let variation = 0.95 + rng.gen::<f64>() * 0.1;
    to_kg(raw as f64 * variation)
}

/// Rounds half-to-even into whole kg. A yield outside the i64 range comes
/// from an absurd land area and is rejected rather than saturated.
fn to_kg(kg: f64) -> Result<i64, YieldError> {
    let rounded = kg.round_ties_even();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(YieldError::Validation(
            "Field 'area_of_land' is too large to estimate a yield".to_string(),
        ));
    }
    Ok(rounded as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Crop, Season, SoilType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rice_weather() -> WeatherReading {
        WeatherReading::sample(25.0, 70.0, 180.0)
    }

    #[test]
    fn test_rice_kharif_loamy_factors() {
        let f = YieldFactors::compute("Rice", "Kharif", "Loamy", 5.0, &rice_weather());
        assert_eq!(f.base_yield, 4000.0);
        assert!((f.temp_effect - 1.0).abs() < 1e-12);
        assert!((f.water_effect - 1.0).abs() < 1e-12);
        assert!((f.soil_suitability - 0.954).abs() < 1e-9);
        assert!((f.season_effect - 0.96).abs() < 1e-9);
        assert!((f.land_hectares - 2.023431).abs() < 1e-6);
    }

    #[test]
    fn test_rice_kharif_loamy_baseline() {
        assert_eq!(baseline_yield("Rice", "Kharif", "Loamy", 5.0, &rice_weather()).unwrap(), 7413);
    }

    #[test]
    fn test_effects_clamp_at_half() {
        let hot_and_dry = WeatherReading::sample(60.0, 10.0, 10.0);
        let f = YieldFactors::compute("Potatoes", "Rabi", "Clay", 1.0, &hot_and_dry);
        assert_eq!(f.temp_effect, 0.5);
        assert_eq!(f.water_effect, 0.5);
    }

    #[test]
    fn test_unknown_inputs_use_defaults() {
        let f = YieldFactors::compute("Quinoa", "Monsoon", "Peat", 2.47105, &rice_weather());
        assert!((f.base_yield - 18550.0).abs() < 1e-9);
        assert!((f.soil_suitability - 0.88).abs() < 1e-9);
        assert!((f.season_effect - 1.0).abs() < 1e-9);
        assert!((f.land_hectares - 1.0).abs() < 1e-12);
        // Default crop: optimum 25°C, water need 150mm
        assert!((f.temp_effect - 1.0).abs() < 1e-12);
        assert!((f.water_effect - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_within_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let raw = baseline_yield("Rice", "Kharif", "Loamy", 5.0, &rice_weather()).unwrap() as f64;
        for _ in 0..1000 {
            let v = estimate("Rice", "Kharif", "Loamy", 5.0, &rice_weather(), &mut rng).unwrap() as f64;
            assert!(v >= (raw * 0.95).floor() && v <= (raw * 1.05).ceil(), "{v} outside jitter");
        }
    }

    #[test]
    fn test_estimate_varies_between_calls() {
        let mut rng = StdRng::seed_from_u64(1);
        let values: Vec<i64> = (0..20)
            .map(|_| estimate("Sugarcane", "Zaid", "Black", 40.0, &rice_weather(), &mut rng).unwrap())
            .collect();
        assert!(values.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_optimal_weather_within_sanity_bounds() {
        for crop in Crop::ALL {
            let p = crop.profile();
            let weather = WeatherReading::sample(p.temp_optimal, 60.0, p.water_need * 200.0);
            for season in Season::ALL {
                for soil in SoilType::ALL {
                    let raw = baseline_yield(crop.name(), season.name(), soil.name(), 10.0, &weather).unwrap();
                    let naive = crop.base_yield() * 10.0 / ACRES_PER_HECTARE;
                    assert!(raw as f64 >= 0.25 * naive, "{crop}/{season}/{soil} too low");
                    assert!(raw as f64 <= 4.0 * naive, "{crop}/{season}/{soil} too high");
                }
            }
        }
    }

    #[test]
    fn test_any_weather_respects_effect_floors() {
        // 0.5 × 0.5 × 0.6 × 0.78 (lowest season effect, Rabi)
        let floor = 0.5 * 0.5 * 0.6 * 0.78;
        for crop in Crop::ALL {
            for temp in [-10.0, 20.0, 35.0, 50.0] {
                for rain in [0.0, 50.0, 200.0, 600.0] {
                    let weather = WeatherReading::sample(temp, 50.0, rain);
                    let raw = baseline_yield(crop.name(), "Rabi", "Sandy", 10.0, &weather).unwrap();
                    let naive = crop.base_yield() * 10.0 / ACRES_PER_HECTARE;
                    assert!(raw as f64 >= floor * naive - 1.0);
                    assert!(raw as f64 <= 4.0 * naive);
                }
            }
        }
    }

    #[test]
    fn test_zero_area_yields_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(estimate("Wheat", "Rabi", "Silt", 0.0, &rice_weather(), &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_oversized_area_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = estimate("Sugarcane", "Zaid", "Black", 1e300, &rice_weather(), &mut rng)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(baseline_yield("Rice", "Kharif", "Loamy", 1e18, &rice_weather()).is_err());
        assert!(baseline_yield("Rice", "Kharif", "Loamy", 1e9, &rice_weather()).is_ok());
    }
}
