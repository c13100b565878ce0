//! Crop suitability ranking.
//!
//! Scores every crop in the reference table against the soil, season and
//! weather, and returns the best three. Deterministic; ties keep table order.

use std::cmp::Ordering;

use crate::reference::{season_profile, soil_profile, Crop, SeasonProfile, SoilProfile};
use crate::types::WeatherReading;

use super::estimator::WATER_NEED_SCALE_MM;

/// Number of crops returned by [`rank`].
pub const TOP_N: usize = 3;

/// Composite suitability of one crop.
pub fn suitability(
    crop: Crop,
    soil: &SoilProfile,
    season: &SeasonProfile,
    weather: &WeatherReading,
) -> f64 {
    let p = crop.profile();

    let temp_score = (1.0 - (weather.temperature() - p.temp_optimal).abs() / 20.0).max(0.0);

    let water_need_mm = p.water_need * WATER_NEED_SCALE_MM;
    let water_score = (1.0 - (weather.rainfall() - water_need_mm).abs() / 150.0).max(0.0);

    let soil_compat = p.soil_preference * soil.quality();

    let season_compat = season.temp_factor * (1.0 - (p.temp_optimal - 25.0).abs() / 10.0) * 0.4
        + season.rainfall_factor * p.water_need * 0.4
        + season.sunlight_factor * 0.2;

    temp_score * 0.3 + water_score * 0.3 + soil_compat * 0.2 + season_compat * 0.2
}

/// All crops with their scores, best first.
pub fn score_all(soil_type: &str, season: &str, weather: &WeatherReading) -> Vec<(Crop, f64)> {
    let soil = soil_profile(soil_type);
    let season = season_profile(season);

    let mut scored: Vec<(Crop, f64)> = Crop::ALL
        .iter()
        .map(|&crop| (crop, suitability(crop, &soil, &season, weather)))
        .collect();

    // sort_by is stable, so equal scores keep table order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

/// Top three crops for the conditions.
pub fn rank(soil_type: &str, season: &str, weather: &WeatherReading) -> Vec<Crop> {
    score_all(soil_type, season, weather)
        .into_iter()
        .take(TOP_N)
        .map(|(crop, _)| crop)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Season, SoilType};

    #[test]
    fn test_rank_rice_conditions() {
        let weather = WeatherReading::sample(25.0, 70.0, 180.0);
        assert_eq!(
            rank("Loamy", "Kharif", &weather),
            vec![Crop::Rice, Crop::Maize, Crop::Sugarcane]
        );
    }

    #[test]
    fn test_rank_cool_clay_rabi() {
        let weather = WeatherReading::sample(18.0, 60.0, 100.0);
        assert_eq!(
            rank("Clay", "Rabi", &weather),
            vec![Crop::Onions, Crop::Wheat, Crop::Potatoes]
        );
    }

    #[test]
    fn test_rice_score_value() {
        let weather = WeatherReading::sample(25.0, 70.0, 180.0);
        let scores = score_all("Loamy", "Kharif", &weather);
        assert_eq!(scores[0].0, Crop::Rice);
        assert!((scores[0].1 - 0.9256).abs() < 1e-9);
        assert_eq!(scores.len(), Crop::ALL.len());
    }

    #[test]
    fn test_scores_sorted_descending() {
        let weather = WeatherReading::sample(31.0, 50.0, 75.0);
        let scores = score_all("Sandy", "Zaid", &weather);
        assert!(scores.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_rank_always_three_distinct_known_crops() {
        for soil in SoilType::ALL.iter().map(|s| s.name()).chain(["Peat"]) {
            for season in Season::ALL.iter().map(|s| s.name()).chain(["Winter"]) {
                for (t, r) in [(5.0, 10.0), (22.0, 120.0), (40.0, 400.0)] {
                    let ranked = rank(soil, season, &WeatherReading::sample(t, 50.0, r));
                    assert_eq!(ranked.len(), TOP_N);
                    assert_ne!(ranked[0], ranked[1]);
                    assert_ne!(ranked[1], ranked[2]);
                    assert_ne!(ranked[0], ranked[2]);
                }
            }
        }
    }
}
