use crate::models::{RequirementScores, WeatherReading};

/// Wind speed (m/s) above which warmth requirement is bumped one step
const WIND_CHILL_THRESHOLD: f64 = 8.0;

/// Translates a weather reading into target garment attribute scores
///
/// Thresholds are deterministic:
/// - warmth: <5°C → 5, <15 → 4, <25 → 3, <32 → 2, else 1, plus one step
///   (capped at 5) when wind exceeds 8 m/s
/// - impermeability: rain ≥2.5 mm/h → 3, >0.5 → 2, else 1
/// - layering: 4 when warmth ≥3, else 3
pub fn compute_requirements(weather: &WeatherReading) -> RequirementScores {
    let mut warmth = if weather.temp < 5.0 {
        5
    } else if weather.temp < 15.0 {
        4
    } else if weather.temp < 25.0 {
        3
    } else if weather.temp < 32.0 {
        2
    } else {
        1
    };

    if weather.wind > WIND_CHILL_THRESHOLD {
        warmth = (warmth + 1).min(5);
    }

    let impermeability = if weather.rain >= 2.5 {
        3
    } else if weather.rain > 0.5 {
        2
    } else {
        1
    };

    let layering = if warmth >= 3 { 4 } else { 3 };

    RequirementScores {
        warmth,
        impermeability,
        layering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherSource;

    fn reading(temp: f64, wind: f64, rain: f64) -> WeatherReading {
        WeatherReading::new(temp, wind, rain, "test", WeatherSource::Supplied).unwrap()
    }

    #[test]
    fn test_freezing_is_maximum_warmth() {
        for temp in [-40.0, -5.0, 0.0, 4.99] {
            assert_eq!(compute_requirements(&reading(temp, 0.0, 0.0)).warmth, 5);
        }
    }

    #[test]
    fn test_warmth_bands_non_increasing() {
        let mut previous = u8::MAX;
        let mut temp = -20.0;
        while temp <= 45.0 {
            let warmth = compute_requirements(&reading(temp, 0.0, 0.0)).warmth;
            assert!(warmth <= previous, "warmth rose at {}°C", temp);
            previous = warmth;
            temp += 0.5;
        }
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(compute_requirements(&reading(5.0, 0.0, 0.0)).warmth, 4);
        assert_eq!(compute_requirements(&reading(15.0, 0.0, 0.0)).warmth, 3);
        assert_eq!(compute_requirements(&reading(25.0, 0.0, 0.0)).warmth, 2);
        assert_eq!(compute_requirements(&reading(32.0, 0.0, 0.0)).warmth, 1);
    }

    #[test]
    fn test_wind_chill_bump_is_capped() {
        assert_eq!(compute_requirements(&reading(20.0, 9.0, 0.0)).warmth, 4);
        assert_eq!(compute_requirements(&reading(20.0, 8.0, 0.0)).warmth, 3);
        assert_eq!(compute_requirements(&reading(-10.0, 20.0, 0.0)).warmth, 5);
    }

    #[test]
    fn test_impermeability_bands() {
        assert_eq!(compute_requirements(&reading(20.0, 0.0, 2.5)).impermeability, 3);
        assert_eq!(compute_requirements(&reading(20.0, 0.0, 2.49)).impermeability, 2);
        assert_eq!(compute_requirements(&reading(20.0, 0.0, 0.51)).impermeability, 2);
        assert_eq!(compute_requirements(&reading(20.0, 0.0, 0.5)).impermeability, 1);
        assert_eq!(compute_requirements(&reading(20.0, 0.0, 0.0)).impermeability, 1);
    }

    #[test]
    fn test_cold_calm_dry_day() {
        let required = compute_requirements(&reading(2.0, 2.0, 0.0));
        assert_eq!(
            required,
            RequirementScores {
                warmth: 5,
                impermeability: 1,
                layering: 4
            }
        );
    }

    #[test]
    fn test_hot_day_needs_less_layering() {
        let required = compute_requirements(&reading(28.0, 1.0, 0.0));
        assert_eq!(required.warmth, 2);
        assert_eq!(required.impermeability, 1);
        assert_eq!(required.layering, 3);
    }
}
