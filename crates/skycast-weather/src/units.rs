//! Canonical-to-display unit conversion.
//!
//! Temperatures travel as °F and wind speeds as mph (the units requested
//! from the upstream source). The canonical value is rounded first and the
//! metric value is derived from the rounded number, so the two displayed
//! figures always agree with each other.

use serde::Serialize;

/// km per statute mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Paired display values, all rounded to whole numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvertedUnits {
    pub temp_c: i64,
    pub temp_f: i64,
    pub wind_kmh: i64,
    pub wind_mph: i64,
}

/// Convert a canonical temperature (°F) and wind speed (mph).
///
/// Input must be finite; missing readings are the caller's to handle (see
/// [`convert_temperature`] and [`convert_wind`]).
pub fn to_display(temp_f: f64, wind_mph: f64) -> ConvertedUnits {
    let (temp_c, temp_f) = convert_temperature(temp_f);
    let (wind_kmh, wind_mph) = convert_wind(wind_mph);
    ConvertedUnits {
        temp_c,
        temp_f,
        wind_kmh,
        wind_mph,
    }
}

/// Round to the nearest whole number, halves toward +∞ (`-4.5` → `-4`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// °F → `(°C, °F)`
pub fn convert_temperature(temp_f: f64) -> (i64, i64) {
    let rounded_f = round_half_up(temp_f);
    let celsius = round_half_up((rounded_f - 32.0) * 5.0 / 9.0);
    (celsius as i64, rounded_f as i64)
}

/// mph → `(km/h, mph)`
pub fn convert_wind(wind_mph: f64) -> (i64, i64) {
    let rounded_mph = round_half_up(wind_mph);
    let kmh = round_half_up(rounded_mph * KM_PER_MILE);
    (kmh as i64, rounded_mph as i64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_freezing_and_calm() {
        assert_eq!(
            to_display(32.0, 0.0),
            ConvertedUnits {
                temp_c: 0,
                temp_f: 32,
                wind_kmh: 0,
                wind_mph: 0
            }
        );
    }

    #[test]
    fn test_body_temperature_rounds_before_deriving() {
        let units = to_display(98.6, 10.0);
        assert_eq!(units.temp_f, 99);
        assert_eq!(units.temp_c, 37);
        assert_eq!(units.wind_mph, 10);
        assert_eq!(units.wind_kmh, 16);
    }

    #[test]
    fn test_celsius_follows_rounded_fahrenheit() {
        // 38.4°F → 38°F → 3.33 → 3, whereas unrounded it gives 3.56 → 4
        assert_eq!(convert_temperature(38.4), (3, 38));
    }

    #[test]
    fn test_wind_follows_rounded_mph() {
        // 9.4 mph → 9 mph → 14.48 → 14 km/h; unrounded 15.13 → 15
        assert_eq!(convert_wind(9.4), (14, 9));
    }

    #[test]
    fn test_below_zero() {
        assert_eq!(convert_temperature(-40.0), (-40, -40));
        assert_eq!(convert_temperature(0.0), (-18, 0));
    }

    #[test]
    fn test_negative_halves_round_up() {
        assert_eq!(convert_temperature(-4.5), (-20, -4));
        assert_eq!(convert_temperature(-0.5), (-18, 0));
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn test_positive_halves_round_up() {
        assert_eq!(convert_temperature(49.5), (10, 50));
        assert_eq!(round_half_up(2.5), 3.0);
        // 2 mph → 3.21868 km/h
        assert_eq!(convert_wind(1.5), (3, 2));
    }
}
