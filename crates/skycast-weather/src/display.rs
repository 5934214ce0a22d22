//! Display values derived on read from fetched data.
//!
//! Nothing here is cached: callers keep the immutable payloads and derive a
//! [`DisplayWeather`] whenever they render.

use serde::Serialize;

use crate::types::{CurrentWeather, ForecastSample, WeatherCondition};
use crate::units::{convert_temperature, convert_wind, round_half_up};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Icon URL for an upstream icon code such as `"10d"`; `None` for an empty code.
pub fn icon_url(icon: &str) -> Option<String> {
    if icon.trim().is_empty() {
        None
    } else {
        Some(format!("{}/{}@2x.png", ICON_BASE_URL, icon.trim()))
    }
}

/// Everything needed to render one reading. Absent readings stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayWeather {
    pub description: String,
    pub icon_url: Option<String>,
    pub temp_c: Option<i64>,
    pub temp_f: Option<i64>,
    pub humidity_pct: Option<i64>,
    pub wind_kmh: Option<i64>,
    pub wind_mph: Option<i64>,
}

impl DisplayWeather {
    pub fn from_current(current: &CurrentWeather) -> Self {
        let condition = current.condition();
        Self::build(
            condition.map(|c| c.description.as_str()).unwrap_or_default(),
            condition.map(|c| c.id),
            condition.map(|c| c.icon.as_str()).unwrap_or_default(),
            current.temperature_f(),
            current.humidity(),
            current.wind_mph(),
        )
    }

    pub fn from_sample(sample: &ForecastSample) -> Self {
        Self::build(
            &sample.description,
            Some(sample.weather_code),
            &sample.icon,
            Some(sample.temperature),
            sample.humidity,
            sample.wind_speed,
        )
    }

    fn build(
        description: &str,
        code: Option<i32>,
        icon: &str,
        temp_f: Option<f64>,
        humidity: Option<f64>,
        wind_mph: Option<f64>,
    ) -> Self {
        let temperature = temp_f.filter(|t| t.is_finite()).map(convert_temperature);
        let wind = wind_mph.filter(|w| w.is_finite()).map(convert_wind);
        let condition = code
            .map(WeatherCondition::from_owm_code)
            .unwrap_or_default();

        let description = if description.is_empty() && code.is_some() {
            condition.description().to_string()
        } else {
            description.to_string()
        };

        Self {
            description,
            icon_url: icon_url(icon),
            temp_c: temperature.map(|(c, _)| c),
            temp_f: temperature.map(|(_, f)| f),
            humidity_pct: humidity.filter(|h| h.is_finite()).map(|h| round_half_up(h) as i64),
            wind_kmh: wind.map(|(kmh, _)| kmh),
            wind_mph: wind.map(|(_, mph)| mph),
        }
    }
}
