use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from OpenWeatherMap condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i32) -> Self {
        match code {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            500 | 501 | 520 | 521 => Self::Rain,
            502..=504 | 522 | 531 => Self::HeavyRain,
            511 => Self::Sleet, // Freezing rain
            611..=616 => Self::Sleet,
            600..=602 | 620..=622 => Self::Snow,
            701..=781 => Self::Fog, // Mist, haze, dust, ...
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// One entry of the upstream `weather` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionEntry {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Upstream `main` block. Temperature is in °F (imperial units are requested).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

/// Upstream `wind` block. Speed is in mph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindReadings {
    pub speed: Option<f64>,
}

/// Current-weather payload as relayed by the backend in `weather_data`.
///
/// Every field is optional: stored records may hold partial or foreign data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: Option<String>,
    pub main: Option<MainReadings>,
    pub wind: Option<WindReadings>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    /// Seconds east of UTC for the queried location
    pub timezone: Option<i32>,
}

impl CurrentWeather {
    pub fn condition(&self) -> Option<&ConditionEntry> {
        self.weather.first()
    }

    pub fn temperature_f(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    pub fn humidity(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.humidity)
    }

    pub fn wind_mph(&self) -> Option<f64> {
        self.wind.as_ref().and_then(|w| w.speed)
    }
}

/// One 3-hourly point of the upstream forecast `list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Option<MainReadings>,
    pub wind: Option<WindReadings>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: Option<String>,
    /// Seconds east of UTC
    pub timezone: Option<i32>,
}

/// Forecast payload as relayed by the backend in `forecast_data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    pub city: Option<ForecastCity>,
}

impl ForecastPayload {
    /// Convert the raw list into samples, dropping entries without a
    /// temperature or condition.
    pub fn samples(&self) -> Vec<ForecastSample> {
        self.list
            .iter()
            .filter_map(|entry| {
                let sample = ForecastSample::from_entry(entry);
                if sample.is_none() {
                    tracing::debug!("Skipping incomplete forecast entry at dt={}", entry.dt);
                }
                sample
            })
            .collect()
    }

    /// The fixed offset day boundaries are computed in: the city's own offset
    /// when the payload carries one, UTC otherwise.
    pub fn time_reference(&self) -> FixedOffset {
        self.city
            .as_ref()
            .and_then(|c| c.timezone)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc_offset)
    }
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// One time-stamped forecast observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp_seconds: i64,
    /// °F
    pub temperature: f64,
    /// mph
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
    pub weather_code: i32,
    pub description: String,
    pub icon: String,
}

impl ForecastSample {
    pub fn from_entry(entry: &ForecastEntry) -> Option<Self> {
        let main = entry.main.as_ref()?;
        let condition = entry.weather.first()?;
        Some(Self {
            timestamp_seconds: entry.dt,
            temperature: main.temp?,
            wind_speed: entry.wind.as_ref().and_then(|w| w.speed),
            humidity: main.humidity,
            weather_code: condition.id,
            description: condition.description.clone(),
            icon: condition.icon.clone(),
        })
    }

    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_owm_code(self.weather_code)
    }
}
