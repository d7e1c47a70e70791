use serde::{Deserialize, Serialize};

const TEMP_BOUNDS: (f64, f64) = (-60.0, 60.0);
const WIND_BOUNDS: (f64, f64) = (0.0, 75.0);
const RAIN_BOUNDS: (f64, f64) = (0.0, 300.0);

/// Where a weather reading came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Fetched from a live weather API
    Live,
    /// Substituted by the weather collaborator after a failed fetch
    Fallback,
    /// Provided directly by the caller
    Supplied,
}

/// Normalized weather observation consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub city: Option<String>,
    /// Temperature in °C
    pub temp: f64,
    /// Wind speed in m/s
    pub wind: f64,
    /// Rainfall over the last hour in mm
    pub rain: f64,
    pub description: String,
    pub source: WeatherSource,
}

/// Raw weather input, as supplied by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub wind: Option<f64>,
    #[serde(default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("weather reading is missing '{0}'")]
    MissingField(&'static str),

    #[error("weather reading has a non-finite '{0}'")]
    NonFinite(&'static str),
}

fn finite(field: &'static str, value: f64) -> Result<f64, WeatherError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WeatherError::NonFinite(field))
    }
}

fn clamp(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
}

impl WeatherReading {
    /// Builds a reading from raw numbers, clamping to plausible bounds
    pub fn new(
        temp: f64,
        wind: f64,
        rain: f64,
        description: impl Into<String>,
        source: WeatherSource,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            city: None,
            temp: clamp(finite("temp", temp)?, TEMP_BOUNDS),
            wind: clamp(finite("wind", wind)?, WIND_BOUNDS),
            rain: clamp(finite("rain", rain)?, RAIN_BOUNDS),
            description: description.into(),
            source,
        })
    }

    /// Validates a raw record
    ///
    /// Temperature is required. Missing wind or rain means calm and dry.
    pub fn normalize(record: WeatherRecord, source: WeatherSource) -> Result<Self, WeatherError> {
        let temp = record.temp.ok_or(WeatherError::MissingField("temp"))?;
        let mut reading = Self::new(
            temp,
            record.wind.unwrap_or(0.0),
            record.rain.unwrap_or(0.0),
            record.description.unwrap_or_default(),
            source,
        )?;
        reading.city = record.city;
        Ok(reading)
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}
