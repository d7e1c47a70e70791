/// OpenWeatherMap current-weather provider
///
/// Calls `/weather?q={city}&units=metric` and maps the response onto a
/// [`WeatherReading`]. Rain is the last hour's accumulation, absent when dry.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{WeatherReading, WeatherSource},
    services::providers::WeatherProvider,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ApiWeatherResponse {
    main: ApiMain,
    #[serde(default)]
    wind: Option<ApiWind>,
    #[serde(default)]
    rain: Option<ApiRain>,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    description: String,
}

impl ApiWeatherResponse {
    fn into_reading(self, city: &str) -> AppResult<WeatherReading> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_default();

        let reading = WeatherReading::new(
            self.main.temp,
            self.wind.map_or(0.0, |w| w.speed),
            self.rain.map_or(0.0, |r| r.one_hour),
            description,
            WeatherSource::Live,
        )?;

        Ok(reading.with_city(self.name.unwrap_or_else(|| city.to_string())))
    }
}

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[tracing::instrument(skip(self))]
    async fn current(&self, city: &str) -> AppResult<WeatherReading> {
        let url = format!("{}/weather", self.api_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, city = %city, "Weather API request failed");
            return Err(AppError::WeatherUnavailable(format!(
                "weather API returned {} for '{}'",
                status, city
            )));
        }

        let body: ApiWeatherResponse = response.json().await?;
        let reading = body.into_reading(city)?;

        tracing::debug!(
            city = %city,
            temp = reading.temp,
            wind = reading.wind,
            rain = reading.rain,
            "Fetched live weather"
        );

        Ok(reading)
    }

    fn name(&self) -> &'static str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_mapping_with_rain() {
        let json = r#"{
            "weather": [{"main": "Rain", "description": "light rain"}],
            "main": {"temp": 9.4, "feels_like": 7.0, "humidity": 81},
            "wind": {"speed": 9.2},
            "rain": {"1h": 1.3},
            "name": "Seoul"
        }"#;
        let response: ApiWeatherResponse = serde_json::from_str(json).unwrap();
        let reading = response.into_reading("seoul").unwrap();

        assert_eq!(reading.city.as_deref(), Some("Seoul"));
        assert_eq!(reading.temp, 9.4);
        assert_eq!(reading.wind, 9.2);
        assert_eq!(reading.rain, 1.3);
        assert_eq!(reading.description, "light rain");
        assert_eq!(reading.source, WeatherSource::Live);
    }

    #[test]
    fn test_response_mapping_dry_day() {
        let json = r#"{
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 27.0},
            "wind": {"speed": 1.0}
        }"#;
        let response: ApiWeatherResponse = serde_json::from_str(json).unwrap();
        let reading = response.into_reading("Lisbon").unwrap();

        assert_eq!(reading.rain, 0.0);
        assert_eq!(reading.city.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn test_response_without_main_is_rejected() {
        let json = r#"{"cod": "404", "message": "city not found"}"#;
        assert!(serde_json::from_str::<ApiWeatherResponse>(json).is_err());
    }
}
