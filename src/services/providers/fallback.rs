use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{WeatherReading, WeatherSource},
    services::providers::WeatherProvider,
};

/// Provider that always answers with a fixed mild reading
///
/// Used when no API key is configured, and as the substitute behind
/// [`FallbackWeatherProvider`].
#[derive(Debug, Clone)]
pub struct StaticWeatherProvider {
    temp: f64,
    wind: f64,
    rain: f64,
    description: String,
}

impl Default for StaticWeatherProvider {
    fn default() -> Self {
        Self {
            temp: 15.0,
            wind: 3.5,
            rain: 0.0,
            description: "partly cloudy".to_string(),
        }
    }
}

impl StaticWeatherProvider {
    pub fn new(temp: f64, wind: f64, rain: f64, description: impl Into<String>) -> Self {
        Self {
            temp,
            wind,
            rain,
            description: description.into(),
        }
    }
}

#[async_trait::async_trait]
impl WeatherProvider for StaticWeatherProvider {
    async fn current(&self, city: &str) -> AppResult<WeatherReading> {
        let reading = WeatherReading::new(
            self.temp,
            self.wind,
            self.rain,
            self.description.clone(),
            WeatherSource::Fallback,
        )?;
        Ok(reading.with_city(city))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Tries a primary provider and substitutes the fallback's reading on failure
pub struct FallbackWeatherProvider {
    primary: Arc<dyn WeatherProvider>,
    fallback: Arc<dyn WeatherProvider>,
}

impl FallbackWeatherProvider {
    pub fn new(primary: Arc<dyn WeatherProvider>, fallback: Arc<dyn WeatherProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait::async_trait]
impl WeatherProvider for FallbackWeatherProvider {
    async fn current(&self, city: &str) -> AppResult<WeatherReading> {
        match self.primary.current(city).await {
            Ok(reading) => Ok(reading),
            Err(e) => {
                tracing::warn!(
                    provider = self.primary.name(),
                    fallback = self.fallback.name(),
                    city = %city,
                    error = %e,
                    "Weather fetch failed, using fallback"
                );
                let mut reading = self.fallback.current(city).await?;
                reading.source = WeatherSource::Fallback;
                Ok(reading)
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::providers::MockWeatherProvider};

    fn live_reading(city: &str) -> WeatherReading {
        WeatherReading::new(31.0, 2.0, 0.0, "sunny", WeatherSource::Live)
            .unwrap()
            .with_city(city)
    }

    #[tokio::test]
    async fn test_static_provider_reading() {
        let provider = StaticWeatherProvider::default();
        let reading = provider.current("London").await.unwrap();

        assert_eq!(reading.temp, 15.0);
        assert_eq!(reading.wind, 3.5);
        assert_eq!(reading.rain, 0.0);
        assert_eq!(reading.city.as_deref(), Some("London"));
        assert_eq!(reading.source, WeatherSource::Fallback);
    }

    #[tokio::test]
    async fn test_primary_reading_passes_through() {
        let mut primary = MockWeatherProvider::new();
        primary
            .expect_current()
            .times(1)
            .returning(|city| Ok(live_reading(city)));

        let provider = FallbackWeatherProvider::new(
            Arc::new(primary),
            Arc::new(StaticWeatherProvider::default()),
        );
        let reading = provider.current("Madrid").await.unwrap();

        assert_eq!(reading.temp, 31.0);
        assert_eq!(reading.source, WeatherSource::Live);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback() {
        let mut primary = MockWeatherProvider::new();
        primary
            .expect_current()
            .times(1)
            .returning(|_| Err(AppError::WeatherUnavailable("timeout".to_string())));
        primary.expect_name().return_const("mock");

        let provider = FallbackWeatherProvider::new(
            Arc::new(primary),
            Arc::new(StaticWeatherProvider::new(-3.0, 10.0, 4.0, "sleet")),
        );
        let reading = provider.current("Oslo").await.unwrap();

        assert_eq!(reading.temp, -3.0);
        assert_eq!(reading.description, "sleet");
        assert_eq!(reading.city.as_deref(), Some("Oslo"));
        assert_eq!(reading.source, WeatherSource::Fallback);
    }
}
