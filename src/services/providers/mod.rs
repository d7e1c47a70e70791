/// Weather data provider abstraction
///
/// The engine only consumes normalized [`WeatherReading`]s. Providers sit in
/// front of it and are responsible for fetching, and for substituting a
/// fallback when the upstream source is unavailable.
use crate::{error::AppResult, models::WeatherReading};

pub mod fallback;
pub mod openweather;

pub use fallback::{FallbackWeatherProvider, StaticWeatherProvider};
pub use openweather::OpenWeatherProvider;

/// Trait for weather data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the current weather for a city
    async fn current(&self, city: &str) -> AppResult<WeatherReading>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
