use std::sync::Arc;

use outfit_api::{
    config::Config,
    db::WearHistory,
    routes::{create_router, AppState},
    services::{
        providers::{
            FallbackWeatherProvider, OpenWeatherProvider, StaticWeatherProvider, WeatherProvider,
        },
        GarmentCatalog,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outfit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            let (catalog, rejected) = GarmentCatalog::load(path)?;
            if !rejected.is_empty() {
                tracing::warn!(
                    path = %path,
                    rejected = rejected.len(),
                    "Some catalog rows were excluded"
                );
            }
            catalog
        }
        None => {
            tracing::warn!("CATALOG_PATH not set, starting with an empty catalog");
            GarmentCatalog::default()
        }
    };

    let history = WearHistory::open(&config.history_path);
    let weather = weather_provider(&config)?;

    tracing::info!(
        garments = catalog.len(),
        history_entries = history.len(),
        weather_provider = weather.name(),
        "Recommendation engine ready"
    );

    let state = Arc::new(AppState::new(catalog, history, weather));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn weather_provider(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let fallback: Arc<dyn WeatherProvider> = Arc::new(StaticWeatherProvider::default());

    match &config.openweather_api_key {
        Some(key) if !key.is_empty() => {
            let live = OpenWeatherProvider::new(key.clone(), config.openweather_api_url.clone())?;
            Ok(Arc::new(FallbackWeatherProvider::new(Arc::new(live), fallback)))
        }
        _ => {
            tracing::warn!("OPENWEATHER_API_KEY not set, using static weather");
            Ok(fallback)
        }
    }
}
