use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON file with the garment catalog; starts empty when unset
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// JSON file the wear history is persisted to
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// OpenWeatherMap API key; without it a static reading is used
    #[serde(default)]
    pub openweather_api_key: Option<String>,

    /// OpenWeatherMap API base URL
    #[serde(default = "default_openweather_api_url")]
    pub openweather_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_history_path() -> String {
    "data/wardrobe_history.json".to_string()
}

fn default_openweather_api_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
