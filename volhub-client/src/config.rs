//! Client configuration

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the backend API, including the `/api` prefix
    pub api_base_url: String,

    /// Path to the durable session database; `None` keeps sessions in
    /// memory only (hosts without durable storage)
    pub storage_path: Option<PathBuf>,

    /// Session time-to-live enforced at read time
    pub session_ttl_hours: i64,
}

impl Config {
    /// Read configuration from the environment, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(url) = std::env::var("VOLHUB_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(path) = std::env::var("VOLHUB_STORAGE_PATH") {
            config.storage_path = Some(PathBuf::from(path));
        }
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            storage_path: None,
            session_ttl_hours: 24,
        }
    }
}
