//! Configuration module

use std::env;
use std::net::IpAddr;

use habit_recommender_core::DEFAULT_TOP_N;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Path to the model manifest (JSON)
    pub model_manifest: String,

    /// Number of recommendations per response
    pub top_n: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: get("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| IpAddr::from([0, 0, 0, 0])),

            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),

            model_manifest: get("MODEL_MANIFEST")
                .unwrap_or_else(|| "models/recommendation_model.json".to_string()),

            top_n: get("TOP_N")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_TOP_N),

            environment: get("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
