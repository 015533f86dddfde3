use std::env;

use anyhow::{Context, Result};

/// Connection settings for the external content store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub storage_bucket: String,
    pub port: u16,
}

impl AppConfig {
    /// Build the configuration from environment variables. The store URL and
    /// access key are required; everything else falls back to a default.
    pub fn from_env() -> Result<Self> {
        let url = env::var("SUPABASE_URL").context("SUPABASE_URL env var is missing")?;
        let service_key =
            env::var("SUPABASE_SERVICE_KEY").context("SUPABASE_SERVICE_KEY env var is missing")?;

        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "exhibit-images".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            store: StoreConfig {
                url: url.trim_end_matches('/').to_string(),
                service_key,
            },
            storage_bucket,
            port,
        })
    }
}
