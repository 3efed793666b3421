use common::env::{EnvError, read_secret, try_load};

pub const API_KEY_SECRET: &str = "AHREFS_API_KEY";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub api_url: String,
    pub rating_date: String,
}

impl Config {
    pub fn load() -> Result<Self, EnvError> {
        Ok(Self {
            host: try_load("PROXY_HOST", "127.0.0.1")?,
            port: try_load("PROXY_PORT", "3001")?,
            api_key: read_secret(API_KEY_SECRET)?,
            api_url: try_load("AHREFS_API_URL", "https://api.ahrefs.com/v3/site-explorer")?,
            rating_date: try_load("AHREFS_RATING_DATE", "2024-01-01")?,
        })
    }
}
