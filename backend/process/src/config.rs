use std::time::Duration;

use common::env::{EnvError, read_secret, require, try_load};

use crate::models::ENDPOINT;

pub struct Config {
    pub account_id: String,
    pub analytics_token: String,
    pub graphql_url: String,
    pub store: StoreConfig,
    pub port: u16,
    pub interval: Duration,
}

#[derive(Clone)]
pub struct StoreConfig {
    pub api_url: String,
    pub token: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
}

impl Config {
    pub fn load() -> Result<Self, EnvError> {
        Ok(Self {
            account_id: require("CF_ACCOUNT_ID")?,
            analytics_token: read_secret("CF_API_TOKEN")?,
            graphql_url: try_load("CF_GRAPHQL_URL", ENDPOINT)?,
            store: StoreConfig {
                api_url: try_load("GITHUB_API_URL", "https://api.github.com")?,
                token: read_secret("GITHUB_TOKEN")?,
                repo: try_load("STATS_REPO", "essentials-com/essentials.com")?,
                path: try_load("STATS_PATH", "stats.json")?,
                branch: try_load("STATS_BRANCH", "stats")?,
            },
            port: try_load("STATS_PORT", "8787")?,
            interval: interval(try_load("STATS_INTERVAL_HOURS", "24")?)?,
        })
    }
}

/// Schedule period, between one hour and a week.
pub const MAX_INTERVAL_HOURS: u64 = 7 * 24;

pub fn interval(hours: u64) -> Result<Duration, EnvError> {
    if !(1..=MAX_INTERVAL_HOURS).contains(&hours) {
        return Err(EnvError::Invalid {
            key: "STATS_INTERVAL_HOURS".to_string(),
            reason: format!("must be between 1 and {MAX_INTERVAL_HOURS}, got {hours}"),
        });
    }

    Ok(Duration::from_secs(hours * 60 * 60))
}
