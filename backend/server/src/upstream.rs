//! # Ahrefs
//!
//! The browser never sees the API key. It talks to this proxy, which attaches
//! `Authorization: Bearer <key>` and relays whatever Ahrefs answers, status and
//! body untouched.
//!
//! | Route                   | Upstream                                          |
//! |-------------------------|---------------------------------------------------|
//! | `/api/domain-metrics`   | `GET {base}/domain-rating?target=<domain>&date=…` |
//! | `/api/metrics-overview` | `GET {base}/metrics?target=<domain>&mode=subdomains` |
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, Request, header::ACCEPT};

use crate::{config::Config, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    DomainRating,
    MetricsOverview,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DomainRating => "domain-rating",
            Endpoint::MetricsOverview => "metrics",
        }
    }
}

/// Upstream answer, relayed as is.
#[derive(Debug, Clone)]
pub struct Relay {
    pub status: u16,
    pub body: Bytes,
}

#[async_trait]
pub trait MetricsApi: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, domain: &str) -> Result<Relay, AppError>;
}

pub struct Ahrefs {
    client: Client,
    api_key: String,
    base_url: String,
    rating_date: String,
}

impl Ahrefs {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            rating_date: config.rating_date.clone(),
        }
    }

    fn request(&self, endpoint: Endpoint, domain: &str) -> Result<Request, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let builder = match endpoint {
            Endpoint::DomainRating => self
                .client
                .get(url)
                .query(&[("target", domain), ("date", self.rating_date.as_str())]),
            Endpoint::MetricsOverview => self
                .client
                .get(url)
                .query(&[("target", domain), ("mode", "subdomains")]),
        };

        builder
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .build()
    }
}

#[async_trait]
impl MetricsApi for Ahrefs {
    async fn fetch(&self, endpoint: Endpoint, domain: &str) -> Result<Relay, AppError> {
        let request = self.request(endpoint, domain)?;
        let response = self.client.execute(request).await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(Relay { status, body })
    }
}
