//! # Cloudflare Web Analytics
//!
//! Daily unique visits per site come from the GraphQL
//! `rumPageloadEventsAdaptiveGroups` dataset, which only holds RUM beacon
//! page loads and so excludes bot traffic.
//!
//! Site tag, account tag and start date are bound as GraphQL variables, never
//! spliced into the query text.
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::QueryError,
    models::{DailyVisits, Response},
    utils::build_payload,
};

pub struct VisitQuery<'a> {
    pub account_id: &'a str,
    pub site_tag: &'a str,
    pub after: NaiveDate,
    pub limit: u32,
}

#[async_trait]
pub trait Analytics: Send + Sync {
    /// Rows ascending by date, at most `query.limit` of them.
    async fn daily_visits(&self, query: &VisitQuery<'_>) -> Result<Vec<DailyVisits>, QueryError>;
}

pub struct Cloudflare {
    client: Client,
    endpoint: String,
    token: String,
}

impl Cloudflare {
    pub fn new(client: Client, endpoint: &str, token: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl Analytics for Cloudflare {
    async fn daily_visits(&self, query: &VisitQuery<'_>) -> Result<Vec<DailyVisits>, QueryError> {
        let payload = build_payload(query);

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        debug!("Analytics status for {}: {}", query.site_tag, res.status());

        let json: Response = res.json().await?;

        json.into_daily_visits()
    }
}
