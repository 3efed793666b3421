//! # Stats
//!
//! Daily visit counts for every `essentials.*` domain over a sliding 30-day
//! window, committed as `stats.json` on the `stats` branch so the static site
//! can chart it.
//!
//! ## Pipeline
//!
//! 1. [`window`]: the 30 UTC calendar days ending today.
//! 2. [`aggregate`]: one Cloudflare Web Analytics query per site, sequentially.
//!    A site that fails is reported and skipped; it never aborts the batch.
//! 3. [`store`]: read the current file `sha`, then upsert the new document.
//!    A failed write fails the run.
//!
//! ## Document
//!
//! ```json
//! [
//!   {
//!     "date": "2024-04-21",
//!     "domains": {
//!       "essentials.com": 12,
//!       "essentials.net": 7
//!     }
//!   }
//! ]
//! ```
//!
//! Always exactly 30 entries. A domain missing from a day had no data that
//! day (or its query failed), which is different from zero visits.
//!
//! ## Known gap
//!
//! Two runs racing each other both read the same `sha`; GitHub accepts the
//! first write and rejects the second. Nothing retries the loser.
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{error, info, warn};

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod trigger;
pub mod utils;
pub mod window;

#[cfg(test)]
pub mod testing;

use aggregate::aggregate;
use analytics::{Analytics, Cloudflare};
use config::Config;
use error::JobError;
use models::{JobReport, Site, sites};
use store::{AGENT, DocumentStore, GitHub, commit_document};
use utils::{format, today};
use window::DateWindow;

pub struct Job {
    account_id: String,
    sites: Vec<Site>,
    analytics: Arc<dyn Analytics>,
    store: Arc<dyn DocumentStore>,
}

impl Job {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(AGENT).build()?;

        let analytics = Arc::new(Cloudflare::new(
            client.clone(),
            &config.graphql_url,
            &config.analytics_token,
        ));
        let store = Arc::new(GitHub::new(client, config.store.clone()));

        Ok(Self::with_adapters(&config.account_id, sites(), analytics, store))
    }

    pub fn with_adapters(
        account_id: &str,
        sites: Vec<Site>,
        analytics: Arc<dyn Analytics>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            sites,
            analytics,
            store,
        }
    }

    pub async fn run(&self) -> Result<JobReport, JobError> {
        self.run_on(today()).await
    }

    pub async fn run_on(&self, today: NaiveDate) -> Result<JobReport, JobError> {
        let window = DateWindow::ending(today);
        info!(
            "Aggregating {} site(s) from {} to {}",
            self.sites.len(),
            format(window.after()),
            format(window.end())
        );

        let aggregation = aggregate(
            self.analytics.as_ref(),
            &self.account_id,
            &self.sites,
            &window,
        )
        .await;

        commit_document(self.store.as_ref(), &aggregation.records, today).await?;

        Ok(JobReport {
            success: true,
            date: format(today),
            data_points: aggregation.records.len(),
            errors: aggregation.failures,
        })
    }
}

/// Every run ends here, whether or not a caller waits for the report.
pub fn log_report(result: &Result<JobReport, JobError>) {
    match result {
        Ok(report) => {
            for failure in &report.errors {
                warn!("Stats for {} missing: {:?}", failure.domain, failure.detail);
            }

            info!(
                "Stats committed for {}: {} data point(s), {} failed site(s)",
                report.date,
                report.data_points,
                report.errors.len()
            );
        }
        Err(e) => error!("Stats update failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde_json::Value;

    use super::*;
    use crate::{
        error::{QueryError, StoreError},
        testing::{FakeAnalytics, FakeStore, site, visits},
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn sites() -> Vec<Site> {
        vec![site("A", "site_a"), site("B", "site_b")]
    }

    fn analytics() -> Arc<FakeAnalytics> {
        Arc::new(
            FakeAnalytics::default()
                .answer("site_a", Ok(vec![visits("2024-05-10", 42)]))
                .answer("site_b", Err(QueryError::Transport("reset by peer".to_string()))),
        )
    }

    #[tokio::test]
    async fn test_partial_success_still_commits() {
        let store = Arc::new(FakeStore::empty());
        let job = Job::with_adapters("account", sites(), analytics(), store.clone());

        let report = job.run_on(day()).await.unwrap();

        assert!(report.success);
        assert_eq!(report.date, "2024-05-20");
        assert_eq!(report.data_points, 30);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].domain, "B");

        let commits = store.commits();
        assert_eq!(commits.len(), 1);

        let document: Value =
            serde_json::from_slice(&STANDARD.decode(&commits[0].content).unwrap()).unwrap();
        let day = document
            .as_array()
            .unwrap()
            .iter()
            .find(|record| record["date"] == "2024-05-10")
            .unwrap();
        assert_eq!(day["domains"], serde_json::json!({ "A": 42 }));
    }

    #[tokio::test]
    async fn test_write_failure_fails_job() {
        let analytics = Arc::new(
            FakeAnalytics::default()
                .answer("site_a", Ok(vec![visits("2024-05-10", 42)]))
                .answer("site_b", Ok(vec![visits("2024-05-11", 8)])),
        );
        let store = Arc::new(FakeStore::rejecting(422, "Invalid request"));
        let job = Job::with_adapters("account", sites(), analytics, store);

        let err = job.run_on(day()).await.unwrap_err();

        assert!(matches!(err, JobError::Commit(StoreError::Rejected { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_every_site_failing_still_commits_full_window() {
        let analytics = Arc::new(
            FakeAnalytics::default()
                .answer("site_a", Err(QueryError::Transport("a".to_string())))
                .answer("site_b", Err(QueryError::Transport("b".to_string()))),
        );
        let store = Arc::new(FakeStore::empty());
        let job = Job::with_adapters("account", sites(), analytics, store.clone());

        let report = job.run_on(day()).await.unwrap();

        assert_eq!(report.data_points, 30);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(store.commits().len(), 1);
    }
}
