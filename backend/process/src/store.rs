//! # GitHub contents API
//!
//! The aggregate lives in a single JSON file on a dedicated branch. Every run
//! overwrites it with an upsert:
//!
//! 1. `GET /repos/{repo}/contents/{path}?ref={branch}` for the current blob `sha`.
//!    A 404 is the first run, not an error. Any other read failure is logged and
//!    treated the same way.
//! 2. `PUT /repos/{repo}/contents/{path}` with base64 content and, when known,
//!    the previous `sha`. GitHub rejects a stale `sha`, so a concurrent run loses
//!    instead of silently clobbering. There is no retry.
//!
//! A failed write fails the job: the run produced nothing durable.
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::NaiveDate;
use reqwest::{
    Client, RequestBuilder, StatusCode,
    header::{ACCEPT, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::StoreConfig,
    error::{JobError, StoreError},
    models::DayRecord,
    utils::format,
};

pub const AGENT: &str = "essentials-stats-worker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
    pub content: String,
    pub sha: Option<String>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Revision token of the stored document, `None` when it does not exist yet.
    async fn revision(&self) -> Result<Option<String>, StoreError>;

    async fn write(&self, commit: &Commit) -> Result<(), StoreError>;
}

pub async fn commit_document(
    store: &dyn DocumentStore,
    records: &[DayRecord],
    date: NaiveDate,
) -> Result<(), JobError> {
    let sha = store.revision().await.unwrap_or_else(|e| {
        warn!("Reading current stats revision failed, writing without one: {e}");
        None
    });

    match &sha {
        Some(sha) => info!("Updating stats over revision {sha}"),
        None => info!("No previous stats document, creating it"),
    }

    let document = serde_json::to_string_pretty(records)?;

    let commit = Commit {
        message: format!("Update stats {}", format(date)),
        content: STANDARD.encode(document),
        sha,
    };

    store.write(&commit).await.map_err(JobError::Commit)
}

#[derive(Deserialize)]
struct FileInfo {
    sha: String,
}

#[derive(Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

pub struct GitHub {
    client: Client,
    config: StoreConfig,
}

impl GitHub {
    pub fn new(client: Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    fn url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo,
            self.config.path
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.token)
            .header(USER_AGENT, AGENT)
            .header(ACCEPT, "application/vnd.github.v3+json")
    }
}

#[async_trait]
impl DocumentStore for GitHub {
    async fn revision(&self) -> Result<Option<String>, StoreError> {
        let res = self
            .authorized(self.client.get(self.url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }

        let file: FileInfo = res.json().await?;

        Ok(Some(file.sha))
    }

    async fn write(&self, commit: &Commit) -> Result<(), StoreError> {
        let body = PutBody {
            message: &commit.message,
            content: &commit.content,
            branch: &self.config.branch,
            sha: commit.sha.as_deref(),
        };

        let res = self
            .authorized(self.client.put(self.url()))
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
