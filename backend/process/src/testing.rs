//! In-memory adapters for pipeline tests.
use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    analytics::{Analytics, VisitQuery},
    error::{QueryError, StoreError},
    models::{DailyVisits, Site},
    store::{Commit, DocumentStore},
};

pub fn site(domain: &str, tag: &str) -> Site {
    Site {
        domain: domain.to_string(),
        tag: tag.to_string(),
    }
}

pub fn visits(date: &str, visits: u64) -> DailyVisits {
    DailyVisits {
        date: date.to_string(),
        visits,
    }
}

/// Answers keyed by site tag. Unknown tags return no rows.
#[derive(Default)]
pub struct FakeAnalytics {
    pub answers: HashMap<String, Result<Vec<DailyVisits>, QueryError>>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeAnalytics {
    pub fn answer(mut self, tag: &str, answer: Result<Vec<DailyVisits>, QueryError>) -> Self {
        self.answers.insert(tag.to_string(), answer);
        self
    }
}

#[async_trait]
impl Analytics for FakeAnalytics {
    async fn daily_visits(&self, query: &VisitQuery<'_>) -> Result<Vec<DailyVisits>, QueryError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.site_tag.to_string(), query.after.to_string()));

        self.answers
            .get(query.site_tag)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct FakeStore {
    pub revision: Result<Option<String>, StoreError>,
    pub write: Result<(), StoreError>,
    pub commits: Mutex<Vec<Commit>>,
}

impl FakeStore {
    pub fn empty() -> Self {
        Self::with_revision(Ok(None))
    }

    pub fn with_revision(revision: Result<Option<String>, StoreError>) -> Self {
        Self {
            revision,
            write: Ok(()),
            commits: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16, body: &str) -> Self {
        Self {
            write: Err(StoreError::Rejected {
                status,
                body: body.to_string(),
            }),
            ..Self::empty()
        }
    }

    pub fn commits(&self) -> Vec<Commit> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn revision(&self) -> Result<Option<String>, StoreError> {
        self.revision.clone()
    }

    async fn write(&self, commit: &Commit) -> Result<(), StoreError> {
        self.commits.lock().unwrap().push(commit.clone());
        self.write.clone()
    }
}
