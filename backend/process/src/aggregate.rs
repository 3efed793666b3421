//! Folds per-site analytics rows into the fixed 30-day window.
//!
//! Sites are queried one at a time in table order. A failed site becomes an
//! [`EntityFailure`] and the rest of the batch carries on; the window always
//! keeps all of its days.
use tracing::{debug, warn};

use crate::{
    analytics::{Analytics, VisitQuery},
    error::QueryError,
    models::{DailyVisits, DayRecord, EntityFailure, Site},
    window::{DateWindow, WINDOW_DAYS},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub records: Vec<DayRecord>,
    pub failures: Vec<EntityFailure>,
}

pub type Outcome = (String, Result<Vec<DailyVisits>, QueryError>);

pub async fn aggregate(
    analytics: &dyn Analytics,
    account_id: &str,
    sites: &[Site],
    window: &DateWindow,
) -> Aggregation {
    let mut outcomes: Vec<Outcome> = Vec::with_capacity(sites.len());

    for site in sites {
        let outcome = fetch_site(analytics, account_id, site, window).await;

        match &outcome {
            Ok(rows) => debug!("{}: {} day(s)", site.domain, rows.len()),
            Err(e) => warn!("{}: {e}", site.domain),
        }

        outcomes.push((site.domain.clone(), outcome));
    }

    fold(window, outcomes)
}

async fn fetch_site(
    analytics: &dyn Analytics,
    account_id: &str,
    site: &Site,
    window: &DateWindow,
) -> Result<Vec<DailyVisits>, QueryError> {
    if account_id.is_empty() {
        return Err(QueryError::InvalidInput("account id"));
    }

    if site.tag.is_empty() {
        return Err(QueryError::InvalidInput("site tag"));
    }

    let query = VisitQuery {
        account_id,
        site_tag: &site.tag,
        after: window.after(),
        limit: WINDOW_DAYS,
    };

    analytics.daily_visits(&query).await
}

/// Rows dated outside the window are dropped.
pub fn fold(window: &DateWindow, outcomes: impl IntoIterator<Item = Outcome>) -> Aggregation {
    let empty = Aggregation {
        records: window.records(),
        failures: Vec::new(),
    };

    outcomes
        .into_iter()
        .fold(empty, |mut aggregation, (domain, outcome)| {
            match outcome {
                Ok(rows) => {
                    for row in rows {
                        if let Some(record) = aggregation
                            .records
                            .iter_mut()
                            .find(|record| record.date == row.date)
                        {
                            record.domains.insert(domain.clone(), row.visits);
                        }
                    }
                }
                Err(err) => aggregation.failures.push(EntityFailure::new(domain, err)),
            }

            aggregation
        })
}
