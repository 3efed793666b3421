use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QueryError;

pub const ENDPOINT: &str = "https://api.cloudflare.com/client/v4/graphql";

/// Web Analytics site tags (RUM queries, bot traffic already filtered).
/// Not the beacon `site_token`.
pub const SITES: &[(&str, &str)] = &[
    ("essentials.com", "3c70b68deb4c47c0b1b20fb5b13a8ac7"),
    ("essentials.net", "a6b388101b694341ae5f60784ba44f77"),
    ("essentials.co.uk", "cd7b62213ab94108b7956bc0c91c544c"),
    ("essentials.uk", "f81ece8b0e404e9b9daffbf129dad11f"),
    ("essentials.eu", "cce0d068b21146c0b0b27a823b5642ba"),
    ("essentials.us", "6868d7d0633b4224a7d7e7b3bba344fc"),
    ("essentials.fr", "3efc92066a2e45598427ba7d6dba1ab3"),
    ("essentials.cn", "6699f55f63aa44979af522c2b3b99f02"),
    ("essentials.hk", "b50f1c2fa2e04dcc920d0944306cf101"),
    ("essentials.tw", "75bd8006a16f45db9be8a72006b760c1"),
    ("essentials.mobi", "586af3efb4ef48baa63961cd4e457279"),
];

pub const QUERY: &str = r#"
    query siteVisits($accountTag: string!, $siteTag: string!, $start: Date!, $limit: uint64!) {
        viewer {
            accounts(filter: { accountTag: $accountTag }) {
                rumPageloadEventsAdaptiveGroups(
                    limit: $limit
                    filter: { date_gt: $start, siteTag: $siteTag }
                    orderBy: [date_ASC]
                ) {
                    count
                    dimensions {
                        date
                    }
                    sum {
                        visits
                    }
                }
            }
        }
    }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub domain: String,
    pub tag: String,
}

pub fn sites() -> Vec<Site> {
    SITES
        .iter()
        .map(|(domain, tag)| Site {
            domain: domain.to_string(),
            tag: tag.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyVisits {
    pub date: String,
    pub visits: u64,
}

/// One day of the committed document. A domain without data for the day has
/// no key at all, which is not the same as a zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    pub domains: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityFailure {
    pub domain: String,
    #[serde(flatten)]
    pub detail: FailureDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FailureDetail {
    /// Error objects from the GraphQL response, verbatim.
    #[serde(rename = "errors")]
    Rejected(Vec<Value>),

    #[serde(rename = "error")]
    Message(String),
}

impl EntityFailure {
    pub fn new(domain: String, err: QueryError) -> Self {
        let detail = match err {
            QueryError::Rejected(errors) => FailureDetail::Rejected(errors),
            other => FailureDetail::Message(other.to_string()),
        };

        Self { domain, detail }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub success: bool,
    pub date: String,
    pub errors: Vec<EntityFailure>,
    pub data_points: usize,
}

#[derive(Deserialize)]
pub struct Response {
    pub data: Option<Data>,
    pub errors: Option<Vec<Value>>,
}

#[derive(Deserialize)]
pub struct Data {
    pub viewer: Option<Viewer>,
}

#[derive(Deserialize)]
pub struct Viewer {
    pub accounts: Option<Vec<Account>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub rum_pageload_events_adaptive_groups: Option<Vec<Group>>,
}

#[derive(Deserialize)]
pub struct Group {
    pub dimensions: Dimensions,
    pub sum: Sum,
}

#[derive(Deserialize)]
pub struct Dimensions {
    pub date: String,
}

#[derive(Deserialize)]
pub struct Sum {
    pub visits: u64,
}

impl Response {
    pub fn into_daily_visits(self) -> Result<Vec<DailyVisits>, QueryError> {
        // `"errors": []` carries no error, so it is read as success.
        if let Some(errors) = self.errors.filter(|errors| !errors.is_empty()) {
            return Err(QueryError::Rejected(errors));
        }

        let groups = self
            .data
            .and_then(|data| data.viewer)
            .and_then(|viewer| viewer.accounts)
            .and_then(|accounts| accounts.into_iter().next())
            .and_then(|account| account.rum_pageload_events_adaptive_groups)
            .unwrap_or_default();

        Ok(groups
            .into_iter()
            .map(|group| DailyVisits {
                date: group.dimensions.date,
                visits: group.sum.visits,
            })
            .collect())
    }
}
