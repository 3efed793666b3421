use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::{analytics::VisitQuery, models::QUERY};

/// Calendar day in UTC; windows and commit messages never use local time.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn build_payload(query: &VisitQuery<'_>) -> serde_json::Value {
    json!({
        "operationName": "siteVisits",
        "variables": {
            "accountTag": query.account_id,
            "siteTag": query.site_tag,
            "start": format(query.after),
            "limit": query.limit,
        },
        "query": QUERY
    })
}
