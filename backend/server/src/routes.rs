use std::sync::Arc;

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::{error::AppError, state::AppState, upstream::Endpoint};

/// Raw query pairs. A repeated `domain` forwards the first non-empty value.
pub type DomainQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

pub async fn domain_metrics_handler(
    State(state): State<Arc<AppState>>,
    query: DomainQuery,
) -> Result<Response, AppError> {
    forward(&state, Endpoint::DomainRating, query).await
}

pub async fn metrics_overview_handler(
    State(state): State<Arc<AppState>>,
    query: DomainQuery,
) -> Result<Response, AppError> {
    forward(&state, Endpoint::MetricsOverview, query).await
}

pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    AppError::NotFound.into_response()
}

async fn forward(
    state: &AppState,
    endpoint: Endpoint,
    query: DomainQuery,
) -> Result<Response, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::InvalidQuery(e.body_text()))?;

    let domain = pairs
        .into_iter()
        .find(|(key, value)| key == "domain" && !value.is_empty())
        .map(|(_, value)| value)
        .ok_or(AppError::MissingDomain)?;

    info!("Forwarding {} for {domain}", endpoint.path());

    let relay = state
        .metrics
        .fetch(endpoint, &domain)
        .await
        .inspect_err(|e| warn!("Upstream {} failed: {e}", endpoint.path()))?;

    let status = StatusCode::from_u16(relay.status)
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok((status, [(CONTENT_TYPE, "application/json")], relay.body).into_response())
}
