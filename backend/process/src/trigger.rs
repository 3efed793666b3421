//! Ways to start a run: `POST` to the HTTP trigger, or the interval schedule.
//! Both log the report through [`log_report`]; only the HTTP trigger returns it.
use std::{error::Error as _, sync::Arc, time::Duration};

use anyhow::Error;
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use common::signal::shutdown_signal;
use serde::Serialize;
use tokio::{
    net::TcpListener,
    time::{MissedTickBehavior, interval},
};
use tracing::info;

use crate::{Job, error::JobError, log_report};

pub const IDLE_MESSAGE: &str = "POST to trigger update";

#[derive(Serialize)]
struct Failure {
    error: String,
    stack: String,
}

impl From<&JobError> for Failure {
    fn from(err: &JobError) -> Self {
        let mut stack = format!("{err:?}");
        let mut source = err.source();

        while let Some(cause) = source {
            stack.push_str(&format!("\ncaused by: {cause}"));
            source = cause.source();
        }

        Self {
            error: err.to_string(),
            stack,
        }
    }
}

pub fn router(job: Arc<Job>) -> Router {
    Router::new().fallback(trigger_handler).with_state(job)
}

pub async fn trigger_handler(State(job): State<Arc<Job>>, method: Method) -> Response {
    if method != Method::POST {
        return (StatusCode::OK, IDLE_MESSAGE).into_response();
    }

    info!("Stats update requested");
    let result = job.run().await;
    log_report(&result);

    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(Failure::from(&e))).into_response(),
    }
}

/// First tick fires immediately.
pub async fn schedule(job: Arc<Job>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        info!("Scheduled stats update");
        log_report(&job.run().await);
    }
}

pub async fn serve(job: Arc<Job>, port: u16, every: Duration) -> Result<(), Error> {
    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    let scheduled = tokio::spawn(schedule(job.clone(), every));

    info!("Stats trigger running on {address}, scheduled every {every:?}");

    axum::serve(listener, router(job))
        .with_graceful_shutdown(shutdown_signal("stats"))
        .await?;

    scheduled.abort();
    info!("Stats trigger shutting down...");

    Ok(())
}
