use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

/// Resolves on Ctrl+C or SIGTERM, logging which one stopped `service`.
pub async fn shutdown_signal(service: &'static str) {
    let interrupt = async {
        if let Err(e) = ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    let received = tokio::select! {
        _ = interrupt => "Ctrl+C",
        _ = terminate() => "SIGTERM",
    };

    info!("{service}: received {received}, shutting down");
}

#[cfg(unix)]
async fn terminate() {
    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_pending_without_signal() {
        let waited = timeout(Duration::from_millis(50), shutdown_signal("test")).await;

        assert!(waited.is_err());
    }
}
