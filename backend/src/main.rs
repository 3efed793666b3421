use tracing::error;

#[tokio::main]
async fn main() {
    common::telemetry::init();

    if let Err(err) = server::start_server().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}
