use std::sync::Arc;

use super::{
    config::Config,
    upstream::{Ahrefs, MetricsApi},
};

pub struct AppState {
    pub config: Config,
    pub metrics: Arc<dyn MetricsApi>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let metrics = Arc::new(Ahrefs::new(&config));

        Self::with_metrics(config, metrics)
    }

    pub fn with_metrics(config: Config, metrics: Arc<dyn MetricsApi>) -> Arc<Self> {
        Arc::new(Self { config, metrics })
    }
}
