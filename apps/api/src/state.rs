use std::sync::Arc;

use crate::config::Config;
use crate::criteria::CriteriaStore;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
    /// Extracted criteria sets, addressable by `criteria_id`.
    pub criteria_store: Arc<CriteriaStore>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        let criteria_store = Arc::new(CriteriaStore::new(config.criteria_store_capacity));
        Self {
            config,
            pipeline,
            criteria_store,
        }
    }
}
