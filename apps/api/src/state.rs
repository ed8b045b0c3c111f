use std::sync::Arc;

use crate::comparison::MissionComparer;
use crate::config::Config;
use crate::extraction::DossierExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<DossierExtractor>,
    pub comparer: Arc<MissionComparer>,
    pub config: Config,
}
