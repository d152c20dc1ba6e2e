use std::sync::Arc;

use crate::config::Config;
use crate::profile::repository::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Repository over the injected document store. Mutations serialize on
    /// its internal writer lock.
    pub repo: Arc<Repository>,
    pub config: Config,
}
