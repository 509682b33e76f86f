use sqlx::PgPool;

use crate::config::Config;
use crate::db::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Both handles are pools/clients; a request borrows a connection only for its own duration.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub documents: DocumentStore,
    pub config: Config,
}
