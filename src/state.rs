//! Shared application state for all routes. Metadata is read from the catalog
//! per request, so the state carries only the pool.

use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
