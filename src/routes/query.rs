//! Dynamic query routes. The static /query/tables route is registered
//! alongside the parameterized one; axum matches static segments first.

use crate::handlers::query::{list_tables, query_table};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn query_routes(state: AppState) -> Router {
    Router::new()
        .route("/query/tables", get(list_tables))
        .route("/query/:table", get(query_table))
        .with_state(state)
}
