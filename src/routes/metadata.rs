//! Catalog CRUD routes. DELETE is a soft delete (deactivation).

use crate::handlers::metadata::{create, deactivate, list, read, update};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn metadata_routes(state: AppState) -> Router {
    Router::new()
        .route("/metadata", post(create).get(list))
        .route("/metadata/:id", get(read).patch(update).delete(deactivate))
        .with_state(state)
}
