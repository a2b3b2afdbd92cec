//! Page listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mirage_store::Page;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /all.
///
/// Returns every stored page with its raw content.
pub(crate) async fn get_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Page>>, ServerError> {
    state
        .pages
        .pages()
        .await
        .map(Json)
        .ok_or(ServerError::StoreUnavailable)
}
