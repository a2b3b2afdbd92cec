//! Redirect helper endpoint.

use std::collections::HashMap;

use axum::Json;
use axum::extract::Query;
use axum::response::{IntoResponse, Redirect, Response};

/// Handle GET /goto.
///
/// Redirects to `redir` when present, otherwise echoes the query parameters.
pub(crate) async fn goto(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("redir") {
        Some(target) => Redirect::to(target).into_response(),
        None => Json(params).into_response(),
    }
}
