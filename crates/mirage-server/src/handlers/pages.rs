//! Generated pages endpoint.
//!
//! Every path without a dedicated route lands here and is resolved through
//! the lazy page cache.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use mirage_site::PageOutcome;
use percent_encoding::percent_decode_str;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET for any generated page.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ServerError> {
    let request_path = percent_decode_str(uri.path()).decode_utf8_lossy();

    match state.pages.resolve(&request_path).await {
        PageOutcome::Serve { kind, document } => {
            Ok(([(header::CONTENT_TYPE, kind.content_type())], document).into_response())
        }
        PageOutcome::Redirect => Ok(Redirect::to(&redirect_target(&uri)).into_response()),
        PageOutcome::GenerationFailed { reason } => Err(ServerError::GenerationFailed(reason)),
    }
}

/// Handle HEAD for any page.
///
/// Answers from the store only; an uncached path is 404 and never generates.
pub(crate) async fn head_page(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let request_path = percent_decode_str(uri.path()).decode_utf8_lossy();

    match state.pages.lookup(&request_path).await {
        Some((kind, document)) => {
            ([(header::CONTENT_TYPE, kind.content_type())], document).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Target for re-requesting the same path after generation.
///
/// Leading slashes are collapsed so `//host` never becomes a
/// protocol-relative redirect.
fn redirect_target(uri: &Uri) -> String {
    let path = format!("/{}", uri.path().trim_start_matches('/'));
    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_keeps_path() {
        let uri: Uri = "/about".parse().unwrap();

        assert_eq!(redirect_target(&uri), "/about");
    }

    #[test]
    fn test_redirect_target_keeps_raw_encoding() {
        let uri: Uri = "/caf%C3%A9/menu".parse().unwrap();

        assert_eq!(redirect_target(&uri), "/caf%C3%A9/menu");
    }

    #[test]
    fn test_redirect_target_keeps_query() {
        let uri: Uri = "/search?q=rust".parse().unwrap();

        assert_eq!(redirect_target(&uri), "/search?q=rust");
    }

    #[test]
    fn test_redirect_target_collapses_leading_slashes() {
        let uri: Uri = "//evil.example/page".parse().unwrap();

        assert_eq!(redirect_target(&uri), "/evil.example/page");
    }
}
