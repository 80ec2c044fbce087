//! API documentation view
//!
//! `/` redirects to the static documentation page at `/docs`.

use axum::{
    response::{Html, Redirect},
    routing::get,
    Router,
};

use crate::AppState;

const DOCS_HTML: &str = include_str!("../../ui/docs.html");

/// GET /
pub async fn redirect_to_docs() -> Redirect {
    Redirect::temporary("/docs")
}

/// GET /docs
pub async fn serve_docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

/// Build documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(redirect_to_docs))
        .route("/docs", get(serve_docs))
}
