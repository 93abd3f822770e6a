use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tower_http::trace::TraceLayer;

use crate::report::ReportApi;
use crate::state::AppState;

/// The collector's whole API surface: one POST route at the configured
/// report path. Unknown paths get 404 and other methods on the report path
/// get 405 from the router itself.
pub fn routes(state: AppState) -> Router {
    let report_path = state.settings.server.report_path.clone();
    let max_body_size = state.settings.server.max_body_size;

    Router::new()
        .route(&report_path, post(ReportApi::submit))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
