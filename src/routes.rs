use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::resolver::ShareResolver;
use crate::state::AppState;

/// Create the application router.
pub fn create_router<R: ShareResolver>(state: AppState<R>) -> Router {
    Router::new()
        .route("/", get(handlers::get_details::<R>))
        // Browsers ask for this on every page load
        .route("/favicon.ico", get(handlers::favicon))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
