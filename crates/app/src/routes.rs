use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, catalog, health, history, quiz, review};
use crate::middleware::{logging_middleware, security_headers};
use crate::state::AppState;

/// Create the router with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(catalog::home))
        .route("/year/:year", get(catalog::year_page))
        .route(
            "/start_exam/:department",
            get(quiz::start_form).post(quiz::start_exam),
        )
        .route("/exam", get(quiz::show_exam).post(quiz::submit_answer))
        .route("/exam/next", post(quiz::next_question))
        .route("/exam/bookmark", post(quiz::bookmark_current))
        .route("/result", get(quiz::show_result))
        .route("/history", get(history::history_page))
        .route("/review", get(review::review_page))
        .route("/review/start/:department", post(review::start_review))
        .route("/review/remove", post(review::remove_review))
        .route("/reset", post(quiz::reset))
        .route("/health", get(health::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(middleware::from_fn(security_headers))
                .layer(CompressionLayer::new()),
        )
}
