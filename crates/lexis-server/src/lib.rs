//! lexis-server - REST API server for lexis.
//!
//! Exposes the word scheduler over HTTP. The learner is identified by the
//! `X-Learner-Id` header; requests without it study anonymously.
//!
//! # Example
//!
//! ```ignore
//! use lexis_core::LexisConfig;
//! use lexis_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::from_config(LexisConfig::from_env()).unwrap();
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod extract;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::Learner;
pub use factory::{create_scheduler, open_store, seed_on_startup, spawn_event_logger};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Requests each route handles at once; the rest wait.
pub const MAX_IN_FLIGHT_REQUESTS: usize = 256;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

/// Create the server with API key authentication.
pub fn create_server_with_auth(state: AppState) -> Router {
    routes::create_router(state.clone())
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
