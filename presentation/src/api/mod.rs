//! HTTP API
//!
//! | Method | Path             | Handler                      |
//! |--------|------------------|------------------------------|
//! | POST   | `/agent`         | [`handlers::run_agent`]      |
//! | GET    | `/`              | [`handlers::status`]         |
//! | GET    | `/health`        | [`handlers::health`]         |
//! | GET    | `/tools`         | [`handlers::list_tools`]     |
//! | POST   | `/tools/refresh` | [`handlers::refresh_tools`]  |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router.
pub fn router(state: AppState, cors_allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/agent", post(handlers::run_agent))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/refresh", post(handlers::refresh_tools))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
