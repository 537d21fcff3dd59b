mod routes;
mod handlers;

pub use routes::{ApiResponse, AppState, PaginationParams};

use crate::config::ServerConfig;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the HTTP router over shared application state
pub fn router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))

        // Feed routes
        .route("/api/feed", get(handlers::feed::get_feed))
        .route("/api/feed/page", get(handlers::feed::get_feed_page))

        // Post interaction routes
        .route("/api/posts/:id/reactions", post(handlers::reactions::toggle_reaction))
        .route(
            "/api/posts/:id/comments",
            get(handlers::comments::get_comments).post(handlers::comments::add_comment),
        )

        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Start the API server
pub async fn start_api_server(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let app = router(state, config.enable_cors);

    // Get bind address
    let addr = format!("{}:{}", config.host, config.port)
        .parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
