//! VPortal HTTP server.
//!
//! Exposes the action layer over an `axum` router. Handlers stay thin: they
//! extract the bearer token and the request body, call the matching action,
//! and translate the tagged outcome into a status code and JSON envelope.
//!
//! ## Architectural Layer
//!
//! **Interface layer.** This crate owns the HTTP surface and nothing else.
//! Authorization decisions, validation, and persistence all happen behind
//! [`actions`] and the ports it carries in [`actions::Deps`].

mod extract;
mod respond;
mod routes;

use std::sync::Arc;

use actions::Deps;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use extract::Bearer;

/// Builds the full route table over shared dependencies.
pub fn router(deps: Arc<Deps>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, axum::http::header::AUTHORIZATION])
        .allow_origin(Any);

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/api/dashboard", get(routes::dashboard))
        .route(
            "/api/settings",
            get(routes::get_settings).put(routes::update_settings),
        )
        .route("/api/apps", post(routes::create_app))
        .route(
            "/api/apps/{id}",
            put(routes::update_app).delete(routes::delete_app),
        )
        .route("/api/categories", post(routes::create_category))
        .route(
            "/api/categories/{id}",
            put(routes::update_category).delete(routes::delete_category),
        )
        .route("/api/users", get(routes::list_users))
        .route("/api/users/{uid}/role", put(routes::set_user_role))
        .route(
            "/api/favorites/{app_id}/toggle",
            post(routes::toggle_favorite),
        )
        .route("/api/recents/{app_id}", post(routes::log_recent))
        .route("/api/auth/bootstrap", post(routes::bootstrap_admin))
        .route("/api/auth/sync", post(routes::sync_user))
        .route("/api/seed", post(routes::seed))
        .layer(cors)
        .with_state(deps)
}

/// Binds `addr` and serves until SIGINT or SIGTERM.
pub async fn serve(addr: &str, deps: Arc<Deps>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(deps))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::error!(%error, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("shutdown: interrupt"),
        _ = terminate => tracing::info!("shutdown: terminate"),
    }
}
