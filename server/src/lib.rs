//! # License Verification Backend
//!
//! Backend for the cannabis marketplace frontend: an in-memory cache of
//! the public license registry plus a thin proxy in front of a hosted
//! chat-completion model for licenses the registry snapshot cannot answer.
//!
//!
//!
//! # General Infrastructure
//! - Frontend search hits `/search` first, which is the local cache and instant
//! - Only when the cache has no match does the frontend fall back to `POST /verify`
//! - `/verify` holds the model credential server-side and forwards the query
//! - The model's free-text JSON answer is parsed into a typed result; garbage
//!   degrades to a not-found outcome, never an error
//! - The registry snapshot is replaced wholesale every 5 minutes on demand;
//!   a failed fetch keeps the stale snapshot authoritative
//!
//!
//!
//! # Error Surface
//! - Wrong method on `/verify` → 405 `{"error": "Method not allowed"}`
//! - Missing or non-string query → 400 `{"error": "Query parameter is required"}`
//! - Credential not in the environment → 500 `{"error": "API key not configured"}`
//! - Upstream failure → 500 with a generic message, full detail only in the
//!   server logs
//!
//!
//!
//! # Setup
//!
//! Run against the default public registry endpoint:
//! ```sh
//! OPENAI_API_KEY=sk-... cargo run -p licensing
//! ```
//!
//! Environment:
//! - `RUST_PORT` — listen port, default 1111
//! - `REGISTRY_URL` — open-data endpoint for license records
//! - `MODEL_URL` / `MODEL` — chat-completion host and model name
//! - `OPENAI_API_KEY` — model credential, read per request
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod adapter;
pub mod cache;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod verify;

use routes::{lookup_handler, method_not_allowed, search_handler, verify_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/verify", post(verify_handler).fallback(method_not_allowed))
        .route("/search", get(search_handler))
        .route("/lookup", get(lookup_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
