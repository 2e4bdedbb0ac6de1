//! Habit Recommender Server
//!
//! Serves top-N habit recommendations from a pre-trained classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   HABIT RECOMMENDER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────┐   ┌───────────────┐  │
//! │  │  API      │──►│  Recommender     │──►│  Probability  │  │
//! │  │  (Axum)   │   │  (align + rank)  │   │  Model        │  │
//! │  └───────────┘   └──────────────────┘   └───────┬───────┘  │
//! │                                                 ▼          │
//! │                                        ┌──────────────┐    │
//! │                                        │  Manifest    │    │
//! │                                        │  (on disk)   │    │
//! │                                        └──────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use habit_recommender_core::{LoadedModel, Recommender};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Habit Recommender starting...");
    tracing::info!("Model manifest: {}", config.model_manifest);

    // Load once, before the first request
    let model = LoadedModel::load(&config.model_manifest)
        .with_context(|| format!("Failed to load model from {}", config.model_manifest))?;
    let recommender = Arc::new(Recommender::new(model, config.top_n));

    // Build application state
    let state = AppState {
        recommender,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "habit_recommender_server=debug,habit_recommender_core=info,tower_http=debug".into()
    });

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/recommendation", post(handlers::recommendation::recommend))
        .route("/api/v1/model", get(handlers::model::info))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
