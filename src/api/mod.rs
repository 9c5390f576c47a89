//! REST API server.
//!
//! Provides HTTP endpoints for:
//! - Meeting CRUD and the full aggregate view
//! - The end-to-end processing pipeline (POST /process-recording)
//! - Direct transcription (POST /transcribe)

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

use crate::config::Deployment;
use crate::db::Database;
use crate::pipeline::Pipeline;
use crate::transcription::{Language, Transcriber};

/// Shared state for all routes. Every heavyweight member is a cheap
/// clone of an Arc or handle constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pipeline: Arc<Pipeline>,
    pub transcriber: Arc<Transcriber>,
    pub deployment: Deployment,
    pub default_language: Language,
}

pub struct ApiServer {
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState, port: u16) -> Self {
        Self { port, state }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(service_info))
            .route("/version", get(version))
            .merge(routes::meetings::router(self.state.clone()))
            .merge(routes::process::router(self.state.clone()))
            .merge(routes::transcribe::router(self.state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET    /                   - Service info");
        info!("  GET    /version            - Version info");
        info!("  POST   /meetings           - Create a meeting");
        info!("  GET    /meetings           - List meetings");
        info!("  PUT    /meetings?id=       - Update a meeting");
        info!("  DELETE /meetings?id=       - Archive or delete a meeting");
        info!("  GET    /meeting/:id        - Full meeting aggregate");
        info!("  POST   /process-recording  - Run the processing pipeline");
        info!("  POST   /transcribe         - Transcribe audio directly");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "minuted",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "minuted"
    }))
}
