use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{BurnedBlockTransaction, Session};
use crate::session::SessionAggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<RwLock<SessionAggregator>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
struct RecentParams {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct BlocksResponse {
    blocks: Vec<BurnedBlockTransaction>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn session(State(state): State<AppState>) -> Json<Session> {
    let aggregator = state.aggregator.read().await;
    Json(aggregator.session().clone())
}

async fn recent_blocks(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<BlocksResponse> {
    let aggregator = state.aggregator.read().await;
    Json(BlocksResponse {
        blocks: aggregator.recent_blocks(params.limit),
    })
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session))
        .route("/blocks/recent", get(recent_blocks))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
