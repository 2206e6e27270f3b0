//! HTTP read API over a [`SnapshotFeed`].
//!
//! Serves the same endpoints [`molt_source::RemoteSource`] consumes, so one
//! dashboard instance can act as the remote source of another.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use molt_source::SnapshotFeed;
use molt_views::{build_leaderboard_with, project_graph, GraphFilter, NetworkStats, LEADERBOARD_SIZE};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
struct ApiState {
    feed: Arc<SnapshotFeed>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

pub struct ApiServer {
    bind_addr: String,
    feed: Arc<SnapshotFeed>,
}

impl ApiServer {
    pub fn new(bind_addr: impl Into<String>, feed: Arc<SnapshotFeed>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            feed,
        }
    }

    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        self.run_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn run_on(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "HTTP read API listening");
        axum::serve(listener, router(self.feed)).await?;
        Ok(())
    }
}

pub fn router(feed: Arc<SnapshotFeed>) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/api/agents", get(api_agents))
        .route("/api/agents/:id", get(api_agent))
        .route("/api/connections", get(api_connections))
        .route("/api/leaderboard", get(api_leaderboard))
        .route("/api/graph", get(api_graph))
        .route("/api/stats", get(api_stats))
        .layer(CorsLayer::permissive())
        .with_state(ApiState { feed })
}

async fn api_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "MoltNet API online" }))
}

async fn api_agents(State(api): State<ApiState>) -> Response {
    let snapshot = api.feed.snapshot().await;
    Json(&snapshot.agents).into_response()
}

async fn api_agent(State(api): State<ApiState>, Path(id): Path<String>) -> Response {
    let snapshot = api.feed.snapshot().await;
    match snapshot.agent(&id) {
        Some(agent) => Json(agent).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("agent '{id}' not found") })),
        )
            .into_response(),
    }
}

async fn api_connections(State(api): State<ApiState>) -> Response {
    let snapshot = api.feed.snapshot().await;
    Json(&snapshot.connections).into_response()
}

async fn api_leaderboard(State(api): State<ApiState>, Query(query): Query<LeaderboardQuery>) -> Response {
    let snapshot = api.feed.snapshot().await;
    let size = query.limit.unwrap_or(LEADERBOARD_SIZE);
    Json(build_leaderboard_with(&snapshot.agents, size)).into_response()
}

async fn api_graph(State(api): State<ApiState>, Query(filter): Query<GraphFilter>) -> Response {
    let snapshot = api.feed.snapshot().await;
    Json(project_graph(&snapshot.agents, &snapshot.connections, &filter)).into_response()
}

async fn api_stats(State(api): State<ApiState>) -> Json<NetworkStats> {
    let snapshot = api.feed.snapshot().await;
    Json(NetworkStats::compute(&snapshot.agents, &snapshot.connections))
}
