//! HTTP handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::{ClassificationResult, classify};
use crate::dashboard::{DashboardStats, graph_ids, graphs};
use crate::render::{render_go, render_index};
use crate::state::AppState;

/// Handler failure, reported as a 500 with the error text.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %format!("{:#}", self.0), "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", self.0)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GoParams {
    #[serde(default)]
    pub query: String,
}

/// Chart specs and the element ids they render into.
#[derive(Debug, Serialize)]
pub struct GraphsPayload {
    pub ids: Vec<String>,
    pub graphs: Vec<Value>,
}

fn dashboard(state: &AppState) -> GraphsPayload {
    let stats = DashboardStats::compute(&state.dataset);
    let graphs = graphs(&stats);
    GraphsPayload {
        ids: graph_ids(&graphs),
        graphs,
    }
}

async fn predict(state: Arc<AppState>, query: String) -> Result<ClassificationResult, AppError> {
    let result = tokio::task::spawn_blocking(move || classify(&state, &query)).await??;
    Ok(result)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let payload = dashboard(&state);
    Html(render_index(&payload.graphs, &payload.ids))
}

async fn go(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoParams>,
) -> Result<Html<String>, AppError> {
    let result = predict(state, params.query).await?;
    Ok(Html(render_go(&result)))
}

async fn api_graphs(State(state): State<Arc<AppState>>) -> Json<GraphsPayload> {
    Json(dashboard(&state))
}

async fn api_go(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoParams>,
) -> Result<Json<ClassificationResult>, AppError> {
    Ok(Json(predict(state, params.query).await?))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/go", get(go))
        .route("/api/graphs", get(api_graphs))
        .route("/api/go", get(api_go))
        .with_state(state)
}
