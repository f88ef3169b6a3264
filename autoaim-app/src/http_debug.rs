//! A minimal debug HTTP surface: `/status` reports identity and odometry
//! freshness, `/stream` serves the latest latched debug frame.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::host_state::HostState;

#[derive(Serialize)]
struct StatusResponse {
    robot_identity: Option<String>,
}

async fn status(State(state): State<Arc<HostState>>) -> Json<StatusResponse> {
    let robot_identity = state
        .robot_identity()
        .map(|(color, robot_type)| format!("{color:?}/{robot_type:?}"));
    Json(StatusResponse { robot_identity })
}

async fn stream(State(state): State<Arc<HostState>>) -> impl IntoResponse {
    match state.latest_debug_frame() {
        Some(frame) => ([("content-type", "image/jpeg")], frame).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

pub fn router(state: Arc<HostState>) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/stream", get(stream))
        .with_state(state)
}

/// Binds and serves the debug router until the process is shut down.
pub async fn serve(bind_addr: &str, state: Arc<HostState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, router(state))
        .await
        .map_err(|error| std::io::Error::new(std::io::ErrorKind::Other, error))
}
