use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use serde::Serialize;

/// Connections that reached `completed`
#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub connections: Vec<String>,
    pub count: usize,
}

pub async fn list_connections(
    State(state): State<AppState>,
) -> ApiResult<Json<ConnectionsResponse>> {
    let connections = state.registry.usable_connections()?;
    Ok(Json(ConnectionsResponse {
        count: connections.len(),
        connections,
    }))
}
