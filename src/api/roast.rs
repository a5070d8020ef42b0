use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{roast::transport, server::AppState};

/// Serves a roast parked in the holding map by the callback, once.
pub async fn stored_roast(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(encoded) = state.store.take(&id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Roast not found or expired" })),
        )
            .into_response();
    };

    match transport::decode(&encoded) {
        Ok(result) => Json(result).into_response(),
        Err(e) => e.into_response(),
    }
}
