use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::{Value, json};

use crate::{
    apple,
    error::RoastError,
    roast::{Stage, enter, normalize},
    server::AppState,
    types::{AppleMusicBundle, Service},
};

pub async fn apple_token(State(state): State<AppState>) -> Result<Json<Value>, RoastError> {
    let credentials = state
        .config
        .apple
        .as_ref()
        .ok_or(RoastError::AppleUnavailable)?;
    let token = apple::developer_token(credentials)?;
    Ok(Json(json!({ "developerToken": token })))
}

/// Roasts a listening bundle collected by MusicKit in the browser.
///
/// A disabled server answers 503 whatever the body; an unreadable body
/// answers 400 with the usual `{"error": ..}` shape.
pub async fn apple_roast(
    State(state): State<AppState>,
    payload: Result<Json<AppleMusicBundle>, JsonRejection>,
) -> Result<Json<Value>, RoastError> {
    enter(Stage::Start);
    if state.config.apple.is_none() {
        return Err(RoastError::AppleUnavailable);
    }
    let Json(bundle) = payload.map_err(|e| RoastError::InvalidRequest(e.body_text()))?;

    let profile = normalize::profile_from_apple(&bundle);
    let result = state.pipeline.roast_profile(Service::Apple, profile).await?;

    enter(Stage::Transporting);
    let body = json!({
        "roast": result.roast,
        "dataSummary": result.summary,
    });
    enter(Stage::Done);
    Ok(Json(body))
}
