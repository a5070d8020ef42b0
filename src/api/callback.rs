use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::RoastError,
    roast::{
        Stage, enter,
        transport::{self, MAX_INLINE_PAYLOAD},
    },
    server::AppState,
    spotify,
    types::RoastResult,
    utils,
};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Spotify redirect target: runs the whole roast and redirects to the
/// presentation layer, either to the roast page or to the error page.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    match roast(&state, params).await {
        Ok(location) => Redirect::to(&location),
        Err(e) => {
            warn!("Callback failed: {}", e);
            Redirect::to(&utils::error_redirect_url(
                &state.config.client_url,
                &e.user_message(),
            ))
        }
    }
}

async fn roast(state: &AppState, params: CallbackParams) -> Result<String, RoastError> {
    enter(Stage::Start);
    if let Some(error) = params.error {
        return Err(RoastError::OAuthDenied(error));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RoastError::OAuthDenied("no authorization code received".to_string()))?;

    enter(Stage::ExchangingCredential);
    let token = spotify::auth::exchange_code(&state.http, &state.config.spotify, &code).await?;

    let result = state.pipeline.roast_spotify(&token.access_token).await?;
    info!(chars = result.roast.chars().count(), "Roast ready");

    deliver(state, &result).await
}

/// Encodes `result` and returns the redirect location carrying it.
///
/// Payloads above [`MAX_INLINE_PAYLOAD`] are parked in the holding map and
/// the location carries their key instead.
pub async fn deliver(state: &AppState, result: &RoastResult) -> Result<String, RoastError> {
    enter(Stage::Transporting);
    let encoded = transport::encode(result)?;
    let client_url = &state.config.client_url;

    let location = if encoded.len() > MAX_INLINE_PAYLOAD {
        let key = state.store.insert(encoded).await;
        utils::stored_roast_redirect_url(client_url, &key)
    } else {
        utils::roast_redirect_url(client_url, &encoded)
    };

    enter(Stage::Done);
    Ok(location)
}
