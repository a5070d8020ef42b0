use axum::{extract::State, response::Redirect};

use crate::{error::RoastError, server::AppState, spotify};

pub async fn login(State(state): State<AppState>) -> Result<Redirect, RoastError> {
    let url = spotify::auth::authorize_url(&state.config.spotify)?;
    Ok(Redirect::to(url.as_str()))
}
