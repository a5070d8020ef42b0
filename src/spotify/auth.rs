use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::SpotifyConfig,
    error::RoastError,
    types::{Token, TokenError},
};

/// Builds the Spotify authorization URL the login endpoint redirects to.
///
/// # Errors
///
/// Fails with [`RoastError::InvalidConfig`] when `SPOTIFY_API_AUTH_URL` is not
/// a valid URL.
pub fn authorize_url(config: &SpotifyConfig) -> Result<Url, RoastError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .map_err(|e| RoastError::InvalidConfig {
        name: "SPOTIFY_API_AUTH_URL".to_string(),
        reason: e.to_string(),
    })
}

/// Exchanges an authorization code for an access token.
///
/// Uses the confidential-client variant of the authorization code grant: the
/// client secret travels in the form body next to the code.
///
/// # Errors
///
/// Every failure maps to [`RoastError::OAuthExchangeFailed`]: transport
/// errors, a body that is not JSON, and an `error` answer from the token
/// endpoint (its `error_description` is preferred as message).
pub async fn exchange_code(
    client: &Client,
    config: &SpotifyConfig,
    code: &str,
) -> Result<Token, RoastError> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await
        .map_err(|e| RoastError::OAuthExchangeFailed(e.to_string()))?;

    let status = res.status();
    let json: Value = res
        .json()
        .await
        .map_err(|e| RoastError::OAuthExchangeFailed(format!("unreadable token response ({status}): {e}")))?;

    if json.get("error").is_some() {
        let err: TokenError = serde_json::from_value(json)
            .map_err(|e| RoastError::OAuthExchangeFailed(e.to_string()))?;
        warn!("Token endpoint answered with error {}", err.error);
        return Err(RoastError::OAuthExchangeFailed(
            err.error_description.unwrap_or(err.error),
        ));
    }

    let token: Token = serde_json::from_value(json)
        .map_err(|e| RoastError::OAuthExchangeFailed(format!("missing access token: {e}")))?;
    debug!(scope = ?token.scope, "Exchanged authorization code");
    Ok(token)
}
