//! Error taxonomy for a roast request.
//!
//! Configuration errors are raised once at startup and terminate the process.
//! Everything else is caught at the request boundary and turned into a
//! redirect or a JSON body carrying [`RoastError::user_message`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoastError {
    /// A required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingConfig(String),

    /// An environment variable is set but cannot be parsed
    #[error("Invalid value for {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    /// The user declined the login or the provider redirected with an error code
    #[error("Authorization denied: {0}")]
    OAuthDenied(String),

    /// The token endpoint refused the authorization code
    #[error("Spotify Auth Error: {0}")]
    OAuthExchangeFailed(String),

    /// Too many upstream reads were answered with 403
    #[error("Upstream denied {forbidden} of {issued} requests")]
    UpstreamAuthorizationDenied { forbidden: usize, issued: usize },

    /// No records survived normalization
    #[error("No listening data available")]
    InsufficientData,

    /// The generation call failed or answered with an unknown shape
    #[error("Generation degraded: {0}")]
    GenerationDegraded(String),

    /// The roast could not be serialized for the redirect
    #[error("Failed to encode roast payload: {0}")]
    TransportEncodeFailed(String),

    /// The encoded payload could not be turned back into a roast
    #[error("Failed to decode roast payload: {0}")]
    TransportDecodeFailed(String),

    /// A JSON request body was missing or could not be read
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// Apple Music credentials are not configured
    #[error("Apple Music is not configured")]
    AppleUnavailable,

    /// Signing the Apple developer token failed
    #[error("Failed to issue Apple developer token: {0}")]
    AppleTokenFailed(String),

    /// Binding or serving the HTTP listener failed
    #[error("HTTP server error: {0}")]
    Server(String),
}

impl RoastError {
    /// Message shown to the user on the error page.
    pub fn user_message(&self) -> String {
        match self {
            RoastError::MissingConfig(_)
            | RoastError::InvalidConfig { .. }
            | RoastError::Server(_) => {
                "The server is misconfigured. Please try again later.".to_string()
            }
            RoastError::OAuthDenied(code) => format!("Login was cancelled ({code})."),
            RoastError::OAuthExchangeFailed(_) => self.to_string(),
            RoastError::UpstreamAuthorizationDenied { .. } => {
                "Spotify refused access to your listening data. The app is probably still in \
                 development mode and your account is not on its allowlist yet."
                    .to_string()
            }
            RoastError::InsufficientData => {
                "We couldn't find any listening data to roast. Play some music, follow a few \
                 artists, then come back!"
                    .to_string()
            }
            RoastError::GenerationDegraded(_) => "The roast generator is taking a break.".to_string(),
            RoastError::TransportEncodeFailed(_) => "Failed to prepare roast data".to_string(),
            RoastError::TransportDecodeFailed(_) => "Failed to load roast data".to_string(),
            RoastError::InvalidRequest(_) => self.to_string(),
            RoastError::AppleUnavailable => {
                "Apple Music is not available on this server. Make sure Apple credentials are \
                 configured."
                    .to_string()
            }
            RoastError::AppleTokenFailed(_) => "Failed to get Apple Music token.".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RoastError::MissingConfig(_)
            | RoastError::InvalidConfig { .. }
            | RoastError::AppleTokenFailed(_)
            | RoastError::TransportEncodeFailed(_)
            | RoastError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RoastError::OAuthDenied(_) => StatusCode::UNAUTHORIZED,
            RoastError::OAuthExchangeFailed(_) | RoastError::GenerationDegraded(_) => {
                StatusCode::BAD_GATEWAY
            }
            RoastError::UpstreamAuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            RoastError::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
            RoastError::TransportDecodeFailed(_) | RoastError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            RoastError::AppleUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RoastError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.user_message() }))).into_response()
    }
}
