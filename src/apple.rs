//! Apple Music support.
//!
//! Apple offers no server-side code exchange for user data: the browser runs
//! MusicKit with a developer token issued here, collects the listening data
//! itself and posts it back as an [`crate::types::AppleMusicBundle`].

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use crate::{config::AppleCredentials, error::RoastError};

/// Apple accepts developer tokens valid for at most six months.
pub const DEVELOPER_TOKEN_TTL_SECS: i64 = 15_777_000;

#[derive(Debug, Serialize)]
struct DeveloperClaims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs an ES256 MusicKit developer token.
///
/// # Errors
///
/// [`RoastError::AppleTokenFailed`] when the private key is not a valid EC
/// PEM or signing fails.
pub fn developer_token(credentials: &AppleCredentials) -> Result<String, RoastError> {
    let key = EncodingKey::from_ec_pem(credentials.private_key.as_bytes())
        .map_err(|e| RoastError::AppleTokenFailed(e.to_string()))?;

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(credentials.key_id.clone());

    let iat = Utc::now().timestamp();
    let claims = DeveloperClaims {
        iss: &credentials.team_id,
        iat,
        exp: iat + DEVELOPER_TOKEN_TTL_SECS,
    };

    encode(&header, &claims, &key).map_err(|e| RoastError::AppleTokenFailed(e.to_string()))
}
