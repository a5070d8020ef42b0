//! Configuration management for tasteroast.
//!
//! Configuration is read from environment variables, optionally seeded from a
//! `.env` file. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`tasteroast/.env`)
//! 4. Application defaults (where applicable)
//!
//! Required values that are missing make [`Config::from_env`] fail with
//! [`RoastError::MissingConfig`]; the binary treats this as fatal at startup.

use std::{env, path::PathBuf, time::Duration};

use crate::error::RoastError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
pub const DEFAULT_SCOPE: &str = "user-follow-read user-top-read user-read-recently-played playlist-read-private user-library-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Loads environment variables from a `.env` file.
///
/// A `.env` in the working directory wins. Otherwise the file is looked up in
/// the platform-specific local data directory under `tasteroast/.env`:
/// - Linux: `~/.local/share/tasteroast/.env`
/// - macOS: `~/Library/Application Support/tasteroast/.env`
/// - Windows: `%LOCALAPPDATA%/tasteroast/.env`
///
/// A missing file is not an error, the variables may come from the process
/// environment directly.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    if dotenv::dotenv().is_ok() {
        return Ok(());
    }

    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tasteroast/.env");
    path
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

/// Signing material for Apple Music developer tokens.
#[derive(Debug, Clone)]
pub struct AppleCredentials {
    pub team_id: String,
    pub key_id: String,
    /// PKCS#8 PEM of the MusicKit private key
    pub private_key: String,
}

impl AppleCredentials {
    /// All three of `APPLE_TEAM_ID`, `APPLE_KEY_ID` and `APPLE_PRIVATE_KEY`,
    /// or `None`. Literal `\n` sequences in the key are unescaped.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Some(Self {
            team_id: get("APPLE_TEAM_ID")?,
            key_id: get("APPLE_KEY_ID")?,
            private_key: get("APPLE_PRIVATE_KEY")?.replace("\\n", "\n"),
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub client_url: String,
    pub upstream_timeout: Duration,
    pub spotify: SpotifyConfig,
    pub gemini: GeminiConfig,
    pub apple: Option<AppleCredentials>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, RoastError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RoastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| get(name).ok_or_else(|| RoastError::MissingConfig(name.to_string()));
        let or_default = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| RoastError::InvalidConfig {
                name: "PORT".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| RoastError::InvalidConfig {
                name: "UPSTREAM_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let spotify = SpotifyConfig {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: trim_slash(or_default("SPOTIFY_API_URL", DEFAULT_API_URL)),
        };

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_url: trim_slash(or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)),
        };

        Ok(Self {
            port,
            client_url: trim_slash(or_default("CLIENT_URL", DEFAULT_CLIENT_URL)),
            upstream_timeout: Duration::from_secs(timeout_secs),
            spotify,
            gemini,
            apple: AppleCredentials::from_lookup(&lookup),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
