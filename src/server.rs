use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api,
    config::Config,
    error::RoastError,
    management::{DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL, RoastStore, SystemClock},
    roast::{RoastPipeline, generate::GeminiClient},
    spotify::fetch::SpotifyFetcher,
};

/// Generation is slower than the Spotify reads, so it gets its own budget.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub pipeline: Arc<RoastPipeline>,
    pub store: Arc<RoastStore>,
}

impl AppState {
    /// Wires the production collaborators from `config`.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.upstream_timeout).build()?;
        let generation_http = Client::builder().timeout(GENERATION_TIMEOUT).build()?;

        let fetcher = SpotifyFetcher::with_client(http.clone(), config.spotify.api_url.clone());
        let generator = Arc::new(GeminiClient::new(generation_http, &config.gemini));
        let pipeline = RoastPipeline::new(fetcher, generator);

        Ok(Self {
            config: Arc::new(config),
            http,
            pipeline: Arc::new(pipeline),
            store: Arc::new(RoastStore::new(DEFAULT_TTL, Arc::new(SystemClock))),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(api::login))
        .route("/api/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/api/apple/token", get(api::apple_token))
        .route("/api/apple/roast", post(api::apple_roast))
        .route("/api/roast/{id}", get(api::stored_roast))
        .route("/api/health", get(api::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds the configured port and serves until the process is stopped.
pub async fn start_api_server(state: AppState) -> Result<(), RoastError> {
    let addr = SocketAddr::from_str(&state.config.server_addr()).map_err(|e| {
        RoastError::InvalidConfig {
            name: "PORT".to_string(),
            reason: e.to_string(),
        }
    })?;

    let sweeper = Arc::clone(&state.store).spawn_sweeper(DEFAULT_SWEEP_INTERVAL);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RoastError::Server(format!("cannot bind {addr}: {e}")))?;
    info!("Listening on {}", addr);

    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served.map_err(|e| RoastError::Server(e.to_string()))
}
