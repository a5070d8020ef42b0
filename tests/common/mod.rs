#![allow(dead_code)]

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};
use tasteroast::{
    config::Config, error::RoastError, roast::generate::TextGenerator,
    spotify::fetch::UpstreamRequest,
};

/// Canned answer of the stub Spotify server.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Text(&'static str),
    RawJson(&'static str),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(v) => Json(v).into_response(),
            Reply::Status(code) => StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
            Reply::Text(t) => t.into_response(),
            Reply::RawJson(raw) => (
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                raw,
            )
                .into_response(),
        }
    }
}

/// Key of a request in the stub: path plus `time_range` when present.
pub fn reply_key(uri: &Uri) -> String {
    let time_range = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .find(|kv| kv.starts_with("time_range="));
    match time_range {
        Some(tr) => format!("{}?{}", uri.path(), tr),
        None => uri.path().to_string(),
    }
}

async fn stub_handler(State(replies): State<Arc<HashMap<String, Reply>>>, uri: Uri) -> Response {
    replies
        .get(&reply_key(&uri))
        .cloned()
        .unwrap_or(Reply::Status(404))
        .into_response()
}

/// Serves `replies` keyed by [`reply_key`] on a random local port.
pub async fn spawn_stub(replies: HashMap<String, Reply>) -> String {
    spawn(Router::new().fallback(stub_handler).with_state(Arc::new(replies))).await
}

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Stub key under `/v1` for a fan-out request.
pub fn request_key(req: &UpstreamRequest) -> String {
    let path = req.path.split('?').collect::<Vec<_>>();
    let time_range = path
        .get(1)
        .and_then(|q| q.split('&').find(|kv| kv.starts_with("time_range=")));
    match time_range {
        Some(tr) => format!("/v1{}?{}", path[0], tr),
        None => format!("/v1{}", path[0]),
    }
}

pub fn artist_json(name: &str, genres: &[&str], popularity: u32) -> Value {
    json!({ "name": name, "genres": genres, "popularity": popularity })
}

pub fn track_json(name: &str, artist: &str, popularity: u32) -> Value {
    json!({ "name": name, "artists": [{ "name": artist }], "popularity": popularity })
}

pub fn followed_page(artists: Vec<Value>) -> Value {
    json!({ "artists": { "items": artists } })
}

pub fn page(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

pub fn track_item_page(tracks: Vec<Value>) -> Value {
    page(tracks.into_iter().map(|t| json!({ "track": t })).collect())
}

pub fn playlist_json(name: &str, total: u32, public: bool) -> Value {
    json!({ "name": name, "tracks": { "total": total }, "public": public })
}

pub fn gemini_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

/// Generator that counts calls and answers with a fixed reply.
pub struct StubGenerator {
    calls: AtomicUsize,
    reply: Result<Value, RoastError>,
}

impl StubGenerator {
    pub fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Ok(reply),
        })
    }

    pub fn failing(err: RoastError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Err(err),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Value, RoastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

pub fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Minimal valid configuration pointing Spotify at `spotify_base`.
pub fn test_config(spotify_base: &str) -> Config {
    let token_url = format!("{spotify_base}/api/token");
    let api_url = format!("{spotify_base}/v1");
    let vars = env_map(&[
        ("SPOTIFY_CLIENT_ID", "client-id"),
        ("SPOTIFY_CLIENT_SECRET", "client-secret"),
        ("GEMINI_API_KEY", "gemini-key"),
        ("CLIENT_URL", "http://localhost:5173"),
        ("SPOTIFY_API_TOKEN_URL", &token_url),
        ("SPOTIFY_API_URL", &api_url),
    ]);
    Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

/// Records the `stage` field of every tracing event, in order.
#[derive(Clone, Default)]
pub struct StageLog {
    stages: Arc<Mutex<Vec<String>>>,
}

impl StageLog {
    /// Installs the recorder for the current thread until the guard drops.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let log = Self::default();
        let guard = tracing::subscriber::set_default(registry().with(log.clone()));
        (log, guard)
    }

    pub fn stages(&self) -> Vec<String> {
        self.stages.lock().unwrap().clone()
    }
}

struct StageField(Option<String>);

impl Visit for StageField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "stage" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for StageLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut field = StageField(None);
        event.record(&mut field);
        if let Some(stage) = field.0 {
            self.stages.lock().unwrap().push(stage);
        }
    }
}
