use std::time::Duration;

use futures::future::join_all;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

/// Which collection of the listening profile a request feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    FollowedArtists,
    TopArtistsShort,
    TopArtistsMedium,
    TopArtistsLong,
    TopTracksShort,
    TopTracksMedium,
    TopTracksLong,
    RecentlyPlayed,
    Playlists,
    SavedTracks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub collection: Collection,
    pub path: &'static str,
    pub limit: u32,
}

impl UpstreamRequest {
    pub const fn new(collection: Collection, path: &'static str, limit: u32) -> Self {
        Self {
            collection,
            path,
            limit,
        }
    }

    pub fn url(&self, api_url: &str) -> String {
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{api_url}{path}{sep}limit={limit}", path = self.path, limit = self.limit)
    }
}

/// The fixed fan-out issued for every Spotify roast.
pub const DEFAULT_REQUESTS: [UpstreamRequest; 10] = [
    UpstreamRequest::new(Collection::FollowedArtists, "/me/following?type=artist", 50),
    UpstreamRequest::new(Collection::TopArtistsShort, "/me/top/artists?time_range=short_term", 20),
    UpstreamRequest::new(Collection::TopArtistsMedium, "/me/top/artists?time_range=medium_term", 20),
    UpstreamRequest::new(Collection::TopArtistsLong, "/me/top/artists?time_range=long_term", 20),
    UpstreamRequest::new(Collection::TopTracksShort, "/me/top/tracks?time_range=short_term", 20),
    UpstreamRequest::new(Collection::TopTracksMedium, "/me/top/tracks?time_range=medium_term", 20),
    UpstreamRequest::new(Collection::TopTracksLong, "/me/top/tracks?time_range=long_term", 20),
    UpstreamRequest::new(Collection::RecentlyPlayed, "/me/player/recently-played", 50),
    UpstreamRequest::new(Collection::Playlists, "/me/playlists", 50),
    UpstreamRequest::new(Collection::SavedTracks, "/me/tracks", 50),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Forbidden,
    NotFound,
    /// Any other non-2xx status
    Status(u16),
    Malformed(String),
    Network(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Success(Value),
    Failure(FailureKind),
}

impl UpstreamOutcome {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, UpstreamOutcome::Failure(FailureKind::Forbidden))
    }
}

/// Result of one request of the fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub collection: Collection,
    pub outcome: UpstreamOutcome,
}

/// Issues the read-only Spotify Web API calls behind a roast.
#[derive(Debug, Clone)]
pub struct SpotifyFetcher {
    client: Client,
    api_url: String,
}

impl SpotifyFetcher {
    /// Builds a fetcher whose every call is bounded by `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Fires every request concurrently and waits for all of them to settle.
    ///
    /// Never fails: each request reports its own [`UpstreamOutcome`], in the
    /// order of `requests`.
    pub async fn fetch_all(&self, token: &str, requests: &[UpstreamRequest]) -> Vec<Fetched> {
        let calls = requests.iter().map(|req| async move {
            let outcome = self.fetch_one(token, req).await;
            if let UpstreamOutcome::Failure(kind) = &outcome {
                warn!(collection = ?req.collection, failure = ?kind, "Upstream request failed");
            }
            Fetched {
                collection: req.collection,
                outcome,
            }
        });

        join_all(calls).await
    }

    async fn fetch_one(&self, token: &str, req: &UpstreamRequest) -> UpstreamOutcome {
        let url = req.url(&self.api_url);
        debug!(%url, "GET");

        let response = match self.client.get(&url).bearer_auth(token).send().await {
            Ok(resp) => resp,
            Err(err) => return UpstreamOutcome::Failure(FailureKind::Network(err.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return UpstreamOutcome::Failure(match status {
                StatusCode::FORBIDDEN => FailureKind::Forbidden,
                StatusCode::NOT_FOUND => FailureKind::NotFound,
                other => FailureKind::Status(other.as_u16()),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            return UpstreamOutcome::Failure(FailureKind::Malformed(
                "response is not JSON".to_string(),
            ));
        }

        match response.json::<Value>().await {
            Ok(json) => UpstreamOutcome::Success(json),
            Err(err) if err.is_decode() => {
                UpstreamOutcome::Failure(FailureKind::Malformed(err.to_string()))
            }
            Err(err) => UpstreamOutcome::Failure(FailureKind::Network(err.to_string())),
        }
    }
}
