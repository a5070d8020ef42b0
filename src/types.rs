use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Successful answer of the Spotify token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error answer of the Spotify token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

// Raw Spotify payloads. Every field is optional because Spotify omits or nulls
// fields freely; the defaults are applied in one place, `roast::normalize`.

/// A page of any Spotify list endpoint. Items stay untyped so that each one
/// is decoded on its own, see `roast::normalize`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowedArtistsResponse {
    #[serde(default)]
    pub artists: Option<Page>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<SpotifyArtist>>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

/// Wrapper used by both `recently-played` and saved tracks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackItem {
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyPlaylist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracks>,
    #[serde(default)]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub total: Option<u32>,
}

/// Listening data collected by MusicKit in the browser and posted as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleMusicBundle {
    #[serde(default)]
    pub recently_played: Option<Vec<Option<AppleItem>>>,
    #[serde(default)]
    pub heavy_rotation: Option<Vec<Option<AppleItem>>>,
    #[serde(default)]
    pub playlists: Option<Vec<Option<ApplePlaylist>>>,
    #[serde(default)]
    pub library_songs: Option<Vec<Option<AppleItem>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppleItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePlaylist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

// Normalized records

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub primary_artist: String,
    pub popularity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub track_count: u32,
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Spotify,
    Apple,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Spotify => write!(f, "Spotify"),
            Service::Apple => write!(f, "Apple Music"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindows<T> {
    pub short_term: Vec<T>,
    pub medium_term: Vec<T>,
    pub long_term: Vec<T>,
}

impl<T> Default for TimeWindows<T> {
    fn default() -> Self {
        Self {
            short_term: Vec::new(),
            medium_term: Vec::new(),
            long_term: Vec::new(),
        }
    }
}

impl<T> TimeWindows<T> {
    pub fn len(&self) -> usize {
        self.short_term.len() + self.medium_term.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Windows from most recent to all-time, with their prompt labels.
    pub fn labelled(&self) -> [(&'static str, &[T]); 3] {
        [
            ("last 4 weeks", self.short_term.as_slice()),
            ("last 6 months", self.medium_term.as_slice()),
            ("all time", self.long_term.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListeningProfile {
    pub followed_artists: Vec<Artist>,
    pub top_artists: TimeWindows<Artist>,
    pub top_tracks: TimeWindows<Track>,
    pub recently_played: Vec<Track>,
    pub heavy_rotation: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub saved_tracks: Vec<Track>,
}

impl ListeningProfile {
    pub fn total_records(&self) -> usize {
        self.followed_artists.len()
            + self.top_artists.len()
            + self.top_tracks.len()
            + self.recently_played.len()
            + self.heavy_rotation.len()
            + self.playlists.len()
            + self.saved_tracks.len()
    }
}

// Transport

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTrack {
    pub name: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySummary {
    pub service: Service,
    pub artists: Vec<String>,
    pub tracks: Vec<SummaryTrack>,
    pub playlists: Vec<String>,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastResult {
    pub roast: String,
    pub summary: DisplaySummary,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub kind: String,
    pub name: String,
}
