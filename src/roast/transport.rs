//! Carries a finished roast across the redirect to the presentation layer.
//!
//! Wire form: compact JSON of [`RoastResult`], base64url without padding, so
//! it fits in a single query parameter.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    error::RoastError,
    types::{DisplaySummary, ListeningProfile, RoastResult, Service, SummaryTrack},
};

pub const SUMMARY_ARTISTS: usize = 12;
pub const SUMMARY_TRACKS: usize = 10;
pub const SUMMARY_PLAYLISTS: usize = 8;

/// Longest encoded payload that is still sent inline in the redirect URL.
pub const MAX_INLINE_PAYLOAD: usize = 6000;

/// Digest of the profile for display next to the roast.
///
/// Artists come from the followed list first, then from the top artists
/// (most recent window first), without duplicates. Tracks follow the same
/// rule over top tracks, heavy rotation, recently played and saved tracks.
pub fn summarize(service: Service, profile: &ListeningProfile) -> DisplaySummary {
    let mut artists: Vec<String> = Vec::new();
    let candidates = profile
        .followed_artists
        .iter()
        .chain(&profile.top_artists.short_term)
        .chain(&profile.top_artists.medium_term)
        .chain(&profile.top_artists.long_term);
    for artist in candidates {
        if artists.len() == SUMMARY_ARTISTS {
            break;
        }
        if !artists.contains(&artist.name) {
            artists.push(artist.name.clone());
        }
    }

    let mut tracks: Vec<SummaryTrack> = Vec::new();
    let candidates = profile
        .top_tracks
        .short_term
        .iter()
        .chain(&profile.top_tracks.medium_term)
        .chain(&profile.top_tracks.long_term)
        .chain(&profile.heavy_rotation)
        .chain(&profile.recently_played)
        .chain(&profile.saved_tracks);
    for track in candidates {
        if tracks.len() == SUMMARY_TRACKS {
            break;
        }
        let entry = SummaryTrack {
            name: track.name.clone(),
            artist: track.primary_artist.clone(),
        };
        if !tracks.contains(&entry) {
            tracks.push(entry);
        }
    }

    DisplaySummary {
        service,
        artists,
        tracks,
        playlists: profile
            .playlists
            .iter()
            .take(SUMMARY_PLAYLISTS)
            .map(|p| p.name.clone())
            .collect(),
        total_records: profile.total_records(),
    }
}

pub fn encode(result: &RoastResult) -> Result<String, RoastError> {
    let json = serde_json::to_string(result)
        .map_err(|e| RoastError::TransportEncodeFailed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Inverse of [`encode`]. Trailing `=` padding is tolerated.
pub fn decode(encoded: &str) -> Result<RoastResult, RoastError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim().trim_end_matches('='))
        .map_err(|e| RoastError::TransportDecodeFailed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| RoastError::TransportDecodeFailed(e.to_string()))
}
