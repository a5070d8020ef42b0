//! Maps raw upstream payloads into [`Artist`], [`Track`] and [`Playlist`].
//!
//! All defaulting of missing upstream fields happens here:
//! - a missing or blank name becomes [`UNKNOWN`]
//! - a missing genre list becomes empty, `null` genres are dropped, longer
//!   lists keep the first [`MAX_GENRES`]
//! - a missing artist popularity becomes 0, track popularity stays unknown
//! - popularity above 100 is clamped
//! - a missing playlist track total becomes 0, a missing `public` flag `false`
//! - `null` list items are skipped
//! - a list item that does not decode is skipped with a warning, its siblings
//!   are kept

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::{
    spotify::fetch::{Collection, Fetched, UpstreamOutcome},
    types::{
        AppleItem, AppleMusicBundle, ApplePlaylist, Artist, FollowedArtistsResponse,
        ListeningProfile, Page, Playlist, SpotifyArtist, SpotifyPlaylist, SpotifyTrack, Track,
        TrackItem,
    },
};

pub const UNKNOWN: &str = "Unknown";
pub const MAX_GENRES: usize = 3;

fn name_or_unknown(name: Option<&String>) -> String {
    match name.map(|n| n.trim()) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn clamp_popularity(popularity: u32) -> u8 {
    popularity.min(100) as u8
}

pub fn artist(raw: &SpotifyArtist) -> Artist {
    Artist {
        name: name_or_unknown(raw.name.as_ref()),
        genres: raw
            .genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flatten()
            .take(MAX_GENRES)
            .cloned()
            .collect(),
        popularity: clamp_popularity(raw.popularity.unwrap_or(0)),
    }
}

pub fn track(raw: &SpotifyTrack) -> Track {
    let primary_artist = raw
        .artists
        .as_deref()
        .and_then(|artists| artists.first())
        .and_then(|a| a.name.as_ref());

    Track {
        name: name_or_unknown(raw.name.as_ref()),
        primary_artist: name_or_unknown(primary_artist),
        popularity: raw.popularity.map(clamp_popularity),
    }
}

pub fn playlist(raw: &SpotifyPlaylist) -> Playlist {
    Playlist {
        name: name_or_unknown(raw.name.as_ref()),
        track_count: raw.tracks.as_ref().and_then(|t| t.total).unwrap_or(0),
        is_public: raw.public.unwrap_or(false),
    }
}

/// Decodes every item of `page` on its own. `null` items are skipped
/// silently, items of an unexpected shape with a warning.
fn items<T: DeserializeOwned>(page: Page) -> impl Iterator<Item = T> {
    page.items
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.is_null())
        .filter_map(|item| match T::deserialize(&item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping undecodable item: {}", e);
                None
            }
        })
}

pub fn followed_artists(json: &Value) -> Result<Vec<Artist>, serde_json::Error> {
    let res = FollowedArtistsResponse::deserialize(json)?;
    Ok(items::<SpotifyArtist>(res.artists.unwrap_or_default())
        .map(|a| artist(&a))
        .collect())
}

pub fn artist_page(json: &Value) -> Result<Vec<Artist>, serde_json::Error> {
    let page = Page::deserialize(json)?;
    Ok(items::<SpotifyArtist>(page).map(|a| artist(&a)).collect())
}

pub fn track_page(json: &Value) -> Result<Vec<Track>, serde_json::Error> {
    let page = Page::deserialize(json)?;
    Ok(items::<SpotifyTrack>(page).map(|t| track(&t)).collect())
}

/// Pages whose items wrap the track, like play history and saved tracks.
pub fn track_item_page(json: &Value) -> Result<Vec<Track>, serde_json::Error> {
    let page = Page::deserialize(json)?;
    Ok(items::<TrackItem>(page)
        .filter_map(|item| item.track)
        .map(|t| track(&t))
        .collect())
}

pub fn playlist_page(json: &Value) -> Result<Vec<Playlist>, serde_json::Error> {
    let page = Page::deserialize(json)?;
    Ok(items::<SpotifyPlaylist>(page).map(|p| playlist(&p)).collect())
}

/// Assembles a profile from the fan-out results.
///
/// Failed requests and payloads that do not decode leave their collection
/// empty.
pub fn profile_from_outcomes(fetched: &[Fetched]) -> ListeningProfile {
    let mut profile = ListeningProfile::default();

    for f in fetched {
        let UpstreamOutcome::Success(json) = &f.outcome else {
            continue;
        };

        let decoded = match f.collection {
            Collection::FollowedArtists => {
                followed_artists(json).map(|v| profile.followed_artists.extend(v))
            }
            Collection::TopArtistsShort => {
                artist_page(json).map(|v| profile.top_artists.short_term.extend(v))
            }
            Collection::TopArtistsMedium => {
                artist_page(json).map(|v| profile.top_artists.medium_term.extend(v))
            }
            Collection::TopArtistsLong => {
                artist_page(json).map(|v| profile.top_artists.long_term.extend(v))
            }
            Collection::TopTracksShort => {
                track_page(json).map(|v| profile.top_tracks.short_term.extend(v))
            }
            Collection::TopTracksMedium => {
                track_page(json).map(|v| profile.top_tracks.medium_term.extend(v))
            }
            Collection::TopTracksLong => {
                track_page(json).map(|v| profile.top_tracks.long_term.extend(v))
            }
            Collection::RecentlyPlayed => {
                track_item_page(json).map(|v| profile.recently_played.extend(v))
            }
            Collection::Playlists => playlist_page(json).map(|v| profile.playlists.extend(v)),
            Collection::SavedTracks => {
                track_item_page(json).map(|v| profile.saved_tracks.extend(v))
            }
        };

        if let Err(e) = decoded {
            warn!(collection = ?f.collection, "Discarding undecodable payload: {}", e);
        }
    }

    profile
}

fn apple_track(item: &AppleItem) -> Track {
    Track {
        name: name_or_unknown(item.name.as_ref()),
        primary_artist: name_or_unknown(item.artist.as_ref()),
        popularity: None,
    }
}

fn apple_playlist(item: &ApplePlaylist) -> Playlist {
    Playlist {
        name: name_or_unknown(item.name.as_ref()),
        track_count: item.track_count.unwrap_or(0),
        is_public: item.is_public.unwrap_or(false),
    }
}

/// Assembles a profile from a browser-side Apple Music bundle.
pub fn profile_from_apple(bundle: &AppleMusicBundle) -> ListeningProfile {
    let tracks = |items: &Option<Vec<Option<AppleItem>>>| -> Vec<Track> {
        items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(apple_track)
            .collect()
    };

    ListeningProfile {
        recently_played: tracks(&bundle.recently_played),
        heavy_rotation: tracks(&bundle.heavy_rotation),
        saved_tracks: tracks(&bundle.library_songs),
        playlists: bundle
            .playlists
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(apple_playlist)
            .collect(),
        ..Default::default()
    }
}
