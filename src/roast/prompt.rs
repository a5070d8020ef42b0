use std::fmt::Write;

use crate::types::{Artist, ListeningProfile, Playlist, Service, Track};

pub const FOLLOWED_ARTISTS_LIMIT: usize = 20;
pub const TOP_ARTISTS_LIMIT: usize = 10;
pub const TOP_TRACKS_LIMIT: usize = 10;
pub const RECENTLY_PLAYED_LIMIT: usize = 15;
pub const HEAVY_ROTATION_LIMIT: usize = 10;
pub const PLAYLISTS_LIMIT: usize = 15;
pub const SAVED_TRACKS_LIMIT: usize = 15;

pub const EMPTY_SECTION: &str = "No data available for this section.";
pub const SIGN_OFF: &str = "Roasted with love (and zero mercy) by tasteroast";

const PERSONA: &str = "Roast my music taste brutally. Be sarcastic. No compliments. \
Use Hindi as well, it should be very desi. You are a savage stand-up comic from Delhi \
who has heard every playlist on earth and liked none of them.";

fn section<T>(title: &str, records: &[T], limit: usize, line: impl Fn(&T) -> String) -> String {
    let mut out = format!("## {title}\n");
    if records.is_empty() {
        out.push_str(EMPTY_SECTION);
        out.push('\n');
        return out;
    }

    for (i, record) in records.iter().take(limit).enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, line(record));
    }
    out
}

pub fn artist_line(artist: &Artist) -> String {
    let genres = if artist.genres.is_empty() {
        "Unknown".to_string()
    } else {
        artist.genres.join(", ")
    };
    format!(
        "{} (Genres: {}, Popularity: {})",
        artist.name, genres, artist.popularity
    )
}

pub fn track_line(track: &Track) -> String {
    match track.popularity {
        Some(p) => format!("{} by {} (Popularity: {})", track.name, track.primary_artist, p),
        None => format!("{} by {}", track.name, track.primary_artist),
    }
}

pub fn playlist_line(playlist: &Playlist) -> String {
    format!(
        "{} ({} tracks, {})",
        playlist.name,
        playlist.track_count,
        if playlist.is_public { "public" } else { "private" }
    )
}

pub fn artist_section(title: &str, artists: &[Artist], limit: usize) -> String {
    section(title, artists, limit, artist_line)
}

pub fn track_section(title: &str, tracks: &[Track], limit: usize) -> String {
    section(title, tracks, limit, track_line)
}

pub fn playlist_section(title: &str, playlists: &[Playlist], limit: usize) -> String {
    section(title, playlists, limit, playlist_line)
}

/// Renders the instruction sent to the generation model.
///
/// Deterministic for a given profile. Every section is always present, empty
/// collections render [`EMPTY_SECTION`].
pub fn build_prompt(service: Service, profile: &ListeningProfile) -> String {
    let mut sections = vec![artist_section(
        "Artists I follow",
        &profile.followed_artists,
        FOLLOWED_ARTISTS_LIMIT,
    )];

    for (window, artists) in profile.top_artists.labelled() {
        sections.push(artist_section(
            &format!("My top artists ({window})"),
            artists,
            TOP_ARTISTS_LIMIT,
        ));
    }
    for (window, tracks) in profile.top_tracks.labelled() {
        sections.push(track_section(
            &format!("My top tracks ({window})"),
            tracks,
            TOP_TRACKS_LIMIT,
        ));
    }

    sections.push(track_section(
        "Recently played",
        &profile.recently_played,
        RECENTLY_PLAYED_LIMIT,
    ));
    sections.push(track_section(
        "Heavy rotation",
        &profile.heavy_rotation,
        HEAVY_ROTATION_LIMIT,
    ));
    sections.push(playlist_section(
        "My playlists",
        &profile.playlists,
        PLAYLISTS_LIMIT,
    ));
    sections.push(track_section(
        "Saved tracks",
        &profile.saved_tracks,
        SAVED_TRACKS_LIMIT,
    ));

    format!(
        "{PERSONA}\n\nHere is my {service} listening data:\n\n{body}\n\
         Give me a brutal roast in a mix of Hindi and English. Pick on specific artists, \
         tracks and playlist names. Keep it under 250 words.\n\
         End with exactly this line: {SIGN_OFF}",
        body = sections.join("\n"),
    )
}
