use tasteroast::{
    error::RoastError,
    roast::transport::{self, SUMMARY_ARTISTS, SUMMARY_PLAYLISTS, SUMMARY_TRACKS},
    types::{
        Artist, DisplaySummary, ListeningProfile, Playlist, RoastResult, Service, SummaryTrack,
        TimeWindows, Track,
    },
};

fn artist(name: &str) -> Artist {
    Artist {
        name: name.to_string(),
        genres: vec![],
        popularity: 50,
    }
}

fn track(name: &str, by: &str) -> Track {
    Track {
        name: name.to_string(),
        primary_artist: by.to_string(),
        popularity: Some(50),
    }
}

fn sample_result() -> RoastResult {
    RoastResult {
        roast: "Yeh playlist sun ke toh mere kaan bhi resign kar gaye 🎧".to_string(),
        summary: DisplaySummary {
            service: Service::Spotify,
            artists: vec!["Arijit Singh".into(), "Badshah".into()],
            tracks: vec![SummaryTrack {
                name: "Kesariya".into(),
                artist: "Arijit Singh".into(),
            }],
            playlists: vec!["Gym Motivation (never used)".into()],
            total_records: 4,
        },
    }
}

#[test]
fn test_encode_decode_preserves_result() {
    let result = sample_result();
    let encoded = transport::encode(&result).unwrap();

    assert!(
        encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert_eq!(transport::decode(&encoded).unwrap(), result);
}

#[test]
fn test_decode_tolerates_padding_and_whitespace() {
    let result = sample_result();
    let encoded = transport::encode(&result).unwrap();

    assert_eq!(transport::decode(&format!("{encoded}==")).unwrap(), result);
    assert_eq!(transport::decode(&format!(" {encoded}\n")).unwrap(), result);
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        transport::decode("%%%not-base64%%%"),
        Err(RoastError::TransportDecodeFailed(_))
    ));

    // valid base64url, but not a roast
    assert!(matches!(
        transport::decode("eyJmb28iOjF9"),
        Err(RoastError::TransportDecodeFailed(_))
    ));
}

#[test]
fn test_wire_form_uses_camel_case() {
    let encoded = transport::encode(&sample_result()).unwrap();
    let bytes = base64::Engine::decode(
        &base64::engine::general_purpose::URL_SAFE_NO_PAD,
        encoded.as_bytes(),
    )
    .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["summary"]["totalRecords"], 4);
    assert_eq!(json["summary"]["service"], "spotify");
}

#[test]
fn test_summary_prefers_followed_artists_and_dedupes() {
    let profile = ListeningProfile {
        followed_artists: vec![artist("Arijit Singh"), artist("Badshah")],
        top_artists: TimeWindows {
            short_term: vec![artist("Badshah"), artist("Diljit Dosanjh")],
            medium_term: vec![artist("Arijit Singh")],
            long_term: vec![artist("AP Dhillon")],
        },
        top_tracks: TimeWindows {
            short_term: vec![track("Kesariya", "Arijit Singh")],
            medium_term: vec![track("Kesariya", "Arijit Singh")],
            long_term: vec![],
        },
        recently_played: vec![track("Lover", "Diljit Dosanjh")],
        ..Default::default()
    };

    let summary = transport::summarize(Service::Spotify, &profile);

    assert_eq!(
        summary.artists,
        vec!["Arijit Singh", "Badshah", "Diljit Dosanjh", "AP Dhillon"]
    );
    assert_eq!(
        summary.tracks,
        vec![
            SummaryTrack {
                name: "Kesariya".into(),
                artist: "Arijit Singh".into()
            },
            SummaryTrack {
                name: "Lover".into(),
                artist: "Diljit Dosanjh".into()
            },
        ]
    );
    assert_eq!(summary.total_records, profile.total_records());
}

#[test]
fn test_summary_is_capped() {
    let profile = ListeningProfile {
        followed_artists: (0..40).map(|i| artist(&format!("Artist {i}"))).collect(),
        saved_tracks: (0..40).map(|i| track(&format!("Track {i}"), "X")).collect(),
        playlists: (0..40)
            .map(|i| Playlist {
                name: format!("Playlist {i}"),
                track_count: i,
                is_public: true,
            })
            .collect(),
        ..Default::default()
    };

    let summary = transport::summarize(Service::Apple, &profile);

    assert_eq!(summary.artists.len(), SUMMARY_ARTISTS);
    assert_eq!(summary.tracks.len(), SUMMARY_TRACKS);
    assert_eq!(summary.playlists.len(), SUMMARY_PLAYLISTS);
    assert_eq!(summary.total_records, 120);
    assert_eq!(summary.service, Service::Apple);
}

#[test]
fn test_encode_and_decode_failures_are_distinct() {
    let encode = RoastError::TransportEncodeFailed("boom".into());
    let decode = RoastError::TransportDecodeFailed("boom".into());

    assert_eq!(encode.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(decode.status(), axum::http::StatusCode::BAD_REQUEST);
    assert_ne!(encode.user_message(), decode.user_message());
    assert!(encode.to_string().starts_with("Failed to encode"));
}
