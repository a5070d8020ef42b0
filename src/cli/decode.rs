use tabled::Table;

use crate::{
    error, info,
    roast::transport,
    types::{SummaryTableRow, SummaryTrack},
};

/// Prints an encoded roast payload the way the presentation layer shows it.
pub fn decode(payload: &str) {
    let result = match transport::decode(payload) {
        Ok(r) => r,
        Err(e) => error!("{}", e),
    };

    let summary = &result.summary;
    info!(
        "{} roast based on {} records",
        summary.service, summary.total_records
    );
    println!("\n{}\n", result.roast);

    let rows = summary
        .artists
        .iter()
        .map(|name| SummaryTableRow {
            kind: "artist".to_string(),
            name: name.clone(),
        })
        .chain(summary.tracks.iter().map(|SummaryTrack { name, artist }| SummaryTableRow {
            kind: "track".to_string(),
            name: format!("{name} - {artist}"),
        }))
        .chain(summary.playlists.iter().map(|name| SummaryTableRow {
            kind: "playlist".to_string(),
            name: name.clone(),
        }));

    println!("{}", Table::new(rows));
}
