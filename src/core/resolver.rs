use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CatalogTrack, Track, TrackSearchResult, VideoEntry};
use crate::sources::{MusicCatalog, VideoSearch};

static COVER_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"w\d+-h\d+").expect("cover size pattern is valid"));

/// Edge length requested for catalog cover art.
pub const COVER_SIZE: u32 = 600;

/// Search both backends and merge their rankings index by index.
///
/// Either backend failing fails the whole search.
pub fn search_track(
    catalog: &dyn MusicCatalog,
    videos: &dyn VideoSearch,
    query: &str,
) -> Result<Vec<TrackSearchResult>> {
    if query.trim().is_empty() {
        return Err(Error::MissingQuery);
    }

    let tracks = catalog.search(query)?;
    let entries = videos.search(query)?;
    debug!(
        query,
        catalog = catalog.name(),
        catalog_hits = tracks.len(),
        videos = videos.name(),
        video_hits = entries.len(),
        "merging search results"
    );

    Ok(merge_results(query, tracks, entries))
}

/// Pair the two lists by position, truncated to the shorter one. Position
/// `i` yields the catalog track when its title contains the query
/// (case-insensitive), otherwise the video entry at `i`. The two rankings
/// are not aligned, so a pair need not describe the same song.
pub fn merge_results(
    query: &str,
    tracks: Vec<CatalogTrack>,
    entries: Vec<VideoEntry>,
) -> Vec<TrackSearchResult> {
    let needle = query.to_lowercase();
    tracks
        .into_iter()
        .zip(entries)
        .map(|(track, entry)| {
            if track.title.to_lowercase().contains(&needle) {
                TrackSearchResult::MusicCatalog(from_catalog(track))
            } else {
                TrackSearchResult::VideoSearch(from_video(entry))
            }
        })
        .collect()
}

fn from_catalog(track: CatalogTrack) -> Track {
    let artist = track.artists.join(" ");
    Track {
        title: format!("{} - {}", track.title, artist),
        artist,
        video_id: track.video_id,
        album: track.album.unwrap_or_default(),
        duration: track.duration,
        cover_url: upscale_cover(&track.thumbnail_url, COVER_SIZE),
    }
}

fn from_video(entry: VideoEntry) -> Track {
    Track {
        album: entry.title.clone(),
        title: entry.title,
        artist: entry.author,
        video_id: entry.video_id,
        duration: entry.duration,
        cover_url: entry.thumbnail_url,
    }
}

/// Rewrite the `wNN-hNN` size segment of a resizable thumbnail URL.
pub fn upscale_cover(url: &str, size: u32) -> String {
    COVER_SIZE_RE
        .replace(url, format!("w{size}-h{size}").as_str())
        .into_owned()
}
