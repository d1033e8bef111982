//! Stream → transcode → tag.
//!
//! Every call writes exactly one randomly named file into the temp directory
//! and hands it to the caller. Nothing is cleaned up on failure; a partial
//! file may be left behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{parser, resolver, tagger};
use crate::error::{Error, Result};
use crate::models::{Metadata, Mp3Result, Mp3Settings, MusicQuery, MusicResult, VideoMeta};
use crate::sources::{BufferFetcher, Sources};

/// Audio-only AAC format requested from the platform.
pub const AUDIO_ITAG: u32 = 140;

/// `<temp_dir>/<6 hex chars>.mp3`. Collisions are improbable but not
/// prevented.
pub fn temp_song_path(temp_dir: &Path) -> PathBuf {
    let bytes: [u8; 3] = rand::random();
    let name: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    temp_dir.join(format!("{}.mp3", name))
}

/// Stream the audio of `url`, transcode it to a fresh temp file and return
/// its path and size.
fn transcode_to_temp(sources: &Sources, temp_dir: &Path, url: &str) -> Result<(PathBuf, u64)> {
    fs::create_dir_all(temp_dir)?;
    let path = temp_song_path(temp_dir);

    let mut stream = sources.video_source.audio_stream(url, AUDIO_ITAG)?;
    sources
        .transcoder
        .transcode(&mut stream, &path, &Mp3Settings::default())?;

    let size = fs::metadata(&path)?.len();
    debug!(path = %path.display(), size, "transcoded");
    Ok((path, size))
}

/// Download a video's audio as MP3. Errors are returned unchanged.
pub fn mp3(sources: &Sources, temp_dir: &Path, url: &str) -> Result<Mp3Result> {
    if url.trim().is_empty() {
        return Err(Error::MissingQuery);
    }
    let url = parser::watch_url(&parser::resolve_video_id(url)?);

    let details = sources.video_source.info(&url)?.details;
    let (path, size) = transcode_to_temp(sources, temp_dir, &url)?;
    info!(title = %details.title, path = %path.display(), "mp3 ready");

    Ok(Mp3Result {
        meta: VideoMeta {
            title: details.title,
            channel: details.channel,
            seconds: details.length_seconds,
        },
        path,
        size,
    })
}

/// Download the first match for `query` as a tagged MP3.
///
/// A [`MusicQuery::Resolved`] list skips the search. Every failure is
/// wrapped in [`Error::DownloadMusic`].
pub fn download_music(sources: &Sources, temp_dir: &Path, query: MusicQuery) -> Result<MusicResult> {
    download_music_inner(sources, temp_dir, query).map_err(Error::download_music)
}

fn download_music_inner(sources: &Sources, temp_dir: &Path, query: MusicQuery) -> Result<MusicResult> {
    let (results, label) = match query {
        MusicQuery::Resolved(results) => (results, "resolved list".to_string()),
        MusicQuery::Text(text) => (
            resolver::search_track(sources.catalog.as_ref(), sources.videos.as_ref(), &text)?,
            text,
        ),
    };
    let search = results
        .into_iter()
        .next()
        .ok_or(Error::NoResults(label))?;
    let track = search.track();

    let url = parser::watch_url(&track.video_id);
    let details = sources.video_source.info(&url)?.details;
    let (path, _) = transcode_to_temp(sources, temp_dir, &url)?;

    let metadata = Metadata {
        title: track.title.clone(),
        artist: track.artist.clone(),
        image: track.cover_url.clone(),
        album: track.album.clone(),
        year: details.publish_year(),
    };
    write_tags(sources.fetcher.as_ref(), &path, &metadata)?;
    // the tag grows the file
    let size = fs::metadata(&path)?.len();
    info!(title = %track.title, source = search.source_name(), path = %path.display(), size, "music ready");

    Ok(MusicResult {
        meta: search,
        path,
        size,
    })
}

/// Fetch the cover image and write all tags. An image fetch failure fails
/// the write.
pub fn write_tags(fetcher: &dyn BufferFetcher, path: &Path, metadata: &Metadata) -> Result<()> {
    let cover = fetcher.fetch(&metadata.image)?;
    tagger::write_tags(path, metadata, &cover)
}
