use tracing::debug;

use crate::core::parser;
use crate::error::{Error, Result};
use crate::models::{Format, Quality, VideoFormatInfo};
use crate::sources::VideoSource;

/// Pick the format matching `quality` among those carrying both audio and
/// video.
pub fn choose_format(formats: &[Format], quality: Quality) -> Option<&Format> {
    let mut combined = formats.iter().filter(|f| f.has_audio && f.has_video);
    match quality {
        Quality::Itag(itag) => combined.find(|f| f.itag == itag),
        Quality::Highest => combined.max_by_key(|f| f.height().unwrap_or(0)),
        Quality::Lowest => combined.min_by_key(|f| f.height().unwrap_or(u32::MAX)),
    }
}

/// Resolve `query` (video id or URL) to a downloadable combined format.
/// Collaborator errors are returned unchanged.
pub fn mp4(source: &dyn VideoSource, query: &str, quality: Quality) -> Result<VideoFormatInfo> {
    if query.trim().is_empty() {
        return Err(Error::MissingQuery);
    }
    let video_id = parser::resolve_video_id(query)?;
    let info = source.info(&parser::watch_url(&video_id))?;
    debug!(video_id = %video_id, formats = info.formats.len(), %quality, "choosing format");

    let format = choose_format(&info.formats, quality).ok_or_else(|| Error::NoMatchingFormat {
        quality: quality.to_string(),
    })?;

    let details = &info.details;
    Ok(VideoFormatInfo {
        title: details.title.clone(),
        thumb: details.thumbnails.last().cloned(),
        date: details.publish_date.clone(),
        duration: details.length_seconds,
        channel: details.channel.clone(),
        quality: format.quality_label.clone(),
        content_length: format.content_length,
        video_url: format.url.clone(),
    })
}
