use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

/// Track length as seconds plus the platform's display label (`"3:33"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Duration {
    pub seconds: u64,
    pub label: String,
}

impl Duration {
    /// Parse an `m:ss` or `h:mm:ss` label. Returns `None` for anything else.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let mut seconds: u64 = 0;
        let mut parts = 0;
        for part in label.split(':') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            seconds = seconds.checked_mul(60)?.checked_add(part.parse::<u64>().ok()?)?;
            parts += 1;
        }
        if parts > 3 {
            return None;
        }
        Some(Self {
            seconds,
            label: label.to_string(),
        })
    }

    /// Build a duration from seconds, rendering the label the way the
    /// platform does.
    pub fn from_seconds(seconds: u64) -> Self {
        let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
        let label = if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        };
        Self { seconds, label }
    }
}

/// A track row returned by the music catalog search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTrack {
    pub video_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration: Duration,
    pub thumbnail_url: String,
}

/// A video row returned by the general video search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoEntry {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub duration: Duration,
    pub thumbnail_url: String,
}

/// Normalized track fields shared by both search result variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub video_id: String,
    pub album: String,
    pub duration: Duration,
    pub cover_url: String,
}

/// One merged search result, tagged by the backend it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TrackSearchResult {
    MusicCatalog(Track),
    VideoSearch(Track),
}

impl TrackSearchResult {
    pub fn track(&self) -> &Track {
        match self {
            TrackSearchResult::MusicCatalog(track) | TrackSearchResult::VideoSearch(track) => track,
        }
    }

    pub fn is_from_music_catalog(&self) -> bool {
        matches!(self, TrackSearchResult::MusicCatalog(_))
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            TrackSearchResult::MusicCatalog(_) => "YouTube Music",
            TrackSearchResult::VideoSearch(_) => "YouTube",
        }
    }

    pub fn summary(&self) -> String {
        let track = self.track();
        format!(
            "{} [{}] ({})",
            track.title, track.duration.label, track.video_id
        )
    }
}

/// A thumbnail as listed by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Basic video metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    /// `YYYY-MM-DD`
    pub publish_date: Option<String>,
    pub length_seconds: u64,
    /// Ascending resolution; the last entry is the largest.
    pub thumbnails: Vec<Thumbnail>,
}

impl VideoDetails {
    /// Leading year component of the publish date.
    pub fn publish_year(&self) -> Option<i32> {
        self.publish_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.trim().parse().ok())
    }
}

/// One encoded variant of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub itag: u32,
    pub quality_label: Option<String>,
    pub content_length: Option<u64>,
    pub url: String,
    pub has_video: bool,
    pub has_audio: bool,
}

impl Format {
    /// Vertical resolution from a label such as `"720p60"`.
    pub fn height(&self) -> Option<u32> {
        let label = self.quality_label.as_deref()?;
        let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Full video info: details plus available formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInfo {
    pub details: VideoDetails,
    pub formats: Vec<Format>,
}

/// Requested video quality for format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Itag(u32),
    Highest,
    Lowest,
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Itag(134)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Itag(itag) => write!(f, "{}", itag),
            Quality::Highest => f.write_str("highest"),
            Quality::Lowest => f.write_str("lowest"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest" => Ok(Quality::Highest),
            "lowest" => Ok(Quality::Lowest),
            other => other
                .parse()
                .map(Quality::Itag)
                .map_err(|_| format!("invalid quality: {}", s)),
        }
    }
}

/// Result of `mp4`: the chosen combined format plus video details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFormatInfo {
    pub title: String,
    pub thumb: Option<Thumbnail>,
    pub date: Option<String>,
    pub duration: u64,
    pub channel: String,
    pub quality: Option<String>,
    pub content_length: Option<u64>,
    pub video_url: String,
}

/// Metadata reported by `mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMeta {
    pub title: String,
    pub channel: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mp3Result {
    pub meta: VideoMeta,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of `download_music`. The file at `path` belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MusicResult {
    pub meta: TrackSearchResult,
    pub path: PathBuf,
    pub size: u64,
}

/// Tag values written into a downloaded MP3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    /// Cover image URL.
    pub image: String,
    pub album: String,
    pub year: Option<i32>,
}

/// Input to `download_music`.
#[derive(Debug, Clone)]
pub enum MusicQuery {
    Text(String),
    Resolved(Vec<TrackSearchResult>),
}

impl From<&str> for MusicQuery {
    fn from(query: &str) -> Self {
        MusicQuery::Text(query.to_string())
    }
}

impl From<String> for MusicQuery {
    fn from(query: String) -> Self {
        MusicQuery::Text(query)
    }
}

impl From<Vec<TrackSearchResult>> for MusicQuery {
    fn from(results: Vec<TrackSearchResult>) -> Self {
        MusicQuery::Resolved(results)
    }
}

/// Target parameters for the MP3 transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp3Settings {
    pub sample_rate: u32,
    pub channels: u8,
    pub bitrate_kbps: u32,
    pub codec: String,
    pub container: String,
    /// libmp3lame VBR quality; when set it overrides the fixed bitrate.
    pub vbr_quality: Option<u8>,
}

impl Default for Mp3Settings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            bitrate_kbps: 128,
            codec: "libmp3lame".to_string(),
            container: "mp3".to_string(),
            vbr_quality: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_label() {
        let d = Duration::from_label("3:33").unwrap();
        assert_eq!(d.seconds, 213);
        assert_eq!(d.label, "3:33");

        assert_eq!(Duration::from_label("1:02:03").unwrap().seconds, 3723);
        assert!(Duration::from_label("LIVE").is_none());
        assert!(Duration::from_label("").is_none());
        assert!(Duration::from_label("3:").is_none());
    }

    #[test]
    fn test_duration_from_oversized_label() {
        assert!(Duration::from_label("999999999999999999:00").is_none());
        assert!(Duration::from_label("99999999999999999999").is_none());
    }

    #[test]
    fn test_duration_from_seconds() {
        assert_eq!(Duration::from_seconds(213).label, "3:33");
        assert_eq!(Duration::from_seconds(3723).label, "1:02:03");
        assert_eq!(Duration::from_seconds(5).label, "0:05");
    }

    #[test]
    fn test_publish_year() {
        let details = VideoDetails {
            publish_date: Some("2009-10-24".to_string()),
            ..Default::default()
        };
        assert_eq!(details.publish_year(), Some(2009));

        let missing = VideoDetails::default();
        assert_eq!(missing.publish_year(), None);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("134".parse::<Quality>().unwrap(), Quality::Itag(134));
        assert_eq!("Highest".parse::<Quality>().unwrap(), Quality::Highest);
        assert_eq!("lowest".parse::<Quality>().unwrap(), Quality::Lowest);
        assert!("hd".parse::<Quality>().is_err());
        assert_eq!(Quality::default(), Quality::Itag(134));
    }

    #[test]
    fn test_format_height() {
        let format = Format {
            quality_label: Some("720p60".to_string()),
            ..Default::default()
        };
        assert_eq!(format.height(), Some(720));
        assert_eq!(Format::default().height(), None);
    }

    #[test]
    fn test_search_result_variants() {
        let track = Track {
            title: "Song - Artist".to_string(),
            ..Default::default()
        };
        let catalog = TrackSearchResult::MusicCatalog(track.clone());
        let video = TrackSearchResult::VideoSearch(track);
        assert!(catalog.is_from_music_catalog());
        assert!(!video.is_from_music_catalog());
        assert_eq!(catalog.track().title, "Song - Artist");

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["source"], "music_catalog");
        assert_eq!(json["title"], "Song - Artist");
    }
}
