pub mod ffmpeg;
pub mod http;
pub mod innertube;
pub mod youtube;
pub mod ytdlp;
pub mod ytmusic;

use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::models::{CatalogTrack, Mp3Settings, VideoEntry, VideoInfo};

/// Music catalog search (track/artist/album structured results).
pub trait MusicCatalog: Send + Sync {
    fn name(&self) -> &str;
    /// Ranked track rows for a free-text query.
    fn search(&self, query: &str) -> Result<Vec<CatalogTrack>>;
}

/// General video search.
pub trait VideoSearch: Send + Sync {
    fn name(&self) -> &str;
    /// Ranked video rows for a free-text query.
    fn search(&self, query: &str) -> Result<Vec<VideoEntry>>;
}

/// Video info and stream extraction.
pub trait VideoSource: Send + Sync {
    /// Details and available formats for a video id or watch URL.
    fn info(&self, url: &str) -> Result<VideoInfo>;
    /// Raw bytes of the audio-only format `itag`.
    fn audio_stream(&self, url: &str, itag: u32) -> Result<Box<dyn Read + Send>>;
}

/// Audio transcoder writing a finished file to `output`.
pub trait Transcoder: Send + Sync {
    fn transcode(&self, input: &mut dyn Read, output: &Path, settings: &Mp3Settings) -> Result<()>;
}

/// Fetches a whole response body.
pub trait BufferFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// One instance of every collaborator the core operations need.
pub struct Sources {
    pub catalog: Box<dyn MusicCatalog>,
    pub videos: Box<dyn VideoSearch>,
    pub video_source: Box<dyn VideoSource>,
    pub transcoder: Box<dyn Transcoder>,
    pub fetcher: Box<dyn BufferFetcher>,
}

impl Sources {
    /// Real backends: YouTube Music and YouTube InnerTube search, yt-dlp,
    /// ffmpeg and a blocking HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let user_agent = &config.http.user_agent;
        let language = &config.general.language;
        Ok(Self {
            catalog: Box::new(ytmusic::YouTubeMusic::new(user_agent, language)?),
            videos: Box::new(youtube::YouTubeSearch::new(user_agent, language)?),
            video_source: Box::new(ytdlp::YtDlp::new(&config.tools.yt_dlp, language)),
            transcoder: Box::new(ffmpeg::Ffmpeg::new(&config.tools.ffmpeg)),
            fetcher: Box::new(http::HttpFetcher::new(user_agent)?),
        })
    }
}
