use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::{fetcher, parser, pipeline, resolver};
use crate::error::Result;
use crate::models::{
    Metadata, Mp3Result, MusicQuery, MusicResult, Quality, TrackSearchResult, VideoFormatInfo,
};
use crate::sources::Sources;

/// Entry point bundling the collaborators and the temp directory.
///
/// Holds no mutable state; concurrent calls only share the temp directory
/// and rely on random file names.
pub struct Downloader {
    sources: Sources,
    temp_dir: PathBuf,
}

impl Downloader {
    pub fn new(sources: Sources, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Sources::from_config(config)?,
            config.general.temp_dir.clone(),
        ))
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn is_youtube_url(input: &str) -> bool {
        parser::is_youtube_url(input)
    }

    pub fn extract_video_id(input: &str) -> Result<String> {
        parser::extract_video_id(input)
    }

    pub fn search_track(&self, query: &str) -> Result<Vec<TrackSearchResult>> {
        resolver::search_track(
            self.sources.catalog.as_ref(),
            self.sources.videos.as_ref(),
            query,
        )
    }

    pub fn mp4(&self, query: &str, quality: Quality) -> Result<VideoFormatInfo> {
        fetcher::mp4(self.sources.video_source.as_ref(), query, quality)
    }

    pub fn mp3(&self, url: &str) -> Result<Mp3Result> {
        pipeline::mp3(&self.sources, &self.temp_dir, url)
    }

    pub fn download_music(&self, query: impl Into<MusicQuery>) -> Result<MusicResult> {
        pipeline::download_music(&self.sources, &self.temp_dir, query.into())
    }

    pub fn write_tags(&self, path: &Path, metadata: &Metadata) -> Result<()> {
        pipeline::write_tags(self.sources.fetcher.as_ref(), path, metadata)
    }
}
