//! Find YouTube tracks, transcode their audio to MP3 and tag the result.
//!
//! ```no_run
//! use ytmusic_dl::{config, Downloader};
//! # fn main() -> ytmusic_dl::Result<()> {
//! let downloader = Downloader::from_config(&config::load_config())?;
//! let music = downloader.download_music("never gonna give you up")?;
//! println!("{} ({} bytes)", music.path.display(), music.size);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod downloader;
pub mod error;
pub mod models;
pub mod sources;

pub use crate::downloader::Downloader;
pub use crate::error::{Error, Result};
