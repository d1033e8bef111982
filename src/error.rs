//! Library error type.
//!
//! Library code returns [`Error`]; the binary wraps it in `anyhow` for
//! context chaining.

use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No query, video id or URL was supplied.
    #[error("Video ID or YouTube Url is required")]
    MissingQuery,

    /// Input does not look like a YouTube URL.
    #[error("is not YouTube URL: {0}")]
    InvalidUrl(String),

    /// No combined audio+video format for the requested quality.
    #[error("no video format with audio matches quality {quality}")]
    NoMatchingFormat { quality: String },

    /// A search came back empty where a result was required.
    #[error("no results for {0:?}")]
    NoResults(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ID3 tag error: {0}")]
    Tag(#[from] id3::Error),

    /// An external program exited unsuccessfully.
    #[error("{program} failed ({status}): {stderr}")]
    Process {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// A backend answered with a shape we could not read.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Any failure inside `download_music`. The message is generic; the
    /// underlying error is still reachable through `source()`.
    #[error("failed to download music")]
    DownloadMusic {
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn download_music(source: Error) -> Self {
        Error::DownloadMusic {
            source: Box::new(source),
        }
    }
}
