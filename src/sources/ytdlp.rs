//! Video info and audio streams through the `yt-dlp` executable.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Format, Thumbnail, VideoDetails, VideoInfo};
use crate::sources::VideoSource;

pub struct YtDlp {
    program: PathBuf,
    language: String,
}

#[derive(Deserialize)]
struct InfoJson {
    id: String,
    title: String,
    channel: Option<String>,
    uploader: Option<String>,
    /// `YYYYMMDD`
    upload_date: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    thumbnails: Vec<ThumbnailJson>,
    #[serde(default)]
    formats: Vec<FormatJson>,
}

#[derive(Deserialize)]
struct ThumbnailJson {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct FormatJson {
    format_id: String,
    url: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    format_note: Option<String>,
    height: Option<u32>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
}

impl YtDlp {
    pub fn new(program: &Path, language: &str) -> Self {
        Self {
            program: program.to_path_buf(),
            language: language.to_string(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "--no-playlist",
            "--no-warnings",
            "--extractor-args",
            &format!("youtube:lang={}", self.language),
        ]);
        cmd
    }
}

impl VideoSource for YtDlp {
    fn info(&self, url: &str) -> Result<VideoInfo> {
        debug!(url, "fetching video info");
        let output = self
            .command()
            .args(["--dump-single-json", "--skip-download", "--", url])
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(Error::Process {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_info(&output.stdout)
    }

    fn audio_stream(&self, url: &str, itag: u32) -> Result<Box<dyn Read + Send>> {
        debug!(url, itag, "opening audio stream");
        let child = self
            .command()
            .args(["--quiet", "-f", &itag.to_string(), "-o", "-", "--", url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        Ok(Box::new(ProcessStream::new(self.program_name(), child)?))
    }
}

/// Convert a `--dump-single-json` document into [`VideoInfo`].
pub fn parse_info(json: &[u8]) -> Result<VideoInfo> {
    let info: InfoJson = serde_json::from_slice(json)?;

    let publish_date = info.upload_date.as_deref().and_then(format_upload_date);
    let details = VideoDetails {
        video_id: info.id,
        title: info.title,
        channel: info.channel.or(info.uploader).unwrap_or_default(),
        publish_date,
        length_seconds: info.duration.map(|d| d.max(0.0).round() as u64).unwrap_or(0),
        thumbnails: info
            .thumbnails
            .into_iter()
            .map(|t| Thumbnail {
                url: t.url,
                width: t.width,
                height: t.height,
            })
            .collect(),
    };

    let formats = info.formats.into_iter().filter_map(convert_format).collect();

    Ok(VideoInfo { details, formats })
}

/// `20091025` -> `2009-10-25`
fn format_upload_date(raw: &str) -> Option<String> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..]))
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| !c.is_empty() && c != "none")
}

/// Skips storyboards and other entries without a numeric itag or URL.
fn convert_format(format: FormatJson) -> Option<Format> {
    let itag = format.format_id.parse().ok()?;
    let url = format.url?;
    let has_video = has_codec(&format.vcodec);
    let has_audio = has_codec(&format.acodec);
    let quality_label = if has_video {
        format
            .format_note
            .filter(|note| note.starts_with(|c: char| c.is_ascii_digit()))
            .or_else(|| format.height.map(|h| format!("{}p", h)))
    } else {
        None
    };

    Some(Format {
        itag,
        quality_label,
        content_length: format.filesize.or(format.filesize_approx),
        url,
        has_video,
        has_audio,
    })
}

/// Stdout of a child process. A non-zero exit is reported as an I/O error
/// once the stream reaches EOF; dropping the stream early kills the child.
struct ProcessStream {
    program: String,
    child: Child,
    stdout: ChildStdout,
    stderr: Option<JoinHandle<String>>,
    finished: bool,
}

impl ProcessStream {
    fn new(program: String, mut child: Child) -> Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout not captured"))?;
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });
        Ok(Self {
            program,
            child,
            stdout,
            stderr,
            finished: false,
        })
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        let status = self.child.wait()?;
        if status.success() {
            return Ok(());
        }
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        Err(io::Error::other(format!(
            "{} failed ({}): {}",
            self.program,
            status,
            stderr.trim()
        )))
    }
}

impl Read for ProcessStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished {
            return Ok(0);
        }
        let n = self.stdout.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.finish()?;
        }
        Ok(n)
    }
}

impl Drop for ProcessStream {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info_json() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "dQw4w9WgXcQ",
            "title": "Rick Astley - Never Gonna Give You Up (Official Music Video)",
            "channel": "Rick Astley",
            "uploader": "RickAstleyVEVO",
            "upload_date": "20091025",
            "duration": 212.0,
            "thumbnails": [
                { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "width": 120, "height": 90 },
                { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg", "width": 1280, "height": 720 }
            ],
            "formats": [
                { "format_id": "sb0", "url": "https://i.ytimg.com/sb/storyboard", "vcodec": "none", "acodec": "none" },
                { "format_id": "140", "url": "https://rr1.googlevideo.com/140", "vcodec": "none", "acodec": "mp4a.40.2", "format_note": "medium", "filesize": 3433514 },
                { "format_id": "18", "url": "https://rr1.googlevideo.com/18", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "format_note": "360p", "height": 360, "filesize_approx": 8000000 },
                { "format_id": "134", "url": "https://rr1.googlevideo.com/134", "vcodec": "avc1.4d401e", "acodec": "none", "height": 360 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_info_details() {
        let info = parse_info(&info_json()).unwrap();
        let details = &info.details;
        assert_eq!(details.video_id, "dQw4w9WgXcQ");
        assert_eq!(details.channel, "Rick Astley");
        assert_eq!(details.publish_date.as_deref(), Some("2009-10-25"));
        assert_eq!(details.length_seconds, 212);
        assert_eq!(details.thumbnails.len(), 2);
        assert_eq!(
            details.thumbnails.last().map(|t| t.url.as_str()),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
    }

    #[test]
    fn test_parse_info_formats() {
        let info = parse_info(&info_json()).unwrap();
        assert_eq!(info.formats.len(), 3, "storyboard must be skipped");

        let audio = &info.formats[0];
        assert_eq!(audio.itag, 140);
        assert!(audio.has_audio && !audio.has_video);
        assert_eq!(audio.quality_label, None);

        let combined = &info.formats[1];
        assert_eq!(combined.itag, 18);
        assert!(combined.has_audio && combined.has_video);
        assert_eq!(combined.quality_label.as_deref(), Some("360p"));
        assert_eq!(combined.content_length, Some(8000000));

        let video_only = &info.formats[2];
        assert_eq!(video_only.quality_label.as_deref(), Some("360p"));
        assert!(!video_only.has_audio);
    }

    #[test]
    fn test_upload_date_format() {
        assert_eq!(format_upload_date("20091025").as_deref(), Some("2009-10-25"));
        assert_eq!(format_upload_date("2009"), None);
        assert_eq!(format_upload_date("2009102x"), None);
    }

    #[test]
    fn test_parse_info_rejects_garbage() {
        assert!(matches!(parse_info(b"not json"), Err(Error::Json(_))));
    }
}
