use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Mp3Settings;
use crate::sources::Transcoder;

/// Transcodes through an `ffmpeg` child reading from stdin.
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
        }
    }
}

/// FFmpeg args: read `pipe:0`, write `output` with the given MP3 settings.
pub fn ffmpeg_args(output: &Path, settings: &Mp3Settings) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        "pipe:0".to_string(),
        "-vn".to_string(),
        "-ar".to_string(),
        settings.sample_rate.to_string(),
        "-ac".to_string(),
        settings.channels.to_string(),
        "-b:a".to_string(),
        format!("{}k", settings.bitrate_kbps),
        "-c:a".to_string(),
        settings.codec.clone(),
    ];
    if let Some(quality) = settings.vbr_quality {
        args.push("-q:a".to_string());
        args.push(quality.to_string());
    }
    args.push("-f".to_string());
    args.push(settings.container.clone());
    args.push(output.to_string_lossy().to_string());
    args
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, input: &mut dyn Read, output: &Path, settings: &Mp3Settings) -> Result<()> {
        debug!(output = %output.display(), "starting ffmpeg");
        let mut child = Command::new(&self.program)
            .args(ffmpeg_args(output, settings))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        let copied = match child.stdin.take() {
            Some(mut stdin) => io::copy(input, &mut stdin),
            None => Err(io::Error::other("ffmpeg stdin not captured")),
        };

        let status = child.wait()?;
        let stderr = stderr
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        // A failing input truncates stdin, so ffmpeg fails too; report the input error.
        let copied = match copied {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            other => other,
        };

        if !status.success() {
            return Err(Error::Process {
                program: self.program.display().to_string(),
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        let bytes = copied?;
        debug!(bytes, output = %output.display(), "ffmpeg finished");
        Ok(())
    }
}
