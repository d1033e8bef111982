use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use ytmusic_dl::models::Track;

/// Replace characters the filesystem rejects with `_`.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c == '/' || c == '\0' {
                return '_';
            }
            if cfg!(target_os = "windows") {
                if matches!(c, '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                    return '_';
                }
                if c.is_ascii_control() {
                    return '_';
                }
            }
            if cfg!(target_os = "macos") && c == ':' {
                return '_';
            }
            c
        })
        .collect()
}

/// `"{artist} - {title}.mp3"`. A catalog title `"{track} - {artist}"` is
/// flipped to `"{artist} - {track}"`, and a title already starting with
/// `"{artist} - "` is used as is. Without an artist only the title is used.
pub fn build_filename(track: &Track) -> Option<String> {
    let title = track.title.trim();
    if title.is_empty() {
        return None;
    }
    let artist = track.artist.trim();
    if artist.is_empty() || title.starts_with(&format!("{} - ", artist)) {
        return Some(format!("{}.mp3", sanitize_filename(title)));
    }
    let title = title
        .strip_suffix(artist)
        .and_then(|rest| rest.strip_suffix(" - "))
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(title);
    Some(format!(
        "{} - {}.mp3",
        sanitize_filename(artist),
        sanitize_filename(title)
    ))
}

/// Move a downloaded file into `dir` under its track name.
/// Refuses to overwrite an existing file.
pub fn move_into(src: &Path, dir: &Path, track: &Track) -> Result<PathBuf> {
    let Some(new_name) = build_filename(track) else {
        bail!("track has no title");
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;
    let dest = dir.join(&new_name);

    if dest.exists() {
        bail!("file already exists: {}", dest.display());
    }

    // rename fails across filesystems; fall back to copy + remove
    if std::fs::rename(src, &dest).is_err() {
        std::fs::copy(src, &dest)
            .with_context(|| format!("cannot copy to {}", dest.display()))?;
        std::fs::remove_file(src)?;
    }
    Ok(dest)
}
