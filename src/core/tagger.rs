use std::path::Path;

use id3::frame::{Picture, PictureType};
use id3::{Tag, TagLike, Version};

use crate::error::Result;
use crate::models::Metadata;

/// Tags read back from an MP3 file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub original_artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub cover: Option<Picture>,
}

/// Write `metadata` and the cover image bytes into `path` as ID3v2.3.
/// Empty text fields are left unset.
pub fn write_tags(path: &Path, metadata: &Metadata, cover: &[u8]) -> Result<()> {
    let mut tag = Tag::new();

    if !metadata.title.is_empty() {
        tag.set_title(metadata.title.as_str());
    }
    if !metadata.artist.is_empty() {
        tag.set_artist(metadata.artist.as_str());
        tag.set_text("TOPE", metadata.artist.as_str());
    }
    if !metadata.album.is_empty() {
        tag.set_album(metadata.album.as_str());
    }
    if let Some(year) = metadata.year {
        tag.set_year(year);
    }
    if !cover.is_empty() {
        tag.add_frame(Picture {
            mime_type: detect_mime_type(cover),
            picture_type: PictureType::CoverFront,
            description: format!("Cover of {}", metadata.title),
            data: cover.to_vec(),
        });
    }

    tag.write_to_path(path, Version::Id3v23)?;
    Ok(())
}

/// Read the fields [`write_tags`] sets. A file without a tag yields `None`.
pub fn read_tags(path: &Path) -> Result<Option<TagSummary>> {
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(id3::Error {
            kind: id3::ErrorKind::NoTag,
            ..
        }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let summary = TagSummary {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        original_artist: tag.get("TOPE").and_then(|f| f.content().text()).map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        year: tag.year(),
        cover: tag
            .pictures()
            .find(|pic| pic.picture_type == PictureType::CoverFront)
            .cloned(),
    };
    Ok(Some(summary))
}

/// PNG by magic bytes, JPEG otherwise.
fn detect_mime_type(data: &[u8]) -> String {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png".to_string()
    } else {
        "image/jpeg".to_string()
    }
}
