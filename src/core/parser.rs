use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Matches `watch?v=`, `/embed/`, `/e/`, other `youtube.com/<path>/` forms and
/// `youtu.be/` short links. Group 1 is the video id.
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/\S*(?:(?:/e(?:mbed))?/|watch\?(?:\S*?&?v=))|youtu\.be/)([a-zA-Z0-9_-]{6,11})")
        .expect("video id pattern is valid")
});

/// Returns true if the input contains a YouTube video URL.
pub fn is_youtube_url(input: &str) -> bool {
    VIDEO_ID_RE.is_match(input)
}

/// Extract the video id from a YouTube URL.
pub fn extract_video_id(input: &str) -> Result<String> {
    VIDEO_ID_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidUrl(input.to_string()))
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// A URL input becomes its video id; anything else is returned unchanged.
pub fn resolve_video_id(query: &str) -> Result<String> {
    if is_youtube_url(query) {
        extract_video_id(query)
    } else {
        Ok(query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link() {
        let url = "https://youtu.be/dQw4w9WgXcQ";
        assert!(is_youtube_url(url));
        assert_eq!(extract_video_id(url).unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert!(is_youtube_url(url));
        assert_eq!(extract_video_id(url).unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        let url = "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ";
        assert_eq!(extract_video_id(url).unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_embed_and_short_embed() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/e/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_id_keeps_case_and_symbols() {
        assert_eq!(
            extract_video_id("https://youtu.be/Ab-_9zYx").unwrap(),
            "Ab-_9zYx"
        );
    }

    #[test]
    fn test_id_is_capped_at_eleven_chars() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQextra").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_non_urls() {
        for input in [
            "",
            "never gonna give you up",
            "dQw4w9WgXcQ",
            "https://vimeo.com/123456789",
            "https://youtu.be/abc",
        ] {
            assert!(!is_youtube_url(input), "{input:?}");
            assert!(matches!(extract_video_id(input), Err(Error::InvalidUrl(_))));
        }
    }

    #[test]
    fn test_resolve_video_id() {
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(resolve_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_canonical_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
