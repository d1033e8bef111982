use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Duration, VideoEntry};
use crate::sources::innertube::{self, InnerTube};
use crate::sources::VideoSearch;

/// General YouTube video search over InnerTube's `WEB` client.
pub struct YouTubeSearch {
    innertube: InnerTube,
}

impl YouTubeSearch {
    pub fn new(user_agent: &str, language: &str) -> Result<Self> {
        Ok(Self {
            innertube: InnerTube::new(innertube::WEB, user_agent, language)?,
        })
    }
}

impl VideoSearch for YouTubeSearch {
    fn name(&self) -> &str {
        "YouTube"
    }

    fn search(&self, query: &str) -> Result<Vec<VideoEntry>> {
        let resp = self.innertube.search(query, None)?;
        parse_search_response(&resp)
    }
}

/// Collect `videoRenderer` items from a `WEB` search response.
/// Entries without a length (live streams, premieres) are skipped.
pub fn parse_search_response(resp: &Value) -> Result<Vec<VideoEntry>> {
    let sections = resp
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::UnexpectedResponse("YouTube search: no section list".to_string()))?;

    let entries = sections
        .iter()
        .filter_map(|section| section.pointer("/itemSectionRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.get("videoRenderer"))
        .filter_map(parse_video_renderer)
        .collect();

    Ok(entries)
}

fn parse_video_renderer(renderer: &Value) -> Option<VideoEntry> {
    let video_id = renderer.get("videoId")?.as_str()?.to_string();
    let title = innertube::text_of(renderer.get("title")?)?;
    let author = renderer
        .get("ownerText")
        .or_else(|| renderer.get("longBylineText"))
        .and_then(innertube::text_of)
        .unwrap_or_default();
    let duration = renderer
        .get("lengthText")
        .and_then(innertube::text_of)
        .and_then(|label| Duration::from_label(&label))?;
    let thumbnail_url = format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id);

    Some(VideoEntry {
        video_id,
        title,
        author,
        duration,
        thumbnail_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(id: &str, title: &str, length: Option<&str>) -> Value {
        let mut renderer = json!({
            "videoId": id,
            "title": { "runs": [{ "text": title }] },
            "ownerText": { "runs": [{ "text": "Rick Astley" }] },
        });
        if let Some(length) = length {
            renderer["lengthText"] = json!({ "simpleText": length });
        }
        json!({ "videoRenderer": renderer })
    }

    #[test]
    fn test_parse_search_response() {
        let resp = json!({
            "contents": { "twoColumnSearchResultsRenderer": { "primaryContents": {
                "sectionListRenderer": { "contents": [
                    { "itemSectionRenderer": { "contents": [
                        video("dQw4w9WgXcQ", "Never Gonna Give You Up", Some("3:33")),
                        { "shelfRenderer": {} },
                        video("live0000001", "Live radio", None),
                        video("yPYZpwSpKmA", "Together Forever", Some("3:25")),
                    ]}},
                    { "continuationItemRenderer": {} }
                ]}
            }}}
        });

        let entries = parse_search_response(&resp).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(entries[0].title, "Never Gonna Give You Up");
        assert_eq!(entries[0].author, "Rick Astley");
        assert_eq!(entries[0].duration.seconds, 213);
        assert_eq!(entries[0].duration.label, "3:33");
        assert_eq!(
            entries[0].thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(entries[1].video_id, "yPYZpwSpKmA");
    }

    #[test]
    fn test_parse_search_response_rejects_unknown_shape() {
        let err = parse_search_response(&json!({ "error": {} })).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}
