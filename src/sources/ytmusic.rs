use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{CatalogTrack, Duration};
use crate::sources::innertube::{self, InnerTube};
use crate::sources::MusicCatalog;

/// Search filter restricting YouTube Music results to songs.
const SONGS_FILTER: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";

const PAGE_TYPE_PATH: &str = "/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs/browseEndpointContextMusicConfig/pageType";

/// YouTube Music catalog search over InnerTube's `WEB_REMIX` client.
pub struct YouTubeMusic {
    innertube: InnerTube,
}

impl YouTubeMusic {
    pub fn new(user_agent: &str, language: &str) -> Result<Self> {
        Ok(Self {
            innertube: InnerTube::new(innertube::WEB_REMIX, user_agent, language)?,
        })
    }
}

impl MusicCatalog for YouTubeMusic {
    fn name(&self) -> &str {
        "YouTube Music"
    }

    fn search(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        let resp = self.innertube.search(query, Some(SONGS_FILTER))?;
        parse_music_response(&resp)
    }
}

/// Collect song rows from every `musicShelfRenderer` of a search response.
pub fn parse_music_response(resp: &Value) -> Result<Vec<CatalogTrack>> {
    let sections = resp
        .pointer("/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::UnexpectedResponse("YouTube Music search: no section list".to_string()))?;

    let tracks = sections
        .iter()
        .filter_map(|section| section.pointer("/musicShelfRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .filter_map(parse_list_item)
        .collect();

    Ok(tracks)
}

fn flex_column_runs(item: &Value, index: usize) -> Option<&Vec<Value>> {
    item.get("flexColumns")?
        .get(index)?
        .pointer("/musicResponsiveListItemFlexColumnRenderer/text/runs")?
        .as_array()
}

fn parse_list_item(item: &Value) -> Option<CatalogTrack> {
    let title_runs = flex_column_runs(item, 0)?;
    let first = title_runs.first()?;
    let title = first.get("text")?.as_str()?.to_string();
    let video_id = item
        .pointer("/playlistItemData/videoId")
        .or_else(|| first.pointer("/navigationEndpoint/watchEndpoint/videoId"))?
        .as_str()?
        .to_string();

    let mut artists = Vec::new();
    let mut album = None;
    let mut duration = None;

    let detail_runs = flex_column_runs(item, 1).map(Vec::as_slice).unwrap_or_default();
    for run in detail_runs {
        let Some(text) = run.get("text").and_then(Value::as_str) else {
            continue;
        };
        match run.pointer(PAGE_TYPE_PATH).and_then(Value::as_str) {
            Some("MUSIC_PAGE_TYPE_ARTIST") | Some("MUSIC_PAGE_TYPE_USER_CHANNEL") => {
                artists.push(text.to_string())
            }
            Some("MUSIC_PAGE_TYPE_ALBUM") => album = Some(text.to_string()),
            _ => {
                if let Some(parsed) = Duration::from_label(text) {
                    duration = Some(parsed);
                }
            }
        }
    }

    // Rows without linked artists still lead with the artist name.
    if artists.is_empty() {
        if let Some(text) = detail_runs
            .first()
            .and_then(|run| run.get("text"))
            .and_then(Value::as_str)
        {
            artists.push(text.to_string());
        }
    }

    let thumbnail_url = item
        .pointer("/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails")
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|thumb| thumb.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(CatalogTrack {
        video_id,
        title,
        artists,
        album,
        duration: duration.unwrap_or_default(),
        thumbnail_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn browse_run(text: &str, page_type: &str) -> Value {
        json!({
            "text": text,
            "navigationEndpoint": { "browseEndpoint": {
                "browseEndpointContextSupportedConfigs": {
                    "browseEndpointContextMusicConfig": { "pageType": page_type }
                }
            }}
        })
    }

    fn song_row() -> Value {
        json!({ "musicResponsiveListItemRenderer": {
            "thumbnail": { "musicThumbnailRenderer": { "thumbnail": { "thumbnails": [
                { "url": "https://lh3.googleusercontent.com/abc=w60-h60-l90-rj" },
                { "url": "https://lh3.googleusercontent.com/abc=w120-h120-l90-rj" }
            ]}}},
            "flexColumns": [
                { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [{
                    "text": "Never Gonna Give You Up",
                    "navigationEndpoint": { "watchEndpoint": { "videoId": "lYBUbBu4W08" } }
                }]}}},
                { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [
                    browse_run("Rick Astley", "MUSIC_PAGE_TYPE_ARTIST"),
                    { "text": " • " },
                    browse_run("Whenever You Need Somebody", "MUSIC_PAGE_TYPE_ALBUM"),
                    { "text": " • " },
                    { "text": "3:34" }
                ]}}}
            ],
            "playlistItemData": { "videoId": "lYBUbBu4W08" }
        }})
    }

    fn response(rows: Vec<Value>) -> Value {
        json!({
            "contents": { "tabbedSearchResultsRenderer": { "tabs": [{ "tabRenderer": { "content": {
                "sectionListRenderer": { "contents": [
                    { "itemSectionRenderer": {} },
                    { "musicShelfRenderer": { "contents": rows } }
                ]}
            }}}]}}
        })
    }

    #[test]
    fn test_parse_song_row() {
        let tracks = parse_music_response(&response(vec![song_row()])).unwrap();
        assert_eq!(tracks.len(), 1);

        let track = &tracks[0];
        assert_eq!(track.video_id, "lYBUbBu4W08");
        assert_eq!(track.title, "Never Gonna Give You Up");
        assert_eq!(track.artists, vec!["Rick Astley".to_string()]);
        assert_eq!(track.album.as_deref(), Some("Whenever You Need Somebody"));
        assert_eq!(track.duration.seconds, 214);
        assert_eq!(track.duration.label, "3:34");
        assert_eq!(
            track.thumbnail_url,
            "https://lh3.googleusercontent.com/abc=w120-h120-l90-rj"
        );
    }

    #[test]
    fn test_row_without_artist_links_uses_first_run() {
        let row = json!({ "musicResponsiveListItemRenderer": {
            "flexColumns": [
                { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [{
                    "text": "Untitled",
                    "navigationEndpoint": { "watchEndpoint": { "videoId": "abcdefghijk" } }
                }]}}},
                { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [
                    { "text": "Various Artists" },
                    { "text": " • " },
                    { "text": "1:02:03" }
                ]}}}
            ]
        }});

        let tracks = parse_music_response(&response(vec![row])).unwrap();
        assert_eq!(tracks[0].video_id, "abcdefghijk");
        assert_eq!(tracks[0].artists, vec!["Various Artists".to_string()]);
        assert_eq!(tracks[0].album, None);
        assert_eq!(tracks[0].duration.seconds, 3723);
        assert_eq!(tracks[0].thumbnail_url, "");
    }

    #[test]
    fn test_row_without_video_id_is_skipped() {
        let row = json!({ "musicResponsiveListItemRenderer": {
            "flexColumns": [
                { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [
                    { "text": "Podcast" }
                ]}}}
            ]
        }});
        let tracks = parse_music_response(&response(vec![row, song_row()])).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Never Gonna Give You Up");
    }
}
