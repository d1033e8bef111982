//! Minimal InnerTube (`/youtubei/v1`) client shared by the YouTube and
//! YouTube Music search backends.

use serde_json::{json, Value};
use tracing::debug;

use crate::error::Result;

/// Client identity sent in the request context.
#[derive(Debug, Clone, Copy)]
pub struct ClientProfile {
    pub host: &'static str,
    pub client_name: &'static str,
    pub client_version: &'static str,
}

pub const WEB: ClientProfile = ClientProfile {
    host: "https://www.youtube.com",
    client_name: "WEB",
    client_version: "2.20240726.00.00",
};

pub const WEB_REMIX: ClientProfile = ClientProfile {
    host: "https://music.youtube.com",
    client_name: "WEB_REMIX",
    client_version: "1.20240724.00.00",
};

pub struct InnerTube {
    client: reqwest::blocking::Client,
    profile: ClientProfile,
    language: String,
}

impl InnerTube {
    pub fn new(profile: ClientProfile, user_agent: &str, language: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            profile,
            language: language.to_string(),
        })
    }

    /// Request body for the `search` endpoint.
    pub fn search_body(&self, query: &str, params: Option<&str>) -> Value {
        let mut body = json!({
            "context": {
                "client": {
                    "clientName": self.profile.client_name,
                    "clientVersion": self.profile.client_version,
                    "hl": self.language,
                }
            },
            "query": query,
        });
        if let Some(params) = params {
            body["params"] = Value::String(params.to_string());
        }
        body
    }

    pub fn search(&self, query: &str, params: Option<&str>) -> Result<Value> {
        let url = format!("{}/youtubei/v1/search", self.profile.host);
        debug!(client = self.profile.client_name, query, "innertube search");

        let resp = self
            .client
            .post(&url)
            .query(&[("prettyPrint", "false")])
            .header("Origin", self.profile.host)
            .header("Referer", format!("{}/", self.profile.host))
            .json(&self.search_body(query, params))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(resp)
    }
}

/// Text of a `{ "runs": [...] }` or `{ "simpleText": ... }` node.
pub fn text_of(node: &Value) -> Option<String> {
    if let Some(text) = node.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let runs = node.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of_runs_and_simple_text() {
        let runs = json!({ "runs": [{ "text": "Never " }, { "text": "Gonna" }] });
        assert_eq!(text_of(&runs).as_deref(), Some("Never Gonna"));

        let simple = json!({ "simpleText": "3:33" });
        assert_eq!(text_of(&simple).as_deref(), Some("3:33"));

        assert_eq!(text_of(&json!({})), None);
    }

    #[test]
    fn test_search_body_carries_language_and_params() {
        let client = InnerTube::new(WEB_REMIX, "test-agent", "id").unwrap();
        let body = client.search_body("hello", Some("EgWKAQIIAQ"));
        assert_eq!(body["context"]["client"]["clientName"], "WEB_REMIX");
        assert_eq!(body["context"]["client"]["hl"], "id");
        assert_eq!(body["query"], "hello");
        assert_eq!(body["params"], "EgWKAQIIAQ");

        let plain = InnerTube::new(WEB, "test-agent", "en")
            .unwrap()
            .search_body("hello", None);
        assert!(plain.get("params").is_none());
    }
}
