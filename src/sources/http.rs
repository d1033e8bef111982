use tracing::debug;

use crate::error::Result;
use crate::sources::BufferFetcher;

/// Blocking HTTP client for cover images.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl BufferFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "fetching buffer");
        let data = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .bytes()?
            .to_vec();
        Ok(data)
    }
}
