use std::time::Duration;

use reqwest::Client;

use crate::app::Result;

/// Shared HTTP client for all feed adapters and the geolocation lookup.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent("temblor/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// GET a URL and return the body as text, treating non-2xx as errors.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.text().await?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
