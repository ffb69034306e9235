//! Wikipedia REST summary lookup
//!
//! `GET {api_base}/page/summary/{term}` and read the `extract` field.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{LookupResult, SummaryLookup};
use crate::config::LookupConfig;
use crate::constants::lookup::USER_AGENT;
use crate::types::{DocError, Result};

/// Summary lookup against the Wikipedia REST API
#[derive(Debug, Clone)]
pub struct WikipediaLookup {
    api_base: Url,
    client: reqwest::Client,
}

impl WikipediaLookup {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            DocError::Config(format!(
                "Invalid lookup api_base '{}': {}",
                config.api_base, e
            ))
        })?;

        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(DocError::Config(format!(
                "Lookup api_base must use http or https scheme, got: {}",
                api_base.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DocError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_base, client })
    }

    /// Summary URL with `term` percent-encoded as one path segment
    pub fn summary_url(&self, term: &str) -> Url {
        let mut url = self.api_base.clone();
        // http(s) base URLs always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["page", "summary", term]);
        }
        url
    }

    async fn fetch(&self, url: Url) -> std::result::Result<Option<String>, reqwest::Error> {
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "summary not available");
            return Ok(None);
        }

        let body: SummaryResponse = response.json().await?;
        Ok(body
            .extract
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}

#[async_trait]
impl SummaryLookup for WikipediaLookup {
    #[instrument(skip(self), fields(service = "wikipedia"))]
    async fn lookup_summary(&self, term: &str) -> LookupResult {
        let url = self.summary_url(term);

        match self.fetch(url).await {
            Ok(Some(extract)) => LookupResult::Found(extract),
            Ok(None) => LookupResult::NotFound,
            Err(e) => {
                warn!(error = %e, "summary lookup failed");
                LookupResult::NotFound
            }
        }
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup_for(base: &str) -> WikipediaLookup {
        WikipediaLookup::new(&LookupConfig {
            api_base: base.to_string(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_summary_url_escapes_term() {
        let lookup = lookup_for("https://en.wikipedia.org/api/rest_v1");
        assert_eq!(
            lookup.summary_url("photosynthesis?").as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/photosynthesis%3F"
        );
        assert_eq!(
            lookup.summary_url("AC/DC").as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/AC%2FDC"
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let lookup = lookup_for("https://en.wikipedia.org/api/rest_v1/");
        assert_eq!(
            lookup.summary_url("Leaf").as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Leaf"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        let result = WikipediaLookup::new(&LookupConfig {
            api_base: "ftp://example.org".to_string(),
            timeout_secs: 2,
        });
        assert!(matches!(result, Err(DocError::Config(_))));
    }

    #[tokio::test]
    async fn test_found_extract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/summary/photosynthesis%3F"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Photosynthesis",
                "extract": "Photosynthesis is a process used by plants."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = lookup_for(&server.uri())
            .lookup_summary("photosynthesis?")
            .await;
        assert_eq!(
            result,
            LookupResult::Found("Photosynthesis is a process used by plants.".to_string())
        );
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = lookup_for(&server.uri()).lookup_summary("Zzyzx").await;
        assert_eq!(result, LookupResult::NotFound);
        assert_eq!(result.as_text(), "No summary found.");
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = lookup_for(&server.uri()).lookup_summary("Leaf").await;
        assert_eq!(result, LookupResult::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = lookup_for(&server.uri()).lookup_summary("Leaf").await;
        assert_eq!(result, LookupResult::NotFound);
    }

    #[tokio::test]
    async fn test_missing_extract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Leaf"})))
            .mount(&server)
            .await;

        let result = lookup_for(&server.uri()).lookup_summary("Leaf").await;
        assert_eq!(result, LookupResult::NotFound);
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let result = lookup_for(&uri).lookup_summary("Leaf").await;
        assert_eq!(result, LookupResult::NotFound);
    }
}
