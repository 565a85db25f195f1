//! OpenAlex work source.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::models::{Work, WorkId, WorkList};
use crate::sources::{SourceError, WorkSource};
use crate::utils::HttpClient;

pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// OpenAlex research source
///
/// Uses the OpenAlex REST API. Every call is a single GET; nothing is retried
/// or cached.
#[derive(Debug, Clone)]
pub struct OpenAlexSource {
    client: HttpClient,
    base_url: String,
    email: Option<String>,
}

impl OpenAlexSource {
    /// Create a source against the public API with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ApiConfig::default())
    }

    /// Create a source from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self, SourceError> {
        if config.timeout_secs == 0 {
            return Err(SourceError::InvalidRequest(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = HttpClient::new(timeout, config.mailto.as_deref())?;
        Ok(Self::with_client(client, &config.base_url, config.mailto.clone()))
    }

    /// Create a source from an existing client
    pub fn with_client(client: HttpClient, base_url: &str, email: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL of a single work
    fn work_url(&self, id: &WorkId) -> String {
        format!("{}/works/{}", self.base_url, id)
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let mut request = self.client.client().get(url);
        // Polite pool: identifies the caller to OpenAlex
        if let Some(ref email) = self.email {
            request = request.query(&[("mailto", email)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        debug!(%status, url, "OpenAlex response");

        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Api(format!(
                "OpenAlex API returned status: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))
    }
}

#[async_trait]
impl WorkSource for OpenAlexSource {
    fn id(&self) -> &str {
        "openalex"
    }

    fn name(&self) -> &str {
        "OpenAlex"
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn get_work(&self, id: &WorkId) -> Result<Work, SourceError> {
        self.get_json(&self.work_url(id)).await
    }

    #[instrument(skip(self))]
    async fn get_cited_by(&self, cited_by_url: &str) -> Result<WorkList, SourceError> {
        self.get_json(cited_by_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn source_for(server: &ServerGuard, email: Option<&str>) -> OpenAlexSource {
        let client = HttpClient::new(Duration::from_secs(5), email).unwrap();
        OpenAlexSource::with_client(client, &server.url(), email.map(str::to_string))
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpClient::new(Duration::from_secs(5), None).unwrap();
        let source = OpenAlexSource::with_client(client, "https://api.openalex.org/", None);
        assert_eq!(source.base_url(), "https://api.openalex.org");
        assert_eq!(
            source.work_url(&WorkId::parse("W1").unwrap()),
            "https://api.openalex.org/works/W1"
        );
    }

    #[test]
    fn test_from_config_rejects_zero_timeout() {
        let config = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(
            OpenAlexSource::from_config(&config),
            Err(SourceError::InvalidRequest(_))
        ));

        let config = ApiConfig {
            timeout_secs: 1,
            ..ApiConfig::default()
        };
        assert!(OpenAlexSource::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_get_work() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/works/W2053250335")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "https://openalex.org/W2053250335",
                    "title": "Examples of Effective Data Sharing in Scientific Publishing",
                    "publication_year": 2015,
                    "type": "journal-article",
                    "authorships": [{"author": {"display_name": "John R. Kitchin"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let source = source_for(&server, None);
        let work = source
            .get_work(&WorkId::parse("https://openalex.org/W2053250335").unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(work.publication_year, Some(2015));
        assert_eq!(work.author_names(), vec!["John R. Kitchin"]);
    }

    #[tokio::test]
    async fn test_mailto_sent_as_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/works/W1")
            .match_query(Matcher::UrlEncoded(
                "mailto".to_string(),
                "me@example.org".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id": "https://openalex.org/W1"}"#)
            .create_async()
            .await;

        let source = source_for(&server, Some("me@example.org"));
        source.get_work(&WorkId::parse("W1").unwrap()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_cited_by_keeps_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::UrlEncoded(
                "filter".to_string(),
                "cites:W1".to_string(),
            ))
            .with_status(200)
            .with_body(
                json!({"results": [
                    {"id": "https://openalex.org/W10"},
                    {"id": "https://openalex.org/W11"}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let source = source_for(&server, None);
        let url = format!("{}/works?filter=cites:W1", server.url());
        let page = source.get_cited_by(&url).await.unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = page.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["https://openalex.org/W10", "https://openalex.org/W11"]);
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/W404")
            .with_status(404)
            .create_async()
            .await;

        let source = source_for(&server, None);
        let err = source
            .get_work(&WorkId::parse("W404").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/W500")
            .with_status(503)
            .create_async()
            .await;

        let source = source_for(&server, None);
        let err = source
            .get_work(&WorkId::parse("W500").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/Wbad")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let source = source_for(&server, None);
        let err = source
            .get_work(&WorkId::parse("Wbad").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = HttpClient::new(Duration::from_secs(2), None).unwrap();
        let source = OpenAlexSource::with_client(client, "http://127.0.0.1:1", None);
        let err = source
            .get_work(&WorkId::parse("W1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
    }
}
