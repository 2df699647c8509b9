//! Webflow collection API client
//!
//! Fetches every item of a CMS collection by walking offset-based pages and
//! unwraps each item's `fieldData` into a [`Record`].

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Record;
use crate::config::WebflowConfig;

/// Number of items requested per page; a shorter page ends the listing
pub const PAGE_SIZE: usize = 100;

/// Upper bound on pages walked in a single refresh
pub const MAX_PAGES: usize = 1_000;

/// Message used when the upstream error body carries none
const GENERIC_API_ERROR: &str = "Webflow API error";

/// Errors that can occur when fetching collection items
#[derive(Debug, Error)]
pub enum WebflowError {
    /// Transport failure or undecodable response body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The collection never produced a short page
    #[error("Upstream pagination exceeded {0} pages")]
    TooManyPages(usize),
}

/// One page of the collection listing
#[derive(Debug, Deserialize)]
struct ItemsResponse {
    items: Vec<CollectionItem>,
}

/// A collection item; only its field data is kept
#[derive(Debug, Deserialize)]
struct CollectionItem {
    #[serde(rename = "fieldData")]
    field_data: Record,
}

/// Error body returned by the API on failure
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
}

/// Client for the Webflow collection items endpoint
#[derive(Debug, Clone)]
pub struct WebflowClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Collection, credentials and base URL
    config: WebflowConfig,
}

impl WebflowClient {
    /// Creates a client for the configured collection
    pub fn new(config: WebflowConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(http_client: Client, config: WebflowConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Lazily walks the collection one page at a time
    ///
    /// Each poll issues one request. The stream ends after the first page
    /// holding fewer than [`PAGE_SIZE`] items, after the first error, or with
    /// [`WebflowError::TooManyPages`] once [`MAX_PAGES`] pages were read.
    pub fn pages(&self) -> impl Stream<Item = Result<Vec<Record>, WebflowError>> + '_ {
        stream::try_unfold(Some(0usize), move |next_page| async move {
            let Some(page_index) = next_page else {
                return Ok(None);
            };
            if page_index >= MAX_PAGES {
                return Err(WebflowError::TooManyPages(MAX_PAGES));
            }

            let page = self.fetch_page(page_index * PAGE_SIZE).await?;
            let next_page = (page.len() >= PAGE_SIZE).then_some(page_index + 1);
            Ok(Some((page, next_page)))
        })
    }

    /// Fetches every record in the collection, in upstream order
    ///
    /// Any failed page aborts the whole fetch; nothing partial is returned.
    pub async fn fetch_all_items(&self) -> Result<Vec<Record>, WebflowError> {
        self.pages()
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page);
                Ok(items)
            })
            .await
    }

    /// Fetches a single page starting at `offset`
    async fn fetch_page(&self, offset: usize) -> Result<Vec<Record>, WebflowError> {
        let url = format!(
            "{}/collections/{}/items?limit={}&offset={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.collection_id,
            PAGE_SIZE,
            offset
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .header("accept-version", &self.config.api_version)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebflowError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let page = response.json::<ItemsResponse>().await?;
        tracing::debug!(offset, count = page.items.len(), "Fetched collection page");
        Ok(page.items.into_iter().map(|item| item.field_data).collect())
    }
}

/// Extracts the upstream's error message, falling back to a generic one
fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::ops::Range;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTION_ID: &str = "col-bookkeepers";

    fn test_config(base_url: String) -> WebflowConfig {
        WebflowConfig {
            collection_id: COLLECTION_ID.to_string(),
            api_token: "test-token".to_string(),
            api_version: "1.0.0".to_string(),
            base_url,
        }
    }

    fn items_body(range: Range<usize>) -> Value {
        let items: Vec<Value> = range
            .map(|i| json!({ "id": format!("item-{i}"), "fieldData": { "name": format!("Bookkeeper {i}") } }))
            .collect();
        json!({ "items": items })
    }

    async fn mount_page(server: &MockServer, offset: usize, range: Range<usize>) {
        Mock::given(method("GET"))
            .and(path(format!("/collections/{COLLECTION_ID}/items")))
            .and(query_param("limit", "100"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(range)))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_error_message_prefers_msg() {
        assert_eq!(error_message(r#"{"msg":"Invalid token"}"#), "Invalid token");
        assert_eq!(error_message(r#"{"message":"Not found"}"#), "Not found");
    }

    #[test]
    fn test_error_message_falls_back_to_generic() {
        assert_eq!(error_message("<html>Bad Gateway</html>"), GENERIC_API_ERROR);
        assert_eq!(error_message(r#"{"msg":""}"#), GENERIC_API_ERROR);
        assert_eq!(error_message(""), GENERIC_API_ERROR);
    }

    #[tokio::test]
    async fn test_fetch_sends_credentials_and_version() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/collections/{COLLECTION_ID}/items")))
            .and(header("authorization", "Bearer test-token"))
            .and(header("accept-version", "1.0.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(0..3)))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebflowClient::new(test_config(server.uri()));
        let items = client.fetch_all_items().await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "Bookkeeper 0");
    }

    #[tokio::test]
    async fn test_fetch_walks_pages_until_short_page() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 0..100).await;
        mount_page(&server, 100, 100..200).await;
        mount_page(&server, 200, 200..250).await;

        let client = WebflowClient::new(test_config(server.uri()));
        let items = client.fetch_all_items().await.unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(items[0]["name"], "Bookkeeper 0");
        assert_eq!(items[149]["name"], "Bookkeeper 149");
        assert_eq!(items[249]["name"], "Bookkeeper 249");
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_full_last_page_needs_one_more_request() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 0..100).await;
        mount_page(&server, 100, 0..0).await;

        let client = WebflowClient::new(test_config(server.uri()));
        let items = client.fetch_all_items().await.unwrap();

        assert_eq!(items.len(), 100);
    }

    #[tokio::test]
    async fn test_pages_stream_yields_each_page() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 0..100).await;
        mount_page(&server, 100, 100..120).await;

        let client = WebflowClient::new(test_config(server.uri()));
        let sizes: Vec<usize> = client
            .pages()
            .map_ok(|page| page.len())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(sizes, vec![100, 20]);
    }

    #[tokio::test]
    async fn test_api_error_surfaces_upstream_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "msg": "Invalid API token" })),
            )
            .mount(&server)
            .await;

        let client = WebflowClient::new(test_config(server.uri()));
        let err = client.fetch_all_items().await.unwrap_err();

        match &err {
            WebflowError::Api { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "Invalid API token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "Invalid API token");
    }

    #[tokio::test]
    async fn test_error_mid_pagination_aborts_fetch() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 0..100).await;

        Mock::given(method("GET"))
            .and(query_param("offset", "100"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebflowClient::new(test_config(server.uri()));
        let err = client.fetch_all_items().await.unwrap_err();

        assert_eq!(err.to_string(), GENERIC_API_ERROR);
    }

    #[tokio::test]
    async fn test_item_without_field_data_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "items": [{ "id": "a" }] })),
            )
            .mount(&server)
            .await;

        let client = WebflowClient::new(test_config(server.uri()));
        let err = client.fetch_all_items().await.unwrap_err();

        assert!(matches!(err, WebflowError::Http(_)));
    }

    #[tokio::test]
    async fn test_endless_full_pages_hit_page_cap() {
        let server = MockServer::start().await;

        // Every offset answers with a full page, so no short page ever ends the walk
        Mock::given(method("GET"))
            .and(path(format!("/collections/{COLLECTION_ID}/items")))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(0..PAGE_SIZE)))
            .mount(&server)
            .await;

        let client = WebflowClient::new(test_config(server.uri()));
        let err = client.fetch_all_items().await.unwrap_err();

        assert!(matches!(err, WebflowError::TooManyPages(MAX_PAGES)));
        assert_eq!(MAX_PAGES, 1_000);
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            MAX_PAGES
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = WebflowClient::new(test_config("http://127.0.0.1:1".to_string()));
        let err = client.fetch_all_items().await.unwrap_err();

        assert!(matches!(err, WebflowError::Http(_)));
        assert!(err.to_string().starts_with("HTTP request failed"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 0..1).await;

        let client = WebflowClient::new(test_config(format!("{}/", server.uri())));
        let items = client.fetch_all_items().await.unwrap();

        assert_eq!(items.len(), 1);
    }
}
