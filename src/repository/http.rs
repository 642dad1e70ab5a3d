//! HTTP Collection Client
//!
//! Talks to a REST content service:
//!
//! ```text
//! GET    {base}/collections/{name}/items[?cursor=..&limit=..] -> { items, nextCursor }
//! POST   {base}/collections/{name}/items                      -> record
//! PUT    {base}/collections/{name}/items/{id}                 -> record
//! DELETE {base}/collections/{name}/items/{id}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use tracing::debug;

use super::traits::{record_id, CollectionClient, Page, PageRequest, Record};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Option<Duration>,
}

pub struct HttpCollectionClient {
    config: HttpClientConfig,
    http_client: reqwest::Client,
}

/// Which side of the contract a failed call was on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Read,
    Write,
}

/// Map a non-success status to the domain taxonomy
fn status_error(op: Op, status: StatusCode, collection: &str, id: Option<&str>) -> DomainError {
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => DomainError::not_found(collection, id),
        (StatusCode::CONFLICT, Some(id)) => DomainError::conflict(collection, id),
        _ => {
            let message = format!("HTTP {}", status);
            match op {
                Op::Read => DomainError::fetch(collection, message),
                Op::Write => DomainError::write(collection, message),
            }
        }
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

impl HttpCollectionClient {
    /// Build the client; fails if the TLS backend cannot be initialised
    pub fn new(config: HttpClientConfig) -> DomainResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent("consulting-site/0.1");
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| DomainError::fetch(&config.base_url, format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { config, http_client })
    }

    fn items_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/items",
            self.config.base_url.trim_end_matches('/'),
            encode_segment(collection)
        )
    }

    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.items_url(collection), encode_segment(id))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn request_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        let url = self.items_url(collection);
        debug!(collection = %collection, url = %url, "GET collection");

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = &request.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(limit) = request.limit {
            query.push(("limit", limit.to_string()));
        }

        let response = self
            .authorize(self.http_client.get(&url).query(&query))
            .send()
            .await
            .map_err(|e| DomainError::fetch(collection, e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(Op::Read, response.status(), collection, None));
        }

        response
            .json::<Page<Record>>()
            .await
            .map_err(|e| DomainError::serialization(collection, e.to_string()))
    }

    async fn send_record(
        &self,
        request: reqwest::RequestBuilder,
        collection: &str,
        id: &str,
    ) -> DomainResult<Record> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| DomainError::write(collection, e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(Op::Write, response.status(), collection, Some(id)));
        }

        response
            .json::<Record>()
            .await
            .map_err(|e| DomainError::serialization(collection, e.to_string()))
    }
}

#[async_trait]
impl CollectionClient for HttpCollectionClient {
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>> {
        let mut items = Vec::new();
        let mut request = PageRequest::default();
        loop {
            let page = self.request_page(collection, &request).await?;
            items.extend(page.items);
            match page.next_cursor {
                Some(cursor) if request.cursor.as_deref() != Some(cursor.as_str()) => {
                    request.cursor = Some(cursor);
                }
                _ => break,
            }
        }
        Ok(items)
    }

    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        self.request_page(collection, request).await
    }

    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record> {
        let id = record_id(&record)
            .ok_or_else(|| DomainError::write(collection, "record has no id"))?
            .to_string();
        let request = self.http_client.post(self.items_url(collection)).json(&record);
        self.send_record(request, collection, &id).await
    }

    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record> {
        let id = record_id(&record)
            .ok_or_else(|| DomainError::write(collection, "record has no id"))?
            .to_string();
        let request = self.http_client.put(self.item_url(collection, &id)).json(&record);
        self.send_record(request, collection, &id).await
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        let response = self
            .authorize(self.http_client.delete(self.item_url(collection, id)))
            .send()
            .await
            .map_err(|e| DomainError::write(collection, e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(Op::Write, response.status(), collection, Some(id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Project;
    use crate::repository::TypedCollections;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const ITEMS: &str = "/collections/projects/items";

    fn client(base: &str) -> HttpCollectionClient {
        HttpCollectionClient::new(HttpClientConfig {
            base_url: base.to_string(),
            api_token: None,
            request_timeout: None,
        })
        .unwrap()
    }

    fn authed(server: &MockServer) -> HttpCollectionClient {
        HttpCollectionClient::new(HttpClientConfig {
            base_url: server.uri(),
            api_token: Some("secret".to_string()),
            request_timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            project_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_urls_trim_and_encode() {
        let c = client("https://cms.example.com/api/");
        assert_eq!(
            c.items_url("blogposts"),
            "https://cms.example.com/api/collections/blogposts/items"
        );
        assert_eq!(
            c.item_url("blogposts", "a b/c"),
            "https://cms.example.com/api/collections/blogposts/items/a%20b%2Fc"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(Op::Write, StatusCode::NOT_FOUND, "projects", Some("u1")),
            DomainError::not_found("projects", "u1")
        );
        assert_eq!(
            status_error(Op::Write, StatusCode::CONFLICT, "projects", Some("u1")),
            DomainError::conflict("projects", "u1")
        );
        assert!(matches!(
            status_error(Op::Read, StatusCode::NOT_FOUND, "projects", None),
            DomainError::Fetch { .. }
        ));
        assert!(matches!(
            status_error(Op::Write, StatusCode::INTERNAL_SERVER_ERROR, "projects", Some("u1")),
            DomainError::Write { .. }
        ));
    }

    #[tokio::test]
    async fn test_get_all_follows_cursor_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ITEMS))
            .and(header("Authorization", "Bearer secret"))
            .and(|req: &Request| !req.url.query_pairs().any(|(k, _)| k == "cursor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"_id": "p1", "projectName": "Alpha"}],
                "nextCursor": "c2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ITEMS))
            .and(header("Authorization", "Bearer secret"))
            .and(query_param("cursor", "c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"_id": "p2", "projectName": "Beta"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let all: Vec<Project> = authed(&server).fetch_all().await.unwrap();
        assert_eq!(all, vec![project("p1", "Alpha"), project("p2", "Beta")]);
    }

    #[tokio::test]
    async fn test_get_page_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ITEMS))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"_id": "p1"}],
                "nextCursor": "1"
            })))
            .mount(&server)
            .await;

        let page = authed(&server)
            .fetch_page::<Project>(&PageRequest::first(1))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_failed_listing_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ITEMS))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = authed(&server).get_all("projects").await.unwrap_err();
        assert_eq!(err, DomainError::fetch("projects", "HTTP 503 Service Unavailable"));
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ITEMS))
            .and(header("Authorization", "Bearer secret"))
            .and(body_partial_json(json!({"_id": "p1", "projectName": "Alpha"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_id": "p1",
                "projectName": "Alpha",
                "_revision": 1
            })))
            .mount(&server)
            .await;

        let saved = authed(&server).create_entity(&project("p1", "Alpha")).await.unwrap();
        assert_eq!(saved.revision, Some(1));
        assert_eq!(saved.project_name.as_deref(), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_stale_update_is_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/p1", ITEMS)))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let err = authed(&server).update_entity(&project("p1", "Alpha")).await.unwrap_err();
        assert_eq!(err, DomainError::conflict("projects", "p1"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}/u1", ITEMS)))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = authed(&server).delete("projects", "u1").await.unwrap_err();
        assert_eq!(err, DomainError::not_found("projects", "u1"));
    }
}
