//! Notion API client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::NotionConfig;
use crate::error::{DigestError, Result};

use super::types::{Page, SearchResponse, TrackingRecord, UsersResponse, WorkspaceUser};

/// Icon attached to every tracking record.
pub const TRACKING_ICON_URL: &str = "https://www.notion.so/icons/compose_gray.svg";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Remote operations the digest pipeline depends on.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Search pages, most recently edited first. Returns the unfiltered result set.
    async fn search_recent_pages(&self) -> Result<Vec<Page>>;

    /// Create one entry in the tracking database.
    async fn create_tracking_record(&self, record: &TrackingRecord) -> Result<()>;
}

/// Property names of the tracking database.
#[derive(Debug, Clone)]
pub struct TrackingSchema {
    /// Title property.
    pub title: String,
    /// Rich-text property holding the page mention.
    pub link: String,
    /// People property holding the editor.
    pub author: String,
    /// Date property.
    pub date: String,
    /// External icon URL.
    pub icon_url: String,
}

impl Default for TrackingSchema {
    fn default() -> Self {
        Self {
            title: "제목".to_string(),
            link: "링크".to_string(),
            author: "작성자".to_string(),
            date: "날짜".to_string(),
            icon_url: TRACKING_ICON_URL.to_string(),
        }
    }
}

/// Notion REST client.
pub struct NotionClient {
    config: NotionConfig,
    schema: TrackingSchema,
    client: Client,
}

impl NotionClient {
    /// Create a new client with the default tracking schema.
    pub fn new(config: NotionConfig) -> Result<Self> {
        Self::with_schema(config, TrackingSchema::default())
    }

    /// Create a new client writing tracking records with the given schema.
    pub fn with_schema(config: NotionConfig, schema: TrackingSchema) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            config,
            schema,
            client,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(NotionConfig::from_env()?)
    }

    /// List workspace users.
    pub async fn list_users(&self) -> Result<Vec<WorkspaceUser>> {
        let response = self.request(Method::GET, "users").send().await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| DigestError::Api { status, body })?;

        let users: UsersResponse = response.json().await?;
        tracing::debug!(count = users.results.len(), "Fetched workspace users");
        Ok(users.results)
    }

    /// Request body for the search call.
    #[must_use]
    pub fn search_payload() -> Value {
        json!({
            "filter": {
                "value": "page",
                "property": "object"
            },
            "sort": {
                "direction": "descending",
                "timestamp": "last_edited_time"
            }
        })
    }

    /// Request body for creating a tracking record in `database_id`.
    #[must_use]
    pub fn tracking_payload(&self, database_id: &str, record: &TrackingRecord) -> Value {
        let people: Vec<Value> = record
            .editor_id
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();

        let mut properties = serde_json::Map::new();
        properties.insert(
            self.schema.title.clone(),
            json!({ "title": [{ "text": { "content": record.title } }] }),
        );
        properties.insert(
            self.schema.link.clone(),
            json!({
                "rich_text": [{
                    "type": "mention",
                    "mention": {
                        "type": "page",
                        "page": { "id": record.page_id }
                    }
                }]
            }),
        );
        properties.insert(self.schema.author.clone(), json!({ "people": people }));
        properties.insert(
            self.schema.date.clone(),
            json!({ "date": { "start": record.date } }),
        );

        json!({
            "parent": { "database_id": database_id },
            "icon": {
                "type": "external",
                "external": { "url": self.schema.icon_url }
            },
            "properties": properties
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", &self.config.version)
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl WorkspaceApi for NotionClient {
    async fn search_recent_pages(&self) -> Result<Vec<Page>> {
        let response = self
            .request(Method::POST, "search")
            .json(&Self::search_payload())
            .send()
            .await?;

        let response = check_status(response)
            .await
            .map_err(|(status, body)| DigestError::Search { status, body })?;

        let search: SearchResponse = response.json().await?;
        tracing::debug!(
            count = search.results.len(),
            has_more = search.has_more,
            "Search returned pages"
        );

        Ok(search.results)
    }

    async fn create_tracking_record(&self, record: &TrackingRecord) -> Result<()> {
        let database_id = self.config.require_database_id()?;
        let payload = self.tracking_payload(database_id, record);

        let response = self
            .request(Method::POST, "pages")
            .json(&payload)
            .send()
            .await?;

        check_status(response)
            .await
            .map_err(|(status, body)| DigestError::TrackingRecord {
                page_id: record.page_id.clone(),
                status,
                body,
            })?;

        tracing::debug!(page_id = %record.page_id, "Created tracking record");
        Ok(())
    }
}

/// Pass successful responses through; otherwise return status and body text.
async fn check_status(response: Response) -> std::result::Result<Response, (u16, String)> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".into());
    Err((status.as_u16(), body))
}
