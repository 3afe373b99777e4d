//! Google Drive API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::auth::AccessTokenSource;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, CreatedItem, FileListResponse, NewItemMetadata, FOLDER_MIME_TYPE};
use crate::storage::RemoteStorage;

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested for each listed item.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Client for interacting with Google Drive, including shared drives.
#[derive(Clone)]
pub struct DriveClient {
    base_url: String,
    auth: Arc<dyn AccessTokenSource>,
    http: Client,
}

impl DriveClient {
    /// Create a new DriveClient against the public Drive API.
    pub fn new(auth: Arc<dyn AccessTokenSource>) -> Self {
        Self::with_base_url(auth, DRIVE_API_BASE)
    }

    /// Create a client against another API root (proxies, mock servers).
    pub fn with_base_url(auth: Arc<dyn AccessTokenSource>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            http: Client::new(),
        }
    }

    async fn create(&self, metadata: &NewItemMetadata<'_>) -> Result<String> {
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "id")])
            .json(metadata)
            .send()
            .await?;

        let created: CreatedItem = check_response(response).await?.json().await?;
        Ok(created.id)
    }
}

#[async_trait]
impl RemoteStorage for DriveClient {
    async fn list_page(&self, folder_id: &str, page_token: Option<&str>) -> Result<FileListResponse> {
        let token = self.auth.access_token().await?;
        let query = format!("'{}' in parents and trashed = false", escape_query_value(folder_id));

        let mut request = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
                ("fields", LIST_FIELDS),
            ]);

        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let page: FileListResponse = check_response(request.send().await?).await?.json().await?;
        debug!(folder_id, items = page.files.len(), more = page.next_page_token.is_some(), "Listed page");
        Ok(page)
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<String> {
        let metadata = NewItemMetadata {
            name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: parent_id.into_iter().collect(),
        };
        self.create(&metadata).await
    }

    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> Result<String> {
        let token = self.auth.access_token().await?;
        let metadata = NewItemMetadata {
            name,
            mime_type: None,
            parents: vec![parent_id],
        };

        let response = self
            .http
            .post(format!("{}/files/{}/copy", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "id")])
            .json(&metadata)
            .send()
            .await?;

        let created: CreatedItem = check_response(response).await?.json().await?;
        Ok(created.id)
    }
}

/// Escape a value for use inside a single-quoted Drive query string.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Turn a non-2xx response into `DriveError::ApiError`, preferring the
/// message from Google's JSON error body.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
