//! The three remote operations tree cloning depends on.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FileListResponse;

/// Remote hierarchical storage, as seen by the cloner.
///
/// [`DriveClient`](crate::client::DriveClient) is the production
/// implementation; tests substitute in-memory doubles.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// One page of the non-trashed children of `folder_id`, including items
    /// from shared drives.
    async fn list_page(&self, folder_id: &str, page_token: Option<&str>) -> Result<FileListResponse>;

    /// Create a folder and return its ID. Without a parent, the service picks
    /// its default location.
    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<String>;

    /// Copy `file_id` into `parent_id` under `name` and return the new ID.
    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> Result<String>;
}
