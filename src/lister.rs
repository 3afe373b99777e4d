//! Exhaustive listing of a folder's children.

use crate::error::Result;
use crate::models::DriveItem;
use crate::storage::RemoteStorage;

/// List every immediate child of `folder_id`, following continuation tokens
/// until the last page. Errors from any page are returned as is.
pub async fn list_children(storage: &dyn RemoteStorage, folder_id: &str) -> Result<Vec<DriveItem>> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = storage.list_page(folder_id, page_token.as_deref()).await?;
        all_items.extend(page.files);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(all_items)
}
