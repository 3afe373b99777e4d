//! Recursive duplication of a folder tree.

use async_recursion::async_recursion;
use tracing::debug;

use crate::error::Result;
use crate::lister::list_children;
use crate::models::ItemKind;
use crate::storage::RemoteStorage;

/// Copy the tree rooted at `source_folder_id` into a new folder called
/// `new_folder_name` under `destination_parent_id`, returning the new
/// folder's ID.
///
/// The destination folder always exists before anything is placed in it.
/// Subfolders are handled depth-first, one remote call at a time. The first
/// error aborts the whole clone; whatever was already created is left behind.
#[async_recursion]
pub async fn clone_folder<'a>(
    storage: &'a dyn RemoteStorage,
    source_folder_id: &'a str,
    destination_parent_id: Option<&'a str>,
    new_folder_name: &'a str,
) -> Result<String> {
    let new_folder_id = storage
        .create_folder(new_folder_name, destination_parent_id)
        .await?;
    debug!(source = source_folder_id, created = %new_folder_id, name = new_folder_name, "Created folder");

    for item in list_children(storage, source_folder_id).await? {
        match item.kind() {
            ItemKind::Folder => {
                clone_folder(storage, &item.id, Some(new_folder_id.as_str()), &item.name).await?;
            }
            ItemKind::File => {
                let copied = storage.copy_file(&item.id, &item.name, &new_folder_id).await?;
                debug!(source = %item.id, copied = %copied, name = %item.name, "Copied file");
            }
        }
    }

    Ok(new_folder_id)
}
