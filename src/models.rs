//! Data models for Google Drive API requests and responses.

use serde::{Deserialize, Serialize};

/// MIME type Google Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// What an item is, as far as cloning is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Folder,
    /// Anything that is not a folder, including Docs, Sheets and shortcuts.
    File,
}

impl ItemKind {
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(FOLDER_MIME_TYPE) => ItemKind::Folder,
            _ => ItemKind::File,
        }
    }
}

/// A file or folder in Google Drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl DriveItem {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
        }
    }

    pub fn file(id: impl Into<String>, name: impl Into<String>, mime_type: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: Some(mime_type.to_string()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        ItemKind::from_mime_type(self.mime_type.as_deref())
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response from files.create and files.copy when only `id` is requested.
#[derive(Debug, Deserialize)]
pub struct CreatedItem {
    pub id: String,
}

/// Request body for files.create and files.copy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemMetadata<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<&'a str>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from JSON key.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// Installed-app OAuth client, as downloaded from the Cloud console.
#[derive(Debug, Deserialize)]
pub struct ClientSecretsFile {
    pub installed: InstalledClient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledClient {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Token endpoint response for the JWT bearer grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_from_mime_type() {
        assert_eq!(ItemKind::from_mime_type(Some(FOLDER_MIME_TYPE)), ItemKind::Folder);
        assert_eq!(ItemKind::from_mime_type(Some("text/plain")), ItemKind::File);
        assert_eq!(
            ItemKind::from_mime_type(Some("application/vnd.google-apps.shortcut")),
            ItemKind::File
        );
        assert_eq!(ItemKind::from_mime_type(None), ItemKind::File);
    }

    #[test]
    fn test_drive_item_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "Templates",
            "mimeType": "application/vnd.google-apps.folder"
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.name, "Templates");
        assert_eq!(item.kind(), ItemKind::Folder);
    }

    #[test]
    fn test_new_folder_metadata_without_parent() {
        let metadata = NewItemMetadata {
            name: "Client Folder",
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: Vec::new(),
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["name"], "Client Folder");
        assert_eq!(json["mimeType"], FOLDER_MIME_TYPE);
        assert!(json.get("parents").is_none());
    }

    #[test]
    fn test_copy_metadata_with_parent() {
        let metadata = NewItemMetadata {
            name: "notes.txt",
            mime_type: None,
            parents: vec!["dest"],
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json, serde_json::json!({"name": "notes.txt", "parents": ["dest"]}));
    }
}
