//! In-memory `RemoteStorage` that records every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use drive_clone::models::{DriveItem, FileListResponse};
use drive_clone::{DriveError, RemoteStorage, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List { folder_id: String, page_token: Option<String> },
    CreateFolder { id: String, name: String, parent_id: Option<String> },
    CopyFile { id: String, source_id: String, name: String, parent_id: String },
}

/// A source tree keyed by folder ID, served `page_size` items at a time.
pub struct RecordingStorage {
    children: HashMap<String, Vec<DriveItem>>,
    page_size: usize,
    failing_folder: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            page_size: 100,
            failing_folder: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_folder(mut self, folder_id: &str, items: Vec<DriveItem>) -> Self {
        self.children.insert(folder_id.to_string(), items);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Listing this folder returns a 403.
    pub fn failing_on(mut self, folder_id: &str) -> Self {
        self.failing_folder = Some(folder_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Render the created destination tree below `root_id` as sorted paths,
    /// folders suffixed with `/`.
    pub fn created_paths(&self, root_id: &str) -> Vec<String> {
        let calls = self.calls();
        let mut paths = Vec::new();
        collect_paths(&calls, root_id, "", &mut paths);
        paths.sort();
        paths
    }
}

fn collect_paths(calls: &[Call], parent: &str, prefix: &str, out: &mut Vec<String>) {
    for call in calls {
        match call {
            Call::CreateFolder { id, name, parent_id } if parent_id.as_deref() == Some(parent) => {
                let path = format!("{}{}/", prefix, name);
                out.push(path.clone());
                collect_paths(calls, id, &path, out);
            }
            Call::CopyFile { name, parent_id, .. } if parent_id == parent => {
                out.push(format!("{}{}", prefix, name));
            }
            _ => {}
        }
    }
}

#[async_trait]
impl RemoteStorage for RecordingStorage {
    async fn list_page(&self, folder_id: &str, page_token: Option<&str>) -> Result<FileListResponse> {
        self.record(Call::List {
            folder_id: folder_id.to_string(),
            page_token: page_token.map(str::to_string),
        });

        if self.failing_folder.as_deref() == Some(folder_id) {
            return Err(DriveError::ApiError {
                status: 403,
                message: "The user does not have sufficient permissions for this file.".to_string(),
            });
        }

        let items = self.children.get(folder_id).cloned().unwrap_or_default();
        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());

        Ok(FileListResponse {
            files: items[start..end].to_vec(),
            next_page_token: (end < items.len()).then(|| end.to_string()),
        })
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        let id = format!("new-{}", calls.len());
        calls.push(Call::CreateFolder {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
        });
        Ok(id)
    }

    async fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        let id = format!("new-{}", calls.len());
        calls.push(Call::CopyFile {
            id: id.clone(),
            source_id: file_id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        Ok(id)
    }
}

/// `root{A/(file1, file2), file3}`
pub fn sample_tree() -> RecordingStorage {
    RecordingStorage::new()
        .with_folder(
            "root",
            vec![
                DriveItem::folder("a", "A"),
                DriveItem::file("f3", "file3", "text/plain"),
            ],
        )
        .with_folder(
            "a",
            vec![
                DriveItem::file("f1", "file1", "application/pdf"),
                DriveItem::file("f2", "file2", "application/vnd.google-apps.document"),
            ],
        )
}
