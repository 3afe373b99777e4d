//! drive_clone - Provision per-client Google Drive folders from a template.
//!
//! This library provides functionality to:
//! - Normalize folder URLs into bare folder IDs
//! - List every child of a folder across result pages
//! - Recursively copy a folder tree under a new root folder
//! - Serve the above as `POST /clone-folder`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use drive_clone::{clone_folder, normalize_folder_id, DriveClient, ServiceAccountAuth};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = ServiceAccountAuth::from_file("service-account.json")?;
//!     let client = DriveClient::new(Arc::new(auth));
//!
//!     let source = normalize_folder_id("https://drive.google.com/drive/folders/1abc");
//!     let new_id = clone_folder(&client, &source, None, "Client Folder").await?;
//!     println!("{}", new_id);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod cloner;
pub mod config;
pub mod error;
pub mod lister;
pub mod models;
pub mod server;
pub mod storage;
pub mod url_parser;

// Re-exports for convenience
pub use auth::{AccessTokenSource, InstalledAppAuth, ServiceAccountAuth, StaticToken};
pub use client::DriveClient;
pub use cloner::clone_folder;
pub use config::Config;
pub use error::{DriveError, Result};
pub use lister::list_children;
pub use models::{DriveItem, ItemKind};
pub use server::{router, AppState};
pub use storage::RemoteStorage;
pub use url_parser::normalize_folder_id;
