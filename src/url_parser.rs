//! Folder ID extraction from Google Drive URLs.

use regex::Regex;
use std::sync::LazyLock;

/// Matches the `/folders/<ID>` segment of any folder URL.
static FOLDER_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/folders/([a-zA-Z0-9_-]+)").expect("Invalid folder regex"));

/// Normalize a folder URL or raw ID into a bare folder ID.
///
/// Anything containing `/folders/<ID>` yields the captured ID, regardless of
/// host, user prefix (`/u/0/`) or trailing query string. Any other input is
/// returned trimmed and otherwise untouched.
///
/// # Examples
///
/// ```
/// use drive_clone::url_parser::normalize_folder_id;
///
/// let id = normalize_folder_id("https://drive.google.com/drive/folders/1abc123?usp=sharing");
/// assert_eq!(id, "1abc123");
///
/// let id = normalize_folder_id("  1abc123  ");
/// assert_eq!(id, "1abc123");
/// ```
pub fn normalize_folder_id(url_or_id: &str) -> String {
    match FOLDER_SEGMENT_REGEX.captures(url_or_id).and_then(|c| c.get(1)) {
        Some(id) => id.as_str().to_string(),
        None => url_or_id.trim().to_string(),
    }
}
