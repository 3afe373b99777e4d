//! HTTP surface: `POST /clone-folder` and a health check.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::cloner::clone_folder;
use crate::storage::RemoteStorage;
use crate::url_parser::normalize_folder_id;

/// Folder name used when the request does not supply one.
pub const DEFAULT_FOLDER_NAME: &str = "Client Folder";

/// Prefix joined with the new folder's ID in successful responses.
pub const DEFAULT_FOLDER_URL_PREFIX: &str = "https://drive.google.com/drive/folders";

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn RemoteStorage>,
    pub folder_url_prefix: String,
}

impl AppState {
    pub fn new(storage: Arc<dyn RemoteStorage>) -> Self {
        Self {
            storage,
            folder_url_prefix: DEFAULT_FOLDER_URL_PREFIX.to_string(),
        }
    }

    pub fn with_folder_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.folder_url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    fn folder_url(&self, folder_id: &str) -> String {
        format!("{}/{}", self.folder_url_prefix, folder_id)
    }
}

/// Fields of a clone request, validated by hand so that every rejection
/// still answers with a JSON body.
#[derive(Debug, PartialEq)]
struct CloneFolderRequest {
    template_folder_id: String,
    new_name: String,
}

impl CloneFolderRequest {
    fn from_json(body: &Value) -> std::result::Result<Self, Response> {
        let template_folder_id = match optional_string(body, "template_folder_id")? {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Missing template_folder_id" })),
                )
                    .into_response())
            }
        };
        let new_name = optional_string(body, "new_name")?.unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());

        Ok(Self {
            template_folder_id,
            new_name,
        })
    }
}

/// `None` for an absent or null field, 400 for anything but a string.
fn optional_string(body: &Value, field: &str) -> std::result::Result<Option<String>, Response> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("{} must be a string", field),
        )),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/clone-folder", post(clone_folder_handler))
        .route("/health", get(health))
        .with_state(Arc::new(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn clone_folder_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(body)) => CloneFolderRequest::from_json(&body),
        Err(rejection) => {
            warn!("Rejected clone request body: {}", rejection.body_text());
            Err(error_response(rejection.status(), rejection.body_text()))
        }
    };
    let request = match request {
        Ok(request) => request,
        Err(response) => return response,
    };
    let new_name = request.new_name.as_str();
    let source_id = normalize_folder_id(&request.template_folder_id);

    info!(source = %source_id, name = new_name, "Cloning folder");

    match clone_folder(state.storage.as_ref(), &source_id, None, new_name).await {
        Ok(new_id) => {
            info!(source = %source_id, created = %new_id, "Clone completed");
            (
                StatusCode::OK,
                Json(json!({ "status": "success", "folder_url": state.folder_url(&new_id) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(source = %source_id, "Clone failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
                .into_response()
        }
    }
}
