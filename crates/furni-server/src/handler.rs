use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::Json;
use furni_service::StorageService;
use furni_types::{Asset, Fields, ItemId};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ServerError, ServerResult};

const UPLOAD_FIELD: &str = "file";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StorageService>,
    pub default_filename: Arc<str>,
}

impl AppState {
    pub fn new(service: Arc<StorageService>, default_filename: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            default_filename: default_filename.into(),
        }
    }

    fn filename(&self, requested: Option<String>) -> String {
        match requested {
            Some(name) if !name.is_empty() => name,
            _ => self.default_filename.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub filename: Option<String>,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub updates: Fields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub item_data: Fields,
}

/// `null` behaves like an absent field: no fields at all.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fields, D::Error> {
    Ok(Option::<Fields>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /files?filename=`
pub async fn read_files(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> ServerResult<Json<Value>> {
    let filename = state.filename(query.filename);
    let document = state.service.read_catalog(&filename).await?;
    Ok(Json(json!({
        "filename": filename,
        "data": document,
    })))
}

/// `POST /update-item`
pub async fn update_item(
    State(state): State<AppState>,
    body: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let Json(req) = body?;
    let item_id = req.item_id.ok_or(ServerError::MissingItemId)?;
    let filename = state.filename(req.filename);
    let item = state
        .service
        .update_item(&filename, &item_id, &req.updates)
        .await?;
    Ok(Json(json!({
        "message": "Item successfully updated",
        "updatedItem": item,
    })))
}

/// `POST /add-item`
pub async fn add_item(
    State(state): State<AppState>,
    body: Result<Json<AddItemRequest>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let Json(req) = body?;
    let filename = state.filename(req.filename);
    let item = state.service.add_item(&filename, &req.item_data).await?;
    Ok(Json(json!({
        "message": "Item successfully added",
        "newItem": item,
    })))
}

/// `POST /upload-asset`, multipart with the file in field `file`.
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or(ServerError::MissingUpload)?;
        let media_type = field
            .content_type()
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        debug!(%filename, %media_type, size = data.len(), "upload received");

        let asset = Asset::new(filename, media_type, data.to_vec());
        let stored = state.service.upload_asset(&asset).await?;
        return Ok(Json(json!({
            "message": "Asset successfully uploaded",
            "filename": stored,
        })));
    }
    Err(ServerError::MissingUpload)
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
