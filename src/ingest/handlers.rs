//! Axum route handlers for upload and document lifecycle.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::normalizer::normalize;
use crate::ingest::orchestrator::{content_hash, spawn_ingestion};
use crate::models::document::FileType;
use crate::state::AppState;
use crate::store::NewDocument;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadMetadata {
    pub page_count: i32,
    pub language: String,
    pub parser_used: String,
    pub extraction_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub cleaned_text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub metadata: UploadMetadata,
}

#[derive(Debug, Serialize)]
pub struct DocumentStatusResponse {
    pub document_id: Uuid,
    pub file_id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub embedding_status: String,
    pub chunk_count: i32,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/upload
///
/// Multipart fields: `file` (the document) and `file_type`
/// (`resume` | `job_description`). Extraction is delegated to the
/// configured extractor; ingestion runs in the background and the caller
/// polls the document status.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::new();
    let mut file_type: Option<FileType> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("file_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file_type: {e}")))?;
                file_type = FileType::parse(value.trim());
                if file_type.is_none() {
                    return Err(AppError::Validation(format!(
                        "Invalid file_type '{value}': expected 'resume' or 'job_description'"
                    )));
                }
            }
            _ => {}
        }
    }

    let bytes =
        file_bytes.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let file_type =
        file_type.ok_or_else(|| AppError::Validation("Missing 'file_type' field".to_string()))?;

    let extracted = state.extractor.extract(&filename, &bytes).await?;
    let normalized = normalize(&extracted.text);

    let file_id = Uuid::new_v4();
    let document = NewDocument {
        file_id,
        filename: filename.clone(),
        file_type,
        raw_text: extracted.text.clone(),
        cleaned_text: normalized.cleaned.clone(),
        word_count: normalized.word_count as i32,
        char_count: normalized.char_count as i32,
        page_count: extracted.page_count,
        language: normalized.language.to_string(),
        content_hash: content_hash(&normalized.cleaned),
    };
    let document_id = state.store.upsert_document(&document).await?;

    spawn_ingestion(
        state.store.clone(),
        state.embedder.clone(),
        document_id,
        file_type,
        normalized.cleaned.clone(),
    );

    Ok(Json(UploadResponse {
        file_id,
        document_id,
        filename,
        cleaned_text: normalized.cleaned,
        word_count: normalized.word_count,
        char_count: normalized.char_count,
        metadata: UploadMetadata {
            page_count: extracted.page_count,
            language: normalized.language.to_string(),
            parser_used: extracted.parser_used.to_string(),
            extraction_time_ms: extracted.extraction_time_ms,
        },
    }))
}

/// GET /api/v1/analysis/documents/:file_id
///
/// Lifecycle view for polling `embedding_status` after upload.
pub async fn handle_document_status(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<DocumentStatusResponse>, AppError> {
    let doc = state
        .store
        .get_document_by_file_id(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {file_id}")))?;

    Ok(Json(DocumentStatusResponse {
        document_id: doc.id,
        file_id: doc.file_id,
        filename: doc.filename,
        file_type: doc.file_type,
        embedding_status: doc.embedding_status,
        chunk_count: doc.chunk_count,
        created_at: doc.created_at,
    }))
}

/// DELETE /api/v1/analysis/documents/:file_id
///
/// Removes the document; chunks cascade with it.
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.store.delete_document(file_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Document not found: {file_id}")));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Document deleted"
    })))
}
