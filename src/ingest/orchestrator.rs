//! Ingestion Orchestrator — drives chunk → classify → embed → store for one
//! document and maintains its lifecycle status.
//!
//! Callers get the `document_id` back immediately and poll
//! `embedding_status`; the pipeline itself runs as a background task. One
//! task runs per document at a time — each upload spawns exactly one, and
//! chunk replacement is transactional, so writes to a document are
//! serialized.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::ingest::chunker::chunk_text;
use crate::models::document::{EmbeddingStatus, FileType};
use crate::store::{EmbeddedChunk, VectorStore};

/// SHA-256 of the cleaned text; identical uploads produce identical hashes,
/// which the idempotent-ingest tests lean on.
pub fn content_hash(cleaned_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cleaned_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Spawns the ingestion pipeline for a freshly created document. Failures
/// are recorded on the document row; the task itself never panics the
/// server.
pub fn spawn_ingestion(
    store: VectorStore,
    embedder: Arc<dyn Embedder>,
    document_id: Uuid,
    file_type: FileType,
    cleaned_text: String,
) {
    tokio::spawn(async move {
        if let Err(e) = run_pipeline(&store, embedder, document_id, file_type, &cleaned_text).await
        {
            error!("Ingestion failed for document {document_id}: {e}");
            // Best effort — if even this update fails the document stays
            // `processing` and the caller's polling surfaces the stall.
            if let Err(status_err) = store
                .set_status(document_id, EmbeddingStatus::Failed, None)
                .await
            {
                error!("Failed to mark document {document_id} failed: {status_err}");
            }
        }
    });
}

/// The pipeline body: processing → chunk → embed → insert → completed.
/// Chunk order is preserved end-to-end; the embedder's outputs align
/// positionally with its inputs.
pub async fn run_pipeline(
    store: &VectorStore,
    embedder: Arc<dyn Embedder>,
    document_id: Uuid,
    file_type: FileType,
    cleaned_text: &str,
) -> Result<usize, AppError> {
    store
        .set_status(document_id, EmbeddingStatus::Processing, None)
        .await?;

    let chunks = chunk_text(cleaned_text, file_type);
    info!(
        "Chunked document {document_id}: {} chunks ({})",
        chunks.len(),
        file_type.as_str()
    );

    // A document with no extractable content completes with zero chunks;
    // matching will report insufficient data rather than an error.
    if chunks.is_empty() {
        store.insert_chunks(document_id, &[]).await?;
        store
            .set_status(document_id, EmbeddingStatus::Completed, Some(0))
            .await?;
        return Ok(0);
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let vectors = embedder
        .embed_batch(&texts)
        .await
        .map_err(|e| AppError::Upstream(format!("Embedding failed: {e}")))?;

    if vectors.len() != chunks.len() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    let model = embedder.model().to_string();
    let embedded: Vec<EmbeddedChunk> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, embedding)| EmbeddedChunk {
            chunk_index: chunk.chunk_index,
            content: chunk.content,
            section_type: chunk.section_type.as_str().to_string(),
            char_count: chunk.char_count,
            token_count: chunk.token_count,
            embedding,
            embedding_model: model.clone(),
        })
        .collect();

    let count = store.insert_chunks(document_id, &embedded).await?;
    store
        .set_status(document_id, EmbeddingStatus::Completed, Some(count as i32))
        .await?;

    info!("Ingestion complete for document {document_id}: {count} chunks");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash("same text");
        let b = content_hash("same text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_content_hash_differs_for_different_text() {
        assert_ne!(content_hash("resume one"), content_hash("resume two"));
    }
}
