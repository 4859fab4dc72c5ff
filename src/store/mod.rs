//! Vector Store — documents, chunks, vectors, and the similarity RPCs.
//!
//! Backed by Postgres with the pgvector extension. The three similarity
//! operations call SQL functions installed by `migrations/0001_init.sql`:
//! `match_documents`, `match_documents_by_file`, and
//! `calculate_overall_similarity`. All similarity values are clipped into
//! [0, 1] before leaving this module.

use pgvector::Vector;
use sqlx::{FromRow, PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{ChunkRow, DocumentRow, EmbeddingStatus, FileType};

/// Per-call budget for similarity RPCs.
const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields for creating or replacing a document row.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_id: Uuid,
    pub filename: String,
    pub file_type: FileType,
    pub raw_text: String,
    pub cleaned_text: String,
    pub word_count: i32,
    pub char_count: i32,
    pub page_count: i32,
    pub language: String,
    pub content_hash: String,
}

/// A chunk ready for insertion, embedding attached.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk_index: i32,
    pub content: String,
    pub section_type: String,
    pub char_count: i32,
    pub token_count: i32,
    pub embedding: Vec<f32>,
    pub embedding_model: String,
}

/// A kNN hit from `match_documents`.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct ChunkSearchHit {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub content: String,
    pub section_type: String,
    pub similarity: f64,
}

/// One (resume chunk, jd chunk) pair from `match_documents_by_file`.
#[derive(Debug, Clone, FromRow)]
pub struct PairwiseMatch {
    pub resume_chunk_id: Uuid,
    pub resume_chunk_index: i32,
    pub resume_section_type: String,
    pub resume_content: String,
    pub jd_chunk_id: Uuid,
    pub jd_chunk_index: i32,
    pub jd_section_type: String,
    pub jd_content: String,
    pub similarity: f64,
}

/// Relational + vector persistence for documents and chunks.
#[derive(Clone)]
pub struct VectorStore {
    pool: PgPool,
}

impl VectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Documents ──────────────────────────────────────────────────────────

    /// Inserts the document, or replaces the mutable fields when the same
    /// `file_id` is uploaded again. Returns the server-side `document_id`.
    pub async fn upsert_document(&self, doc: &NewDocument) -> Result<Uuid, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO documents
                (file_id, filename, file_type, raw_text, cleaned_text,
                 word_count, char_count, page_count, language,
                 embedding_status, content_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10)
            ON CONFLICT (file_id) DO UPDATE SET
                filename = EXCLUDED.filename,
                raw_text = EXCLUDED.raw_text,
                cleaned_text = EXCLUDED.cleaned_text,
                word_count = EXCLUDED.word_count,
                char_count = EXCLUDED.char_count,
                page_count = EXCLUDED.page_count,
                language = EXCLUDED.language,
                embedding_status = 'pending',
                content_hash = EXCLUDED.content_hash,
                updated_at = now()
            RETURNING id
            "#,
        )
        .bind(doc.file_id)
        .bind(&doc.filename)
        .bind(doc.file_type.as_str())
        .bind(&doc.raw_text)
        .bind(&doc.cleaned_text)
        .bind(doc.word_count)
        .bind(doc.char_count)
        .bind(doc.page_count)
        .bind(&doc.language)
        .bind(&doc.content_hash)
        .fetch_one(&self.pool)
        .await?;

        let id: Uuid = row.try_get("id").map_err(AppError::Database)?;
        info!("Document upserted: {id} (file_id={})", doc.file_id);
        Ok(id)
    }

    pub async fn get_document_by_id(&self, id: Uuid) -> Result<Option<DocumentRow>, AppError> {
        let doc = sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc)
    }

    pub async fn get_document_by_file_id(
        &self,
        file_id: Uuid,
    ) -> Result<Option<DocumentRow>, AppError> {
        let doc = sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE file_id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc)
    }

    /// Atomically sets the lifecycle status (and chunk_count when known).
    pub async fn set_status(
        &self,
        document_id: Uuid,
        status: EmbeddingStatus,
        chunk_count: Option<i32>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE documents
            SET embedding_status = $2,
                chunk_count = COALESCE($3, chunk_count),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(document_id)
        .bind(status.as_str())
        .bind(chunk_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deletes the document by client handle; chunks go with it via the
    /// cascading foreign key. Returns false when nothing matched.
    pub async fn delete_document(&self, file_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE file_id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Document deleted: file_id={file_id}");
        }
        Ok(deleted)
    }

    // ── Chunks ─────────────────────────────────────────────────────────────

    /// Replaces the document's chunks in one transaction: delete then insert,
    /// so a re-ingest of identical bytes is atomic and idempotent.
    pub async fn insert_chunks(
        &self,
        document_id: Uuid,
        chunks: &[EmbeddedChunk],
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM document_chunks WHERE document_id = $1")
            .bind(document_id)
            .execute(&mut *tx)
            .await?;

        for chunk in chunks {
            sqlx::query(
                r#"
                INSERT INTO document_chunks
                    (document_id, chunk_index, content, section_type,
                     char_count, token_count, embedding, embedding_model)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(document_id)
            .bind(chunk.chunk_index)
            .bind(&chunk.content)
            .bind(&chunk.section_type)
            .bind(chunk.char_count)
            .bind(chunk.token_count)
            .bind(Vector::from(chunk.embedding.clone()))
            .bind(&chunk.embedding_model)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Inserted {} chunks for document {document_id}", chunks.len());
        Ok(chunks.len())
    }

    /// Chunks of a document in `chunk_index` order, embeddings excluded.
    pub async fn get_chunks(&self, document_id: Uuid) -> Result<Vec<ChunkRow>, AppError> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            r#"
            SELECT id, document_id, chunk_index, content, section_type,
                   char_count, token_count, embedding_model, created_at
            FROM document_chunks
            WHERE document_id = $1
            ORDER BY chunk_index
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of chunks of a document that actually carry an embedding.
    pub async fn embedded_chunk_count(&self, document_id: Uuid) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT count(*) AS n FROM document_chunks \
             WHERE document_id = $1 AND embedding IS NOT NULL",
        )
        .bind(document_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_get::<i64, _>("n").map_err(AppError::Database)
    }

    // ── Similarity RPCs ────────────────────────────────────────────────────

    /// kNN by cosine over all embedded chunks, optionally filtered by file
    /// type and/or client file handle. `similarity = 1 − cosine_distance`.
    pub async fn match_documents(
        &self,
        query_vec: &[f32],
        k: i32,
        filter_file_type: Option<FileType>,
        filter_file_id: Option<Uuid>,
        min_similarity: f64,
    ) -> Result<Vec<ChunkSearchHit>, AppError> {
        let fut = sqlx::query_as::<_, ChunkSearchHit>(
            "SELECT * FROM match_documents($1, $2, $3, $4, $5)",
        )
        .bind(Vector::from(query_vec.to_vec()))
        .bind(k)
        .bind(filter_file_type.map(|t| t.as_str()))
        .bind(filter_file_id)
        .bind(min_similarity)
        .fetch_all(&self.pool);

        let mut hits = with_rpc_timeout(fut).await?;
        for hit in &mut hits {
            hit.similarity = hit.similarity.clamp(0.0, 1.0);
        }
        Ok(hits)
    }

    /// For each resume chunk, its `top_k` most similar JD chunks.
    /// Rows come back ordered by resume `chunk_index`, then similarity desc.
    pub async fn match_documents_by_file(
        &self,
        resume_document_id: Uuid,
        jd_document_id: Uuid,
        top_k: i32,
    ) -> Result<Vec<PairwiseMatch>, AppError> {
        let fut = sqlx::query_as::<_, PairwiseMatch>(
            "SELECT * FROM match_documents_by_file($1, $2, $3)",
        )
        .bind(resume_document_id)
        .bind(jd_document_id)
        .bind(top_k)
        .fetch_all(&self.pool);

        let mut pairs = with_rpc_timeout(fut).await?;
        for pair in &mut pairs {
            pair.similarity = pair.similarity.clamp(0.0, 1.0);
        }
        Ok(pairs)
    }

    /// Cosine similarity between the two documents' chunk-embedding
    /// centroids; 0 when either centroid is undefined.
    pub async fn overall_similarity(
        &self,
        document_id_a: Uuid,
        document_id_b: Uuid,
    ) -> Result<f64, AppError> {
        let fut = sqlx::query("SELECT calculate_overall_similarity($1, $2) AS similarity")
            .bind(document_id_a)
            .bind(document_id_b)
            .fetch_one(&self.pool);

        let row = with_rpc_timeout(fut).await?;
        let similarity: f64 = row.try_get("similarity").map_err(AppError::Database)?;
        Ok(similarity.clamp(0.0, 1.0))
    }
}

/// Wraps a vector RPC future with the 10 s budget; a timeout surfaces as a
/// retriable upstream error, not an internal one.
async fn with_rpc_timeout<T>(
    fut: impl std::future::Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(RPC_TIMEOUT, fut).await {
        Ok(result) => result.map_err(AppError::Database),
        Err(_) => Err(AppError::Upstream(
            "vector store call timed out".to_string(),
        )),
    }
}
