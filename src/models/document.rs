//! Core document data model: file types, lifecycle status, section taxonomy,
//! and the two persisted row shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What an uploaded document is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Resume,
    JobDescription,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Resume => "resume",
            FileType::JobDescription => "job_description",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resume" => Some(FileType::Resume),
            "job_description" => Some(FileType::JobDescription),
            _ => None,
        }
    }
}

/// Vectorization lifecycle of a document.
/// pending → processing → completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EmbeddingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingStatus::Pending => "pending",
            EmbeddingStatus::Processing => "processing",
            EmbeddingStatus::Completed => "completed",
            EmbeddingStatus::Failed => "failed",
        }
    }
}

/// Closed section vocabulary. The first six tags label résumé chunks, the
/// next five label JD chunks; `other` is shared. Wire representation is the
/// snake_case identifier; localization is a UI concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    // Résumé
    Summary,
    Experience,
    Skills,
    Education,
    Projects,
    Certifications,
    // Job description
    Requirements,
    Preferred,
    Responsibilities,
    Technical,
    Benefits,
    // Shared fallback
    Other,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Skills => "skills",
            SectionType::Education => "education",
            SectionType::Projects => "projects",
            SectionType::Certifications => "certifications",
            SectionType::Requirements => "requirements",
            SectionType::Preferred => "preferred",
            SectionType::Responsibilities => "responsibilities",
            SectionType::Technical => "technical",
            SectionType::Benefits => "benefits",
            SectionType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "summary" => Some(SectionType::Summary),
            "experience" => Some(SectionType::Experience),
            "skills" => Some(SectionType::Skills),
            "education" => Some(SectionType::Education),
            "projects" => Some(SectionType::Projects),
            "certifications" => Some(SectionType::Certifications),
            "requirements" => Some(SectionType::Requirements),
            "preferred" => Some(SectionType::Preferred),
            "responsibilities" => Some(SectionType::Responsibilities),
            "technical" => Some(SectionType::Technical),
            "benefits" => Some(SectionType::Benefits),
            "other" => Some(SectionType::Other),
            _ => None,
        }
    }
}

/// A row in the `documents` table.
///
/// `id` is the server-generated matching identity (`document_id`); `file_id`
/// is the client-visible upload handle and never drives matching.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentRow {
    pub id: Uuid,
    pub file_id: Uuid,
    pub filename: String,
    pub file_type: String,
    #[serde(skip_serializing)]
    pub raw_text: Option<String>,
    #[serde(skip_serializing)]
    pub cleaned_text: Option<String>,
    pub word_count: i32,
    pub char_count: i32,
    pub page_count: i32,
    pub chunk_count: i32,
    pub language: String,
    pub embedding_status: String,
    #[serde(skip_serializing)]
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn status(&self) -> Option<EmbeddingStatus> {
        match self.embedding_status.as_str() {
            "pending" => Some(EmbeddingStatus::Pending),
            "processing" => Some(EmbeddingStatus::Processing),
            "completed" => Some(EmbeddingStatus::Completed),
            "failed" => Some(EmbeddingStatus::Failed),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Some(EmbeddingStatus::Completed)
    }
}

/// A row in the `document_chunks` table, without the embedding column.
/// A chunk is eligible for matching iff its embedding is non-null in the DB.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChunkRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub content: String,
    pub section_type: String,
    pub char_count: i32,
    pub token_count: i32,
    pub embedding_model: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_round_trip() {
        for ft in [FileType::Resume, FileType::JobDescription] {
            assert_eq!(FileType::parse(ft.as_str()), Some(ft));
        }
        assert_eq!(FileType::parse("spreadsheet"), None);
    }

    #[test]
    fn test_file_type_serde_snake_case() {
        let json = serde_json::to_string(&FileType::JobDescription).unwrap();
        assert_eq!(json, "\"job_description\"");
    }

    #[test]
    fn test_section_type_round_trip_all() {
        let all = [
            SectionType::Summary,
            SectionType::Experience,
            SectionType::Skills,
            SectionType::Education,
            SectionType::Projects,
            SectionType::Certifications,
            SectionType::Requirements,
            SectionType::Preferred,
            SectionType::Responsibilities,
            SectionType::Technical,
            SectionType::Benefits,
            SectionType::Other,
        ];
        for s in all {
            assert_eq!(SectionType::parse(s.as_str()), Some(s));
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
    }

    #[test]
    fn test_embedding_status_wire_values() {
        assert_eq!(EmbeddingStatus::Pending.as_str(), "pending");
        assert_eq!(EmbeddingStatus::Completed.as_str(), "completed");
    }
}
