//! Text extraction seam for the upload path.
//!
//! PDF parsing is an external collaborator: the upload handler only talks
//! to the `TextExtractor` trait, and a PDF-capable implementation can be
//! plugged in behind it. The crate ships a plain-text/markdown extractor.

use async_trait::async_trait;

use crate::errors::AppError;

/// Raw extraction output, before normalization.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: i32,
    pub parser_used: &'static str,
    pub extraction_time_ms: f64,
}

/// Turns uploaded bytes into text. Implementations decide which file
/// formats they accept.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, AppError>;
}

/// Extractor for plain-text and markdown uploads. Pages are counted by
/// form-feed separators, matching how text exports of PDFs arrive.
pub struct PlainTextExtractor;

const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text"];

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    async fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, AppError> {
        let start = std::time::Instant::now();

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Unsupported file type '.{extension}'. Supported: {}",
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("File is not valid UTF-8 text".to_string()))?;

        if text.trim().is_empty() {
            return Err(AppError::Validation("File contains no text".to_string()));
        }

        let page_count = text.matches('\u{c}').count() as i32 + 1;

        Ok(ExtractedDocument {
            text,
            page_count,
            parser_used: self.name(),
            extraction_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extracts_plain_text() {
        let doc = PlainTextExtractor
            .extract("resume.txt", b"Skills\nRust, SQL")
            .await
            .unwrap();
        assert_eq!(doc.text, "Skills\nRust, SQL");
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.parser_used, "plain_text");
    }

    #[tokio::test]
    async fn test_counts_pages_by_form_feed() {
        let doc = PlainTextExtractor
            .extract("resume.txt", "page one\u{c}page two\u{c}page three".as_bytes())
            .await
            .unwrap();
        assert_eq!(doc.page_count, 3);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let result = PlainTextExtractor.extract("resume.docx", b"hello").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejects_invalid_utf8() {
        let result = PlainTextExtractor
            .extract("resume.txt", &[0xff, 0xfe, 0x00])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_file() {
        let result = PlainTextExtractor.extract("resume.txt", b"   \n ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_accepts_markdown() {
        let doc = PlainTextExtractor
            .extract("jd.md", b"# Requirements\n- Rust")
            .await
            .unwrap();
        assert!(doc.text.contains("Requirements"));
    }
}
