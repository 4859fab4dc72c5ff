//! Chunker — splits a normalized document into overlapping semantic chunks.
//!
//! Strategy: segment the document at section headings first (a heading line
//! is never split away from its section), then budget-chunk inside each
//! section at 600–800 estimated tokens with an 80-token overlap. Trailing
//! fragments under 200 tokens merge into the previous chunk of their
//! section. Identical input always yields identical chunks.

use crate::ingest::classifier::{classify_chunk, detect_heading};
use crate::models::document::{FileType, SectionType};

/// Upper bound of the chunk token budget.
const MAX_CHUNK_TOKENS: usize = 800;
/// Tokens carried over from the end of one chunk into the next.
const OVERLAP_TOKENS: usize = 80;
/// Trailing chunks smaller than this merge into their predecessor.
const MIN_TAIL_TOKENS: usize = 200;

/// One planned chunk, ready for embedding and insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChunk {
    pub chunk_index: i32,
    pub content: String,
    pub section_type: SectionType,
    pub char_count: i32,
    pub token_count: i32,
}

/// Splits normalized text into ordered, contiguously indexed chunks.
/// Empty or whitespace-only input yields no chunks.
pub fn chunk_text(text: &str, file_type: FileType) -> Vec<PlannedChunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sections = split_into_sections(text, file_type);
    let mut chunks: Vec<PlannedChunk> = Vec::new();

    for section in &sections {
        let section_type = section
            .heading_type
            .unwrap_or_else(|| classify_chunk(&section.content, file_type));

        let first_of_section = chunks.len();
        for piece in budget_split(&section.content) {
            chunks.push(make_chunk(chunks.len() as i32, piece, section_type));
        }

        merge_small_tail(&mut chunks, first_of_section);
    }

    // Re-number after merges so indices stay contiguous from 0.
    for (i, chunk) in chunks.iter_mut().enumerate() {
        chunk.chunk_index = i as i32;
    }

    chunks
}

/// Estimates token count: chars-per-token interpolated between 4 (latin)
/// and 2 (hangul) by script ratio.
pub fn estimate_tokens(text: &str) -> usize {
    let total = text.chars().count();
    if total == 0 {
        return 0;
    }
    let korean = text.chars().filter(|c| ('가'..='힣').contains(c)).count();
    let korean_ratio = korean as f64 / total as f64;
    let chars_per_token = 4.0 - korean_ratio * 2.0;
    (total as f64 / chars_per_token) as usize
}

struct TextSection {
    heading_type: Option<SectionType>,
    content: String,
}

/// Splits the document at heading lines. Content before the first heading
/// becomes an untyped leading section classified as a whole.
fn split_into_sections(text: &str, file_type: FileType) -> Vec<TextSection> {
    let mut sections: Vec<TextSection> = Vec::new();
    let mut current_type: Option<SectionType> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(heading) = detect_heading(line, file_type) {
            flush_section(&mut sections, current_type, &current_lines);
            current_type = Some(heading);
            current_lines = vec![line]; // heading stays with its section
        } else {
            current_lines.push(line);
        }
    }
    flush_section(&mut sections, current_type, &current_lines);

    sections
}

fn flush_section(
    sections: &mut Vec<TextSection>,
    heading_type: Option<SectionType>,
    lines: &[&str],
) {
    let content = lines.join("\n").trim().to_string();
    if !content.is_empty() {
        sections.push(TextSection {
            heading_type,
            content,
        });
    }
}

/// Splits section content into pieces within the token budget, carrying an
/// overlap of trailing lines into each subsequent piece.
fn budget_split(content: &str) -> Vec<String> {
    if estimate_tokens(content) <= MAX_CHUNK_TOKENS {
        return vec![content.to_string()];
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut buffer_tokens = 0usize;

    for line in content.lines() {
        for segment in split_oversized_line(line) {
            let seg_tokens = estimate_tokens(&segment);

            if buffer_tokens + seg_tokens > MAX_CHUNK_TOKENS && !buffer.is_empty() {
                pieces.push(buffer.join("\n"));
                let overlap = take_overlap(&buffer);
                buffer_tokens = overlap.iter().map(|l| estimate_tokens(l)).sum();
                buffer = overlap;
            }

            buffer_tokens += seg_tokens;
            buffer.push(segment);
        }
    }

    if !buffer.is_empty() {
        pieces.push(buffer.join("\n"));
    }

    pieces
}

/// Trailing lines of a flushed buffer totalling at most OVERLAP_TOKENS.
fn take_overlap(buffer: &[String]) -> Vec<String> {
    let mut overlap: Vec<String> = Vec::new();
    let mut tokens = 0usize;
    for line in buffer.iter().rev() {
        let line_tokens = estimate_tokens(line);
        if tokens + line_tokens > OVERLAP_TOKENS {
            break;
        }
        tokens += line_tokens;
        overlap.push(line.clone());
    }
    overlap.reverse();
    overlap
}

/// A single line exceeding the whole chunk budget is split at whitespace
/// near the budget boundary so the chunker always terminates.
fn split_oversized_line(line: &str) -> Vec<String> {
    if estimate_tokens(line) <= MAX_CHUNK_TOKENS {
        return vec![line.to_string()];
    }

    let max_chars = MAX_CHUNK_TOKENS * 4;
    let mut segments = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len() {
            // back up to the nearest space so words stay whole
            if let Some(pos) = chars[start..end].iter().rposition(|c| *c == ' ') {
                if pos > 0 {
                    end = start + pos;
                }
            }
        }
        let segment: String = chars[start..end].iter().collect();
        let segment = segment.trim().to_string();
        if !segment.is_empty() {
            segments.push(segment);
        }
        start = end.max(start + 1);
    }
    segments
}

/// Merges a section's trailing fragment into its previous chunk when the
/// tail is under MIN_TAIL_TOKENS.
fn merge_small_tail(chunks: &mut Vec<PlannedChunk>, first_of_section: usize) {
    if chunks.len() < 2 || chunks.len() - first_of_section < 2 {
        return;
    }
    let tail_is_small = chunks
        .last()
        .is_some_and(|last| (last.token_count as usize) < MIN_TAIL_TOKENS);
    if !tail_is_small {
        return;
    }
    if let Some(tail) = chunks.pop() {
        if let Some(prev) = chunks.last_mut() {
            prev.content.push('\n');
            prev.content.push_str(&tail.content);
            prev.char_count = prev.content.chars().count() as i32;
            prev.token_count = estimate_tokens(&prev.content) as i32;
        }
    }
}

fn make_chunk(index: i32, content: String, section_type: SectionType) -> PlannedChunk {
    let char_count = content.chars().count() as i32;
    let token_count = estimate_tokens(&content) as i32;
    PlannedChunk {
        chunk_index: index,
        content,
        section_type,
        char_count,
        token_count,
    }
}
