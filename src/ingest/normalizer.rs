//! Text Normalizer — cleans extracted text and detects its primary language.
//!
//! Pure functions, no I/O. Cleaning never silently drops more than 5% of the
//! input; if it would, the original text is returned unchanged.

/// Fraction of input characters cleaning is allowed to remove.
const MAX_DROP_RATIO: f64 = 0.05;

/// Result of normalizing one extracted document.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub cleaned: String,
    /// Two-letter language code ("ko", "en") or "unknown".
    pub language: &'static str,
    pub word_count: usize,
    pub char_count: usize,
}

/// Cleans raw extracted text and detects the primary language.
pub fn normalize(raw: &str) -> NormalizedText {
    let cleaned = clean_text(raw);
    let language = detect_language(&cleaned);
    let word_count = cleaned.split_whitespace().count();
    let char_count = cleaned.chars().count();

    NormalizedText {
        cleaned,
        language,
        word_count,
        char_count,
    }
}

/// Cleans extracted text for downstream chunking and LLM input.
///
/// Collapses runs of spaces, strips control characters and form-feed page
/// markers, re-joins words hyphenated across line breaks, drops standalone
/// page-number lines, and caps consecutive newlines at two so paragraph
/// boundaries survive.
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Control characters out, newlines and tabs kept; tabs become spaces.
    let mut text: String = raw
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();
    text = text.replace('\r', "");

    text = collapse_spaces(&text);
    text = rejoin_hyphenated_words(&text);

    // Per-line cleanup: trim, drop page-number-only lines.
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !is_page_marker(line))
        .collect();
    text = lines.join("\n");

    text = cap_blank_lines(&text);
    let text = text.trim().to_string();

    // Guard: never silently lose more than 5% of the input.
    let raw_len = raw.chars().filter(|c| !c.is_whitespace()).count();
    let cleaned_len = text.chars().filter(|c| !c.is_whitespace()).count();
    if raw_len > 0 && (raw_len - cleaned_len.min(raw_len)) as f64 / raw_len as f64 > MAX_DROP_RATIO
    {
        return raw.to_string();
    }

    text
}

/// Detects the primary language by hangul/latin character ratio.
/// Returns "ko", "en", or "unknown".
pub fn detect_language(text: &str) -> &'static str {
    if text.trim().chars().count() < 10 {
        return "unknown";
    }

    let korean = text.chars().filter(|c| ('가'..='힣').contains(c)).count();
    let english = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let total = korean + english;

    if total == 0 {
        return "unknown";
    }

    let korean_ratio = korean as f64 / total as f64;
    if korean_ratio >= 0.5 {
        "ko"
    } else if english as f64 / total as f64 >= 0.2 {
        "en"
    } else {
        "unknown"
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !last_was_space {
                out.push(c);
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Re-joins words split across a line break with a hyphen:
/// "computa-\ntional" → "computational".
fn rejoin_hyphenated_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '-'
            && i + 1 < chars.len()
            && chars[i + 1] == '\n'
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(i + 2).is_some_and(|c| c.is_alphanumeric())
        {
            i += 2; // skip "-\n"
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// A line consisting only of a short number is treated as a page marker.
fn is_page_marker(line: &str) -> bool {
    !line.is_empty() && line.len() <= 4 && line.chars().all(|c| c.is_ascii_digit())
}

fn cap_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newline_run = 0;
    for c in text.chars() {
        if c == '\n' {
            newline_run += 1;
            if newline_run <= 2 {
                out.push(c);
            }
        } else {
            newline_run = 0;
            out.push(c);
        }
    }
    out
}
