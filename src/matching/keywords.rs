//! Technology-keyword extraction and normalization.
//!
//! The vocabulary is assembled at runtime from the similar-tech table and
//! the resource catalog's topics and aliases, so extending the catalog
//! extends extraction without code changes. Keywords are normalized to
//! lowercase with whitespace stripped; dots survive (`next.js`).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::matching::similar_tech;
use crate::models::document::SectionType;
use crate::roadmap::catalog::Catalog;

/// Lowercases and strips all whitespace: "Next JS" → "nextjs",
/// "REST API" → "restapi".
pub fn normalize_keyword(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// A JD keyword with its occurrence stats. `weighted_score` is
/// frequency × the §weight of the keyword's enclosing section, and drives
/// the "most-weighted gap keywords" ranking.
#[derive(Debug, Clone, Serialize)]
pub struct JdKeyword {
    pub keyword: String,
    pub frequency: u32,
    pub section_type: SectionType,
    pub weighted_score: f64,
}

/// Alias surfaces that are ordinary English words; scanning for them would
/// produce false keyword hits ("what's next", "the rest of the stack").
/// They still work for catalog resource lookup, just not for extraction.
const AMBIGUOUS_SURFACES: &[&str] = &["next", "rest", "http", "frontend", "backend", "fullstack"];

/// Surface terms scanned for, each mapping to one normalized keyword.
/// Multi-word surface forms ("rest api") match the text; the normalized
/// form is what flows downstream.
pub fn tech_vocabulary(catalog: &Catalog) -> Vec<(String, String)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut vocab: Vec<(String, String)> = Vec::new();

    let mut push = |surface: String, normalized: String| {
        if seen.insert(surface.clone()) {
            vocab.push((surface, normalized));
        }
    };

    for group in similar_tech::TECH_GROUPS {
        for member in group.members {
            push(member.to_string(), normalize_keyword(member));
        }
    }
    for topic in catalog.topic_names() {
        push(topic.to_string(), normalize_keyword(topic));
    }
    for (alias, target) in catalog.aliases() {
        if !AMBIGUOUS_SURFACES.contains(&alias) {
            push(alias.to_string(), normalize_keyword(target));
        }
    }

    // Longer surface forms first so "next.js" wins over "next".
    vocab.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));
    vocab
}

/// Extracts the set of normalized keywords present in free text.
pub fn extract_keywords(text: &str, vocab: &[(String, String)]) -> HashSet<String> {
    let lowered = text.to_lowercase();
    vocab
        .iter()
        .filter(|(surface, _)| count_word_occurrences(&lowered, surface) > 0)
        .map(|(_, normalized)| normalized.clone())
        .collect()
}

/// Extracts JD keywords with per-section frequencies from classified chunks.
/// A keyword's enclosing section is the one it occurs in most often; ties
/// break toward the heavier section so the weight is never understated.
pub fn extract_jd_keywords(
    sections: &[(SectionType, String)],
    vocab: &[(String, String)],
    section_weight: impl Fn(SectionType) -> f64,
) -> Vec<JdKeyword> {
    // keyword → section → count
    let mut counts: HashMap<String, HashMap<SectionType, u32>> = HashMap::new();

    for (section, content) in sections {
        let lowered = content.to_lowercase();
        for (surface, normalized) in vocab {
            let n = count_word_occurrences(&lowered, surface);
            if n > 0 {
                *counts
                    .entry(normalized.clone())
                    .or_default()
                    .entry(*section)
                    .or_insert(0) += n;
            }
        }
    }

    let mut keywords: Vec<JdKeyword> = counts
        .into_iter()
        .map(|(keyword, by_section)| {
            let frequency: u32 = by_section.values().sum();
            let section_type = by_section
                .iter()
                .max_by(|a, b| {
                    a.1.cmp(b.1)
                        .then_with(|| {
                            section_weight(*a.0)
                                .partial_cmp(&section_weight(*b.0))
                                .unwrap_or(std::cmp::Ordering::Equal)
                        })
                        .then_with(|| a.0.as_str().cmp(b.0.as_str()).reverse())
                })
                .map(|(section, _)| *section)
                .unwrap_or(SectionType::Other);
            let weighted_score = frequency as f64 * section_weight(section_type);
            JdKeyword {
                keyword,
                frequency,
                section_type,
                weighted_score,
            }
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords
}

/// Occurrences of `needle` in `haystack` at word boundaries. Alphanumeric
/// neighbors disqualify a hit ("javascript" does not contain "java" here);
/// dots and hyphens inside the needle are fine.
fn count_word_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    let hay: Vec<char> = haystack.chars().collect();
    let ned: Vec<char> = needle.chars().collect();
    let mut count = 0u32;
    let mut i = 0;
    while i + ned.len() <= hay.len() {
        if hay[i..i + ned.len()] == ned[..] {
            let left_ok = i == 0 || !hay[i - 1].is_alphanumeric();
            let right = i + ned.len();
            let right_ok = right == hay.len() || !hay[right].is_alphanumeric();
            if left_ok && right_ok {
                count += 1;
                i += ned.len();
                continue;
            }
        }
        i += 1;
    }
    count
}
