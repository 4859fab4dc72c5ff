//! Matching Engine — computes the weighted match between an ingested résumé
//! and an ingested job description.
//!
//! The scoring core is pure: it consumes pairwise chunk similarities and
//! keyword sets and produces a `MatchResult` deterministically. The async
//! wrapper only fetches inputs from the vector store and refuses documents
//! that are not `completed`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::keywords::{self, JdKeyword};
use crate::matching::similar_tech::{self, SimilarTechMatch};
use crate::models::document::{ChunkRow, DocumentRow, SectionType};
use crate::roadmap::catalog::Catalog;
use crate::store::{PairwiseMatch, VectorStore};

/// JD chunks matched per résumé chunk.
const PAIRWISE_TOP_K: i32 = 3;
/// Example matches kept per section.
const TOP_MATCHES_PER_SECTION: usize = 5;
/// Characters of chunk content carried into wire excerpts.
const EXCERPT_CHARS: usize = 200;

/// Fixed weight of each JD section in the aggregate. Normalized over the
/// sections actually present before use.
pub fn section_weight(section: SectionType) -> f64 {
    match section {
        SectionType::Requirements => 0.45,
        SectionType::Technical => 0.25,
        SectionType::Preferred => 0.15,
        SectionType::Responsibilities => 0.10,
        SectionType::Benefits => 0.00,
        _ => 0.05,
    }
}

/// Letter grade derived from the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchGrade {
    S,
    A,
    B,
    C,
    D,
}

impl MatchGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => MatchGrade::S,
            80..=89 => MatchGrade::A,
            70..=79 => MatchGrade::B,
            55..=69 => MatchGrade::C,
            _ => MatchGrade::D,
        }
    }

    /// One tier up; S is a fixed point.
    pub fn next_tier(&self) -> Self {
        match self {
            MatchGrade::D => MatchGrade::C,
            MatchGrade::C => MatchGrade::B,
            MatchGrade::B => MatchGrade::A,
            MatchGrade::A | MatchGrade::S => MatchGrade::S,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchGrade::S => "S",
            MatchGrade::A => "A",
            MatchGrade::B => "B",
            MatchGrade::C => "C",
            MatchGrade::D => "D",
        }
    }
}

/// One (résumé chunk, JD chunk) pair on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkMatch {
    pub resume_chunk_index: i32,
    pub resume_section_type: String,
    pub resume_excerpt: String,
    pub jd_chunk_index: i32,
    pub jd_section_type: String,
    pub jd_excerpt: String,
    pub similarity: f64,
}

/// Per-JD-section aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct SectionScore {
    pub section_type: String,
    /// Mean best-match similarity over the section's chunks, in [0, 1].
    pub score: f64,
    pub chunk_count: usize,
    pub top_matches: Vec<ChunkMatch>,
}

/// Full match analysis between one résumé and one JD.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub resume_document_id: Uuid,
    pub jd_document_id: Uuid,
    /// Centroid cosine similarity — reported as a sanity signal, never used
    /// as the grade input.
    pub overall_similarity: f64,
    pub match_score: u32,
    pub match_grade: MatchGrade,
    pub section_scores: Vec<SectionScore>,
    pub chunk_matches: Vec<ChunkMatch>,
    pub similar_tech: Vec<SimilarTechMatch>,
    pub similar_tech_bonus: f64,
    pub insufficient_data: bool,
}

/// Keyword-level inputs to the scoring core, shared with the roadmap planner.
#[derive(Debug, Clone)]
pub struct KeywordAnalysis {
    pub resume_keywords: HashSet<String>,
    pub jd_keywords: Vec<JdKeyword>,
}

// ────────────────────────────────────────────────────────────────────────────
// Async orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full match analysis for two ingested documents.
pub async fn analyze_match(
    store: &VectorStore,
    catalog: &Catalog,
    resume_document_id: Uuid,
    jd_document_id: Uuid,
) -> Result<MatchResult, AppError> {
    let (result, _) = analyze_full(store, catalog, resume_document_id, jd_document_id).await?;
    Ok(result)
}

/// Like `analyze_match`, but also returns the keyword analysis — the
/// roadmap planner derives the gap set from it. Keywords are computed even
/// for the insufficient-data case so an empty résumé still yields a
/// JD-seeded plan.
pub async fn analyze_full(
    store: &VectorStore,
    catalog: &Catalog,
    resume_document_id: Uuid,
    jd_document_id: Uuid,
) -> Result<(MatchResult, KeywordAnalysis), AppError> {
    let resume = require_completed(store, resume_document_id, "resume").await?;
    let _jd = require_completed(store, jd_document_id, "job description").await?;

    let jd_chunks = store.get_chunks(jd_document_id).await?;
    let keyword_analysis = analyze_keywords(catalog, &resume, &jd_chunks);

    let resume_embedded = store.embedded_chunk_count(resume_document_id).await?;
    let jd_embedded = store.embedded_chunk_count(jd_document_id).await?;
    if resume_embedded == 0 || jd_embedded == 0 {
        return Ok((
            insufficient_data_result(resume_document_id, jd_document_id),
            keyword_analysis,
        ));
    }

    let pairs = store
        .match_documents_by_file(resume_document_id, jd_document_id, PAIRWISE_TOP_K)
        .await?;
    let overall_similarity = store
        .overall_similarity(resume_document_id, jd_document_id)
        .await?;

    let result = compute_match(
        resume_document_id,
        jd_document_id,
        &pairs,
        &jd_chunks,
        overall_similarity,
        &keyword_analysis,
    );
    Ok((result, keyword_analysis))
}

/// Extracts normalized keyword sets from both documents. The résumé side
/// scans the whole cleaned text; the JD side scans classified chunks so
/// each keyword carries its enclosing section.
pub fn analyze_keywords(
    catalog: &Catalog,
    resume: &DocumentRow,
    jd_chunks: &[ChunkRow],
) -> KeywordAnalysis {
    let vocab = keywords::tech_vocabulary(catalog);

    let resume_text = resume.cleaned_text.as_deref().unwrap_or_default();
    let resume_keywords = keywords::extract_keywords(resume_text, &vocab);

    let sections: Vec<(SectionType, String)> = jd_chunks
        .iter()
        .map(|c| {
            (
                SectionType::parse(&c.section_type).unwrap_or(SectionType::Other),
                c.content.clone(),
            )
        })
        .collect();
    let jd_keywords = keywords::extract_jd_keywords(&sections, &vocab, section_weight);

    KeywordAnalysis {
        resume_keywords,
        jd_keywords,
    }
}

async fn require_completed(
    store: &VectorStore,
    document_id: Uuid,
    label: &str,
) -> Result<DocumentRow, AppError> {
    let doc = store
        .get_document_by_id(document_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown {label} document id")))?;
    if !doc.is_completed() {
        return Err(AppError::NotReady(format!(
            "The {label} document is not vectorized yet (status: {})",
            doc.embedding_status
        )));
    }
    Ok(doc)
}

// ────────────────────────────────────────────────────────────────────────────
// Pure scoring core
// ────────────────────────────────────────────────────────────────────────────

/// Assembles a MatchResult from pairwise similarities and keyword analysis.
/// Deterministic for fixed inputs.
pub fn compute_match(
    resume_document_id: Uuid,
    jd_document_id: Uuid,
    pairs: &[PairwiseMatch],
    jd_chunks: &[ChunkRow],
    overall_similarity: f64,
    keyword_analysis: &KeywordAnalysis,
) -> MatchResult {
    let section_scores = compute_section_scores(pairs, jd_chunks);
    let weighted = weighted_similarity(&section_scores);

    let jd_keyword_names: Vec<String> = keyword_analysis
        .jd_keywords
        .iter()
        .map(|k| k.keyword.clone())
        .collect();
    let similar_tech =
        similar_tech::find_matches(&keyword_analysis.resume_keywords, &jd_keyword_names);
    let similar_tech_bonus = similar_tech::bonus_points(similar_tech.len());

    let match_score = (100.0 * weighted + similar_tech_bonus).clamp(0.0, 100.0).round() as u32;
    let match_grade = MatchGrade::from_score(match_score);

    MatchResult {
        resume_document_id,
        jd_document_id,
        overall_similarity: overall_similarity.clamp(0.0, 1.0),
        match_score,
        match_grade,
        section_scores,
        chunk_matches: all_chunk_matches(pairs),
        similar_tech,
        similar_tech_bonus,
        insufficient_data: false,
    }
}

/// The degenerate result returned when either document has zero embedded
/// chunks. Matching never throws for this case.
pub fn insufficient_data_result(resume_document_id: Uuid, jd_document_id: Uuid) -> MatchResult {
    MatchResult {
        resume_document_id,
        jd_document_id,
        overall_similarity: 0.0,
        match_score: 0,
        match_grade: MatchGrade::D,
        section_scores: Vec::new(),
        chunk_matches: Vec::new(),
        similar_tech: Vec::new(),
        similar_tech_bonus: 0.0,
        insufficient_data: true,
    }
}

/// Per-section score: for each JD chunk the best résumé-match similarity,
/// averaged over all of the section's chunks. Chunks that matched nothing
/// contribute 0, so thin coverage is not hidden.
fn compute_section_scores(pairs: &[PairwiseMatch], jd_chunks: &[ChunkRow]) -> Vec<SectionScore> {
    // jd chunk id → best similarity seen across all résumé chunks
    let mut best_by_jd_chunk: HashMap<Uuid, f64> = HashMap::new();
    for pair in pairs {
        let entry = best_by_jd_chunk.entry(pair.jd_chunk_id).or_insert(0.0);
        if pair.similarity > *entry {
            *entry = pair.similarity;
        }
    }

    // section → jd chunk ids, in chunk order
    let mut chunks_by_section: HashMap<SectionType, Vec<Uuid>> = HashMap::new();
    for chunk in jd_chunks {
        let section = SectionType::parse(&chunk.section_type).unwrap_or(SectionType::Other);
        chunks_by_section.entry(section).or_default().push(chunk.id);
    }

    let mut scores: Vec<SectionScore> = chunks_by_section
        .into_iter()
        .map(|(section, chunk_ids)| {
            let total: f64 = chunk_ids
                .iter()
                .map(|id| best_by_jd_chunk.get(id).copied().unwrap_or(0.0))
                .sum();
            let score = (total / chunk_ids.len() as f64).clamp(0.0, 1.0);

            let mut top_matches: Vec<ChunkMatch> = pairs
                .iter()
                .filter(|p| p.jd_section_type == section.as_str())
                .map(to_chunk_match)
                .collect();
            top_matches.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            top_matches.truncate(TOP_MATCHES_PER_SECTION);

            SectionScore {
                section_type: section.as_str().to_string(),
                score,
                chunk_count: chunk_ids.len(),
                top_matches,
            }
        })
        .collect();

    // Weight-descending, then score-descending, then name for stability.
    scores.sort_by(|a, b| {
        let wa = section_weight(SectionType::parse(&a.section_type).unwrap_or(SectionType::Other));
        let wb = section_weight(SectionType::parse(&b.section_type).unwrap_or(SectionType::Other));
        wb.partial_cmp(&wa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.section_type.cmp(&b.section_type))
    });
    scores
}

/// Weighted mean of section scores, weights normalized over the sections
/// that actually appear.
fn weighted_similarity(section_scores: &[SectionScore]) -> f64 {
    let mut weight_sum = 0.0;
    let mut total = 0.0;
    for s in section_scores {
        let w = section_weight(SectionType::parse(&s.section_type).unwrap_or(SectionType::Other));
        weight_sum += w;
        total += w * s.score;
    }
    if weight_sum <= 0.0 {
        return 0.0;
    }
    (total / weight_sum).clamp(0.0, 1.0)
}

fn all_chunk_matches(pairs: &[PairwiseMatch]) -> Vec<ChunkMatch> {
    pairs.iter().map(to_chunk_match).collect()
}

fn to_chunk_match(pair: &PairwiseMatch) -> ChunkMatch {
    ChunkMatch {
        resume_chunk_index: pair.resume_chunk_index,
        resume_section_type: pair.resume_section_type.clone(),
        resume_excerpt: excerpt(&pair.resume_content),
        jd_chunk_index: pair.jd_chunk_index,
        jd_section_type: pair.jd_section_type.clone(),
        jd_excerpt: excerpt(&pair.jd_content),
        similarity: pair.similarity.clamp(0.0, 1.0),
    }
}

fn excerpt(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    content.chars().take(EXCERPT_CHARS).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn jd_chunk(id: Uuid, index: i32, section: SectionType) -> ChunkRow {
        ChunkRow {
            id,
            document_id: Uuid::new_v4(),
            chunk_index: index,
            content: format!("jd chunk {index}"),
            section_type: section.as_str().to_string(),
            char_count: 20,
            token_count: 5,
            embedding_model: "text-embedding-3-small".to_string(),
            created_at: Utc::now(),
        }
    }

    fn pair(jd_chunk_id: Uuid, jd_section: SectionType, similarity: f64) -> PairwiseMatch {
        PairwiseMatch {
            resume_chunk_id: Uuid::new_v4(),
            resume_chunk_index: 0,
            resume_section_type: "experience".to_string(),
            resume_content: "resume content".to_string(),
            jd_chunk_id,
            jd_chunk_index: 0,
            jd_section_type: jd_section.as_str().to_string(),
            jd_content: "jd content".to_string(),
            similarity,
        }
    }

    fn no_keywords() -> KeywordAnalysis {
        KeywordAnalysis {
            resume_keywords: HashSet::new(),
            jd_keywords: Vec::new(),
        }
    }

    fn keywords_of(resume: &[&str], jd: &[(&str, SectionType)]) -> KeywordAnalysis {
        KeywordAnalysis {
            resume_keywords: resume.iter().map(|s| s.to_string()).collect(),
            jd_keywords: jd
                .iter()
                .map(|(k, s)| JdKeyword {
                    keyword: k.to_string(),
                    frequency: 1,
                    section_type: *s,
                    weighted_score: section_weight(*s),
                })
                .collect(),
        }
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(MatchGrade::from_score(100), MatchGrade::S);
        assert_eq!(MatchGrade::from_score(90), MatchGrade::S);
        assert_eq!(MatchGrade::from_score(89), MatchGrade::A);
        assert_eq!(MatchGrade::from_score(80), MatchGrade::A);
        assert_eq!(MatchGrade::from_score(79), MatchGrade::B);
        assert_eq!(MatchGrade::from_score(70), MatchGrade::B);
        assert_eq!(MatchGrade::from_score(69), MatchGrade::C);
        assert_eq!(MatchGrade::from_score(55), MatchGrade::C);
        assert_eq!(MatchGrade::from_score(54), MatchGrade::D);
        assert_eq!(MatchGrade::from_score(0), MatchGrade::D);
    }

    #[test]
    fn test_next_tier_mapping() {
        assert_eq!(MatchGrade::D.next_tier(), MatchGrade::C);
        assert_eq!(MatchGrade::C.next_tier(), MatchGrade::B);
        assert_eq!(MatchGrade::B.next_tier(), MatchGrade::A);
        assert_eq!(MatchGrade::A.next_tier(), MatchGrade::S);
        assert_eq!(MatchGrade::S.next_tier(), MatchGrade::S);
    }

    #[test]
    fn test_grade_serializes_as_single_letter() {
        assert_eq!(serde_json::to_string(&MatchGrade::S).unwrap(), "\"S\"");
    }

    #[test]
    fn test_section_score_is_mean_of_best_matches() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let chunks = vec![
            jd_chunk(c1, 0, SectionType::Requirements),
            jd_chunk(c2, 1, SectionType::Requirements),
        ];
        // c1 matched twice (best 0.9), c2 matched once (0.5)
        let pairs = vec![
            pair(c1, SectionType::Requirements, 0.6),
            pair(c1, SectionType::Requirements, 0.9),
            pair(c2, SectionType::Requirements, 0.5),
        ];
        let scores = compute_section_scores(&pairs, &chunks);
        assert_eq!(scores.len(), 1);
        assert!((scores[0].score - 0.7).abs() < 1e-9);
        assert_eq!(scores[0].chunk_count, 2);
    }

    #[test]
    fn test_unmatched_jd_chunk_contributes_zero() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let chunks = vec![
            jd_chunk(c1, 0, SectionType::Requirements),
            jd_chunk(c2, 1, SectionType::Requirements),
        ];
        let pairs = vec![pair(c1, SectionType::Requirements, 0.8)];
        let scores = compute_section_scores(&pairs, &chunks);
        assert!((scores[0].score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_weights_normalized_over_present_sections() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let chunks = vec![
            jd_chunk(c1, 0, SectionType::Requirements),
            jd_chunk(c2, 1, SectionType::Preferred),
        ];
        let pairs = vec![
            pair(c1, SectionType::Requirements, 0.8),
            pair(c2, SectionType::Preferred, 0.4),
        ];
        let scores = compute_section_scores(&pairs, &chunks);
        let weighted = weighted_similarity(&scores);
        // (0.45*0.8 + 0.15*0.4) / (0.45+0.15) = 0.42/0.6 = 0.7
        assert!((weighted - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_benefits_only_jd_scores_zero() {
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Benefits)];
        let pairs = vec![pair(c1, SectionType::Benefits, 0.95)];
        let scores = compute_section_scores(&pairs, &chunks);
        assert_eq!(weighted_similarity(&scores), 0.0);
    }

    #[test]
    fn test_section_scores_sorted_by_weight_then_score() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let c3 = Uuid::new_v4();
        let chunks = vec![
            jd_chunk(c1, 0, SectionType::Benefits),
            jd_chunk(c2, 1, SectionType::Requirements),
            jd_chunk(c3, 2, SectionType::Technical),
        ];
        let pairs = vec![
            pair(c1, SectionType::Benefits, 0.99),
            pair(c2, SectionType::Requirements, 0.2),
            pair(c3, SectionType::Technical, 0.9),
        ];
        let scores = compute_section_scores(&pairs, &chunks);
        let order: Vec<&str> = scores.iter().map(|s| s.section_type.as_str()).collect();
        assert_eq!(order, vec!["requirements", "technical", "benefits"]);
    }

    #[test]
    fn test_top_matches_sorted_desc_and_capped_at_five() {
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs: Vec<PairwiseMatch> = (0..8)
            .map(|i| pair(c1, SectionType::Requirements, 0.1 * i as f64))
            .collect();
        let scores = compute_section_scores(&pairs, &chunks);
        let top = &scores[0].top_matches;
        assert_eq!(top.len(), 5);
        for w in top.windows(2) {
            assert!(w[0].similarity >= w[1].similarity);
        }
    }

    #[test]
    fn test_match_score_bounds_and_grade() {
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs = vec![pair(c1, SectionType::Requirements, 0.95)];
        let result = compute_match(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &pairs,
            &chunks,
            0.9,
            &no_keywords(),
        );
        assert!(result.match_score <= 100);
        assert_eq!(result.match_score, 95);
        assert_eq!(result.match_grade, MatchGrade::S);
        assert!(!result.insufficient_data);
    }

    #[test]
    fn test_similar_tech_bonus_added_and_capped() {
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs = vec![pair(c1, SectionType::Requirements, 1.0)];
        // react covers next.js → bonus 2, but score already at 100 → clamp
        let analysis = keywords_of(
            &["react"],
            &[("next.js", SectionType::Requirements)],
        );
        let result = compute_match(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &pairs,
            &chunks,
            1.0,
            &analysis,
        );
        assert_eq!(result.similar_tech.len(), 1);
        assert_eq!(result.similar_tech_bonus, 2.0);
        assert_eq!(result.match_score, 100);
    }

    #[test]
    fn test_bonus_monotonicity() {
        // Adding a résumé keyword that joins a similar-tech group with a
        // missing JD keyword never decreases the score.
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs = vec![pair(c1, SectionType::Requirements, 0.6)];

        let without = keywords_of(
            &["typescript"],
            &[("next.js", SectionType::Requirements)],
        );
        let with = keywords_of(
            &["typescript", "react"],
            &[("next.js", SectionType::Requirements)],
        );

        let r1 = compute_match(Uuid::new_v4(), Uuid::new_v4(), &pairs, &chunks, 0.5, &without);
        let r2 = compute_match(Uuid::new_v4(), Uuid::new_v4(), &pairs, &chunks, 0.5, &with);
        assert!(r2.match_score >= r1.match_score);
        assert!(r2.match_score > r1.match_score);
    }

    #[test]
    fn test_strong_match_scenario() {
        // Résumé: react, typescript, node, postgres.
        // JD: react, typescript, next.js, postgres — react↔next.js grants
        // the family bonus and the grade lands in {A, S}.
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs = vec![pair(c1, SectionType::Requirements, 0.85)];
        let analysis = keywords_of(
            &["react", "typescript", "node", "postgres"],
            &[
                ("react", SectionType::Requirements),
                ("typescript", SectionType::Requirements),
                ("next.js", SectionType::Requirements),
                ("postgres", SectionType::Requirements),
            ],
        );
        let result = compute_match(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &pairs,
            &chunks,
            0.8,
            &analysis,
        );
        assert!(result.similar_tech_bonus >= 2.0);
        assert!(matches!(result.match_grade, MatchGrade::A | MatchGrade::S));
        assert_eq!(result.match_grade.next_tier(), MatchGrade::S);
    }

    #[test]
    fn test_insufficient_data_result_shape() {
        let result = insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(result.match_score, 0);
        assert_eq!(result.match_grade, MatchGrade::D);
        assert!(result.section_scores.is_empty());
        assert!(result.similar_tech.is_empty());
        assert!(result.insufficient_data);
    }

    #[test]
    fn test_overall_similarity_reported_but_not_graded() {
        // A high centroid similarity with weak section matches must not
        // lift the grade: the aggregate drives it.
        let c1 = Uuid::new_v4();
        let chunks = vec![jd_chunk(c1, 0, SectionType::Requirements)];
        let pairs = vec![pair(c1, SectionType::Requirements, 0.1)];
        let result = compute_match(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &pairs,
            &chunks,
            0.99,
            &no_keywords(),
        );
        assert_eq!(result.match_score, 10);
        assert_eq!(result.match_grade, MatchGrade::D);
        assert!((result.overall_similarity - 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_excerpt_truncation() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }
}
