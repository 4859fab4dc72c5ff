//! Roadmap Planner — turns a match result and its skill gap into an N-week
//! curriculum backed by the resource catalog.
//!
//! The LLM is prompted once per plan; everything around that call is
//! deterministic: gap-set derivation, grade targeting, validation,
//! keyword normalization, and resource binding. A plan that fails
//! validation gets exactly one repair attempt and then the error
//! propagates — no silent fallback plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::engine::{self, KeywordAnalysis, MatchGrade, MatchResult, SectionScore};
use crate::matching::keywords::normalize_keyword;
use crate::matching::similar_tech::SimilarTechMatch;
use crate::roadmap::catalog::{Catalog, Difficulty, LearningResource};
use crate::roadmap::prompts::{
    BRIDGE_STRATEGY, ROADMAP_PROMPT_TEMPLATE, ROADMAP_REPAIR_TEMPLATE, ROADMAP_SYSTEM,
};
use crate::store::VectorStore;

pub const DEFAULT_WEEKS: u32 = 8;
pub const MIN_WEEKS: u32 = 4;
pub const MAX_WEEKS: u32 = 12;

/// A JD section scoring below this marks its keywords as gaps even when
/// the résumé mentions them.
const WEAK_SECTION_THRESHOLD: f64 = 0.6;
/// Minimum fraction of tasks that must target the gap set.
const GAP_TASK_RATIO: f64 = 0.7;
/// Resources bound per week.
const RESOURCES_PER_WEEK: usize = 3;
/// Gap keywords reported as key improvement areas.
const KEY_AREAS: usize = 5;
/// Characters of each document quoted into the prompt.
const PROMPT_EXCERPT_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapTask {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapWeek {
    pub week_number: u32,
    pub title: String,
    pub duration: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub tasks: Vec<RoadmapTask>,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Roadmap {
    pub total_weeks: u32,
    pub match_grade: MatchGrade,
    pub target_grade: MatchGrade,
    pub summary: String,
    pub key_improvement_areas: Vec<String>,
    pub weekly_plan: Vec<RoadmapWeek>,
}

/// One gap keyword with its JD weight (frequency × section weight).
#[derive(Debug, Clone, PartialEq)]
pub struct GapKeyword {
    pub keyword: String,
    pub weight: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// LLM wire shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LlmRoadmap {
    summary: String,
    weekly_plan: Vec<LlmWeek>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LlmWeek {
    week_number: u32,
    title: String,
    #[serde(default)]
    duration: Option<String>,
    description: String,
    #[serde(default)]
    keywords: Vec<String>,
    tasks: Vec<RoadmapTask>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Generates a personalized roadmap for an ingested résumé/JD pair.
pub async fn generate_roadmap(
    store: &VectorStore,
    llm: &LlmClient,
    catalog: &Catalog,
    resume_document_id: Uuid,
    jd_document_id: Uuid,
    target_weeks: Option<u32>,
) -> Result<Roadmap, AppError> {
    let total_weeks = target_weeks.unwrap_or(DEFAULT_WEEKS);
    if !(MIN_WEEKS..=MAX_WEEKS).contains(&total_weeks) {
        return Err(AppError::Validation(format!(
            "target_weeks must be between {MIN_WEEKS} and {MAX_WEEKS}"
        )));
    }

    let (match_result, keyword_analysis) =
        engine::analyze_full(store, catalog, resume_document_id, jd_document_id).await?;
    let gap_set = compute_gap_set(
        &keyword_analysis,
        &match_result.similar_tech,
        &match_result.section_scores,
    );

    info!(
        "Planning roadmap: grade={} target={} weeks={} gaps={}",
        match_result.match_grade.as_str(),
        match_result.match_grade.next_tier().as_str(),
        total_weeks,
        gap_set.len()
    );

    let resume_doc = store.get_document_by_id(resume_document_id).await?;
    let jd_doc = store.get_document_by_id(jd_document_id).await?;
    let resume_text = resume_doc
        .as_ref()
        .and_then(|d| d.cleaned_text.as_deref())
        .unwrap_or_default();
    let jd_text = jd_doc
        .as_ref()
        .and_then(|d| d.cleaned_text.as_deref())
        .unwrap_or_default();

    let prompt = build_prompt(
        &match_result,
        &keyword_analysis,
        &gap_set,
        total_weeks,
        resume_text,
        jd_text,
    );

    let plan = call_with_repair(llm, &prompt, total_weeks, &gap_set).await?;

    Ok(assemble_roadmap(
        plan,
        &match_result,
        &gap_set,
        total_weeks,
        catalog,
    ))
}

/// First attempt, then one repair round with the validation errors quoted.
async fn call_with_repair(
    llm: &LlmClient,
    prompt: &str,
    total_weeks: u32,
    gap_set: &[GapKeyword],
) -> Result<LlmRoadmap, AppError> {
    let first: Result<LlmRoadmap, LlmError> = llm.call_json(prompt, ROADMAP_SYSTEM).await;

    let (mut plan, parse_error) = match first {
        Ok(plan) => (Some(plan), None),
        Err(LlmError::Parse(e)) => (None, Some(e.to_string())),
        Err(e) => return Err(AppError::Upstream(format!("Roadmap LLM call failed: {e}"))),
    };

    let errors = match &mut plan {
        Some(p) => {
            normalize_plan(p);
            validate_plan(p, total_weeks, gap_set)
        }
        None => vec![format!("output was not valid JSON: {}", parse_error.unwrap_or_default())],
    };

    if errors.is_empty() {
        return plan.ok_or_else(|| AppError::Internal(anyhow::anyhow!("empty roadmap plan")));
    }

    warn!("Roadmap failed validation, retrying once: {:?}", errors);

    let previous_json = plan
        .as_ref()
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_else(|| "(unparseable)".to_string());
    let repair_prompt = ROADMAP_REPAIR_TEMPLATE
        .replace("{target_weeks}", &total_weeks.to_string())
        .replace("{errors}", &errors.join("\n"))
        .replace("{previous_json}", &previous_json);

    let mut repaired: LlmRoadmap = llm
        .call_json(&repair_prompt, ROADMAP_SYSTEM)
        .await
        .map_err(|e| match e {
            LlmError::Parse(e) => {
                AppError::Internal(anyhow::anyhow!("Roadmap repair returned invalid JSON: {e}"))
            }
            other => AppError::Upstream(format!("Roadmap LLM call failed: {other}")),
        })?;
    normalize_plan(&mut repaired);

    let errors = validate_plan(&repaired, total_weeks, gap_set);
    if !errors.is_empty() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Roadmap failed validation after repair: {}",
            errors.join("; ")
        )));
    }
    Ok(repaired)
}

// ────────────────────────────────────────────────────────────────────────────
// Gap set
// ────────────────────────────────────────────────────────────────────────────

/// JD keywords the résumé fails on: absent and not similar-tech-covered, or
/// sitting in a section that scored below the weak threshold. Sorted by
/// weight descending.
pub fn compute_gap_set(
    analysis: &KeywordAnalysis,
    similar_tech: &[SimilarTechMatch],
    section_scores: &[SectionScore],
) -> Vec<GapKeyword> {
    let covered: HashSet<&str> = similar_tech.iter().map(|m| m.jd_required.as_str()).collect();
    let weak_sections: HashSet<&str> = section_scores
        .iter()
        .filter(|s| s.score < WEAK_SECTION_THRESHOLD)
        .map(|s| s.section_type.as_str())
        .collect();

    let mut gaps: Vec<GapKeyword> = analysis
        .jd_keywords
        .iter()
        .filter(|k| {
            let missing = !analysis.resume_keywords.contains(&k.keyword)
                && !covered.contains(k.keyword.as_str());
            let weak_section = weak_sections.contains(k.section_type.as_str());
            missing || weak_section
        })
        .map(|k| GapKeyword {
            keyword: k.keyword.clone(),
            weight: k.weighted_score,
        })
        .collect();

    gaps.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    gaps.dedup_by(|a, b| a.keyword == b.keyword);
    gaps
}

// ────────────────────────────────────────────────────────────────────────────
// Grade-tiered strategy
// ────────────────────────────────────────────────────────────────────────────

fn grade_strategy(grade: MatchGrade) -> &'static str {
    match grade {
        MatchGrade::D => {
            "Foundations first. Each week teaches a single gap skill from zero; \
             lean on beginner resources throughout and keep projects tiny."
        }
        MatchGrade::C => {
            "Strengthen fundamentals in the gap skills, then finish with one \
             intermediate project-themed week that combines them."
        }
        MatchGrade::B => {
            "Mostly intermediate work: real features, not toy exercises. \
             Introduce advanced topics only in the final two weeks."
        }
        MatchGrade::A => {
            "Advanced depth in the gap skills plus interview and portfolio \
             polish; the candidate is close and needs sharpening, not basics."
        }
        MatchGrade::S => {
            "Stretch topics, open-source contribution, and portfolio work; \
             maintain the edge rather than fill gaps."
        }
    }
}

/// Difficulty tier a week's resources should prefer.
pub fn week_difficulty(grade: MatchGrade, week_number: u32, total_weeks: u32) -> Difficulty {
    match grade {
        MatchGrade::D => Difficulty::Beginner,
        MatchGrade::C => {
            if week_number == total_weeks {
                Difficulty::Intermediate
            } else {
                Difficulty::Beginner
            }
        }
        MatchGrade::B => {
            if week_number + 2 > total_weeks {
                Difficulty::Advanced
            } else {
                Difficulty::Intermediate
            }
        }
        MatchGrade::A | MatchGrade::S => Difficulty::Advanced,
    }
}

/// True when the résumé leans frontend and the JD leans backend — the plan
/// then opens with backend-collaboration weeks.
fn needs_bridge(analysis: &KeywordAnalysis) -> bool {
    const FRONTEND: &[&str] = &["react", "vue", "next.js", "css", "html", "tailwind", "redux"];
    const BACKEND: &[&str] = &["node", "express", "django", "fastapi", "postgres", "sql", "api"];

    let resume_frontend = FRONTEND
        .iter()
        .any(|k| analysis.resume_keywords.contains(*k));
    let jd_backend = analysis
        .jd_keywords
        .iter()
        .any(|k| BACKEND.contains(&k.keyword.as_str()));
    resume_frontend && jd_backend
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt assembly
// ────────────────────────────────────────────────────────────────────────────

fn build_prompt(
    match_result: &MatchResult,
    analysis: &KeywordAnalysis,
    gap_set: &[GapKeyword],
    total_weeks: u32,
    resume_text: &str,
    jd_text: &str,
) -> String {
    let gap_keywords = if gap_set.is_empty() {
        "(none — reinforce and extend existing strengths)".to_string()
    } else {
        gap_set
            .iter()
            .map(|g| g.keyword.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut strengths: Vec<&str> = analysis
        .resume_keywords
        .iter()
        .map(String::as_str)
        .collect();
    strengths.sort_unstable();
    let strength_keywords = if strengths.is_empty() {
        "(none detected)".to_string()
    } else {
        strengths.join(", ")
    };

    let bridge = if needs_bridge(analysis) {
        BRIDGE_STRATEGY
    } else {
        ""
    };

    ROADMAP_PROMPT_TEMPLATE
        .replace("{target_weeks}", &total_weeks.to_string())
        .replace("{match_score}", &match_result.match_score.to_string())
        .replace("{match_grade}", match_result.match_grade.as_str())
        .replace(
            "{target_grade}",
            match_result.match_grade.next_tier().as_str(),
        )
        .replace("{strategy}", grade_strategy(match_result.match_grade))
        .replace("{bridge_strategy}", bridge)
        .replace("{gap_keywords}", &gap_keywords)
        .replace("{strength_keywords}", &strength_keywords)
        .replace("{resume_excerpt}", &prompt_excerpt(resume_text))
        .replace("{jd_excerpt}", &prompt_excerpt(jd_text))
}

fn prompt_excerpt(text: &str) -> String {
    if text.trim().is_empty() {
        return "(no text available)".to_string();
    }
    text.chars().take(PROMPT_EXCERPT_CHARS).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Validation and normalization
// ────────────────────────────────────────────────────────────────────────────

/// Re-normalizes weekly keywords server-side (lowercase, whitespace
/// stripped) so downstream icon mapping is deterministic.
fn normalize_plan(plan: &mut LlmRoadmap) {
    for week in &mut plan.weekly_plan {
        week.keywords = week
            .keywords
            .iter()
            .map(|k| normalize_keyword(k))
            .filter(|k| !k.is_empty())
            .collect();
        week.keywords.dedup();
    }
}

/// Checks the output guarantees. Returns human-readable violations for the
/// repair prompt; empty means the plan is acceptable.
fn validate_plan(plan: &LlmRoadmap, total_weeks: u32, gap_set: &[GapKeyword]) -> Vec<String> {
    let mut errors = Vec::new();

    if plan.summary.trim().is_empty() {
        errors.push("summary is empty".to_string());
    }

    if plan.weekly_plan.len() != total_weeks as usize {
        errors.push(format!(
            "weekly_plan has {} entries, expected exactly {total_weeks}",
            plan.weekly_plan.len()
        ));
    }

    for (i, week) in plan.weekly_plan.iter().enumerate() {
        let expected = i as u32 + 1;
        if week.week_number != expected {
            errors.push(format!(
                "week at position {i} has week_number {}, expected {expected}",
                week.week_number
            ));
        }
        if !(3..=5).contains(&week.tasks.len()) {
            errors.push(format!(
                "week {} has {} tasks, expected 3 to 5",
                week.week_number,
                week.tasks.len()
            ));
        }
        if week.title.trim().is_empty() {
            errors.push(format!("week {} has an empty title", week.week_number));
        }
    }

    if !gap_set.is_empty() && !plan.weekly_plan.is_empty() {
        let coverage = gap_coverage(&plan.weekly_plan, gap_set);
        if coverage < GAP_TASK_RATIO {
            errors.push(format!(
                "only {:.0}% of tasks target the gap skills, at least {:.0}% required",
                coverage * 100.0,
                GAP_TASK_RATIO * 100.0
            ));
        }
    }

    errors
}

/// Fraction of tasks that target a gap keyword, via their week's keyword
/// list or the task text itself.
fn gap_coverage(weeks: &[LlmWeek], gap_set: &[GapKeyword]) -> f64 {
    let gap: HashSet<&str> = gap_set.iter().map(|g| g.keyword.as_str()).collect();
    let mut total = 0usize;
    let mut targeting = 0usize;

    for week in weeks {
        let week_hits_gap = week.keywords.iter().any(|k| gap.contains(k.as_str()));
        for task in &week.tasks {
            total += 1;
            let text = normalize_keyword(&task.task);
            if week_hits_gap || gap.iter().any(|g| text.contains(g)) {
                targeting += 1;
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    targeting as f64 / total as f64
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly and resource binding
// ────────────────────────────────────────────────────────────────────────────

fn assemble_roadmap(
    plan: LlmRoadmap,
    match_result: &MatchResult,
    gap_set: &[GapKeyword],
    total_weeks: u32,
    catalog: &Catalog,
) -> Roadmap {
    let grade = match_result.match_grade;

    let weekly_plan: Vec<RoadmapWeek> = plan
        .weekly_plan
        .into_iter()
        .map(|week| {
            let difficulty = week_difficulty(grade, week.week_number, total_weeks);
            let resources = bind_resources(catalog, &week.keywords, difficulty);
            RoadmapWeek {
                week_number: week.week_number,
                title: week.title,
                duration: week.duration.unwrap_or_else(|| "1 week".to_string()),
                description: week.description,
                keywords: week.keywords,
                tasks: week.tasks,
                resources,
            }
        })
        .collect();

    Roadmap {
        total_weeks,
        match_grade: grade,
        target_grade: grade.next_tier(),
        summary: plan.summary,
        key_improvement_areas: gap_set
            .iter()
            .take(KEY_AREAS)
            .map(|g| g.keyword.clone())
            .collect(),
        weekly_plan,
    }
}

/// Resolves up to RESOURCES_PER_WEEK catalog resources for a week's
/// keywords, deduplicated by URL and preferring the week's difficulty tier.
/// Only catalog URLs can ever appear in the output.
fn bind_resources(
    catalog: &Catalog,
    keywords: &[String],
    target: Difficulty,
) -> Vec<LearningResource> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<&LearningResource> = Vec::new();

    for keyword in keywords {
        for resource in catalog.resources_for(keyword) {
            if seen.insert(resource.url.as_str()) {
                candidates.push(resource);
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.difficulty
            .distance(target)
            .cmp(&b.difficulty.distance(target))
            .then(a.difficulty.cmp(&b.difficulty))
            .then_with(|| a.title.cmp(&b.title))
    });

    candidates
        .into_iter()
        .take(RESOURCES_PER_WEEK)
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::keywords::JdKeyword;
    use crate::models::document::SectionType;

    fn analysis(resume: &[&str], jd: &[(&str, SectionType, u32)]) -> KeywordAnalysis {
        KeywordAnalysis {
            resume_keywords: resume.iter().map(|s| s.to_string()).collect(),
            jd_keywords: jd
                .iter()
                .map(|(k, s, freq)| JdKeyword {
                    keyword: k.to_string(),
                    frequency: *freq,
                    section_type: *s,
                    weighted_score: *freq as f64 * engine::section_weight(*s),
                })
                .collect(),
        }
    }

    fn section(name: &str, score: f64) -> SectionScore {
        SectionScore {
            section_type: name.to_string(),
            score,
            chunk_count: 1,
            top_matches: Vec::new(),
        }
    }

    fn week(number: u32, keywords: &[&str], task_texts: &[&str]) -> LlmWeek {
        LlmWeek {
            week_number: number,
            title: format!("Week {number}"),
            duration: Some("1 week".to_string()),
            description: "desc".to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            tasks: task_texts
                .iter()
                .map(|t| RoadmapTask {
                    task: t.to_string(),
                    priority: Some(Priority::High),
                })
                .collect(),
        }
    }

    fn plan_of(weeks: Vec<LlmWeek>) -> LlmRoadmap {
        LlmRoadmap {
            summary: "a plan".to_string(),
            weekly_plan: weeks,
        }
    }

    #[test]
    fn test_gap_set_missing_keywords() {
        let a = analysis(
            &["php", "mysql", "jquery"],
            &[
                ("react", SectionType::Requirements, 3),
                ("typescript", SectionType::Requirements, 2),
                ("graphql", SectionType::Preferred, 1),
                ("aws", SectionType::Preferred, 1),
            ],
        );
        let gaps = compute_gap_set(&a, &[], &[section("requirements", 0.8)]);
        let names: HashSet<&str> = gaps.iter().map(|g| g.keyword.as_str()).collect();
        for expected in ["react", "typescript", "graphql", "aws"] {
            assert!(names.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_gap_set_excludes_similar_tech_covered() {
        let a = analysis(
            &["react"],
            &[("next.js", SectionType::Requirements, 2)],
        );
        let covered = vec![SimilarTechMatch {
            jd_required: "next.js".to_string(),
            resume_has: "react".to_string(),
            relationship: "framework family".to_string(),
            bonus: 2.0,
        }];
        let gaps = compute_gap_set(&a, &covered, &[section("requirements", 0.8)]);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_gap_set_includes_weak_section_keywords() {
        // Keyword present in the résumé, but its section scored weak.
        let a = analysis(
            &["react"],
            &[("react", SectionType::Requirements, 2)],
        );
        let gaps = compute_gap_set(&a, &[], &[section("requirements", 0.4)]);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].keyword, "react");
    }

    #[test]
    fn test_gap_set_sorted_by_weight_desc() {
        let a = analysis(
            &[],
            &[
                ("graphql", SectionType::Preferred, 1),
                ("react", SectionType::Requirements, 3),
            ],
        );
        let gaps = compute_gap_set(&a, &[], &[]);
        assert_eq!(gaps[0].keyword, "react");
        assert_eq!(gaps[1].keyword, "graphql");
    }

    #[test]
    fn test_week_difficulty_tiers() {
        assert_eq!(week_difficulty(MatchGrade::D, 1, 8), Difficulty::Beginner);
        assert_eq!(week_difficulty(MatchGrade::D, 8, 8), Difficulty::Beginner);
        assert_eq!(week_difficulty(MatchGrade::C, 3, 8), Difficulty::Beginner);
        assert_eq!(
            week_difficulty(MatchGrade::C, 8, 8),
            Difficulty::Intermediate
        );
        assert_eq!(
            week_difficulty(MatchGrade::B, 5, 8),
            Difficulty::Intermediate
        );
        assert_eq!(week_difficulty(MatchGrade::B, 7, 8), Difficulty::Advanced);
        assert_eq!(week_difficulty(MatchGrade::B, 8, 8), Difficulty::Advanced);
        assert_eq!(week_difficulty(MatchGrade::A, 1, 8), Difficulty::Advanced);
        assert_eq!(week_difficulty(MatchGrade::S, 4, 8), Difficulty::Advanced);
    }

    #[test]
    fn test_validate_accepts_well_formed_plan() {
        let gap = vec![GapKeyword {
            keyword: "typescript".to_string(),
            weight: 1.0,
        }];
        let weeks: Vec<LlmWeek> = (1..=4)
            .map(|n| week(n, &["typescript"], &["learn ts", "practice ts", "build app"]))
            .collect();
        let errors = validate_plan(&plan_of(weeks), 4, &gap);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_validate_rejects_wrong_week_count() {
        let weeks = vec![week(1, &[], &["a", "b", "c"])];
        let errors = validate_plan(&plan_of(weeks), 4, &[]);
        assert!(errors.iter().any(|e| e.contains("expected exactly 4")));
    }

    #[test]
    fn test_validate_rejects_noncontiguous_week_numbers() {
        let weeks = vec![
            week(1, &[], &["a", "b", "c"]),
            week(3, &[], &["a", "b", "c"]),
        ];
        let errors = validate_plan(&plan_of(weeks), 2, &[]);
        assert!(errors.iter().any(|e| e.contains("week_number")));
    }

    #[test]
    fn test_validate_rejects_task_count_out_of_range() {
        let too_few = vec![week(1, &[], &["a", "b"])];
        let errors = validate_plan(&plan_of(too_few), 1, &[]);
        assert!(errors.iter().any(|e| e.contains("tasks")));

        let too_many = vec![week(1, &[], &["a", "b", "c", "d", "e", "f"])];
        let errors = validate_plan(&plan_of(too_many), 1, &[]);
        assert!(errors.iter().any(|e| e.contains("tasks")));
    }

    #[test]
    fn test_validate_enforces_gap_coverage() {
        let gap = vec![GapKeyword {
            keyword: "kubernetes".to_string(),
            weight: 1.0,
        }];
        // No week keyword or task text touches kubernetes.
        let weeks = vec![
            week(1, &["css"], &["style things", "more styling", "polish"]),
            week(2, &["html"], &["markup", "semantics", "forms"]),
        ];
        let errors = validate_plan(&plan_of(weeks), 2, &gap);
        assert!(errors.iter().any(|e| e.contains("70%")));
    }

    #[test]
    fn test_gap_coverage_counts_week_keywords_and_task_text() {
        let gap = vec![GapKeyword {
            keyword: "docker".to_string(),
            weight: 1.0,
        }];
        let weeks = vec![
            // Week keyword hits the gap: all 3 tasks count.
            week(1, &["docker"], &["install it", "build image", "run container"]),
            // Task text mentions the gap keyword directly: 1 of 3 counts.
            week(
                2,
                &["css"],
                &["learn Docker networking", "style page", "write tests"],
            ),
        ];
        let coverage = gap_coverage(&weeks, &gap);
        assert!((coverage - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_plan_lowercases_and_strips() {
        let mut plan = plan_of(vec![week(
            1,
            &["Type Script", "REST API", "Next.JS"],
            &["a", "b", "c"],
        )]);
        normalize_plan(&mut plan);
        assert_eq!(
            plan.weekly_plan[0].keywords,
            vec!["typescript", "restapi", "next.js"]
        );
        for k in &plan.weekly_plan[0].keywords {
            assert_eq!(*k, k.to_lowercase());
            assert!(!k.contains(char::is_whitespace));
        }
    }

    #[test]
    fn test_bind_resources_caps_at_three_and_stays_in_catalog() {
        let catalog = Catalog::load().unwrap();
        let keywords = vec!["react".to_string(), "typescript".to_string()];
        let resources = bind_resources(&catalog, &keywords, Difficulty::Beginner);
        assert!(!resources.is_empty());
        assert!(resources.len() <= RESOURCES_PER_WEEK);
        for r in &resources {
            assert!(catalog.contains_url(&r.url), "URL not in catalog: {}", r.url);
        }
    }

    #[test]
    fn test_bind_resources_prefers_target_difficulty() {
        let catalog = Catalog::load().unwrap();
        let keywords = vec!["react".to_string()];
        let beginner = bind_resources(&catalog, &keywords, Difficulty::Beginner);
        assert_eq!(beginner[0].difficulty, Difficulty::Beginner);
        let advanced = bind_resources(&catalog, &keywords, Difficulty::Advanced);
        assert_eq!(advanced[0].difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_bind_resources_resolves_aliases() {
        let catalog = Catalog::load().unwrap();
        let keywords = vec!["nextjs".to_string()];
        let resources = bind_resources(&catalog, &keywords, Difficulty::Beginner);
        assert!(!resources.is_empty());
    }

    #[test]
    fn test_bind_resources_unknown_keyword_yields_nothing() {
        let catalog = Catalog::load().unwrap();
        let keywords = vec!["cobol".to_string()];
        assert!(bind_resources(&catalog, &keywords, Difficulty::Beginner).is_empty());
    }

    #[test]
    fn test_assemble_roadmap_shape() {
        let catalog = Catalog::load().unwrap();
        let match_result = engine::insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        let gap: Vec<GapKeyword> = ["react", "typescript", "graphql", "aws", "docker", "sql"]
            .iter()
            .enumerate()
            .map(|(i, k)| GapKeyword {
                keyword: k.to_string(),
                weight: 10.0 - i as f64,
            })
            .collect();
        let weeks: Vec<LlmWeek> = (1..=4)
            .map(|n| week(n, &["react"], &["a", "b", "c"]))
            .collect();

        let roadmap = assemble_roadmap(plan_of(weeks), &match_result, &gap, 4, &catalog);

        assert_eq!(roadmap.total_weeks, 4);
        assert_eq!(roadmap.weekly_plan.len(), 4);
        assert_eq!(roadmap.match_grade, MatchGrade::D);
        assert_eq!(roadmap.target_grade, MatchGrade::C);
        // top-5 most-weighted gap keywords
        assert_eq!(
            roadmap.key_improvement_areas,
            vec!["react", "typescript", "graphql", "aws", "docker"]
        );
        for w in &roadmap.weekly_plan {
            assert!(w.resources.len() <= RESOURCES_PER_WEEK);
            // D grade → beginner resources dominate
            for r in &w.resources {
                assert!(catalog.contains_url(&r.url));
            }
        }
        assert_eq!(roadmap.weekly_plan[0].week_number, 1);
    }

    #[test]
    fn test_needs_bridge_detection() {
        let frontend_to_backend = analysis(
            &["react", "css"],
            &[("node", SectionType::Requirements, 2)],
        );
        assert!(needs_bridge(&frontend_to_backend));

        let backend_to_backend = analysis(
            &["node", "postgres"],
            &[("django", SectionType::Requirements, 2)],
        );
        assert!(!needs_bridge(&backend_to_backend));
    }

    #[test]
    fn test_week_count_bounds() {
        assert!(MIN_WEEKS <= DEFAULT_WEEKS && DEFAULT_WEEKS <= MAX_WEEKS);
        assert!(!(MIN_WEEKS..=MAX_WEEKS).contains(&3));
        assert!(!(MIN_WEEKS..=MAX_WEEKS).contains(&13));
        assert!((MIN_WEEKS..=MAX_WEEKS).contains(&8));
    }
}
