//! Feedback Generator — natural-language gap analysis over a MatchResult.
//!
//! One LLM call, validated against the declared shape; one repair retry
//! with the violations quoted; then a deterministic fallback assembled
//! from section scores and gap keywords. Malformed LLM output never
//! reaches the client.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::engine::{MatchGrade, MatchResult, SectionScore};
use crate::matching::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_REPAIR_TEMPLATE, FEEDBACK_SYSTEM,
};
use crate::models::document::SectionType;

const MIN_ITEMS: usize = 2;
const MAX_ITEMS: usize = 5;
/// Sections at or above this read as strengths in the fallback.
const STRONG_SECTION: f64 = 0.7;
/// Sections below this read as needing work in the fallback.
const WEAK_SECTION: f64 = 0.5;

/// Structured feedback block attached to gap-analysis responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub potential: Vec<String>,
    pub action_items: Vec<String>,
}

/// Friendly display name for a section tag. The prompt and the fallback
/// both use these so raw taxonomy identifiers never surface in prose.
pub fn section_label(section: SectionType) -> &'static str {
    match section {
        SectionType::Summary => "profile summary",
        SectionType::Experience => "work experience",
        SectionType::Skills => "skills",
        SectionType::Education => "education",
        SectionType::Projects => "projects",
        SectionType::Certifications => "certifications",
        SectionType::Requirements => "core requirements",
        SectionType::Preferred => "preferred qualifications",
        SectionType::Responsibilities => "day-to-day responsibilities",
        SectionType::Technical => "technical stack",
        SectionType::Benefits => "benefits",
        SectionType::Other => "general content",
    }
}

/// Generates feedback for a match result. `gap_keywords` are the JD skills
/// the résumé fails on, most important first.
pub async fn generate_feedback(
    llm: &LlmClient,
    match_result: &MatchResult,
    gap_keywords: &[String],
) -> Feedback {
    let prompt = build_prompt(match_result, gap_keywords);

    let first: Result<Feedback, LlmError> = llm.call_json(&prompt, FEEDBACK_SYSTEM).await;
    let (candidate, errors) = match first {
        Ok(feedback) => {
            let errors = validate(&feedback);
            (Some(feedback), errors)
        }
        Err(e) => {
            warn!("Feedback LLM call failed: {e}");
            (None, vec![format!("output was not valid JSON: {e}")])
        }
    };

    if errors.is_empty() {
        if let Some(feedback) = candidate {
            return feedback;
        }
    }

    warn!("Feedback failed validation, retrying once: {:?}", errors);
    let previous_json = candidate
        .as_ref()
        .and_then(|f| serde_json::to_string(f).ok())
        .unwrap_or_else(|| "(unparseable)".to_string());
    let repair_prompt = FEEDBACK_REPAIR_TEMPLATE
        .replace("{errors}", &errors.join("\n"))
        .replace("{previous_json}", &previous_json);

    match llm.call_json::<Feedback>(&repair_prompt, FEEDBACK_SYSTEM).await {
        Ok(repaired) if validate(&repaired).is_empty() => repaired,
        Ok(_) | Err(_) => {
            warn!("Feedback repair failed, using deterministic fallback");
            deterministic_fallback(match_result, gap_keywords)
        }
    }
}

fn build_prompt(match_result: &MatchResult, gap_keywords: &[String]) -> String {
    let section_breakdown = if match_result.section_scores.is_empty() {
        "(no section data available)".to_string()
    } else {
        match_result
            .section_scores
            .iter()
            .map(|s| {
                let label = label_of(s);
                let excerpt = s
                    .top_matches
                    .first()
                    .map(|m| m.jd_excerpt.replace('\n', " "))
                    .unwrap_or_default();
                format!("- {label}: {:.2} — \"{excerpt}\"", s.score)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let gaps = if gap_keywords.is_empty() {
        "(none)".to_string()
    } else {
        gap_keywords.join(", ")
    };

    let similar_tech_notes = if match_result.similar_tech.is_empty() {
        "(none)".to_string()
    } else {
        match_result
            .similar_tech
            .iter()
            .map(|m| {
                format!(
                    "- knows {} which relates to required {} ({})",
                    m.resume_has, m.jd_required, m.relationship
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{match_score}", &match_result.match_score.to_string())
        .replace("{match_grade}", match_result.match_grade.as_str())
        .replace("{section_breakdown}", &section_breakdown)
        .replace("{gap_keywords}", &gaps)
        .replace("{similar_tech_notes}", &similar_tech_notes)
}

/// Shape checks for LLM output. Returns violations; empty means valid.
fn validate(feedback: &Feedback) -> Vec<String> {
    let mut errors = Vec::new();
    if feedback.summary.trim().is_empty() {
        errors.push("summary is empty".to_string());
    }
    for (name, list) in [
        ("strengths", &feedback.strengths),
        ("improvements", &feedback.improvements),
        ("potential", &feedback.potential),
        ("action_items", &feedback.action_items),
    ] {
        if !(MIN_ITEMS..=MAX_ITEMS).contains(&list.len()) {
            errors.push(format!(
                "{name} has {} items, expected {MIN_ITEMS} to {MAX_ITEMS}",
                list.len()
            ));
        }
        if list.iter().any(|item| item.trim().is_empty()) {
            errors.push(format!("{name} contains an empty item"));
        }
    }
    errors
}

/// Feedback assembled without the LLM: grounded in section scores, gap
/// keywords, and similar-tech matches. Always satisfies the shape rules.
fn deterministic_fallback(match_result: &MatchResult, gap_keywords: &[String]) -> Feedback {
    let grade = match_result.match_grade;
    let score = match_result.match_score;

    let summary = match grade {
        MatchGrade::S => format!(
            "Excellent match at {score}/100. The resume aligns closely with what this role asks for."
        ),
        MatchGrade::A => format!(
            "Strong match at {score}/100. Most of the role's needs are covered; sharpening a few areas would make it airtight."
        ),
        MatchGrade::B => format!(
            "Good match at {score}/100. The fundamentals are there, with clear room to strengthen the weaker areas."
        ),
        MatchGrade::C => format!(
            "Fair match at {score}/100. Several of the role's needs are only partially covered; targeted upskilling would move the needle."
        ),
        MatchGrade::D => format!(
            "The match is currently weak at {score}/100. The role asks for skills the resume does not yet demonstrate, so a focused learning plan matters most."
        ),
    };

    let mut strengths: Vec<String> = match_result
        .section_scores
        .iter()
        .filter(|s| s.score >= STRONG_SECTION)
        .map(|s| {
            format!(
                "Solid alignment in {} ({:.0}% similarity)",
                label_of(s),
                s.score * 100.0
            )
        })
        .collect();
    for m in &match_result.similar_tech {
        strengths.push(format!(
            "Experience with {} transfers toward the required {}",
            m.resume_has, m.jd_required
        ));
    }
    pad(&mut strengths, &[
        "The document structure makes relevant material easy to find",
        "Existing experience gives a base to build the missing skills on",
    ]);

    let mut improvements: Vec<String> = match_result
        .section_scores
        .iter()
        .filter(|s| s.score < WEAK_SECTION)
        .map(|s| {
            format!(
                "Coverage of {} is thin ({:.0}% similarity)",
                label_of(s),
                s.score * 100.0
            )
        })
        .collect();
    for keyword in gap_keywords.iter().take(3) {
        improvements.push(format!("No evidence of {keyword}, which the role asks for"));
    }
    pad(&mut improvements, &[
        "Quantified outcomes would make the existing material more convincing",
        "Tailoring the wording to this role's vocabulary would improve alignment",
    ]);

    let mut potential: Vec<String> = match_result
        .similar_tech
        .iter()
        .map(|m| {
            format!(
                "Knowing {} makes {} a short step ({})",
                m.resume_has, m.jd_required, m.relationship
            )
        })
        .collect();
    pad(&mut potential, &[
        "The strongest sections suggest the remaining gaps are learnable with focused practice",
        "Closing the top gap areas would raise the grade a full tier",
    ]);

    let mut action_items: Vec<String> = gap_keywords
        .iter()
        .take(3)
        .map(|k| format!("Build and document a small project using {k}"))
        .collect();
    pad(&mut action_items, &[
        "Add measurable outcomes to the strongest experience entries",
        "Mirror the role's terminology where it honestly applies",
    ]);

    Feedback {
        summary,
        strengths: cap(strengths),
        improvements: cap(improvements),
        potential: cap(potential),
        action_items: cap(action_items),
    }
}

fn label_of(section_score: &SectionScore) -> &'static str {
    section_label(
        SectionType::parse(&section_score.section_type).unwrap_or(SectionType::Other),
    )
}

fn pad(list: &mut Vec<String>, fillers: &[&str]) {
    for filler in fillers {
        if list.len() >= MIN_ITEMS {
            break;
        }
        list.push(filler.to_string());
    }
}

fn cap(mut list: Vec<String>) -> Vec<String> {
    list.truncate(MAX_ITEMS);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::insufficient_data_result;
    use crate::matching::similar_tech::SimilarTechMatch;
    use uuid::Uuid;

    fn feedback_of(n: usize) -> Feedback {
        let items: Vec<String> = (0..n).map(|i| format!("item {i}")).collect();
        Feedback {
            summary: "ok".to_string(),
            strengths: items.clone(),
            improvements: items.clone(),
            potential: items.clone(),
            action_items: items,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(validate(&feedback_of(2)).is_empty());
        assert!(validate(&feedback_of(5)).is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range_lists() {
        assert!(!validate(&feedback_of(1)).is_empty());
        assert!(!validate(&feedback_of(6)).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_summary() {
        let mut feedback = feedback_of(3);
        feedback.summary = "  ".to_string();
        assert!(validate(&feedback)
            .iter()
            .any(|e| e.contains("summary")));
    }

    #[test]
    fn test_validate_rejects_blank_items() {
        let mut feedback = feedback_of(3);
        feedback.strengths[1] = "".to_string();
        assert!(validate(&feedback)
            .iter()
            .any(|e| e.contains("empty item")));
    }

    #[test]
    fn test_fallback_satisfies_shape_rules() {
        let mut result = insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        result.similar_tech.push(SimilarTechMatch {
            jd_required: "next.js".to_string(),
            resume_has: "react".to_string(),
            relationship: "framework family".to_string(),
            bonus: 2.0,
        });
        let gaps = vec!["graphql".to_string(), "aws".to_string()];
        let feedback = deterministic_fallback(&result, &gaps);
        assert!(validate(&feedback).is_empty());
    }

    #[test]
    fn test_fallback_mentions_gap_keywords() {
        let result = insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        let gaps = vec!["kubernetes".to_string(), "terraform".to_string()];
        let feedback = deterministic_fallback(&result, &gaps);
        let all = feedback.improvements.join(" ") + &feedback.action_items.join(" ");
        assert!(all.contains("kubernetes"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let result = insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        let gaps = vec!["react".to_string()];
        let a = deterministic_fallback(&result, &gaps);
        let b = deterministic_fallback(&result, &gaps);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.strengths, b.strengths);
        assert_eq!(a.action_items, b.action_items);
    }

    #[test]
    fn test_fallback_uses_labels_not_raw_tags() {
        // The label map must keep internal identifiers out of prose.
        let mut result = insufficient_data_result(Uuid::new_v4(), Uuid::new_v4());
        result.section_scores.push(SectionScore {
            section_type: "requirements".to_string(),
            score: 0.2,
            chunk_count: 1,
            top_matches: Vec::new(),
        });
        let feedback = deterministic_fallback(&result, &[]);
        let improvements = feedback.improvements.join(" ");
        assert!(improvements.contains("core requirements"));
    }

    #[test]
    fn test_section_label_covers_all_tags() {
        for tag in [
            "summary",
            "experience",
            "skills",
            "education",
            "projects",
            "certifications",
            "requirements",
            "preferred",
            "responsibilities",
            "technical",
            "benefits",
            "other",
        ] {
            let section = SectionType::parse(tag).unwrap();
            assert!(!section_label(section).is_empty());
        }
    }
}
