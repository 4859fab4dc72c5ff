// All LLM prompt constants for the gap-analysis feedback module.

/// System prompt for feedback generation — enforces JSON-only output.
pub const FEEDBACK_SYSTEM: &str =
    "You are an expert career coach reviewing how well a candidate's resume \
    fits a target job description. You give specific, grounded, encouraging \
    feedback. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent job titles, employer names, or facts not present in the \
    provided material.";

/// Feedback prompt template. Replace before sending:
/// {match_score}, {match_grade}, {section_breakdown}, {gap_keywords},
/// {similar_tech_notes}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Review this resume-to-job-description match and produce structured feedback.

## Match overview
- Score: {match_score}/100 (grade {match_grade})

## Section-by-section alignment
Each line shows a job-description area, its alignment score in [0,1], and an excerpt of the best-matching material:
{section_breakdown}

## Skills the job asks for that the resume does not show
{gap_keywords}

## Related technologies the candidate already has
{similar_tech_notes}

## Output format

Return a JSON object with this EXACT shape:
{
  "summary": "2-3 sentence overall assessment",
  "strengths": ["..."],
  "improvements": ["..."],
  "potential": ["..."],
  "action_items": ["..."]
}

HARD RULES:
1. Each of the four lists has at least 2 and at most 5 items.
2. Every item must be grounded in a specific area or skill named above — no generic advice.
3. Refer to job-description areas ONLY by the friendly names used in the breakdown above (e.g. "core requirements", "technical stack") — never by internal tags.
4. Do not fabricate job titles, employer names, or experience the material does not show.
5. "action_items" are concrete next steps the candidate can start this week.
6. Return valid JSON only."#;

/// Repair prompt sent once when the first feedback response fails
/// validation. Replace: {errors}, {previous_json}
pub const FEEDBACK_REPAIR_TEMPLATE: &str = r#"Your previous feedback JSON failed validation.

Violations:
{errors}

Previous output:
{previous_json}

Produce a corrected JSON object with the same schema that fixes every violation: each list must have 2 to 5 grounded items and the summary must be non-empty. Return valid JSON only."#;
