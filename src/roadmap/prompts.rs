// All LLM prompt constants for the Roadmap module.

/// System prompt for roadmap generation — enforces JSON-only output.
pub const ROADMAP_SYSTEM: &str =
    "You are an expert career coach for software developers. \
    You design strategic week-by-week learning curricula that close the gap \
    between a candidate's current skills and a target job. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Roadmap generation prompt template. Replace before sending:
/// {target_weeks}, {match_score}, {match_grade}, {target_grade},
/// {strategy}, {bridge_strategy}, {gap_keywords}, {strength_keywords},
/// {resume_excerpt}, {jd_excerpt}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create an actionable {target_weeks}-week learning roadmap for a developer moving from their current skill set toward a target job.

## Current situation
- Match score: {match_score}/100 (grade {match_grade})
- Target grade for this roadmap: {target_grade}
- Missing or weak skills (THE GAP — the roadmap's center of gravity): {gap_keywords}
- Existing strengths (reinforce briefly, do not re-teach): {strength_keywords}

## Strategy for this grade
{strategy}
{bridge_strategy}
## Resume excerpt (current skills)
{resume_excerpt}

## Job description excerpt (target requirements)
{jd_excerpt}

## Output format

Return a JSON object with this EXACT shape:
{
  "summary": "3-4 motivating sentences describing the strategy and goal",
  "weekly_plan": [
    {
      "week_number": 1,
      "title": "Week title (e.g. 'TypeScript fundamentals')",
      "duration": "1 week",
      "description": "What this week covers and why it matters (3-4 sentences)",
      "keywords": ["typescript", "javascript"],
      "tasks": [
        {"task": "Work through the official handbook chapters 1-5", "priority": "high"},
        {"task": "Refactor a small app to the new skill", "priority": "high"},
        {"task": "Solve ten practice exercises", "priority": "medium"}
      ]
    }
  ]
}

HARD RULES:
1. "weekly_plan" must contain exactly {target_weeks} entries with week_number contiguous from 1.
2. Every week has 3 to 5 tasks — never fewer, never more.
3. At least 70% of all tasks across the plan must target the gap skills listed above; at most 30% may reinforce strengths or cover bridge topics.
4. "keywords" are 2-4 per week, lowercase, no whitespace (e.g. "typescript", "next.js", "restapi" — never "Type Script" or "REST API"). Gap skills must appear in the keywords of the weeks that teach them.
5. Each task is a concrete, checkable action a developer can finish within the week.
6. "priority" is "high", "medium", or "low" when present.
7. Difficulty ramps across the plan according to the strategy above.
8. Return valid JSON only."#;

/// Repair prompt sent once when the first roadmap fails validation.
/// Replace: {target_weeks}, {errors}, {previous_json}
pub const ROADMAP_REPAIR_TEMPLATE: &str = r#"Your previous roadmap JSON failed validation.

Violations:
{errors}

Previous output:
{previous_json}

Produce a corrected JSON object with the same schema that fixes every violation. Requirements that still apply: exactly {target_weeks} weeks numbered contiguously from 1, 3-5 tasks per week, at least 70% of tasks targeting the gap skills, keywords lowercase with no whitespace. Return valid JSON only."#;

/// Bridge guidance injected when a frontend-leaning résumé targets a
/// backend-leaning JD.
pub const BRIDGE_STRATEGY: &str = r#"
## Frontend-to-backend bridge
This candidate comes from frontend work and the target role leans backend.
- Weeks 1-2 must cover backend collaboration fundamentals: REST API design, data modeling, and HTTP in depth.
- Aim for working fluency with backend concepts, not deep specialization; a small CRUD API project beats theory.
"#;
