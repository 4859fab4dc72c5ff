//! Section Classifier — labels chunks with a tag from a closed vocabulary.
//!
//! A keyword-heuristic scorer over a section → term table. Heading-line hits
//! outweigh body hits; ties break toward the more specific category
//! (e.g. `preferred` over `requirements`); anything below a minimum
//! confidence falls back to `other`. Deterministic for identical input.

use crate::models::document::{FileType, SectionType};

/// Score contributed by a line that is a heading of the section.
const HEADING_HIT: u32 = 3;
/// Score contributed by each body occurrence of a section term.
const TERM_HIT: u32 = 1;
/// Minimum winning score; below this the chunk is classified `other`.
const MIN_CONFIDENCE: u32 = 2;

/// Heading lines longer than this are treated as body text.
const MAX_HEADING_LEN: usize = 100;

/// A heading term must start within this many characters of the line start.
/// Deeper matches are body text ("5+ years of experience" is not a heading).
const MAX_HEADING_TERM_POS: usize = 8;

/// Terms that classify body text but never announce a heading — JD bullets
/// routinely open with these.
const BODY_ONLY_TERMS: &[&str] = &["you will", "a plus"];

/// Term table entry: section, its terms, and a specificity rank used as the
/// tie-break (higher rank wins on equal score).
struct SectionTerms {
    section: SectionType,
    specificity: u32,
    terms: &'static [&'static str],
}

/// Résumé section vocabulary. Terms include the Korean header synonyms that
/// show up in bilingual résumés.
const RESUME_SECTIONS: &[SectionTerms] = &[
    SectionTerms {
        section: SectionType::Certifications,
        specificity: 6,
        terms: &[
            "certification",
            "certificate",
            "license",
            "자격증",
            "자격 사항",
            "면허",
        ],
    },
    SectionTerms {
        section: SectionType::Projects,
        specificity: 5,
        terms: &[
            "project",
            "portfolio",
            "side project",
            "프로젝트",
            "포트폴리오",
        ],
    },
    SectionTerms {
        section: SectionType::Education,
        specificity: 4,
        terms: &[
            "education",
            "academic",
            "degree",
            "university",
            "bachelor",
            "master",
            "학력",
            "교육",
            "학교",
        ],
    },
    SectionTerms {
        section: SectionType::Skills,
        specificity: 3,
        terms: &[
            "skills",
            "technical skills",
            "tech stack",
            "technologies",
            "competencies",
            "proficient in",
            "기술 스택",
            "보유 기술",
            "스킬",
            "역량",
        ],
    },
    SectionTerms {
        section: SectionType::Experience,
        specificity: 2,
        terms: &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "work history",
            "career",
            "경력",
            "직장",
            "업무 경력",
            "근무",
        ],
    },
    SectionTerms {
        section: SectionType::Summary,
        specificity: 1,
        terms: &[
            "summary",
            "profile",
            "about me",
            "objective",
            "자기소개",
            "소개",
            "요약",
            "개요",
        ],
    },
];

/// Job-description section vocabulary.
const JD_SECTIONS: &[SectionTerms] = &[
    SectionTerms {
        // `preferred` outranks `requirements`: "preferred qualifications"
        // matches both tables and must land here.
        section: SectionType::Preferred,
        specificity: 6,
        terms: &[
            "preferred",
            "nice to have",
            "bonus",
            "a plus",
            "desired",
            "우대 사항",
            "우대",
            "선호",
            "가점",
        ],
    },
    SectionTerms {
        section: SectionType::Technical,
        specificity: 5,
        terms: &[
            "tech stack",
            "technical environment",
            "technologies we use",
            "tools we use",
            "our stack",
            "기술 스택",
            "사용 기술",
            "개발 환경",
        ],
    },
    SectionTerms {
        section: SectionType::Benefits,
        specificity: 4,
        terms: &[
            "benefits",
            "perks",
            "what we offer",
            "compensation",
            "salary",
            "복리후생",
            "혜택",
            "복지",
            "연봉",
        ],
    },
    SectionTerms {
        section: SectionType::Requirements,
        specificity: 3,
        terms: &[
            "requirements",
            "qualifications",
            "must have",
            "required",
            "minimum",
            "what we're looking for",
            "자격 요건",
            "필수",
            "지원 자격",
        ],
    },
    SectionTerms {
        section: SectionType::Responsibilities,
        specificity: 2,
        terms: &[
            "responsibilities",
            "duties",
            "you will",
            "what you'll do",
            "your role",
            "담당 업무",
            "주요 업무",
            "업무 내용",
            "역할",
        ],
    },
];

fn table_for(file_type: FileType) -> &'static [SectionTerms] {
    match file_type {
        FileType::Resume => RESUME_SECTIONS,
        FileType::JobDescription => JD_SECTIONS,
    }
}

/// Returns the section a line announces, if the line reads as a heading.
/// Heading terms must appear within the first few words of a short line.
pub fn detect_heading(line: &str, file_type: FileType) -> Option<SectionType> {
    let line = line.trim();
    if line.is_empty() || line.len() > MAX_HEADING_LEN {
        return None;
    }
    let lowered = line.to_lowercase();

    let mut best: Option<(&SectionTerms, usize)> = None;
    for entry in table_for(file_type) {
        for term in entry.terms {
            if BODY_ONLY_TERMS.contains(term) {
                continue;
            }
            if let Some(pos) = lowered.find(term) {
                if pos <= MAX_HEADING_TERM_POS {
                    let better = match best {
                        None => true,
                        Some((cur, cur_pos)) => {
                            pos < cur_pos
                                || (pos == cur_pos && entry.specificity > cur.specificity)
                        }
                    };
                    if better {
                        best = Some((entry, pos));
                    }
                }
            }
        }
    }
    best.map(|(entry, _)| entry.section)
}

/// Classifies a whole chunk of text into exactly one section tag.
pub fn classify_chunk(text: &str, file_type: FileType) -> SectionType {
    let mut best_section = SectionType::Other;
    let mut best_score = 0u32;
    let mut best_specificity = 0u32;

    for entry in table_for(file_type) {
        let score = score_section(text, file_type, entry);
        let wins = score > best_score
            || (score == best_score && score > 0 && entry.specificity > best_specificity);
        if wins {
            best_section = entry.section;
            best_score = score;
            best_specificity = entry.specificity;
        }
    }

    if best_score >= MIN_CONFIDENCE {
        best_section
    } else {
        SectionType::Other
    }
}

fn score_section(text: &str, file_type: FileType, entry: &SectionTerms) -> u32 {
    let mut score = 0u32;
    for line in text.lines() {
        if detect_heading(line, file_type) == Some(entry.section) {
            score += HEADING_HIT;
        }
        let lowered = line.to_lowercase();
        for term in entry.terms {
            score += TERM_HIT * count_occurrences(&lowered, term);
        }
    }
    score
}

fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0u32;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        start += pos + needle.len();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_heading_resume_skills() {
        assert_eq!(
            detect_heading("Technical Skills", FileType::Resume),
            Some(SectionType::Skills)
        );
    }

    #[test]
    fn test_detect_heading_jd_requirements() {
        assert_eq!(
            detect_heading("Requirements:", FileType::JobDescription),
            Some(SectionType::Requirements)
        );
    }

    #[test]
    fn test_preferred_beats_requirements_on_combined_heading() {
        // "Preferred Qualifications" matches both tables; the more specific
        // category must win.
        assert_eq!(
            detect_heading("Preferred Qualifications", FileType::JobDescription),
            Some(SectionType::Preferred)
        );
    }

    #[test]
    fn test_long_line_is_not_a_heading() {
        let line = "We are looking for an engineer with experience building large \
                    distributed systems and a track record of shipping products";
        assert_eq!(detect_heading(line, FileType::JobDescription), None);
    }

    #[test]
    fn test_korean_heading_detected() {
        assert_eq!(
            detect_heading("경력 사항", FileType::Resume),
            Some(SectionType::Experience)
        );
    }

    #[test]
    fn test_classify_chunk_experience() {
        let text = "Work Experience\n\
                    Acme Corp — Senior Engineer\n\
                    Led the platform team through a multi-year migration.";
        assert_eq!(
            classify_chunk(text, FileType::Resume),
            SectionType::Experience
        );
    }

    #[test]
    fn test_classify_chunk_benefits() {
        let text = "Benefits\n\
                    Competitive salary, remote-friendly, generous perks.";
        assert_eq!(
            classify_chunk(text, FileType::JobDescription),
            SectionType::Benefits
        );
    }

    #[test]
    fn test_classify_low_confidence_falls_back_to_other() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
        assert_eq!(classify_chunk(text, FileType::Resume), SectionType::Other);
        assert_eq!(
            classify_chunk(text, FileType::JobDescription),
            SectionType::Other
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let text = "Skills\nRust, Go, TypeScript, PostgreSQL";
        let a = classify_chunk(text, FileType::Resume);
        let b = classify_chunk(text, FileType::Resume);
        assert_eq!(a, b);
    }

    #[test]
    fn test_resume_vocabulary_excludes_jd_tags() {
        // A résumé chunk can never be classified with a JD-only tag.
        let text = "Requirements: must have 5 years of experience";
        let section = classify_chunk(text, FileType::Resume);
        assert!(matches!(
            section,
            SectionType::Summary
                | SectionType::Experience
                | SectionType::Skills
                | SectionType::Education
                | SectionType::Projects
                | SectionType::Certifications
                | SectionType::Other
        ));
    }
}
