//! Similar-Tech Table — undirected equivalence groups of technology
//! keywords that grant partial credit when a JD keyword is missing from a
//! résumé but a related one is present.
//!
//! The table is data, not logic: each group lists normalized members
//! (lowercase, no whitespace) and the relationship tag reported on matches.

use serde::Serialize;
use std::collections::HashSet;

/// Points granted per similar-tech match.
const BONUS_PER_MATCH: f64 = 2.0;
/// Hard cap on the total bonus.
const BONUS_CAP: f64 = 10.0;

/// One equivalence group. Membership is undirected: any member found in the
/// résumé covers any other member required by the JD.
pub struct TechGroup {
    pub relationship: &'static str,
    pub members: &'static [&'static str],
}

pub const TECH_GROUPS: &[TechGroup] = &[
    // React-descended rendering frameworks.
    TechGroup {
        relationship: "framework family",
        members: &["react", "next.js", "remix", "gatsby"],
    },
    // Vue and its meta-framework.
    TechGroup {
        relationship: "framework family",
        members: &["vue", "nuxt"],
    },
    // Python web frameworks.
    TechGroup {
        relationship: "framework family",
        members: &["fastapi", "flask", "django"],
    },
    // Node HTTP frameworks.
    TechGroup {
        relationship: "framework family",
        members: &["express", "koa", "nest.js", "fastify"],
    },
    // Relational databases.
    TechGroup {
        relationship: "same database family",
        members: &["postgres", "mysql", "mariadb", "sqlite"],
    },
    // Document stores.
    TechGroup {
        relationship: "same database family",
        members: &["mongodb", "couchdb", "dynamodb"],
    },
    // In-memory caches.
    TechGroup {
        relationship: "same caching family",
        members: &["redis", "memcached"],
    },
    // Big-three cloud platforms.
    TechGroup {
        relationship: "same cloud ecosystem",
        members: &["aws", "gcp", "azure"],
    },
    // JS and its typed superset.
    TechGroup {
        relationship: "same language ecosystem",
        members: &["typescript", "javascript"],
    },
    // JVM languages.
    TechGroup {
        relationship: "same language ecosystem",
        members: &["java", "kotlin"],
    },
    // JS test runners.
    TechGroup {
        relationship: "testing family",
        members: &["jest", "vitest", "mocha"],
    },
    // Bundlers.
    TechGroup {
        relationship: "build tooling family",
        members: &["webpack", "vite", "rollup", "esbuild"],
    },
    // Client state managers.
    TechGroup {
        relationship: "state management family",
        members: &["redux", "zustand", "mobx", "recoil"],
    },
    // CSS preprocessors.
    TechGroup {
        relationship: "styling family",
        members: &["sass", "less"],
    },
    // Container tooling.
    TechGroup {
        relationship: "container tooling",
        members: &["docker", "podman"],
    },
];

/// A partial-credit hit: the JD asked for `jd_required`, the résumé offers
/// `resume_has` from the same group.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarTechMatch {
    pub jd_required: String,
    pub resume_has: String,
    pub relationship: String,
    pub bonus: f64,
}

/// Finds similar-tech coverage for every JD keyword absent verbatim from
/// the résumé. At most one match is recorded per missing JD keyword.
pub fn find_matches(
    resume_keywords: &HashSet<String>,
    jd_keywords: &[String],
) -> Vec<SimilarTechMatch> {
    let mut matches = Vec::new();

    for jd_keyword in jd_keywords {
        if resume_keywords.contains(jd_keyword) {
            continue;
        }
        let Some(group) = group_of(jd_keyword) else {
            continue;
        };
        let covered_by = group
            .members
            .iter()
            .find(|member| **member != jd_keyword.as_str() && resume_keywords.contains(**member));
        if let Some(member) = covered_by {
            matches.push(SimilarTechMatch {
                jd_required: jd_keyword.clone(),
                resume_has: (*member).to_string(),
                relationship: group.relationship.to_string(),
                bonus: BONUS_PER_MATCH,
            });
        }
    }

    matches
}

/// `min(10, 2 × |matches|)`.
pub fn bonus_points(match_count: usize) -> f64 {
    (BONUS_PER_MATCH * match_count as f64).min(BONUS_CAP)
}

fn group_of(keyword: &str) -> Option<&'static TechGroup> {
    TECH_GROUPS
        .iter()
        .find(|group| group.members.contains(&keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_react_covers_missing_next_js() {
        let resume = set(&["react", "typescript"]);
        let jd = vec!["next.js".to_string()];
        let matches = find_matches(&resume, &jd);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].jd_required, "next.js");
        assert_eq!(matches[0].resume_has, "react");
        assert_eq!(matches[0].relationship, "framework family");
    }

    #[test]
    fn test_verbatim_keyword_produces_no_match() {
        let resume = set(&["react"]);
        let jd = vec!["react".to_string()];
        assert!(find_matches(&resume, &jd).is_empty());
    }

    #[test]
    fn test_unrelated_stacks_produce_no_match() {
        // php/mysql/jquery résumé against a react/typescript/graphql/aws JD:
        // nothing shares a group, so the bonus must be zero.
        let resume = set(&["php", "mysql", "jquery"]);
        let jd = vec![
            "react".to_string(),
            "typescript".to_string(),
            "graphql".to_string(),
            "aws".to_string(),
        ];
        let matches = find_matches(&resume, &jd);
        assert!(matches.is_empty());
        assert_eq!(bonus_points(matches.len()), 0.0);
    }

    #[test]
    fn test_bonus_two_points_per_match() {
        assert_eq!(bonus_points(0), 0.0);
        assert_eq!(bonus_points(1), 2.0);
        assert_eq!(bonus_points(3), 6.0);
    }

    #[test]
    fn test_bonus_capped_at_ten() {
        assert_eq!(bonus_points(5), 10.0);
        assert_eq!(bonus_points(9), 10.0);
    }

    #[test]
    fn test_groups_are_undirected() {
        // next.js on the résumé covers a JD that requires react.
        let resume = set(&["next.js"]);
        let jd = vec!["react".to_string()];
        let matches = find_matches(&resume, &jd);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].resume_has, "next.js");
    }

    #[test]
    fn test_one_match_per_missing_jd_keyword() {
        // Résumé has two members of the group; only one match is recorded.
        let resume = set(&["react", "remix"]);
        let jd = vec!["next.js".to_string()];
        assert_eq!(find_matches(&resume, &jd).len(), 1);
    }

    #[test]
    fn test_members_are_normalized_form() {
        for group in TECH_GROUPS {
            for member in group.members {
                assert_eq!(
                    *member,
                    crate::matching::keywords::normalize_keyword(member),
                    "group member '{member}' must be stored normalized"
                );
            }
        }
    }
}
