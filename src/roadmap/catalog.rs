//! Resource Catalog — curated learning resources, loaded once at startup.
//!
//! The catalog is data, not code: `data/catalog.json` holds the topics,
//! their resources, and the alias table (`next` → `next.js`). Adding a
//! resource never requires a planner change. The loaded catalog is
//! read-only process state shared behind an `Arc`.

use std::collections::HashMap;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching::keywords::normalize_keyword;

const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// The catalog ships with at least this many curated entries.
const MIN_RESOURCES: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Documentation,
    Tutorial,
    Video,
    Article,
    Course,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    YouTube,
    Inflearn,
    Nomad,
    Official,
    #[serde(rename = "MDN")]
    Mdn,
    Docs,
    GitHub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Distance between tiers, used to prefer resources near a target tier.
    pub fn distance(&self, other: Difficulty) -> u8 {
        (*self as i8 - other as i8).unsigned_abs()
    }
}

/// One curated catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub platform: Platform,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTopic {
    pub topic: String,
    pub category: String,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    aliases: HashMap<String, String>,
    topics: Vec<CatalogTopic>,
}

/// The loaded, validated catalog.
#[derive(Debug)]
pub struct Catalog {
    topics: Vec<CatalogTopic>,
    /// normalized topic name → index into `topics`
    by_topic: HashMap<String, usize>,
    /// normalized alias → normalized topic name
    aliases: HashMap<String, String>,
}

impl Catalog {
    /// Parses and validates the embedded catalog. Called once at startup;
    /// a malformed catalog is a deployment error, not a runtime condition.
    pub fn load() -> Result<Self> {
        Self::from_json(CATALOG_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json).context("Failed to parse catalog")?;

        let mut by_topic = HashMap::new();
        for (i, topic) in file.topics.iter().enumerate() {
            ensure!(
                !topic.resources.is_empty(),
                "Catalog topic '{}' has no resources",
                topic.topic
            );
            by_topic.insert(normalize_keyword(&topic.topic), i);
        }

        let aliases: HashMap<String, String> = file
            .aliases
            .iter()
            .map(|(k, v)| (normalize_keyword(k), normalize_keyword(v)))
            .collect();
        for (alias, target) in &aliases {
            ensure!(
                by_topic.contains_key(target),
                "Catalog alias '{alias}' points at unknown topic '{target}'"
            );
        }

        let catalog = Catalog {
            topics: file.topics,
            by_topic,
            aliases,
        };
        ensure!(
            catalog.resource_count() >= MIN_RESOURCES,
            "Catalog has {} resources, expected at least {MIN_RESOURCES}",
            catalog.resource_count()
        );
        Ok(catalog)
    }

    /// Resolves a normalized keyword to a topic: exact topic name first,
    /// then the alias table.
    pub fn resolve(&self, keyword: &str) -> Option<&CatalogTopic> {
        let normalized = normalize_keyword(keyword);
        let index = self
            .by_topic
            .get(&normalized)
            .or_else(|| self.aliases.get(&normalized).and_then(|t| self.by_topic.get(t)))?;
        self.topics.get(*index)
    }

    /// Resources for a keyword; empty when the keyword resolves to nothing.
    pub fn resources_for(&self, keyword: &str) -> &[LearningResource] {
        self.resolve(keyword)
            .map(|t| t.resources.as_slice())
            .unwrap_or(&[])
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|t| t.topic.as_str())
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn resource_count(&self) -> usize {
        self.topics.iter().map(|t| t.resources.len()).sum()
    }

    /// Whether a URL belongs to the catalog. Planner output must never
    /// carry a URL this returns false for.
    pub fn contains_url(&self, url: &str) -> bool {
        self.topics
            .iter()
            .flat_map(|t| &t.resources)
            .any(|r| r.url == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.resource_count() >= MIN_RESOURCES);
    }

    #[test]
    fn test_covers_required_categories() {
        let catalog = Catalog::load().unwrap();
        let categories: std::collections::HashSet<&str> =
            catalog.topics.iter().map(|t| t.category.as_str()).collect();
        for required in ["frontend", "backend", "database", "infra", "deployment", "career"] {
            assert!(categories.contains(required), "missing category {required}");
        }
    }

    #[test]
    fn test_resolve_exact_topic() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.resolve("react").is_some());
        assert!(catalog.resolve("next.js").is_some());
    }

    #[test]
    fn test_resolve_via_alias() {
        let catalog = Catalog::load().unwrap();
        let topic = catalog.resolve("nextjs").unwrap();
        assert_eq!(topic.topic, "next.js");
        let topic = catalog.resolve("postgresql").unwrap();
        assert_eq!(topic.topic, "postgres");
    }

    #[test]
    fn test_resolve_normalizes_input() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.resolve("React").is_some());
        assert!(catalog.resolve("Next JS").is_some());
    }

    #[test]
    fn test_unknown_keyword_resolves_to_nothing() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.resolve("cobol").is_none());
        assert!(catalog.resources_for("cobol").is_empty());
    }

    #[test]
    fn test_contains_url() {
        let catalog = Catalog::load().unwrap();
        assert!(catalog.contains_url("https://react.dev/learn"));
        assert!(!catalog.contains_url("https://example.com/not-in-catalog"));
    }

    #[test]
    fn test_difficulty_distance() {
        assert_eq!(Difficulty::Beginner.distance(Difficulty::Beginner), 0);
        assert_eq!(Difficulty::Beginner.distance(Difficulty::Advanced), 2);
        assert_eq!(Difficulty::Intermediate.distance(Difficulty::Beginner), 1);
    }

    #[test]
    fn test_rejects_alias_to_unknown_topic() {
        let json = r#"{
            "aliases": {"ghost": "nowhere"},
            "topics": [{"topic": "react", "category": "frontend", "resources": [
                {"title": "t", "url": "u", "type": "video",
                 "platform": "YouTube", "difficulty": "beginner"}
            ]}]
        }"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_undersized_catalog() {
        let json = r#"{
            "aliases": {},
            "topics": [{"topic": "react", "category": "frontend", "resources": [
                {"title": "t", "url": "u", "type": "video",
                 "platform": "YouTube", "difficulty": "beginner"}
            ]}]
        }"#;
        assert!(Catalog::from_json(json).is_err());
    }
}
