//! Role and task definitions
//!
//! A role is a named capability profile. A task is the ephemeral unit of work
//! that gets matched against the roles of a catalog.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Words ignored when deriving task keywords
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "from", "into", "onto", "our", "your", "you",
    "are", "was", "were", "will", "should", "would", "could", "can", "need", "needs", "have",
    "has", "had", "not", "but", "all", "any", "some", "out", "use", "using", "make", "about",
    "then", "than", "when", "what", "which", "where", "there", "their", "them", "its", "also",
];

/// A named capability profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Role name, unique within a catalog
    pub name: String,
    /// What this role does
    #[serde(default)]
    pub description: String,
    /// Keywords that route a task to this role
    #[serde(default)]
    pub discovery_keywords: Vec<String>,
    /// Things this role can do
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Weight from 0 to 10
    #[serde(default)]
    pub priority: u32,
}

impl Role {
    /// Create a role with no keywords or capabilities
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            discovery_keywords: Vec::new(),
            capabilities: Vec::new(),
            priority: 0,
        }
    }

    /// Set discovery keywords
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.discovery_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Set capabilities
    pub fn with_capabilities(mut self, capabilities: &[&str]) -> Self {
        self.capabilities = capabilities.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Set priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Priority scaled into `[0, 1]`
    pub fn normalized_priority(&self) -> f64 {
        (f64::from(self.priority) / 10.0).min(1.0)
    }

    /// Whether this role can stand in as the general-purpose fallback
    pub fn is_general_purpose(&self) -> bool {
        let name = self.name.to_lowercase();
        ["assistant", "general", "helper"]
            .iter()
            .any(|marker| name.contains(marker))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A unit of work to match against roles
#[derive(Debug, Clone, Default)]
pub struct Task {
    /// Free-text description
    pub description: String,
    /// Keywords, derived from the description unless set explicitly
    pub keywords: Vec<String>,
    /// Arbitrary caller context
    pub context: HashMap<String, String>,
}

impl Task {
    /// Create a task, deriving keywords from the description
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        let keywords = extract_keywords(&description);
        Self {
            description,
            keywords,
            context: HashMap::new(),
        }
    }

    /// Replace the derived keywords
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
        self
    }

    /// Add a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Split text into lowercase alphanumeric words
pub(crate) fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Derive keywords from free text
///
/// Lowercase words longer than two characters, stop words removed,
/// de-duplicated in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(text)
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
