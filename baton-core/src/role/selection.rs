//! Role selection logic
//!
//! Scores every role of a catalog against a task and picks the best one.
//! The score is a fixed weighted sum:
//!
//! | signal                         | weight |
//! |--------------------------------|--------|
//! | keyword match ratio            | 0.40   |
//! | description Jaccard similarity | 0.25   |
//! | capability match ratio         | 0.20   |
//! | usage recency                  | 0.10   |
//! | normalized priority            | 0.05   |
//!
//! Usage recency penalizes roles that were already selected by this selector,
//! so repeated calls spread work across roles.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::catalog::RoleCatalog;
use super::types::{words, Role, Task};

const KEYWORD_WEIGHT: f64 = 0.40;
const SIMILARITY_WEIGHT: f64 = 0.25;
const CAPABILITY_WEIGHT: f64 = 0.20;
const RECENCY_WEIGHT: f64 = 0.10;
const PRIORITY_WEIGHT: f64 = 0.05;

/// Description similarity above which a role is a candidate on its own
const SIMILARITY_CANDIDATE_THRESHOLD: f64 = 0.3;

/// Number of recommendations returned
const MAX_RECOMMENDATIONS: usize = 3;

/// Per-signal breakdown of a role's score for a task
#[derive(Debug, Clone, PartialEq)]
pub struct RoleScore {
    /// The scored role
    pub role: Role,
    /// Task keywords overlapping a discovery keyword
    pub matched_keywords: Vec<String>,
    /// Task keywords overlapping a capability
    pub matched_capabilities: Vec<String>,
    /// Fraction of task keywords matching discovery keywords
    pub keyword_ratio: f64,
    /// Jaccard similarity of task and role descriptions
    pub similarity: f64,
    /// Fraction of task keywords matching capabilities
    pub capability_ratio: f64,
    /// `max(0, 1 - 0.1 * times selected)`
    pub recency: f64,
    /// Weighted total
    pub total: f64,
}

impl RoleScore {
    /// Whether the role passes candidate filtering
    pub fn is_candidate(&self) -> bool {
        !self.matched_keywords.is_empty()
            || self.similarity > SIMILARITY_CANDIDATE_THRESHOLD
            || !self.matched_capabilities.is_empty()
    }

    /// Human-readable explanation of the score
    pub fn reason(&self) -> String {
        let mut parts = Vec::new();
        if !self.matched_keywords.is_empty() {
            parts.push(format!("keywords: {}", self.matched_keywords.join(", ")));
        }
        if !self.matched_capabilities.is_empty() {
            parts.push(format!(
                "capabilities: {}",
                self.matched_capabilities.join(", ")
            ));
        }
        if self.similarity > 0.0 {
            parts.push(format!("description similarity {:.2}", self.similarity));
        }
        if parts.is_empty() {
            "no direct match".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// A ranked role suggestion for display
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRecommendation {
    /// Suggested role
    pub role: Role,
    /// Score clamped to `[0, 1]`
    pub confidence: f64,
    /// Why the role scored as it did
    pub reason: String,
}

/// Picks roles for tasks and remembers how often each role was picked
///
/// Usage history lives only in this instance and is never persisted.
#[derive(Debug, Default)]
pub struct RoleSelector {
    catalog: RoleCatalog,
    usage: Mutex<HashMap<String, u32>>,
}

impl RoleSelector {
    /// Create a selector over a catalog
    pub fn new(catalog: RoleCatalog) -> Self {
        Self {
            catalog,
            usage: Mutex::new(HashMap::new()),
        }
    }

    /// The current catalog
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Replace the catalog wholesale, keeping usage history
    pub fn reload(&mut self, catalog: RoleCatalog) {
        tracing::info!(roles = catalog.len(), "Role catalog reloaded");
        self.catalog = catalog;
    }

    /// How many times a role has been selected
    pub fn times_selected(&self, role_name: &str) -> u32 {
        self.usage().get(role_name).copied().unwrap_or(0)
    }

    /// Select the best role for a task
    ///
    /// Never fails: when no candidate scores above zero the catalog's
    /// fallback role is returned. The chosen role's usage count is
    /// incremented.
    pub fn select_optimal_role(&self, task: &Task) -> Role {
        let scores = self.score_candidates(task);

        let mut best: Option<&RoleScore> = None;
        for score in &scores {
            // strict comparison keeps the first listed role on ties
            if best.map_or(true, |b| score.total > b.total) {
                best = Some(score);
            }
        }

        let role = match best {
            Some(score) if score.total > 0.0 => {
                tracing::debug!(
                    role = %score.role.name,
                    score = score.total,
                    reason = %score.reason(),
                    "Selected role"
                );
                score.role.clone()
            }
            _ => {
                let fallback = self.catalog.fallback_role();
                tracing::debug!(role = %fallback.name, "No candidate role, using fallback");
                fallback
            }
        };

        *self.usage().entry(role.name.clone()).or_insert(0) += 1;
        role
    }

    /// Top three roles for a task with confidence and reason
    ///
    /// Uses the same scoring as [`select_optimal_role`](Self::select_optimal_role)
    /// but does not touch usage history.
    pub fn recommendations(&self, task: &Task) -> Vec<RoleRecommendation> {
        let mut scores = self.score_candidates(task);
        // stable sort keeps catalog order among equal scores
        scores.sort_by(|a, b| b.total.total_cmp(&a.total));

        scores
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|score| RoleRecommendation {
                confidence: score.total.clamp(0.0, 1.0),
                reason: score.reason(),
                role: score.role,
            })
            .collect()
    }

    /// Score every candidate role, in catalog order
    pub fn score_candidates(&self, task: &Task) -> Vec<RoleScore> {
        let usage = self.usage();
        self.catalog
            .iter()
            .map(|role| {
                let times = usage.get(&role.name).copied().unwrap_or(0);
                score_role(task, role, times)
            })
            .filter(RoleScore::is_candidate)
            .collect()
    }

    fn usage(&self) -> MutexGuard<'_, HashMap<String, u32>> {
        // the map holds plain counters, so a poisoned lock is still usable
        self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Score one role against a task
pub fn score_role(task: &Task, role: &Role, times_selected: u32) -> RoleScore {
    let matched_keywords = matching_keywords(&task.keywords, &role.discovery_keywords);
    let matched_capabilities = matching_keywords(&task.keywords, &role.capabilities);

    let keyword_ratio = ratio(matched_keywords.len(), task.keywords.len());
    let capability_ratio = ratio(matched_capabilities.len(), task.keywords.len());
    let similarity = jaccard_similarity(&task.description, &role.description);
    let recency = (1.0 - 0.1 * f64::from(times_selected)).max(0.0);

    let total = keyword_ratio * KEYWORD_WEIGHT
        + similarity * SIMILARITY_WEIGHT
        + capability_ratio * CAPABILITY_WEIGHT
        + recency * RECENCY_WEIGHT
        + role.normalized_priority() * PRIORITY_WEIGHT;

    RoleScore {
        role: role.clone(),
        matched_keywords,
        matched_capabilities,
        keyword_ratio,
        similarity,
        capability_ratio,
        recency,
        total,
    }
}

/// Jaccard similarity over the sets of words longer than two characters
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a = significant_words(a);
    let set_b = significant_words(b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    set_a.intersection(&set_b).count() as f64 / union as f64
}

fn significant_words(text: &str) -> HashSet<String> {
    words(text).filter(|w| w.chars().count() > 2).collect()
}

/// Task keywords that share a substring relation with any of `terms`
fn matching_keywords(task_keywords: &[String], terms: &[String]) -> Vec<String> {
    task_keywords
        .iter()
        .filter(|keyword| terms.iter().any(|term| overlaps(keyword, term)))
        .cloned()
        .collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}
