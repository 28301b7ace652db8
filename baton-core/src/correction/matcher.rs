//! Correction matching heuristic
//!
//! A cheap, explainable score built from independent additive signals. Scores
//! are kept in integer hundredths ("points") so the acceptance threshold is
//! compared exactly.
//!
//! | signal                                              | points |
//! |-----------------------------------------------------|--------|
//! | each trigger keyword found in the task description  | 30     |
//! | each (file, pattern) pair where one contains the other | 20  |
//! | each shared tech-stack term                         | 15     |
//! | context phase among the correction's phases         | 15     |
//! | each tag appearing as a word or token in the description | 10  |
//! | more than two long words shared with wrong behavior | 25     |

use std::collections::HashSet;

use super::types::{Correction, WarningContext};
use crate::role::words;

const KEYWORD_POINTS: u32 = 30;
const FILE_POINTS: u32 = 20;
const TECH_POINTS: u32 = 15;
const PHASE_POINTS: u32 = 15;
const TAG_POINTS: u32 = 10;
const OVERLAP_POINTS: u32 = 25;

/// Minimum raw score for a correction to produce a warning
pub const MATCH_THRESHOLD: f64 = 0.25;
const THRESHOLD_POINTS: u32 = 25;

/// Minimum length of words compared between wrong behavior and task
const OVERLAP_MIN_CHARS: usize = 4;
/// Shared long words needed for the overlap bonus
const OVERLAP_MIN_WORDS: usize = 3;

/// Whether a raw score clears the acceptance threshold
pub fn is_accepted(raw_score: f64) -> bool {
    raw_score >= MATCH_THRESHOLD
}

/// Result of scoring one correction against a context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Raw score in hundredths
    pub points: u32,
    /// Which signals fired
    pub reasons: Vec<String>,
}

impl MatchScore {
    /// Unclamped score
    pub fn raw(&self) -> f64 {
        f64::from(self.points) / 100.0
    }

    /// Score clamped to `1.0`
    pub fn confidence(&self) -> f64 {
        self.raw().min(1.0)
    }

    /// Whether the score clears the threshold
    pub fn is_match(&self) -> bool {
        self.points >= THRESHOLD_POINTS
    }

    /// Signals joined for display
    pub fn reason(&self) -> String {
        self.reasons.join("; ")
    }
}

/// Punctuation stripped from whitespace tokens so `next.js,` matches `next.js`
fn is_edge_punctuation(c: char) -> bool {
    matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '(' | ')' | '"' | '\'')
}

/// Score a correction against a context
pub fn score_correction(correction: &Correction, context: &WarningContext) -> MatchScore {
    let mut score = MatchScore::default();
    let description = context.task_description.to_lowercase();
    let description_words: HashSet<String> = words(&context.task_description).collect();
    let description_tokens: HashSet<&str> = description
        .split_whitespace()
        .map(|t| t.trim_matches(is_edge_punctuation))
        .filter(|t| !t.is_empty())
        .collect();

    let keywords: Vec<&str> = correction
        .context
        .trigger_keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| !kw.trim().is_empty() && description.contains(&kw.to_lowercase()))
        .collect();
    if !keywords.is_empty() {
        score.points += KEYWORD_POINTS * keywords.len() as u32;
        score.reasons.push(format!("keywords: {}", keywords.join(", ")));
    }

    let mut files = Vec::new();
    for file in &context.files {
        let file_lower = file.to_lowercase();
        for pattern in &correction.context.file_patterns {
            let pattern_lower = pattern.to_lowercase();
            if pattern_lower.is_empty() || file_lower.is_empty() {
                continue;
            }
            if file_lower.contains(&pattern_lower) || pattern_lower.contains(&file_lower) {
                score.points += FILE_POINTS;
                files.push(file.as_str());
            }
        }
    }
    if !files.is_empty() {
        files.dedup();
        score.reasons.push(format!("files: {}", files.join(", ")));
    }

    let mut seen_tech = HashSet::new();
    let tech: Vec<&str> = context
        .tech_stack
        .iter()
        .map(String::as_str)
        .filter(|t| seen_tech.insert(t.to_lowercase()))
        .filter(|t| {
            correction
                .context
                .tech_stack
                .iter()
                .any(|c| c.eq_ignore_ascii_case(t))
        })
        .collect();
    if !tech.is_empty() {
        score.points += TECH_POINTS * tech.len() as u32;
        score.reasons.push(format!("tech stack: {}", tech.join(", ")));
    }

    if let Some(phase) = &context.phase {
        if correction
            .context
            .phases
            .iter()
            .any(|p| p.eq_ignore_ascii_case(phase))
        {
            score.points += PHASE_POINTS;
            score.reasons.push(format!("phase: {}", phase));
        }
    }

    let tags: Vec<&str> = correction
        .tags
        .iter()
        .map(String::as_str)
        .filter(|tag| {
            let tag = tag.to_lowercase();
            description_words.contains(&tag) || description_tokens.contains(tag.as_str())
        })
        .collect();
    if !tags.is_empty() {
        score.points += TAG_POINTS * tags.len() as u32;
        score.reasons.push(format!("tags: {}", tags.join(", ")));
    }

    let wrong_words: HashSet<String> = words(&correction.wrong_behavior)
        .filter(|w| w.chars().count() >= OVERLAP_MIN_CHARS)
        .collect();
    let shared = wrong_words
        .iter()
        .filter(|w| description_words.contains(*w))
        .count();
    if shared >= OVERLAP_MIN_WORDS {
        score.points += OVERLAP_POINTS;
        score
            .reasons
            .push(format!("similar wording ({} shared words)", shared));
    }

    score
}
