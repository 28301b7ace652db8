//! Correction documents and matching inputs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How bad repeating the mistake would be
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    #[default]
    Moderate,
    Critical,
}

impl Severity {
    /// Get the short name for this severity
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" | "low" => Ok(Severity::Minor),
            "moderate" | "medium" => Ok(Severity::Moderate),
            "critical" | "high" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Where a correction applies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorrectionContext {
    /// Path fragments of files the mistake involved
    pub file_patterns: Vec<String>,
    /// Technologies involved
    pub tech_stack: Vec<String>,
    /// Words in a task description that should trigger the warning
    pub trigger_keywords: Vec<String>,
    /// Workflow phases (role names) the mistake happened in
    pub phases: Vec<String>,
}

/// A remembered mistake and its fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub id: String,
    pub wrong_behavior: String,
    pub correct_behavior: String,
    #[serde(default)]
    pub context: CorrectionContext,
    #[serde(default)]
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    /// Times this correction produced a warning
    #[serde(default)]
    pub warn_count: u32,
    /// Workflows this correction came from (references only)
    #[serde(default)]
    pub workflow_ids: Vec<String>,
    /// Keywords derived from the behavior text and tech stack
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial correction accepted by
/// [`CorrectionStore::record`](super::CorrectionStore::record); missing
/// fields get defaults
#[derive(Debug, Clone, Default)]
pub struct NewCorrection {
    pub wrong_behavior: String,
    pub correct_behavior: String,
    pub context: CorrectionContext,
    pub severity: Option<Severity>,
    pub workflow_ids: Vec<String>,
}

impl NewCorrection {
    /// Start a correction from the wrong and correct behavior
    pub fn new(wrong_behavior: impl Into<String>, correct_behavior: impl Into<String>) -> Self {
        Self {
            wrong_behavior: wrong_behavior.into(),
            correct_behavior: correct_behavior.into(),
            ..Default::default()
        }
    }

    /// Set trigger keywords
    pub fn with_trigger_keywords(mut self, keywords: &[&str]) -> Self {
        self.context.trigger_keywords = to_strings(keywords);
        self
    }

    /// Set file patterns
    pub fn with_file_patterns(mut self, patterns: &[&str]) -> Self {
        self.context.file_patterns = to_strings(patterns);
        self
    }

    /// Set tech stack
    pub fn with_tech_stack(mut self, tech: &[&str]) -> Self {
        self.context.tech_stack = to_strings(tech);
        self
    }

    /// Set phases
    pub fn with_phases(mut self, phases: &[&str]) -> Self {
        self.context.phases = to_strings(phases);
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Link the workflow the correction came from
    pub fn with_workflow(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_ids.push(workflow_id.into());
        self
    }
}

/// What a caller is about to do, matched against stored corrections
#[derive(Debug, Clone, Default)]
pub struct WarningContext {
    pub task_description: String,
    pub files: Vec<String>,
    pub tech_stack: Vec<String>,
    pub phase: Option<String>,
}

impl WarningContext {
    /// Context for a task description
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            ..Default::default()
        }
    }

    /// Set the files about to be touched
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files = to_strings(files);
        self
    }

    /// Set the technologies in use
    pub fn with_tech_stack(mut self, tech: &[&str]) -> Self {
        self.tech_stack = to_strings(tech);
        self
    }

    /// Set the current phase
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }
}

/// A correction that matched a context
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionWarning {
    /// The matched correction, with its updated warn count
    pub correction: Correction,
    /// Match score clamped to `1.0`
    pub confidence: f64,
    /// Which signals matched
    pub reason: String,
}

/// Summary index for listing corrections without loading every document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionIndex {
    pub version: u32,
    pub last_updated: DateTime<Utc>,
    pub total_corrections: usize,
    pub corrections: Vec<IndexEntry>,
}

impl Default for CorrectionIndex {
    fn default() -> Self {
        Self {
            version: 1,
            last_updated: Utc::now(),
            total_corrections: 0,
            corrections: Vec::new(),
        }
    }
}

/// One line of the correction index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    /// First 100 characters of the wrong behavior
    pub wrong_behavior: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl IndexEntry {
    /// Maximum characters of wrong-behavior text kept in the index
    pub const PREVIEW_CHARS: usize = 100;

    /// Index entry for a correction
    pub fn for_correction(correction: &Correction) -> Self {
        Self {
            id: correction.id.clone(),
            wrong_behavior: correction
                .wrong_behavior
                .chars()
                .take(Self::PREVIEW_CHARS)
                .collect(),
            severity: correction.severity,
            created_at: correction.created_at,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Minor);
        assert_eq!(Severity::default(), Severity::Moderate);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("low".parse::<Severity>().unwrap(), Severity::Minor);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_index_entry_truncates() {
        let correction = Correction {
            id: "c-1".to_string(),
            wrong_behavior: "é".repeat(150),
            correct_behavior: String::new(),
            context: CorrectionContext::default(),
            severity: Severity::Minor,
            created_at: Utc::now(),
            warn_count: 0,
            workflow_ids: Vec::new(),
            tags: Vec::new(),
        };
        let entry = IndexEntry::for_correction(&correction);
        assert_eq!(entry.wrong_behavior.chars().count(), 100);
    }

    #[test]
    fn test_partial_document_defaults() {
        let json = r#"{
            "id": "c-1",
            "wrongBehavior": "used var",
            "correctBehavior": "use let",
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let correction: Correction = serde_json::from_str(json).unwrap();
        assert_eq!(correction.severity, Severity::Moderate);
        assert_eq!(correction.warn_count, 0);
        assert!(correction.context.trigger_keywords.is_empty());
    }
}
