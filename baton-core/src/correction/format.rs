//! Markdown rendering of correction warnings

use super::types::{CorrectionWarning, Severity};

/// Render warnings as a markdown block to prepend to a role's context
///
/// Returns an empty string when there are no warnings.
pub fn format_warnings_as_context(warnings: &[CorrectionWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("## Past Corrections\n\n");
    out.push_str("These mistakes were corrected before. Do not repeat them.\n\n");

    for (i, warning) in warnings.iter().enumerate() {
        let correction = &warning.correction;
        let marker = match correction.severity {
            Severity::Critical => "CRITICAL",
            Severity::Moderate => "MODERATE",
            Severity::Minor => "MINOR",
        };
        out.push_str(&format!(
            "### {}. [{}] {}\n",
            i + 1,
            marker,
            correction.wrong_behavior
        ));
        out.push_str(&format!("- **Wrong:** {}\n", correction.wrong_behavior));
        out.push_str(&format!("- **Correct:** {}\n", correction.correct_behavior));
        out.push_str(&format!(
            "- **Matched on:** {} (confidence {:.0}%)\n",
            warning.reason,
            warning.confidence * 100.0
        ));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::types::{Correction, CorrectionContext};
    use chrono::Utc;

    fn warning(severity: Severity) -> CorrectionWarning {
        CorrectionWarning {
            correction: Correction {
                id: "c-1".to_string(),
                wrong_behavior: "used lodash for deep clone".to_string(),
                correct_behavior: "use structuredClone".to_string(),
                context: CorrectionContext::default(),
                severity,
                created_at: Utc::now(),
                warn_count: 1,
                workflow_ids: Vec::new(),
                tags: Vec::new(),
            },
            confidence: 0.6,
            reason: "keywords: lodash, clone".to_string(),
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_warnings_as_context(&[]), "");
    }

    #[test]
    fn test_renders_each_warning() {
        let text = format_warnings_as_context(&[warning(Severity::Critical), warning(Severity::Minor)]);
        assert!(text.starts_with("## Past Corrections"));
        assert!(text.contains("### 1. [CRITICAL] used lodash for deep clone"));
        assert!(text.contains("### 2. [MINOR]"));
        assert!(text.contains("- **Correct:** use structuredClone"));
        assert!(text.contains("keywords: lodash, clone (confidence 60%)"));
    }
}
