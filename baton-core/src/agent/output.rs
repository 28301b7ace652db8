//! Parsing of role executor output

use crate::workflow::RoleOutput;

/// Line prefix that marks a deliverable in agent output
pub const DELIVERABLE_PREFIX: &str = "DELIVERABLE:";

/// Split agent stdout into the full text and its declared deliverables
///
/// Every line starting with `DELIVERABLE:` (after leading whitespace or a
/// markdown bullet) contributes one deliverable. The output text is kept
/// whole, deliverable lines included.
pub fn parse_role_output(stdout: &str) -> RoleOutput {
    let mut deliverables: Vec<String> = Vec::new();

    for line in stdout.lines() {
        let line = line.trim_start().trim_start_matches(['-', '*']).trim_start();
        if let Some(rest) = line.strip_prefix(DELIVERABLE_PREFIX) {
            let item = rest.trim().trim_matches('`');
            if !item.is_empty() && !deliverables.iter().any(|d| d == item) {
                deliverables.push(item.to_string());
            }
        }
    }

    RoleOutput {
        output: stdout.trim_end().to_string(),
        deliverables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deliverables() {
        let stdout = "Wrote the design.\n\nDELIVERABLE: docs/design.md\n  - DELIVERABLE: `src/auth.rs`\nDELIVERABLE:\nDELIVERABLE: docs/design.md\n";
        let output = parse_role_output(stdout);
        assert_eq!(output.deliverables, vec!["docs/design.md", "src/auth.rs"]);
        assert!(output.output.starts_with("Wrote the design."));
        assert!(!output.output.ends_with('\n'));
    }

    #[test]
    fn test_no_deliverables() {
        let output = parse_role_output("nothing to report");
        assert!(output.deliverables.is_empty());
        assert_eq!(output.output, "nothing to report");
    }

    #[test]
    fn test_prefix_must_start_line() {
        let output = parse_role_output("see DELIVERABLE: not-this-one");
        assert!(output.deliverables.is_empty());
    }
}
