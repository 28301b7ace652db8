//! Completion artifacts
//!
//! Markdown rendered from a finished workflow's handoff data. Formatting
//! only; nothing here feeds back into workflow state.

use super::state::{ExecutionStatus, WorkflowState};

/// Cumulative handoff summary across every role that ran
pub fn render_handoff_summary(state: &WorkflowState) -> String {
    let handoff = &state.handoff_data;
    let mut out = String::new();

    out.push_str(&format!("# Handoff: {}\n", title(state)));
    out.push('\n');
    out.push_str(&format!("- **Workflow:** {}\n", state.id));
    if let Some(issue) = &state.issue_id {
        out.push_str(&format!("- **Issue:** {}\n", issue));
    }
    out.push_str(&format!("- **Status:** {}\n", state.status));
    out.push_str(&format!("- **Final role:** {}\n", handoff.current_role));
    if let Some(done) = state.completed_at {
        out.push_str(&format!("- **Completed:** {}\n", done.to_rfc3339()));
    }
    out.push('\n');

    if let Some(description) = &state.description {
        out.push_str(&format!("## Description\n\n{}\n\n", description));
    }

    out.push_str("## Roles\n\n");
    for execution in &state.executions {
        let marker = match execution.status {
            ExecutionStatus::Completed => "x",
            _ => " ",
        };
        out.push_str(&format!(
            "- [{}] {} ({})\n",
            marker, execution.role_id, execution.status
        ));
        if let Some(error) = &execution.error {
            out.push_str(&format!("  - error: {}\n", error));
        }
    }
    out.push('\n');

    push_list(&mut out, "Completed Tasks", &handoff.completed_tasks);
    push_list(&mut out, "Pending Tasks", &handoff.pending_tasks);
    push_list(&mut out, "Deliverables", &handoff.deliverables);
    push_list(&mut out, "Next Steps", &handoff.next_steps);

    if !handoff.context.is_empty() {
        out.push_str("## Context\n\n");
        for (key, value) in &handoff.context {
            out.push_str(&format!("- **{}:** {}\n", key, first_line(value)));
        }
        out.push('\n');
    }

    if let Some(notes) = &handoff.notes {
        out.push_str(&format!("## Notes\n\n{}\n", notes));
    }

    out
}

/// Pull-request style summary of what the workflow delivered
pub fn render_pr_summary(state: &WorkflowState) -> String {
    let handoff = &state.handoff_data;
    let mut out = String::new();

    out.push_str(&format!("# {}\n", title(state)));
    out.push('\n');

    out.push_str("## Summary\n\n");
    match &state.description {
        Some(description) if !description.trim().is_empty() => {
            out.push_str(&format!("{}\n\n", description));
        }
        _ => out.push_str("No description provided.\n\n"),
    }

    out.push_str("## Changes\n\n");
    if handoff.deliverables.is_empty() {
        out.push_str("- No deliverables recorded\n");
    } else {
        for deliverable in &handoff.deliverables {
            out.push_str(&format!("- {}\n", deliverable));
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "## Roles\n\n{}\n\n",
        handoff.completed_tasks.join(" -> ")
    ));

    if let Some(issue) = &state.issue_id {
        out.push_str(&format!("Closes {}\n", issue));
    }

    out
}

fn title(state: &WorkflowState) -> &str {
    state.title.as_deref().unwrap_or(&state.id)
}

fn first_line(value: &str) -> &str {
    value.lines().next().unwrap_or("")
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("## {}\n\n", heading));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::state::{WorkflowExecution, WorkflowStatus};

    fn finished() -> WorkflowState {
        let mut state = WorkflowState::new(
            Some("Add auth".to_string()),
            Some("Session based login".to_string()),
            Some("#42".to_string()),
            "analysis",
        );
        let mut exec = WorkflowExecution::start("analysis");
        exec.complete("ok".to_string(), vec!["notes.md".to_string()])
            .unwrap();
        state.executions.push(exec);
        state.handoff_data.completed_tasks = vec!["analysis".to_string()];
        state.handoff_data.deliverables = vec!["notes.md".to_string()];
        state
            .handoff_data
            .context
            .insert("analysis.output".to_string(), "line one\nline two".to_string());
        state.transition_to(WorkflowStatus::InProgress).unwrap();
        state.transition_to(WorkflowStatus::Completed).unwrap();
        state
    }

    #[test]
    fn test_handoff_summary() {
        let text = render_handoff_summary(&finished());
        assert!(text.starts_with("# Handoff: Add auth"));
        assert!(text.contains("- **Issue:** #42"));
        assert!(text.contains("- [x] analysis (completed)"));
        assert!(text.contains("## Deliverables\n\n- notes.md"));
        assert!(text.contains("- **analysis.output:** line one\n"));
        assert!(!text.contains("## Pending Tasks"));
    }

    #[test]
    fn test_pr_summary() {
        let text = render_pr_summary(&finished());
        assert!(text.starts_with("# Add auth"));
        assert!(text.contains("Session based login"));
        assert!(text.contains("- notes.md"));
        assert!(text.ends_with("Closes #42\n"));
    }

    #[test]
    fn test_pr_summary_without_deliverables() {
        let state = WorkflowState::new(None, None, None, "analysis");
        let text = render_pr_summary(&state);
        assert!(text.starts_with(&format!("# {}", state.id)));
        assert!(text.contains("No deliverables recorded"));
    }
}
