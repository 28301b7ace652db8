//! Role prompt template
//!
//! The template uses `{{VARIABLE}}` placeholders filled from a
//! [`PromptContext`]. Placeholders left unset render as "(not specified)".

use std::collections::HashMap;

use crate::workflow::RoleRequest;

/// Embedded prompt for every role
const ROLE_PROMPT: &str = include_str!("prompts/role.md");

/// Variable substitutions for a template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    variables: HashMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a markdown bullet list, or `empty` when there are no items
    pub fn with_list(self, key: impl Into<String>, items: &[String], empty: &str) -> Self {
        let value = if items.is_empty() {
            empty.to_string()
        } else {
            items
                .iter()
                .map(|item| format!("- {}", item))
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.with(key, value)
    }
}

/// Render the role prompt for an executor request
pub fn role_prompt(request: &RoleRequest) -> String {
    let workflow = &request.workflow;
    let handoff = &request.context.handoff;

    let context = PromptContext::new()
        .with("ROLE", &request.role_id)
        .with(
            "ROLE_DESCRIPTION",
            request
                .context
                .role
                .as_ref()
                .map(|r| r.description.clone())
                .unwrap_or_default(),
        )
        .with("TITLE", workflow.title.clone().unwrap_or_default())
        .with(
            "DESCRIPTION",
            workflow.description.clone().unwrap_or_default(),
        )
        .with(
            "PREVIOUS_ROLE",
            handoff.previous_role.as_deref().unwrap_or("(none, you are first)"),
        )
        .with_list("COMPLETED", &handoff.completed_tasks, "(none)")
        .with_list("DELIVERABLES", &handoff.deliverables, "(none)")
        .with_list("PENDING", &remaining_after(handoff, &request.role_id), "(none, you are last)")
        .with(
            "CORRECTIONS",
            request.context.corrections.clone().unwrap_or_default(),
        );

    render_template(ROLE_PROMPT, &context)
}

fn remaining_after(handoff: &crate::workflow::HandoffData, role: &str) -> Vec<String> {
    handoff
        .pending_tasks
        .iter()
        .filter(|task| !task.eq_ignore_ascii_case(role))
        .cloned()
        .collect()
}

/// Render a template string with variable substitution
fn render_template(template: &str, context: &PromptContext) -> String {
    let mut result = template.to_string();

    for (key, value) in &context.variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    // Replace remaining {{UPPERCASE_NAME}} placeholders
    loop {
        let start = result.find("{{");
        let end = result.find("}}");

        match (start, end) {
            (Some(s), Some(e)) if s < e => {
                let placeholder = &result[s..=e + 1];
                let inside = &result[s + 2..e];
                if inside.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                    result = result.replacen(placeholder, "(not specified)", 1);
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    result
}
