//! Tag derivation for corrections

use std::collections::HashSet;

use crate::role::words;

/// Technology terms recognised in correction text
const TECH_VOCABULARY: &[&str] = &[
    "react", "vue", "angular", "svelte", "nextjs", "nuxt", "typescript", "javascript", "node",
    "deno", "bun", "express", "python", "django", "flask", "fastapi", "rust", "cargo", "tokio",
    "serde", "java", "kotlin", "spring", "swift", "ruby", "rails", "php", "laravel", "golang",
    "lodash", "jquery", "webpack", "vite", "babel", "eslint", "prettier", "jest", "vitest",
    "pytest", "mocha", "cypress", "playwright", "docker", "kubernetes", "terraform", "aws",
    "gcp", "azure", "postgres", "postgresql", "mysql", "sqlite", "mongodb", "redis", "graphql",
    "grpc", "rest", "sql", "prisma", "tailwind", "css", "html", "json", "yaml", "git", "npm",
    "yarn", "pnpm",
];

/// Derive tags from correction text and declared tech stack
///
/// Vocabulary terms found in the wrong or correct behavior, followed by the
/// declared tech stack, lowercased and de-duplicated in first-seen order.
pub fn derive_tags(wrong_behavior: &str, correct_behavior: &str, tech_stack: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    let text_terms = words(wrong_behavior)
        .chain(words(correct_behavior))
        .filter(|w| TECH_VOCABULARY.contains(&w.as_str()));
    let declared = tech_stack
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    for tag in text_terms.chain(declared) {
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_terms() {
        let tags = derive_tags(
            "used lodash for deep clone in React",
            "use structuredClone, no lodash",
            &[],
        );
        assert_eq!(tags, vec!["lodash", "react"]);
    }

    #[test]
    fn test_declared_stack_appended() {
        let tags = derive_tags(
            "queried postgres in a loop",
            "batch the query",
            &["Postgres".to_string(), "Diesel ".to_string(), "".to_string()],
        );
        assert_eq!(tags, vec!["postgres", "diesel"]);
    }

    #[test]
    fn test_no_tags() {
        assert!(derive_tags("forgot the semicolon", "add it", &[]).is_empty());
    }
}
