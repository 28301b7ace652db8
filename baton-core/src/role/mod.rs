//! Roles and role selection
//!
//! A catalog of capability profiles and the scorer that picks which role
//! should handle a described task.

mod catalog;
mod selection;
mod types;

pub use catalog::{RoleCatalog, FALLBACK_ROLE_NAME};
pub use selection::{jaccard_similarity, score_role, RoleRecommendation, RoleScore, RoleSelector};
pub use types::{extract_keywords, Role, Task};

pub(crate) use types::words;
