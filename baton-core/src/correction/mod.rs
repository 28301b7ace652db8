//! Remembered corrections
//!
//! Records "wrong behavior -> correct behavior" pairs and warns when a new
//! task looks like it is about to repeat one.

mod format;
mod matcher;
mod store;
mod tags;
mod types;

pub use format::format_warnings_as_context;
pub use matcher::{is_accepted, score_correction, MatchScore, MATCH_THRESHOLD};
pub use store::CorrectionStore;
pub use tags::derive_tags;
pub use types::{
    Correction, CorrectionContext, CorrectionIndex, CorrectionWarning, IndexEntry, NewCorrection,
    Severity, WarningContext,
};
