//! IRB review-level pre-screening
//!
//! Deterministic classification of a human-subjects research protocol
//! against the US Common Rule (45 CFR 46): Exempt, Expedited, or Full Board
//! review, with citations, a heuristic confidence, advisory flags, and
//! recommendations.
//!
//! The classifier is a pure function over a [`ProtocolSnapshot`]. It never
//! performs I/O, never mutates its input, and always produces exactly one
//! [`ReviewResult`]. Every result is advisory; see [`ADVISORY_DISCLAIMER`].
//!
//! ```
//! use irb_classifier::{ProtocolSnapshot, ReviewType, TriState, classify_review};
//!
//! let mut snapshot = ProtocolSnapshot::default();
//! snapshot.prescreening.is_research = TriState::No;
//! snapshot.prescreening.involves_human_subjects = TriState::Yes;
//!
//! let result = classify_review(&snapshot);
//! assert_eq!(result.review_type, ReviewType::NotResearch);
//! ```

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod documents;
pub mod error;
pub mod recommendations;
pub mod result;
pub mod review;
pub mod snapshot;

pub use documents::{DocumentKind, plan_documents};
pub use error::{Result, ScreenError};
pub use recommendations::generate_recommendations;
pub use result::{
    ADVISORY_DISCLAIMER, Flag, Priority, Recommendation, RecommendationKind, ReviewResult,
    ReviewType, Severity,
};
pub use review::{
    CategoryMatch, TriggerReport, check_exempt_categories, check_expedited_categories,
    check_full_board_triggers, classify_review,
};
pub use snapshot::{
    ConsentSection, DataSection, IdentifierType, MethodType, Prescreening, ProceduresSection,
    ProtocolSnapshot, RiskLevel, RisksSection, SubjectsSection, TriState, load_snapshot,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
