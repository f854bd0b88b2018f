//! Rules-based review classifier.
//!
//! Stages run in strict precedence order and the first stage to produce a
//! determination wins:
//!
//! 1. Applicability gate ([`gate`])
//! 2. Full-board hard triggers ([`triggers`])
//! 3. Exempt categories ([`exempt`])
//! 4. Expedited categories ([`expedited`])
//! 5. Default Full Board
//!
//! Recommendations are attached afterwards to every result, gated ones
//! included, and never change the determination. No exempt or expedited
//! match can downgrade a hard-triggered Full Board result.

pub mod exempt;
pub mod expedited;
pub mod gate;
pub mod topics;
pub mod triggers;

use serde::Serialize;

use crate::recommendations::generate_recommendations;
use crate::result::{Flag, ReviewResult, ReviewType};
use crate::snapshot::ProtocolSnapshot;

pub use exempt::check_exempt_categories;
pub use expedited::check_expedited_categories;
pub use triggers::{TriggerReport, check_full_board_triggers};

/// Fixed calibration constants for non-category branches.
pub(crate) mod confidence {
    pub const INSUFFICIENT_INFO: f32 = 0.0;
    pub const NOT_RESEARCH: f32 = 0.9;
    pub const NOT_HUMAN_SUBJECTS: f32 = 0.85;
    pub const HARD_TRIGGER: f32 = 0.9;
    pub const DEFAULT_FULL_BOARD: f32 = 0.75;
}

/// A matched exempt or expedited category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryMatch {
    pub category: u8,
    pub label: &'static str,
    pub reasons: Vec<String>,
    pub confidence: f32,
    pub flags: Vec<Flag>,
}

impl CategoryMatch {
    pub(crate) fn into_result(self, review_type: ReviewType) -> ReviewResult {
        let mut result = ReviewResult::uncategorized(review_type, self.confidence, self.reasons);
        result.category = Some(self.category);
        result.category_label = Some(self.label.to_string());
        result.flags = self.flags;
        result
    }
}

/// Reasons and flags produced by a category builder.
pub(crate) struct Rationale {
    pub reasons: Vec<String>,
    pub flags: Vec<Flag>,
}

/// One entry of an ordered category list: a predicate and the builder for
/// its rationale. Rule order is load-bearing.
pub(crate) struct CategoryRule {
    pub category: u8,
    pub label: &'static str,
    pub confidence: f32,
    pub applies: fn(&ProtocolSnapshot) -> bool,
    pub rationale: fn(&ProtocolSnapshot) -> Rationale,
}

/// Evaluate `rules` in order and build the first one that applies.
pub(crate) fn first_match(
    rules: &[CategoryRule],
    snapshot: &ProtocolSnapshot,
) -> Option<CategoryMatch> {
    let rule = rules.iter().find(|rule| (rule.applies)(snapshot))?;
    let Rationale { reasons, flags } = (rule.rationale)(snapshot);
    Some(CategoryMatch {
        category: rule.category,
        label: rule.label,
        reasons,
        confidence: rule.confidence,
        flags,
    })
}

/// Classify a protocol snapshot into exactly one review level.
///
/// Pure and total: never panics, never mutates the snapshot, and returns
/// identical results for identical input.
pub fn classify_review(snapshot: &ProtocolSnapshot) -> ReviewResult {
    let mut result = determine(snapshot);
    result.recommendations = generate_recommendations(snapshot, result.review_type);

    tracing::debug!(
        review_type = ?result.review_type,
        category = ?result.category,
        confidence = result.confidence,
        flags = result.flags.len(),
        recommendations = result.recommendations.len(),
        "Protocol classified"
    );

    result
}

fn determine(snapshot: &ProtocolSnapshot) -> ReviewResult {
    if let Some(result) = gate::evaluate(snapshot) {
        return result;
    }

    let triggers = check_full_board_triggers(snapshot);
    if triggers.triggered {
        return triggers.into_result();
    }

    if let Some(matched) = check_exempt_categories(snapshot) {
        return matched.into_result(ReviewType::Exempt);
    }

    if let Some(matched) = check_expedited_categories(snapshot) {
        return matched.into_result(ReviewType::Expedited);
    }

    default_full_board()
}

fn default_full_board() -> ReviewResult {
    let mut result = ReviewResult::uncategorized(
        ReviewType::FullBoard,
        confidence::DEFAULT_FULL_BOARD,
        vec![
            "The protocol does not match any exempt (45 CFR 46.104(d)) or expedited \
             (45 CFR 46.110) category."
                .to_string(),
            "Full Board review is the default when no category applies (45 CFR 46.108(b))."
                .to_string(),
        ],
    );
    result.flags.push(Flag::medium(
        "No category matched; review your procedure, risk, and data answers in case one was \
         left incomplete.",
    ));
    result
}
