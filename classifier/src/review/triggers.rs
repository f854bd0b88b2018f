//! Full-board hard triggers.
//!
//! These conditions are not waivable: when any of them holds, no exempt or
//! expedited category is considered.

use serde::Serialize;

use crate::result::{Flag, ReviewResult, ReviewType};
use crate::snapshot::ProtocolSnapshot;

use super::confidence;

/// Every hard trigger that fired, in evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TriggerReport {
    pub triggered: bool,
    pub reasons: Vec<String>,
    pub flags: Vec<Flag>,
}

impl TriggerReport {
    fn push(&mut self, reason: &str, flag: &str) {
        self.triggered = true;
        self.reasons.push(reason.to_string());
        self.flags.push(Flag::high(flag));
    }

    pub(crate) fn into_result(self) -> ReviewResult {
        let mut result = ReviewResult::uncategorized(
            ReviewType::FullBoard,
            confidence::HARD_TRIGGER,
            self.reasons,
        );
        result.flags = self.flags;
        result
    }
}

/// Evaluate all hard triggers. Triggers are independent; every one that
/// fires contributes its reason and flag.
pub fn check_full_board_triggers(snapshot: &ProtocolSnapshot) -> TriggerReport {
    let mut report = TriggerReport::default();

    if snapshot.subjects.includes_prisoners {
        report.push(
            "Research involving prisoners requires Full Board review \
             (45 CFR 46 Subpart C, 46.305-46.306).",
            "Prisoner research cannot be exempted or expedited; the IRB must include a \
             prisoner representative.",
        );
    }

    if snapshot.risks.is_greater_than_minimal() {
        report.push(
            "Research involving greater than minimal risk requires Full Board review \
             (45 CFR 46.102(j), 46.108(b)).",
            "Greater than minimal risk was selected; Full Board review is required regardless \
             of other answers.",
        );
    }

    if snapshot.procedures.involves_deception && snapshot.procedures.deception_debriefing.is_no()
    {
        report.push(
            "Deception without a debriefing plan requires Full Board review \
             (45 CFR 46.116(f)(3)(v)).",
            "Deception is planned without debriefing; add a debriefing plan or expect Full \
             Board review.",
        );
    }

    report
}
