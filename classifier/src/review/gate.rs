//! Applicability gate: prerequisite answers, research, human subjects.

use crate::result::{ReviewResult, ReviewType};
use crate::snapshot::ProtocolSnapshot;

use super::confidence;

/// Short-circuit the review when the activity cannot be classified yet or
/// falls outside the Common Rule. `None` means classification continues.
///
/// Research-ness is decided strictly before human-subjects-ness.
pub fn evaluate(snapshot: &ProtocolSnapshot) -> Option<ReviewResult> {
    let prescreening = &snapshot.prescreening;

    if !prescreening.is_research.is_answered()
        || !prescreening.involves_human_subjects.is_answered()
    {
        return Some(ReviewResult::uncategorized(
            ReviewType::InsufficientInfo,
            confidence::INSUFFICIENT_INFO,
            vec![
                "Answer the prescreening questions (is this activity research, and does it \
                 involve human subjects?) before a review level can be determined."
                    .to_string(),
            ],
        ));
    }

    if prescreening.is_research.is_no() {
        return Some(ReviewResult::uncategorized(
            ReviewType::NotResearch,
            confidence::NOT_RESEARCH,
            vec![
                "The activity is not a systematic investigation designed to contribute to \
                 generalizable knowledge (45 CFR 46.102(l))."
                    .to_string(),
                "IRB review is not required, but confirm this determination with your IRB office."
                    .to_string(),
            ],
        ));
    }

    if prescreening.involves_human_subjects.is_no() {
        return Some(ReviewResult::uncategorized(
            ReviewType::NotHumanSubjects,
            confidence::NOT_HUMAN_SUBJECTS,
            vec![
                "The research does not obtain information or biospecimens through interaction \
                 or intervention with living individuals, nor identifiable private information \
                 (45 CFR 46.102(e))."
                    .to_string(),
                "IRB review is not required, but confirm this determination with your IRB office."
                    .to_string(),
            ],
        ));
    }

    None
}
