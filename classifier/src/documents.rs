//! Submission document plan.
//!
//! Maps a classification onto the set of templates a document generator
//! should produce. Rendering is out of scope here; this only selects.

use serde::{Deserialize, Serialize};

use crate::result::{ReviewResult, ReviewType};
use crate::snapshot::ProtocolSnapshot;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    NotHumanSubjectsDetermination,
    ExemptProtocolSummary,
    ExemptInformationSheet,
    ProtocolNarrative,
    ConsentForm,
    ConsentInformationSheet,
    ConsentWaiverRequest,
    DocumentationWaiverRequest,
    ParentalPermissionForm,
    ChildAssentForm,
    DebriefingScript,
    RecruitmentMaterials,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotHumanSubjectsDetermination => "Not Human Subjects determination request",
            Self::ExemptProtocolSummary => "Exempt protocol summary",
            Self::ExemptInformationSheet => "Exempt research information sheet",
            Self::ProtocolNarrative => "Protocol narrative",
            Self::ConsentForm => "Informed consent form",
            Self::ConsentInformationSheet => "Consent information sheet",
            Self::ConsentWaiverRequest => "Waiver of informed consent request",
            Self::DocumentationWaiverRequest => "Waiver of documentation of consent request",
            Self::ParentalPermissionForm => "Parental permission form",
            Self::ChildAssentForm => "Child assent form",
            Self::DebriefingScript => "Debriefing script",
            Self::RecruitmentMaterials => "Recruitment materials",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Select the documents to generate for a classified protocol.
///
/// Order is deterministic and no kind appears twice.
pub fn plan_documents(snapshot: &ProtocolSnapshot, result: &ReviewResult) -> Vec<DocumentKind> {
    let consent = &snapshot.consent;
    let mut plan = Vec::new();

    match result.review_type {
        ReviewType::InsufficientInfo => return plan,
        ReviewType::NotResearch | ReviewType::NotHumanSubjects => {
            plan.push(DocumentKind::NotHumanSubjectsDetermination);
            return plan;
        }
        ReviewType::Exempt => {
            plan.push(DocumentKind::ExemptProtocolSummary);
            if !consent.waiver_of_consent {
                plan.push(DocumentKind::ExemptInformationSheet);
            }
        }
        ReviewType::Expedited | ReviewType::FullBoard => {
            plan.push(DocumentKind::ProtocolNarrative);
            if consent.waiver_of_consent {
                plan.push(DocumentKind::ConsentWaiverRequest);
            } else if consent.waiver_of_documentation {
                plan.push(DocumentKind::ConsentInformationSheet);
                plan.push(DocumentKind::DocumentationWaiverRequest);
            } else {
                plan.push(DocumentKind::ConsentForm);
            }
        }
    }

    if snapshot.subjects.includes_minors {
        plan.push(DocumentKind::ParentalPermissionForm);
        plan.push(DocumentKind::ChildAssentForm);
    }
    if snapshot.procedures.involves_deception {
        plan.push(DocumentKind::DebriefingScript);
    }
    if snapshot
        .subjects
        .recruitment_method
        .iter()
        .any(|method| !method.trim().is_empty())
    {
        plan.push(DocumentKind::RecruitmentMaterials);
    }

    tracing::debug!(
        review_type = ?result.review_type,
        documents = plan.len(),
        "Document plan built"
    );
    plan
}
