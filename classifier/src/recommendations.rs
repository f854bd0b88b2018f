//! Advisory recommendations attached after classification.
//!
//! Every rule is independent and all applicable rules fire. Emission order
//! is fixed so output is reproducible.

use crate::result::{Priority, Recommendation, RecommendationKind, ReviewType};
use crate::snapshot::ProtocolSnapshot;

fn recommendation(
    kind: RecommendationKind,
    priority: Priority,
    title: &str,
    body: &str,
) -> Recommendation {
    Recommendation {
        kind,
        priority,
        title: title.to_string(),
        body: body.to_string(),
    }
}

/// Build the advisory list for a classified protocol.
///
/// Never influences the determination itself.
pub fn generate_recommendations(
    snapshot: &ProtocolSnapshot,
    review_type: ReviewType,
) -> Vec<Recommendation> {
    use Priority::{High, Low, Medium};
    use RecommendationKind::{Compliance, Consistency, Expedite, Protection};

    let subjects = &snapshot.subjects;
    let procedures = &snapshot.procedures;
    let data = &snapshot.data;
    let full_board = review_type == ReviewType::FullBoard;

    let mut out = Vec::new();

    if full_board {
        out.push(recommendation(
            Expedite,
            High,
            "Consider de-identifying data",
            "Collecting data without direct identifiers (or coding it and destroying the key) \
             may qualify the study for Exempt Category 2 or Expedited review.",
        ));
        out.push(recommendation(
            Expedite,
            Medium,
            "Review exempt categories",
            "Check whether minor procedural changes, such as removing identifiers or limiting \
             the population to adults, would place the study in an exempt category \
             (45 CFR 46.104(d)).",
        ));
    }

    out.push(recommendation(
        Compliance,
        High,
        "Complete CITI training",
        "All study personnel must complete CITI human subjects training before the protocol \
         is submitted.",
    ));

    if subjects.includes_minors {
        out.push(recommendation(
            Protection,
            High,
            "Parental permission and child assent",
            "Research with minors requires parental permission and age-appropriate child \
             assent (45 CFR 46.408).",
        ));
    }

    if subjects.includes_prisoners {
        out.push(recommendation(
            Protection,
            High,
            "Prisoner representative",
            "The convened IRB must include a prisoner or prisoner representative, and \
             participation must not affect parole decisions (45 CFR 46.304-46.305).",
        ));
    }

    if subjects.includes_pregnant_women {
        out.push(recommendation(
            Protection,
            High,
            "Fetal risk disclosure",
            "Describe any risks to the fetus in the consent document and how they are \
             minimized (45 CFR 46.204).",
        ));
    }

    if subjects.includes_cognitively_impaired {
        out.push(recommendation(
            Protection,
            High,
            "Capacity assessment and legally authorized representative",
            "Describe how decision-making capacity is assessed and when consent is obtained \
             from a legally authorized representative, with assent from the participant.",
        ));
    }

    if subjects.includes_ub_students {
        out.push(recommendation(
            Protection,
            Medium,
            "Prevent coercion of UB students and employees",
            "State that participation is voluntary and will not affect grades, standing, or \
             employment, and avoid recruitment by instructors or supervisors of the \
             participants.",
        ));
    }

    if subjects.includes_economically_disadvantaged {
        out.push(recommendation(
            Protection,
            Medium,
            "Non-coercive compensation",
            "Keep compensation proportionate to time and inconvenience so that payment does \
             not unduly influence the decision to participate.",
        ));
    }

    if data.collects_identifiers && !data.data_encrypted {
        out.push(recommendation(
            Compliance,
            High,
            "Encrypt identifiable data",
            "Identifiable data must be encrypted at rest and in transit and stored on \
             university-approved systems.",
        ));
    }

    if subjects.total_participants > 0 {
        out.push(recommendation(
            Consistency,
            Low,
            "Keep participant counts consistent",
            "Use the same target enrollment figure in the protocol, consent documents, and \
             recruitment materials.",
        ));
    }

    if snapshot.consent.waiver_of_documentation {
        out.push(recommendation(
            Compliance,
            Medium,
            "Justify the waiver of documentation",
            "A waiver of signed consent requires that the signature would be the only record \
             linking the participant to the research and the principal risk is a breach of \
             confidentiality, or that the research is minimal risk and involves no procedures \
             requiring written consent outside research (45 CFR 46.117(c)).",
        ));
    }

    if procedures.involves_deception {
        out.push(recommendation(
            Compliance,
            High,
            "Deception requirements",
            "Studies using deception must justify why deception is necessary, provide a \
             debriefing that explains the true purpose, and give participants the option to \
             withdraw their data after debriefing.",
        ));
    }

    if procedures.involves_recording {
        out.push(recommendation(
            Protection,
            Medium,
            "Recording opt-out",
            "Explain in the consent document how recordings are used and stored, and offer a \
             way to participate without being recorded where possible.",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn citi_reminder_always_fires() {
        let out = generate_recommendations(&ProtocolSnapshot::default(), ReviewType::Exempt);
        assert_eq!(titles(&out), vec!["Complete CITI training"]);
        assert_eq!(out[0].kind, RecommendationKind::Compliance);
        assert_eq!(out[0].priority, Priority::High);
    }

    #[test]
    fn full_board_with_identifiers_suggests_deidentification_first() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.data.collects_identifiers = true;
        snapshot.data.data_encrypted = true;

        let out = generate_recommendations(&snapshot, ReviewType::FullBoard);
        assert_eq!(
            titles(&out),
            vec![
                "Consider de-identifying data",
                "Review exempt categories",
                "Complete CITI training",
            ]
        );
        assert!(out[..2].iter().all(|r| r.kind == RecommendationKind::Expedite));
    }

    #[test]
    fn full_board_without_identifiers_still_suggests_deidentification() {
        let out = generate_recommendations(&ProtocolSnapshot::default(), ReviewType::FullBoard);
        assert_eq!(
            titles(&out),
            vec![
                "Consider de-identifying data",
                "Review exempt categories",
                "Complete CITI training",
            ]
        );
        assert_eq!(out[0].priority, Priority::High);
        assert_eq!(out[1].priority, Priority::Medium);
    }

    #[test]
    fn deidentification_is_reserved_for_full_board() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.data.collects_identifiers = true;
        snapshot.data.data_encrypted = true;
        for review_type in [ReviewType::Exempt, ReviewType::Expedited, ReviewType::NotResearch] {
            let out = generate_recommendations(&snapshot, review_type);
            assert!(!titles(&out).contains(&"Consider de-identifying data"));
        }
    }

    #[test]
    fn vulnerable_population_recommendations_co_occur_in_order() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.subjects.includes_minors = true;
        snapshot.subjects.includes_prisoners = true;
        snapshot.subjects.includes_pregnant_women = true;
        snapshot.subjects.includes_cognitively_impaired = true;
        snapshot.subjects.includes_ub_students = true;
        snapshot.subjects.includes_economically_disadvantaged = true;

        let out = generate_recommendations(&snapshot, ReviewType::Expedited);
        assert_eq!(
            titles(&out),
            vec![
                "Complete CITI training",
                "Parental permission and child assent",
                "Prisoner representative",
                "Fetal risk disclosure",
                "Capacity assessment and legally authorized representative",
                "Prevent coercion of UB students and employees",
                "Non-coercive compensation",
            ]
        );
    }

    #[test]
    fn unencrypted_identifiers_require_encryption() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.data.collects_identifiers = true;
        let out = generate_recommendations(&snapshot, ReviewType::Expedited);
        assert!(titles(&out).contains(&"Encrypt identifiable data"));

        snapshot.data.data_encrypted = true;
        let out = generate_recommendations(&snapshot, ReviewType::Expedited);
        assert!(!titles(&out).contains(&"Encrypt identifiable data"));
    }

    #[test]
    fn trailing_rules_keep_their_order() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.subjects.total_participants = 120;
        snapshot.consent.waiver_of_documentation = true;
        snapshot.procedures.involves_deception = true;
        snapshot.procedures.involves_recording = true;

        let out = generate_recommendations(&snapshot, ReviewType::Expedited);
        assert_eq!(
            titles(&out),
            vec![
                "Complete CITI training",
                "Keep participant counts consistent",
                "Justify the waiver of documentation",
                "Deception requirements",
                "Recording opt-out",
            ]
        );
        assert_eq!(out[1].priority, Priority::Low);
        assert!(out[2].body.contains("46.117(c)"));
    }

    #[test]
    fn output_is_deterministic() {
        let mut snapshot = ProtocolSnapshot::default();
        snapshot.subjects.includes_minors = true;
        snapshot.procedures.involves_recording = true;
        assert_eq!(
            generate_recommendations(&snapshot, ReviewType::FullBoard),
            generate_recommendations(&snapshot, ReviewType::FullBoard)
        );
    }
}
