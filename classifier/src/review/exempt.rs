//! Exempt categories (45 CFR 46.104(d)).
//!
//! Categories are tried in a fixed order and the first that applies wins.
//! Category 2 carries its own disqualifiers: direct identifiers of concern or
//! sensitive survey topics push the protocol on to the expedited matcher,
//! where the complementary identifier conditions pick it up.

use crate::result::Flag;
use crate::snapshot::{IdentifierType, MethodType, ProtocolSnapshot};

use super::topics::mentions_sensitive_topic;
use super::{CategoryMatch, CategoryRule, Rationale, first_match};

/// Identifier types that disqualify Exempt Category 2.
pub const CATEGORY_2_DISQUALIFYING_IDENTIFIERS: &[IdentifierType] = &[
    IdentifierType::Name,
    IdentifierType::Ssn,
    IdentifierType::IdNumber,
];

const CATEGORY_2_METHODS: &[MethodType] = &[
    MethodType::Survey,
    MethodType::Interview,
    MethodType::ObservationPublic,
];

const EXEMPT_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: 1,
        label: "Normal educational practices",
        confidence: 0.85,
        applies: educational_practice_applies,
        rationale: educational_practice_rationale,
    },
    CategoryRule {
        category: 2,
        label: "Surveys, interviews, educational tests, or public observation",
        confidence: 0.85,
        applies: survey_interview_applies,
        rationale: survey_interview_rationale,
    },
    CategoryRule {
        category: 3,
        label: "Benign behavioral interventions",
        confidence: 0.78,
        applies: benign_intervention_applies,
        rationale: benign_intervention_rationale,
    },
    CategoryRule {
        category: 4,
        label: "Secondary research with publicly available data",
        confidence: 0.9,
        applies: public_secondary_data_applies,
        rationale: public_secondary_data_rationale,
    },
    CategoryRule {
        category: 4,
        label: "Secondary research with de-identified data",
        confidence: 0.82,
        applies: deidentified_secondary_data_applies,
        rationale: deidentified_secondary_data_rationale,
    },
    CategoryRule {
        category: 6,
        label: "Taste and food quality evaluation",
        confidence: 0.8,
        applies: taste_food_applies,
        rationale: taste_food_rationale,
    },
];

/// Return the first exempt category the protocol qualifies for, if any.
pub fn check_exempt_categories(snapshot: &ProtocolSnapshot) -> Option<CategoryMatch> {
    first_match(EXEMPT_RULES, snapshot)
}

/// Whether Exempt Category 2 is ruled out despite its method matching.
pub fn survey_interview_disqualified(snapshot: &ProtocolSnapshot) -> bool {
    let data = &snapshot.data;
    let identifiers_of_concern =
        data.collects_identifiers && data.has_identifier_type(CATEGORY_2_DISQUALIFYING_IDENTIFIERS);
    identifiers_of_concern || mentions_sensitive_topic(&snapshot.procedures.survey_topics)
}

// Category 1 ----------------------------------------------------------------

fn educational_practice_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot
        .procedures
        .has_method(MethodType::EducationalAssessment)
        && snapshot.subjects.excludes_minors_and_prisoners()
        && !snapshot.risks.is_greater_than_minimal()
}

fn educational_practice_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Research in an established educational setting involving normal educational \
             practices (45 CFR 46.104(d)(1))."
                .to_string(),
        ],
        flags: vec![
            Flag::medium(
                "The research must not adversely affect students' opportunity to learn \
                 required content or the assessment of educators.",
            ),
            Flag::low(
                "Confirm the setting is an established or commonly accepted educational setting.",
            ),
        ],
    }
}

// Category 2 ----------------------------------------------------------------

fn survey_interview_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.has_any_method(CATEGORY_2_METHODS)
        && snapshot.subjects.excludes_minors_and_prisoners()
        && !survey_interview_disqualified(snapshot)
}

fn survey_interview_rationale(snapshot: &ProtocolSnapshot) -> Rationale {
    let mut flags = vec![Flag::low(
        "Exempt status assumes responses cannot be linked to participants or that disclosure \
         would not place them at risk.",
    )];
    if snapshot.data.collects_identifiers {
        flags.push(Flag::medium(
            "Identifiers are collected; keep them separate from responses and limit access to \
             the research team.",
        ));
    }
    if snapshot
        .procedures
        .has_method(MethodType::ObservationPublic)
    {
        flags.push(Flag::low(
            "Observation must be limited to public behavior without investigator participation.",
        ));
    }

    Rationale {
        reasons: vec![
            "Research limited to surveys, interviews, educational tests, or observation of \
             public behavior (45 CFR 46.104(d)(2))."
                .to_string(),
            "No minors or prisoners are enrolled and no sensitive topics or direct identifiers \
             of concern were reported."
                .to_string(),
        ],
        flags,
    }
}

// Category 3 ----------------------------------------------------------------

fn benign_intervention_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot
        .procedures
        .has_method(MethodType::BehavioralIntervention)
        && snapshot.subjects.min_age_at_least(18)
        && snapshot.subjects.excludes_minors_and_prisoners()
        && !snapshot.data.collects_identifiers
}

fn benign_intervention_rationale(snapshot: &ProtocolSnapshot) -> Rationale {
    let mut flags = vec![
        Flag::medium(
            "Interventions must be brief, harmless, painless, not physically invasive, and \
             unlikely to have a significant adverse lasting impact.",
        ),
        Flag::low("Adult participants must prospectively agree to the intervention."),
    ];
    if snapshot.procedures.involves_deception {
        flags.push(Flag::medium(
            "Deception is only permitted here if participants agree to be unaware of or misled \
             about the study's nature or purposes.",
        ));
    }

    Rationale {
        reasons: vec![
            "Benign behavioral intervention with adult participants and no identifiers \
             (45 CFR 46.104(d)(3))."
                .to_string(),
        ],
        flags,
    }
}

// Category 4 ----------------------------------------------------------------

fn public_secondary_data_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.uses_existing_data
        && snapshot.procedures.data_source_publicly_available.is_yes()
}

fn public_secondary_data_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Secondary research use of publicly available information (45 CFR 46.104(d)(4)(i))."
                .to_string(),
        ],
        flags: vec![Flag::low(
            "Verify the data source is publicly available without access restrictions or \
             data use agreements.",
        )],
    }
}

fn deidentified_secondary_data_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.uses_existing_data && snapshot.procedures.existing_data_identifiable.is_no()
}

fn deidentified_secondary_data_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Secondary research use of information recorded so that subjects cannot be \
             identified (45 CFR 46.104(d)(4)(ii))."
                .to_string(),
        ],
        flags: vec![
            Flag::medium(
                "Confirm you cannot access the re-identification key or any code linking data \
                 to individuals.",
            ),
            Flag::low("Do not attempt to contact or re-identify subjects."),
        ],
    }
}

// Category 6 ----------------------------------------------------------------

fn taste_food_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.has_method(MethodType::TasteFood) && snapshot.risks.is_minimal()
}

fn taste_food_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Taste and food quality evaluation or consumer acceptance study \
             (45 CFR 46.104(d)(6))."
                .to_string(),
        ],
        flags: vec![Flag::low(
            "Foods must be wholesome without additives, or contain ingredients at or below \
             levels found safe by the FDA, EPA, or USDA.",
        )],
    }
}
