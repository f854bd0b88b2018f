//! Expedited categories (45 CFR 46.110, 63 FR 60364).
//!
//! Only consulted when no exempt category matched. Category numbers follow
//! the federal list and are not sequential.

use crate::result::Flag;
use crate::snapshot::{MethodType, ProtocolSnapshot};

use super::{CategoryMatch, CategoryRule, Rationale, first_match};

const NONINVASIVE_METHODS: &[MethodType] = &[
    MethodType::Survey,
    MethodType::Interview,
    MethodType::ObservationPublic,
    MethodType::CognitiveTest,
];

const CHARACTERISTICS_METHODS: &[MethodType] = &[MethodType::Survey, MethodType::Interview];

const EXPEDITED_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: 2,
        label: "Minor blood collection",
        confidence: 0.8,
        applies: blood_draw_applies,
        rationale: blood_draw_rationale,
    },
    CategoryRule {
        category: 4,
        label: "Noninvasive data collection with identifiers or vulnerable populations",
        confidence: 0.78,
        applies: noninvasive_applies,
        rationale: noninvasive_rationale,
    },
    CategoryRule {
        category: 5,
        label: "Existing identifiable records",
        confidence: 0.82,
        applies: identifiable_records_applies,
        rationale: identifiable_records_rationale,
    },
    CategoryRule {
        category: 6,
        label: "Voice, video, digital, or image recordings",
        confidence: 0.78,
        applies: recording_applies,
        rationale: recording_rationale,
    },
    CategoryRule {
        category: 7,
        label: "Individual or group characteristics with identifiers",
        confidence: 0.75,
        applies: characteristics_applies,
        rationale: characteristics_rationale,
    },
];

/// Return the first expedited category the protocol qualifies for, if any.
pub fn check_expedited_categories(snapshot: &ProtocolSnapshot) -> Option<CategoryMatch> {
    first_match(EXPEDITED_RULES, snapshot)
}

// Category 2 ----------------------------------------------------------------

fn blood_draw_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.involves_blood_draw
        && snapshot.subjects.min_age_at_least(18)
        && snapshot.subjects.excludes_minors_and_prisoners()
        && snapshot.risks.is_minimal()
}

fn blood_draw_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Collection of blood samples by finger stick, heel stick, ear stick, or \
             venipuncture from healthy adults (45 CFR 46.110, expedited category 2)."
                .to_string(),
        ],
        flags: vec![Flag::medium(
            "Amounts may not exceed 550 ml in an 8-week period, collected no more than twice \
             per week.",
        )],
    }
}

// Category 4 ----------------------------------------------------------------

fn noninvasive_applies(snapshot: &ProtocolSnapshot) -> bool {
    let subjects = &snapshot.subjects;
    let identifiers_or_vulnerable = snapshot.data.collects_identifiers
        || subjects.includes_minors
        || subjects.includes_pregnant_women
        || subjects.includes_cognitively_impaired;

    snapshot.procedures.has_any_method(NONINVASIVE_METHODS)
        && snapshot.risks.is_minimal()
        && !subjects.includes_prisoners
        && identifiers_or_vulnerable
}

fn noninvasive_rationale(snapshot: &ProtocolSnapshot) -> Rationale {
    let subjects = &snapshot.subjects;
    let mut reasons = vec![
        "Minimal risk noninvasive data collection (45 CFR 46.110, expedited category 4)."
            .to_string(),
    ];
    let mut flags = Vec::new();

    if snapshot.data.collects_identifiers {
        reasons.push(
            "Direct identifiers are collected, so the study does not qualify for Exempt \
             Category 2 (45 CFR 46.104(d)(2))."
                .to_string(),
        );
        flags.push(Flag::medium(
            "Identifiable data must be stored securely and separated from responses where \
             possible.",
        ));
    }
    if subjects.includes_minors {
        flags.push(Flag::medium(
            "Minors are enrolled: parental permission and child assent are required \
             (45 CFR 46 Subpart D).",
        ));
    }
    if subjects.includes_pregnant_women {
        flags.push(Flag::medium(
            "Pregnant women are enrolled: address risks to the fetus (45 CFR 46 Subpart B).",
        ));
    }
    if subjects.includes_cognitively_impaired {
        flags.push(Flag::medium(
            "Cognitively impaired adults are enrolled: describe capacity assessment and use \
             of a legally authorized representative.",
        ));
    }

    Rationale { reasons, flags }
}

// Category 5 ----------------------------------------------------------------

fn identifiable_records_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.uses_existing_data
        && snapshot.procedures.existing_data_identifiable.is_yes()
}

fn identifiable_records_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Research involving identifiable data or records collected for non-research \
             purposes (45 CFR 46.110, expedited category 5)."
                .to_string(),
        ],
        flags: vec![
            Flag::medium(
                "Describe how access to identifiable records is authorized and how identifiers \
                 are protected.",
            ),
            Flag::low("Limit access to identifiable records to study personnel."),
        ],
    }
}

// Category 6 ----------------------------------------------------------------

fn recording_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.involves_recording
        && snapshot.risks.is_minimal()
        && !snapshot.subjects.includes_prisoners
}

fn recording_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Collection of data from voice, video, digital, or image recordings made for \
             research purposes (45 CFR 46.110, expedited category 6)."
                .to_string(),
        ],
        flags: vec![Flag::medium(
            "Consent language must disclose that sessions are recorded and how recordings are \
             stored and destroyed.",
        )],
    }
}

// Category 7 ----------------------------------------------------------------

fn characteristics_applies(snapshot: &ProtocolSnapshot) -> bool {
    snapshot.procedures.has_any_method(CHARACTERISTICS_METHODS)
        && snapshot.data.collects_identifiers
        && snapshot.risks.is_minimal()
}

fn characteristics_rationale(_: &ProtocolSnapshot) -> Rationale {
    Rationale {
        reasons: vec![
            "Research on individual or group characteristics or behavior using surveys or \
             interviews (45 CFR 46.110, expedited category 7)."
                .to_string(),
            "Direct identifiers are collected, so the study does not qualify for exemption."
                .to_string(),
        ],
        flags: vec![Flag::medium(
            "Describe confidentiality safeguards for identifiable responses in the consent \
             document.",
        )],
    }
}
