//! Protocol snapshot: the classifier's sole input.
//!
//! A snapshot aggregates six independently filled wizard sections. Every
//! section and field defaults when absent or `null`, so a partially filled
//! wizard always deserializes; the review gate is the only place where
//! missing answers become a first-class result.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{Result, ScreenError};

// ---------------------------------------------------------------------------
// Tri-state answers
// ---------------------------------------------------------------------------

/// A yes/no question that may not have been answered yet.
///
/// Serialized as `true`, `false`, or `null`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl TriState {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }

    pub fn is_no(self) -> bool {
        self == Self::No
    }

    pub fn is_answered(self) -> bool {
        self != Self::Unanswered
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unanswered,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Self::from(Some(value))
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unanswered => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Enumerated answers
// ---------------------------------------------------------------------------

/// Research procedure types offered by the wizard.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodType {
    Survey,
    Interview,
    FocusGroup,
    ObservationPublic,
    ObservationLab,
    EducationalAssessment,
    BehavioralIntervention,
    CognitiveTest,
    Physiological,
    TasteFood,
    SecondaryData,
    /// Anything the wizard does not know about, including unrecognized strings.
    #[serde(other)]
    Other,
}

/// Kinds of direct identifiers a study may collect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    Name,
    Ssn,
    IdNumber,
    Email,
    Institution,
    Phone,
    Address,
    #[serde(other)]
    Other,
}

/// Self-assessed risk level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Minimal,
    Minor,
    Greater,
    /// Not yet selected (also absorbs empty or unrecognized values).
    #[default]
    #[serde(other)]
    Unspecified,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prescreening {
    pub is_research: TriState,
    pub involves_human_subjects: TriState,
    pub citi_training_completed: TriState,
    #[serde(deserialize_with = "null_as_default")]
    pub pi_role: String,
    pub has_faculty_advisor: TriState,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubjectsSection {
    #[serde(deserialize_with = "lenient_count")]
    pub total_participants: u32,
    #[serde(deserialize_with = "lenient_age")]
    pub min_age: Option<u32>,
    #[serde(deserialize_with = "lenient_age")]
    pub max_age: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub includes_minors: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub includes_prisoners: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub includes_pregnant_women: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub includes_cognitively_impaired: bool,
    /// Students or employees of the sponsoring university.
    #[serde(rename = "includesUBStudents", deserialize_with = "null_as_default")]
    pub includes_ub_students: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub includes_economically_disadvantaged: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub recruitment_method: Vec<String>,
}

impl SubjectsSection {
    /// Neither minors nor prisoners are enrolled.
    pub fn excludes_minors_and_prisoners(&self) -> bool {
        !self.includes_minors && !self.includes_prisoners
    }

    /// Minimum enrolment age is known and at least `age`.
    pub fn min_age_at_least(&self, age: u32) -> bool {
        self.min_age.is_some_and(|min| min >= age)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProceduresSection {
    #[serde(deserialize_with = "null_as_default")]
    pub method_types: Vec<MethodType>,
    #[serde(deserialize_with = "null_as_default")]
    pub involves_deception: bool,
    pub deception_debriefing: TriState,
    #[serde(deserialize_with = "null_as_default")]
    pub involves_recording: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub involves_blood_draw: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub involves_randomization: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub uses_existing_data: bool,
    pub existing_data_identifiable: TriState,
    pub data_source_publicly_available: TriState,
    #[serde(deserialize_with = "null_as_default")]
    pub survey_topics: String,
    #[serde(deserialize_with = "null_as_default")]
    pub procedure_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub intervention_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub existing_data_source: String,
}

impl ProceduresSection {
    pub fn has_method(&self, method: MethodType) -> bool {
        self.method_types.contains(&method)
    }

    pub fn has_any_method(&self, methods: &[MethodType]) -> bool {
        self.method_types.iter().any(|m| methods.contains(m))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RisksSection {
    #[serde(deserialize_with = "null_as_default")]
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "null_as_default")]
    pub physical_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub psychological_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub privacy_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub social_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub economic_risks: String,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_minimization: String,
}

impl RisksSection {
    pub fn is_minimal(&self) -> bool {
        self.risk_level == RiskLevel::Minimal
    }

    pub fn is_greater_than_minimal(&self) -> bool {
        self.risk_level == RiskLevel::Greater
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSection {
    #[serde(deserialize_with = "null_as_default")]
    pub collects_identifiers: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier_types: Vec<IdentifierType>,
    #[serde(deserialize_with = "null_as_default")]
    pub data_encrypted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub retention_period: String,
}

impl DataSection {
    pub fn has_identifier_type(&self, kinds: &[IdentifierType]) -> bool {
        self.identifier_types.iter().any(|t| kinds.contains(t))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsentSection {
    #[serde(deserialize_with = "null_as_default")]
    pub consent_required: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub waiver_of_consent: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub documented_consent: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub waiver_of_documentation: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub waiver_justification: String,
    #[serde(deserialize_with = "null_as_default")]
    pub documentation_waiver_justification: String,
}

/// Complete protocol description assembled by the wizard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub prescreening: Prescreening,
    #[serde(deserialize_with = "null_as_default")]
    pub subjects: SubjectsSection,
    #[serde(deserialize_with = "null_as_default")]
    pub procedures: ProceduresSection,
    #[serde(deserialize_with = "null_as_default")]
    pub risks: RisksSection,
    #[serde(deserialize_with = "null_as_default")]
    pub data: DataSection,
    #[serde(deserialize_with = "null_as_default")]
    pub consent: ConsentSection,
}

impl ProtocolSnapshot {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|source| ScreenError::SnapshotParseJson { source })
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|source| ScreenError::SnapshotParseToml { source })
    }
}

/// Load a snapshot from a `.json` or `.toml` file.
pub fn load_snapshot(path: &Path) -> Result<ProtocolSnapshot> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<ProtocolSnapshot> = match format.as_deref() {
        Some("json") => ProtocolSnapshot::from_json_str,
        Some("toml") => ProtocolSnapshot::from_toml_str,
        _ => {
            return Err(ScreenError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ScreenError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot = parse(&contents)?;
    tracing::debug!(path = %path.display(), "Loaded protocol snapshot");
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// `null` decodes to the type's default instead of failing.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers as the wizard may send them: integers, floats, or form text.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    fn into_u32(self) -> Option<u32> {
        match self {
            Self::Int(n) => u32::try_from(n).ok(),
            Self::Float(f) if f.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&f) => {
                Some(f.trunc() as u32)
            }
            Self::Float(_) => None,
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

fn lenient_age<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LenientNumber>::deserialize(deserializer)?.and_then(LenientNumber::into_u32))
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_age(deserializer)?.unwrap_or_default())
}
