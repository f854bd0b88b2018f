//! Review result: the classifier's sole output.

use serde::{Deserialize, Serialize};

/// Advisory framing attached to every result.
pub const ADVISORY_DISCLAIMER: &str = "This pre-screening is advisory only and is not an IRB \
determination. Submit your protocol to the IRB, which makes the final review-level decision.";

/// Review-level determination.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewType {
    NotResearch,
    NotHumanSubjects,
    Exempt,
    Expedited,
    FullBoard,
    InsufficientInfo,
}

impl ReviewType {
    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotResearch => "Not Research",
            Self::NotHumanSubjects => "Not Human Subjects Research",
            Self::Exempt => "Exempt Review",
            Self::Expedited => "Expedited Review",
            Self::FullBoard => "Full Board Review",
            Self::InsufficientInfo => "Insufficient Information",
        }
    }

    /// Whether the protocol requires IRB submission at one of the three tiers.
    pub fn is_reviewable(self) -> bool {
        matches!(self, Self::Exempt | Self::Expedited | Self::FullBoard)
    }
}

impl std::fmt::Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Flag severity. Also accepts `error` / `warning` / `info` on input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[serde(alias = "error")]
    High,
    #[serde(alias = "warning")]
    Medium,
    #[serde(alias = "info")]
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub severity: Severity,
    pub message: String,
}

impl Flag {
    pub fn high(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::High,
            message: message.into(),
        }
    }

    pub fn medium(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Medium,
            message: message.into(),
        }
    }

    pub fn low(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Low,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Changes that could lower the review level.
    Expedite,
    Compliance,
    Protection,
    Consistency,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub body: String,
}

/// Result of classifying a protocol snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    #[serde(rename = "type")]
    pub review_type: ReviewType,
    /// Regulatory category number; only set for Exempt and Expedited.
    pub category: Option<u8>,
    pub category_label: Option<String>,
    /// Ordered rationale, citing the regulation when a category matched.
    pub reasons: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Heuristic confidence in [0, 1]; not a probability.
    pub confidence: f32,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(skip_deserializing, default = "advisory_disclaimer")]
    pub disclaimer: &'static str,
}

fn advisory_disclaimer() -> &'static str {
    ADVISORY_DISCLAIMER
}

impl ReviewResult {
    /// A result with no category, recommendations, or flags.
    pub(crate) fn uncategorized(
        review_type: ReviewType,
        confidence: f32,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            review_type,
            category: None,
            category_label: None,
            reasons,
            recommendations: Vec::new(),
            confidence,
            flags: Vec::new(),
            disclaimer: ADVISORY_DISCLAIMER,
        }
    }

    /// Whether confidence meets a given threshold.
    pub fn meets_threshold(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// Category headline, e.g. "Exempt Review - Category 2 (...)".
    pub fn headline(&self) -> String {
        match (self.category, self.category_label.as_deref()) {
            (Some(category), Some(label)) => {
                format!("{} - Category {category} ({label})", self.review_type)
            }
            (Some(category), None) => format!("{} - Category {category}", self.review_type),
            _ => self.review_type.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_type_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ReviewType::NotHumanSubjects).expect("serializes");
        assert_eq!(json, r#""NOT_HUMAN_SUBJECTS""#);
        let parsed: ReviewType = serde_json::from_str(r#""FULL_BOARD""#).expect("parses");
        assert_eq!(parsed, ReviewType::FullBoard);
    }

    #[test]
    fn reviewable_types() {
        assert!(ReviewType::Exempt.is_reviewable());
        assert!(ReviewType::Expedited.is_reviewable());
        assert!(ReviewType::FullBoard.is_reviewable());
        assert!(!ReviewType::NotResearch.is_reviewable());
        assert!(!ReviewType::NotHumanSubjects.is_reviewable());
        assert!(!ReviewType::InsufficientInfo.is_reviewable());
    }

    #[test]
    fn severity_accepts_legacy_names() {
        let flag: Flag =
            serde_json::from_str(r#"{"severity": "warning", "message": "m"}"#).expect("parses");
        assert_eq!(flag.severity, Severity::Medium);
        let json = serde_json::to_string(&Flag::high("x")).expect("serializes");
        assert!(json.contains(r#""severity":"high""#));
    }

    #[test]
    fn result_json_shape() {
        let mut result = ReviewResult::uncategorized(
            ReviewType::Exempt,
            0.85,
            vec!["45 CFR 46.104(d)(2)".to_string()],
        );
        result.category = Some(2);
        result.category_label = Some("Survey".to_string());
        result.recommendations.push(Recommendation {
            kind: RecommendationKind::Compliance,
            priority: Priority::High,
            title: "t".to_string(),
            body: "b".to_string(),
        });

        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["type"], "EXEMPT");
        assert_eq!(value["category"], 2);
        assert_eq!(value["categoryLabel"], "Survey");
        assert_eq!(value["recommendations"][0]["type"], "compliance");
        assert_eq!(value["disclaimer"], ADVISORY_DISCLAIMER);

        let parsed: ReviewResult = serde_json::from_value(value).expect("parses");
        assert_eq!(parsed, result);
    }

    #[test]
    fn headline_includes_category() {
        let mut result = ReviewResult::uncategorized(ReviewType::Expedited, 0.78, Vec::new());
        assert_eq!(result.headline(), "Expedited Review");
        result.category = Some(4);
        result.category_label = Some("Noninvasive data collection".to_string());
        assert_eq!(
            result.headline(),
            "Expedited Review - Category 4 (Noninvasive data collection)"
        );
    }

    #[test]
    fn threshold_comparison() {
        let result = ReviewResult::uncategorized(ReviewType::FullBoard, 0.75, Vec::new());
        assert!(result.meets_threshold(0.75));
        assert!(!result.meets_threshold(0.8));
    }
}
