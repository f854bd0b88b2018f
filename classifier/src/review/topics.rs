//! Sensitive-topic keyword scan for survey and interview content.
//!
//! A literal, case-insensitive substring match. It over- and under-triggers
//! (e.g. "drugstore" matches, "narcotics" does not); that behavior is part
//! of the determination contract and must stay reproducible.

/// Keywords whose presence in survey topics disqualifies Exempt Category 2.
pub const SENSITIVE_TOPIC_KEYWORDS: &[&str] = &[
    "sexual",
    "drug",
    "illegal",
    "abuse",
    "criminal",
    "immigration",
    "mental health",
    "financial distress",
];

/// Whether the free text mentions any sensitive topic keyword.
pub fn mentions_sensitive_topic(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    SENSITIVE_TOPIC_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}
