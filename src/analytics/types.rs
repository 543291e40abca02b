//! Analytics data types
//!
//! Filter normalization and the count records exchanged with the
//! aggregation service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A company filter, lower-cased and trimmed.
///
/// The empty filter means "all companies".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedFilter(String);

impl NormalizedFilter {
    /// Normalize free-text filter input
    pub fn new(input: &str) -> Self {
        Self(input.trim().to_lowercase())
    }

    /// True when no company is selected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedFilter {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

/// Three-way sentiment tally.
///
/// Decoding is strict: every field must be present and a non-negative
/// integer. Unknown fields (such as `tags`) are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyticsCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl AnalyticsCounts {
    pub const ZERO: AnalyticsCounts = AnalyticsCounts {
        positive: 0,
        negative: 0,
        neutral: 0,
    };

    pub fn new(positive: u64, negative: u64, neutral: u64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Total number of classified feedback entries
    pub fn total(&self) -> u64 {
        self.positive
            .saturating_add(self.negative)
            .saturating_add(self.neutral)
    }

    /// Largest of the three counts
    pub fn max(&self) -> u64 {
        self.positive.max(self.negative).max(self.neutral)
    }
}

/// Sentiment category assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Display order used by every chart
    pub const ALL: [Sentiment; 3] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// The count for this category, looked up by field name
    pub fn count_in(&self, counts: &AnalyticsCounts) -> u64 {
        match self {
            Sentiment::Positive => counts.positive,
            Sentiment::Negative => counts.negative,
            Sentiment::Neutral => counts.neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-company record as stored by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompanyAnalytics {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    /// Best-matching tag for each classified feedback, in arrival order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CompanyAnalytics {
    pub fn counts(&self) -> AnalyticsCounts {
        AnalyticsCounts::new(self.positive, self.negative, self.neutral)
    }

    /// Tags ranked by frequency, ties broken alphabetically
    pub fn top_tags(&self, limit: usize) -> Vec<(String, usize)> {
        let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tag in &self.tags {
            *freq.entry(tag.as_str()).or_default() += 1;
        }

        let mut ranked: Vec<(String, usize)> = freq
            .into_iter()
            .map(|(tag, n)| (tag.to_string(), n))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Unfiltered analytics: normalized company name → record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CompanyBreakdown(pub BTreeMap<String, CompanyAnalytics>);

impl CompanyBreakdown {
    /// Sum of every company's counts
    pub fn totals(&self) -> AnalyticsCounts {
        self.0.values().fold(AnalyticsCounts::ZERO, |acc, c| {
            AnalyticsCounts::new(
                acc.positive.saturating_add(c.positive),
                acc.negative.saturating_add(c.negative),
                acc.neutral.saturating_add(c.neutral),
            )
        })
    }

    pub fn get(&self, company: &NormalizedFilter) -> Option<&CompanyAnalytics> {
        self.0.get(company.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CompanyAnalytics)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Response to a feedback submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassifyOutcome {
    /// Company name as normalized by the service
    pub company: String,
    pub sentiment: Sentiment,
    pub tag: String,
    /// Whether the negative-feedback alert fired for this submission
    #[serde(rename = "alertSent")]
    pub alert_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(NormalizedFilter::new("  Acme Corp  ").as_str(), "acme corp");
        assert_eq!(NormalizedFilter::new("GLOBEX").as_str(), "globex");
    }

    #[test]
    fn test_normalize_blank_is_empty() {
        assert!(NormalizedFilter::new("").is_empty());
        assert!(NormalizedFilter::new("   \t\n ").is_empty());
        assert!(!NormalizedFilter::new(" a ").is_empty());
    }

    #[test]
    fn test_normalize_unicode_case() {
        let filter = NormalizedFilter::new("\u{3000}ÄBC Straße\u{2003}");
        assert_eq!(filter.as_str(), "äbc straße");
        let once = NormalizedFilter::new("İstanbul Ltd");
        assert_eq!(NormalizedFilter::new(once.as_str()), once);
    }

    #[test]
    fn test_totals_saturate() {
        let counts = AnalyticsCounts::new(u64::MAX, 1, 1);
        assert_eq!(counts.total(), u64::MAX);

        let breakdown = CompanyBreakdown(
            [
                ("a".to_string(), CompanyAnalytics {
                    positive: u64::MAX,
                    ..CompanyAnalytics::default()
                }),
                ("b".to_string(), CompanyAnalytics {
                    positive: 7,
                    negative: 2,
                    ..CompanyAnalytics::default()
                }),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(breakdown.totals(), AnalyticsCounts::new(u64::MAX, 2, 0));
    }

    /// Unicode padding around mixed-case letters, including case-folding edge cases
    const SPACED_NAME: &str =
        "[ \\t\\n\\u{00A0}\\u{2003}\\u{3000}]*[a-zA-ZÄÖÜßİΣσЖж ]*[ \\t\\u{2003}]*";

    // Property-based tests
    proptest! {
        #[test]
        fn test_normalize_idempotent(input in "\\PC*") {
            let once = NormalizedFilter::new(&input);
            let twice = NormalizedFilter::new(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_normalize_idempotent_mixed_case_and_spacing(input in SPACED_NAME) {
            let once = NormalizedFilter::new(&input);
            let twice = NormalizedFilter::new(once.as_str());
            prop_assert_eq!(once.as_str(), input.trim().to_lowercase());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_blank_input_normalizes_to_empty(
            input in "[ \\t\\n\\r\\u{00A0}\\u{2003}\\u{3000}]*"
        ) {
            prop_assert!(NormalizedFilter::new(&input).is_empty());
            let normalized = NormalizedFilter::new(&input);
            prop_assert_eq!(normalized.as_str(), "");
        }
    }

    #[test]
    fn test_counts_decode() {
        let counts: AnalyticsCounts =
            serde_json::from_str(r#"{"positive":5,"negative":2,"neutral":1}"#).unwrap();
        assert_eq!(counts, AnalyticsCounts::new(5, 2, 1));
        assert_eq!(counts.total(), 8);
        assert_eq!(counts.max(), 5);
    }

    #[test]
    fn test_counts_ignore_tags() {
        let counts: AnalyticsCounts = serde_json::from_str(
            r#"{"positive":1,"negative":0,"neutral":3,"tags":["speed","price"]}"#,
        )
        .unwrap();
        assert_eq!(counts, AnalyticsCounts::new(1, 0, 3));
    }

    #[test]
    fn test_counts_missing_field_rejected() {
        let result: Result<AnalyticsCounts, _> =
            serde_json::from_str(r#"{"positive":1,"negative":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_counts_wrong_type_rejected() {
        let result: Result<AnalyticsCounts, _> =
            serde_json::from_str(r#"{"positive":"1","negative":0,"neutral":0}"#);
        assert!(result.is_err());

        let result: Result<AnalyticsCounts, _> =
            serde_json::from_str(r#"{"positive":-1,"negative":0,"neutral":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sentiment_binds_by_name() {
        let counts = AnalyticsCounts::new(5, 2, 1);
        let values: Vec<u64> = Sentiment::ALL.iter().map(|s| s.count_in(&counts)).collect();
        assert_eq!(values, vec![5, 2, 1]);
        assert_eq!(Sentiment::Negative.label(), "Negative");
    }

    #[test]
    fn test_breakdown_totals() {
        let breakdown: CompanyBreakdown = serde_json::from_str(
            r#"{
                "acme corp": {"positive": 5, "negative": 2, "neutral": 1, "tags": ["service"]},
                "globex": {"positive": 1, "negative": 4, "neutral": 0}
            }"#,
        )
        .unwrap();

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.totals(), AnalyticsCounts::new(6, 6, 1));

        let acme = breakdown.get(&NormalizedFilter::new("Acme Corp")).unwrap();
        assert_eq!(acme.tags, vec!["service"]);
        assert!(breakdown.get(&NormalizedFilter::new("initech")).is_none());
    }

    #[test]
    fn test_top_tags() {
        let record = CompanyAnalytics {
            tags: ["slow", "price", "slow", "friendly", "price", "slow"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Default::default()
        };

        let top = record.top_tags(2);
        assert_eq!(top, vec![("slow".to_string(), 3), ("price".to_string(), 2)]);
    }

    #[test]
    fn test_classify_outcome_decode() {
        let outcome: ClassifyOutcome = serde_json::from_str(
            r#"{"company":"acme corp","sentiment":"negative","tag":"late delivery","alertSent":true}"#,
        )
        .unwrap();
        assert_eq!(outcome.sentiment, Sentiment::Negative);
        assert!(outcome.alert_sent);
    }
}
