//! Contrast issue model shared by the Inspector and the Controller.
//!
//! Everything in here crosses the context boundary as JSON, so the wire shape
//! (camelCase keys, the `"Unknown"` sentinel, the `count` field on reports) is
//! part of the contract.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Placeholder written for every value the engine did not supply.
pub const UNKNOWN: &str = "Unknown";

/// A value the engine may or may not have reported.
///
/// Serializes as the bare value, or as the string `"Unknown"` when absent.
/// `null` and the `"Unknown"` string both deserialize to [`Reported::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reported<T> {
    Value(T),
    Unknown,
}

impl<T> Default for Reported<T> {
    fn default() -> Self {
        Reported::Unknown
    }
}

impl<T> Reported<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Reported::Unknown)
    }
}

impl<T> From<Option<T>> for Reported<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reported::Value(v),
            None => Reported::Unknown,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reported<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reported::Value(v) => v.fmt(f),
            Reported::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reported::Value(v) => v.serialize(serializer),
            Reported::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Matches only the literal `"Unknown"` string.
struct UnknownTag;

impl<'de> Deserialize<'de> for UnknownTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == UNKNOWN {
            Ok(UnknownTag)
        } else {
            Err(de::Error::custom("not the Unknown sentinel"))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportedWire<T> {
    Sentinel(UnknownTag),
    Value(T),
    Null(()),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ReportedWire::<T>::deserialize(deserializer)? {
            ReportedWire::Value(v) => Reported::Value(v),
            ReportedWire::Sentinel(_) | ReportedWire::Null(()) => Reported::Unknown,
        })
    }
}

/// A contrast ratio expressed as `ratio:1`.
///
/// The engine reports the measured ratio as a number and the required ratio
/// as a `"4.5:1"` string; both forms are accepted, numbers are emitted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ContrastRatio(pub f64);

impl ContrastRatio {
    /// Returns `None` for non-finite or non-positive ratios.
    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }
}

impl fmt::Display for ContrastRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:1", self.0)
    }
}

impl FromStr for ContrastRatio {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let head = trimmed.strip_suffix(":1").unwrap_or(trimmed);
        head.trim()
            .parse::<f64>()
            .ok()
            .and_then(ContrastRatio::new)
            .ok_or_else(|| ReportError::InvalidRatio(s.to_string()))
    }
}

impl Serialize for ContrastRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for ContrastRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RatioWire {
            Number(f64),
            Text(String),
        }

        match RatioWire::deserialize(deserializer)? {
            RatioWire::Number(n) => ContrastRatio::new(n)
                .ok_or_else(|| de::Error::custom(format!("invalid contrast ratio {}", n))),
            RatioWire::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// The two engine rules this tool reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContrastRule {
    #[serde(rename = "color-contrast")]
    ColorContrast,
    #[serde(rename = "color-contrast-enhanced")]
    ColorContrastEnhanced,
}

impl ContrastRule {
    pub const ALL: [ContrastRule; 2] = [
        ContrastRule::ColorContrast,
        ContrastRule::ColorContrastEnhanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContrastRule::ColorContrast => "color-contrast",
            ContrastRule::ColorContrastEnhanced => "color-contrast-enhanced",
        }
    }

    /// Returns `None` for any rule id outside the contrast pair.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.as_str() == id)
    }
}

impl fmt::Display for ContrastRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element failing a contrast rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFinding {
    /// Engine selector; may match more than one element.
    pub selector: String,
    #[serde(default)]
    pub html: Reported<String>,
    #[serde(default)]
    pub contrast_ratio: Reported<ContrastRatio>,
    #[serde(default)]
    pub expected_contrast_ratio: Reported<ContrastRatio>,
    #[serde(default)]
    pub fg_color: Reported<String>,
    #[serde(default)]
    pub bg_color: Reported<String>,
    #[serde(default)]
    pub font_size: Reported<String>,
    #[serde(default)]
    pub font_weight: Reported<String>,
}

impl ElementFinding {
    /// Advisory text attached to every flagged element.
    pub fn tooltip(&self) -> String {
        format!(
            "Contrast Issue: Expected {}, Actual {}\nForeground: {}, Background: {}",
            self.expected_contrast_ratio, self.contrast_ratio, self.fg_color, self.bg_color
        )
    }
}

/// One violation of a contrast rule. Always carries at least one finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "IssueRecord")]
pub struct Issue {
    pub rule_id: ContrastRule,
    pub impact: Reported<String>,
    pub description: String,
    pub help: String,
    elements: Vec<ElementFinding>,
}

impl Issue {
    /// Returns `None` when `elements` is empty.
    pub fn new(
        rule_id: ContrastRule,
        impact: Reported<String>,
        description: impl Into<String>,
        help: impl Into<String>,
        elements: Vec<ElementFinding>,
    ) -> Option<Self> {
        if elements.is_empty() {
            return None;
        }
        Some(Self {
            rule_id,
            impact,
            description: description.into(),
            help: help.into(),
            elements,
        })
    }

    pub fn elements(&self) -> &[ElementFinding] {
        &self.elements
    }

    /// Required ratio of the first finding, used as the issue's headline minimum.
    pub fn minimum_contrast(&self) -> &Reported<ContrastRatio> {
        &self.elements[0].expected_contrast_ratio
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRecord {
    rule_id: ContrastRule,
    #[serde(default)]
    impact: Reported<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    help: String,
    elements: Vec<ElementFinding>,
}

impl TryFrom<IssueRecord> for Issue {
    type Error = ReportError;

    fn try_from(record: IssueRecord) -> Result<Self, Self::Error> {
        let rule = record.rule_id;
        Issue::new(
            record.rule_id,
            record.impact,
            record.description,
            record.help,
            record.elements,
        )
        .ok_or(ReportError::EmptyIssue(rule))
    }
}

/// Result of one analysis run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "ReportRecord", try_from = "ReportRecord")]
pub struct IssueReport {
    issues: Vec<Issue>,
}

impl IssueReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Every finding in report order.
    pub fn findings(&self) -> impl Iterator<Item = &ElementFinding> {
        self.issues.iter().flat_map(|issue| issue.elements.iter())
    }
}

#[derive(Serialize, Deserialize)]
struct ReportRecord {
    count: usize,
    issues: Vec<Issue>,
}

impl From<IssueReport> for ReportRecord {
    fn from(report: IssueReport) -> Self {
        Self {
            count: report.issues.len(),
            issues: report.issues,
        }
    }
}

impl TryFrom<ReportRecord> for IssueReport {
    type Error = ReportError;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        if record.count != record.issues.len() {
            return Err(ReportError::CountMismatch {
                declared: record.count,
                actual: record.issues.len(),
            });
        }
        Ok(IssueReport::new(record.issues))
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReportError {
    #[error("Issue for rule {0} has no element findings")]
    EmptyIssue(ContrastRule),

    #[error("Report declares {declared} issues but carries {actual}")]
    CountMismatch { declared: usize, actual: usize },

    #[error("Invalid contrast ratio: {0}")]
    InvalidRatio(String),
}
