//! Wire shapes of the accessibility engine (axe-core) as seen from Rust.
//!
//! Only the fields the contrast pipeline reads are modelled. Deserialization
//! is lenient: the engine omits or nulls fields freely between versions.

use crate::model::ContrastRule;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options passed to `axe.run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    #[serde(rename = "runOnly")]
    pub run_only: RunOnly,
    pub rules: BTreeMap<String, RuleSwitch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOnly {
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleSwitch {
    pub enabled: bool,
}

impl RunConfig {
    /// Enables exactly the two contrast rules; everything else stays off.
    pub fn contrast_only() -> Self {
        let values: Vec<String> = ContrastRule::ALL
            .iter()
            .map(|rule| rule.as_str().to_string())
            .collect();
        let rules = values
            .iter()
            .map(|id| (id.clone(), RuleSwitch { enabled: true }))
            .collect();
        Self {
            run_only: RunOnly {
                kind: "rule".to_string(),
                values,
            },
            rules,
        }
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|(_, switch)| switch.enabled)
            .map(|(id, _)| id.as_str())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::contrast_only()
    }
}

/// The subset of `axe.run` results the analyzer consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineResults {
    #[serde(default)]
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub nodes: Vec<EngineNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineNode {
    #[serde(default)]
    pub target: Vec<TargetSegment>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub any: Vec<CheckResult>,
}

/// One entry of a node's `target` path.
///
/// Elements inside shadow roots are addressed by a nested array of selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSegment {
    Selector(String),
    Nested(Vec<String>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl EngineNode {
    /// All target segments, nested ones flattened, joined with `", "`.
    pub fn selector(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for segment in &self.target {
            match segment {
                TargetSegment::Selector(s) => parts.push(s),
                TargetSegment::Nested(list) => parts.extend(list.iter().map(String::as_str)),
            }
        }
        parts.join(", ")
    }

    /// The `data` object of the first `any` check, when it is an object.
    pub fn check_data(&self) -> Option<&Map<String, Value>> {
        self.any.first().and_then(|check| check.data.as_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contrast_only_config_shape() {
        let value = serde_json::to_value(RunConfig::contrast_only()).unwrap();
        assert_eq!(
            value,
            json!({
                "runOnly": {
                    "type": "rule",
                    "values": ["color-contrast", "color-contrast-enhanced"]
                },
                "rules": {
                    "color-contrast": { "enabled": true },
                    "color-contrast-enhanced": { "enabled": true }
                }
            })
        );
    }

    #[test]
    fn test_lenient_violation_parsing() {
        let results: EngineResults = serde_json::from_value(json!({
            "violations": [{
                "id": "color-contrast",
                "impact": null,
                "nodes": [{ "target": ["#a"] }]
            }],
            "passes": []
        }))
        .unwrap();

        let violation = &results.violations[0];
        assert!(violation.impact.is_none());
        assert_eq!(violation.description, "");
        assert!(violation.nodes[0].any.is_empty());
        assert!(violation.nodes[0].check_data().is_none());
    }

    #[test]
    fn test_selector_joins_and_flattens_segments() {
        let node: EngineNode = serde_json::from_value(json!({
            "target": ["iframe#frame", ["my-widget", ".label"]]
        }))
        .unwrap();
        assert_eq!(node.selector(), "iframe#frame, my-widget, .label");
    }

    #[test]
    fn test_check_data_ignores_non_object() {
        let node: EngineNode = serde_json::from_value(json!({
            "target": ["p"],
            "any": [{ "id": "color-contrast", "data": "message only" }]
        }))
        .unwrap();
        assert!(node.check_data().is_none());
    }
}
