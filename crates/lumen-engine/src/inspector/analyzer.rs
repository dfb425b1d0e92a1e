//! Contrast analysis: run the engine, keep the contrast rules, normalize nodes.

use super::document::{Document, DocumentError};
use super::overlay::HighlightOverlay;
use async_trait::async_trait;
use lumen_common::engine::{EngineNode, EngineResults, RunConfig, Violation};
use lumen_common::model::{
    ContrastRatio, ContrastRule, ElementFinding, Issue, IssueReport, Reported,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Engine is not loaded in the document")]
    NotLoaded,

    #[error("Engine injection failed: {0}")]
    Injection(String),

    #[error("Engine run failed: {0}")]
    Run(String),

    #[error("Engine returned malformed results: {0}")]
    Malformed(String),

    /// The document went away while the engine was running.
    #[error("Document unavailable during analysis: {0}")]
    Context(String),
}

/// The third-party accessibility checker, reached inside the target document.
#[async_trait]
pub trait AccessibilityEngine: Send + Sync {
    /// Make the engine available in the document. Must be safe to repeat.
    async fn inject(&mut self) -> Result<(), EngineError>;

    async fn run(&mut self, config: &RunConfig) -> Result<EngineResults, EngineError>;
}

pub struct ContrastAnalyzer {
    config: RunConfig,
}

impl Default for ContrastAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastAnalyzer {
    pub fn new() -> Self {
        Self {
            config: RunConfig::contrast_only(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the engine and normalize its output.
    ///
    /// Engine failures are logged and produce an empty report. Losing the
    /// document is not an engine failure and is returned as an error.
    pub async fn analyze<E: AccessibilityEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<IssueReport, DocumentError> {
        let report = match engine.run(&self.config).await {
            Ok(results) => {
                let report = normalize(results);
                info!(
                    "Contrast analysis found {} issues ({} findings)",
                    report.count(),
                    report.findings().count()
                );
                report
            }
            Err(EngineError::Context(message)) => return Err(DocumentError::Context(message)),
            Err(e) => {
                warn!("Contrast analysis failed, reporting no issues: {}", e);
                IssueReport::empty()
            }
        };
        Ok(report)
    }

    /// Analyze, then flag every finding on the document.
    pub async fn analyze_and_mark<E, D>(
        &self,
        engine: &mut E,
        overlay: &mut HighlightOverlay,
        document: &mut D,
    ) -> Result<IssueReport, DocumentError>
    where
        E: AccessibilityEngine + ?Sized,
        D: Document + ?Sized,
    {
        let report = self.analyze(engine).await?;
        let mut marked = 0;
        for finding in report.findings() {
            marked += overlay.mark_finding(document, finding).await?;
        }
        debug!("Flagged {} elements", marked);
        Ok(report)
    }
}

/// Keep the contrast violations and map them into the issue model.
pub fn normalize(results: EngineResults) -> IssueReport {
    let issues = results
        .violations
        .into_iter()
        .filter_map(|violation| match ContrastRule::from_id(&violation.id) {
            Some(rule) => issue_from_violation(rule, violation),
            None => {
                debug!("Dropping non-contrast violation {}", violation.id);
                None
            }
        })
        .collect();
    IssueReport::new(issues)
}

fn issue_from_violation(rule: ContrastRule, violation: Violation) -> Option<Issue> {
    let elements = violation.nodes.iter().map(finding_from_node).collect();
    let impact = violation.impact.filter(|s| !s.is_empty()).into();
    let issue = Issue::new(
        rule,
        impact,
        violation.description,
        violation.help,
        elements,
    );
    if issue.is_none() {
        debug!("Dropping {} violation without nodes", rule);
    }
    issue
}

/// Map one engine node. Every value the engine left out becomes `Unknown`.
pub fn finding_from_node(node: &EngineNode) -> ElementFinding {
    let data = node.check_data();
    ElementFinding {
        selector: node.selector(),
        html: node.html.clone().filter(|s| !s.is_empty()).into(),
        contrast_ratio: ratio_field(data, "contrastRatio"),
        expected_contrast_ratio: ratio_field(data, "expectedContrastRatio"),
        fg_color: text_field(data, "fgColor"),
        bg_color: text_field(data, "bgColor"),
        font_size: text_field(data, "fontSize"),
        font_weight: text_field(data, "fontWeight"),
    }
}

/// Zero, empty and unparsable ratios count as missing.
fn ratio_field(data: Option<&Map<String, Value>>, key: &str) -> Reported<ContrastRatio> {
    let ratio = match data.and_then(|d| d.get(key)) {
        Some(Value::Number(n)) => n.as_f64().and_then(ContrastRatio::new),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    ratio.into()
}

fn text_field(data: Option<&Map<String, Value>>, key: &str) -> Reported<String> {
    let text = match data.and_then(|d| d.get(key)) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    };
    text.into()
}
