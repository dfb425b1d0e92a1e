//! Turns an [`IssueReport`] into the navigable structure the operator browses.
//!
//! Rendering never talks to the document. The only wiring back to the
//! Inspector is [`FindingRow::on_click`], which yields the call to dispatch.

use lumen_common::model::{ElementFinding, Issue, IssueReport};
use lumen_common::protocol::{InspectorAction, SelectRequest};
use std::fmt;
use std::str::FromStr;

pub const NO_ISSUES_MESSAGE: &str = "No contrast issues found!";

/// 1-based address of a row, written `issue.element` (e.g. `2.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub issue: usize,
    pub element: usize,
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.issue, self.element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid row '{0}', expected <issue>.<element> such as 1.2")]
pub struct ParseRowIdError(String);

impl FromStr for RowId {
    type Err = ParseRowIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRowIdError(s.to_string());
        let (issue, element) = s.trim().split_once('.').ok_or_else(err)?;
        let issue: usize = issue.parse().map_err(|_| err())?;
        let element: usize = element.parse().map_err(|_| err())?;
        if issue == 0 || element == 0 {
            return Err(err());
        }
        Ok(RowId { issue, element })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindingRow {
    pub id: RowId,
    pub selector: String,
    pub expected_contrast: String,
    pub actual_contrast: String,
    pub foreground: String,
    pub background: String,
}

impl FindingRow {
    fn from_finding(id: RowId, finding: &ElementFinding) -> Self {
        Self {
            id,
            selector: finding.selector.clone(),
            expected_contrast: finding.expected_contrast_ratio.to_string(),
            actual_contrast: finding.contrast_ratio.to_string(),
            foreground: finding.fg_color.to_string(),
            background: finding.bg_color.to_string(),
        }
    }

    pub fn lines(&self) -> [String; 5] {
        [
            format!("Element: {}", self.selector),
            format!("Expected Contrast: {}", self.expected_contrast),
            format!("Actual Contrast: {}", self.actual_contrast),
            format!("Foreground: {}", self.foreground),
            format!("Background: {}", self.background),
        ]
    }

    /// The Inspector call a click on this row triggers.
    pub fn on_click(&self) -> InspectorAction {
        InspectorAction::Select(SelectRequest {
            selector: self.selector.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueSection {
    pub ordinal: usize,
    pub title: String,
    pub description: String,
    pub help: String,
    pub minimum_contrast: String,
    pub rows: Vec<FindingRow>,
}

impl IssueSection {
    fn from_issue(ordinal: usize, issue: &Issue) -> Self {
        let minimum_contrast = issue.minimum_contrast().to_string();
        Self {
            ordinal,
            title: format!("Issue {}: {} impact", ordinal, issue.impact),
            description: issue.description.clone(),
            help: format!(
                "{} (Minimum required contrast: {})",
                issue.help, minimum_contrast
            ),
            minimum_contrast,
            rows: issue
                .elements()
                .iter()
                .enumerate()
                .map(|(i, finding)| {
                    let id = RowId {
                        issue: ordinal,
                        element: i + 1,
                    };
                    FindingRow::from_finding(id, finding)
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub summary: String,
    pub sections: Vec<IssueSection>,
}

impl RenderedReport {
    pub fn row(&self, id: RowId) -> Option<&FindingRow> {
        self.sections
            .get(id.issue.checked_sub(1)?)?
            .rows
            .get(id.element.checked_sub(1)?)
    }
}

/// What the report panel shows. Each render replaces the previous one whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportView {
    /// Successful scan with nothing to report.
    NoIssues,
    Issues(RenderedReport),
}

impl ReportView {
    pub fn row(&self, id: RowId) -> Option<&FindingRow> {
        match self {
            ReportView::NoIssues => None,
            ReportView::Issues(report) => report.row(id),
        }
    }
}

pub struct ReportRenderer;

impl ReportRenderer {
    pub fn render(report: &IssueReport) -> ReportView {
        if report.is_empty() {
            return ReportView::NoIssues;
        }
        ReportView::Issues(RenderedReport {
            summary: format!("Found {} contrast issues:", report.count()),
            sections: report
                .issues()
                .iter()
                .enumerate()
                .map(|(i, issue)| IssueSection::from_issue(i + 1, issue))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::model::{ContrastRatio, ContrastRule, Reported};

    fn sample_report() -> IssueReport {
        let full = ElementFinding {
            selector: "#lead".into(),
            contrast_ratio: Reported::Value(ContrastRatio(2.1)),
            expected_contrast_ratio: Reported::Value(ContrastRatio(4.5)),
            fg_color: Reported::Value("#999999".into()),
            bg_color: Reported::Value("#ffffff".into()),
            ..Default::default()
        };
        let bare = ElementFinding {
            selector: ".hero h2".into(),
            ..Default::default()
        };
        let issue = Issue::new(
            ContrastRule::ColorContrast,
            Reported::Value("serious".into()),
            "Ensures contrast",
            "Elements must meet minimum color contrast ratio thresholds",
            vec![full, bare],
        )
        .unwrap();
        IssueReport::new(vec![issue])
    }

    #[test]
    fn test_render_headings_and_rows() {
        let view = ReportRenderer::render(&sample_report());
        let ReportView::Issues(rendered) = view else {
            panic!("Expected issues view");
        };

        assert_eq!(rendered.summary, "Found 1 contrast issues:");
        let section = &rendered.sections[0];
        assert_eq!(section.title, "Issue 1: serious impact");
        assert_eq!(
            section.help,
            "Elements must meet minimum color contrast ratio thresholds (Minimum required contrast: 4.5:1)"
        );
        assert_eq!(section.rows.len(), 2);
        assert_eq!(section.rows[1].expected_contrast, "Unknown");
        assert_eq!(
            section.rows[0].lines()[2],
            "Actual Contrast: 2.1:1".to_string()
        );
    }

    #[test]
    fn test_empty_report_is_acknowledged() {
        assert_eq!(
            ReportRenderer::render(&IssueReport::empty()),
            ReportView::NoIssues
        );
    }

    #[test]
    fn test_row_click_selects_row_selector() {
        let view = ReportRenderer::render(&sample_report());
        let row = view.row("1.2".parse().unwrap()).unwrap();
        assert_eq!(
            row.on_click(),
            InspectorAction::Select(SelectRequest {
                selector: ".hero h2".into()
            })
        );
        assert!(view.row(RowId { issue: 2, element: 1 }).is_none());
    }

    #[test]
    fn test_row_id_parsing() {
        assert_eq!(
            "3.4".parse::<RowId>().unwrap(),
            RowId {
                issue: 3,
                element: 4
            }
        );
        assert!("0.1".parse::<RowId>().is_err());
        assert!("3".parse::<RowId>().is_err());
        assert!("a.b".parse::<RowId>().is_err());
    }
}
