use crate::controller::renderer::{NO_ISSUES_MESSAGE, ReportView};
use lumen_common::protocol::SelectionOutcome;

pub fn format_view(view: &ReportView) -> String {
    match view {
        ReportView::NoIssues => NO_ISSUES_MESSAGE.to_string(),
        ReportView::Issues(report) => {
            let mut output = report.summary.clone();
            for section in &report.sections {
                output.push_str(&format!("\n\n## {}\n", section.title));
                output.push_str(&section.description);
                output.push_str(&format!("\n_{}_", section.help));
                for row in &section.rows {
                    let mut lines = row.lines().into_iter();
                    if let Some(first) = lines.next() {
                        output.push_str(&format!("\n  [{}] {}", row.id, first));
                    }
                    for line in lines {
                        output.push_str(&format!("\n        {}", line));
                    }
                }
            }
            output
        }
    }
}

pub fn format_selection(outcome: &SelectionOutcome) -> String {
    if outcome.selected {
        format!("Selected {}", outcome.selector)
    } else {
        format!("No element matches {} any more", outcome.selector)
    }
}
