use lumen_common::model::IssueReport;
use lumen_common::protocol::DocumentSession;
use std::collections::HashMap;

/// Reports computed during this Controller's lifetime, per inspected document.
#[derive(Debug, Default)]
pub struct SessionCache {
    reports: HashMap<DocumentSession, IssueReport>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes any earlier report for the same document.
    pub fn store(&mut self, session: DocumentSession, report: IssueReport) {
        self.reports.insert(session, report);
    }

    pub fn load(&self, session: DocumentSession) -> Option<&IssueReport> {
        self.reports.get(&session)
    }
}
