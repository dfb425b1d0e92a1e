use lumen_common::model::IssueReport;
use lumen_common::protocol::DocumentSession;
use std::collections::HashMap;

/// Last report per document session, kept on the Inspector side.
///
/// A slot exists from the first stash for a session until that session's
/// document is torn down.
#[derive(Debug, Default)]
pub struct ReportStash {
    slots: HashMap<DocumentSession, IssueReport>,
}

impl ReportStash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was stashed for `session`.
    pub fn put(&mut self, session: DocumentSession, report: IssueReport) {
        self.slots.insert(session, report);
    }

    pub fn get(&self, session: DocumentSession) -> Option<&IssueReport> {
        self.slots.get(&session)
    }

    pub fn clear(&mut self, session: DocumentSession) -> Option<IssueReport> {
        self.slots.remove(&session)
    }
}
