use crate::model::IssueReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one loaded document. A navigation or reload starts a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSession(pub u64);

impl fmt::Display for DocumentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// The document the Controller is currently pointed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub session: DocumentSession,
    pub url: String,
    pub title: String,
}

/// Calls the Controller issues into the inspected document's context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InspectorAction {
    /// Load the accessibility engine into the document.
    InjectEngine,
    /// Run the contrast analysis and draw the flagged markers.
    Analyze,
    /// Move the selected marker to the first match of a selector.
    Select(SelectRequest),
    /// Keep a report inside the document for later Controller sessions.
    StashReport(StashRequest),
    /// Read back the stashed report, if any.
    LoadStash,
}

impl InspectorAction {
    pub fn name(&self) -> &'static str {
        match self {
            InspectorAction::InjectEngine => "inject_engine",
            InspectorAction::Analyze => "analyze",
            InspectorAction::Select(_) => "select",
            InspectorAction::StashReport(_) => "stash_report",
            InspectorAction::LoadStash => "load_stash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashRequest {
    pub report: IssueReport,
}

/// Responses received from the Inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InspectorResponse {
    Ok {
        data: InspectorData,
    },
    Error {
        code: String,
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

impl InspectorResponse {
    pub fn ok(data: InspectorData) -> Self {
        InspectorResponse::Ok { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InspectorData {
    Report { report: IssueReport },
    Stash { report: Option<IssueReport> },
    Selection(SelectionOutcome),
    Ack,
}

/// What a `select` call did to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub selector: String,
    /// False when the selector matched nothing and the selection was left alone.
    pub selected: bool,
}
