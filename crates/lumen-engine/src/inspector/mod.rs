//! Inspector: everything that runs against the inspected document.
//!
//! Backends own one [`Inspector`] per page and feed it [`InspectorAction`]s;
//! it answers with exactly one [`InspectorResponse`] per call.

pub mod analyzer;
pub mod document;
pub mod overlay;
pub mod stash;

pub use analyzer::{AccessibilityEngine, ContrastAnalyzer, EngineError};
pub use document::{Document, DocumentError, ElementRef, Marker, ScrollOptions};
pub use overlay::{HighlightOverlay, SelectionState};
pub use stash::ReportStash;

use lumen_common::protocol::{
    DocumentSession, InspectorAction, InspectorData, InspectorResponse, SelectionOutcome,
};
use serde_json::json;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl InspectorError {
    fn into_response(self) -> InspectorResponse {
        let (code, details) = match &self {
            InspectorError::Engine(_) => ("ENGINE_INJECTION_FAILED", None),
            InspectorError::Document(DocumentError::InvalidSelector { selector, .. }) => {
                ("SELECTOR_INVALID", Some(json!({ "selector": selector })))
            }
            InspectorError::Document(DocumentError::Stale(_)) => ("INSPECTOR_ERROR", None),
            InspectorError::Document(DocumentError::Context(_)) => ("CONTEXT_LOST", None),
        };
        InspectorResponse::Error {
            code: code.to_string(),
            message: self.to_string(),
            details,
            hint: None,
        }
    }
}

pub struct Inspector<E, D> {
    session: DocumentSession,
    engine: E,
    document: D,
    analyzer: ContrastAnalyzer,
    overlay: HighlightOverlay,
    stash: ReportStash,
}

impl<E: AccessibilityEngine, D: Document> Inspector<E, D> {
    pub fn new(session: DocumentSession, engine: E, document: D) -> Self {
        Self {
            session,
            engine,
            document,
            analyzer: ContrastAnalyzer::new(),
            overlay: HighlightOverlay::new(),
            stash: ReportStash::new(),
        }
    }

    pub fn session(&self) -> DocumentSession {
        self.session
    }

    pub fn selection(&self) -> SelectionState {
        self.overlay.selection()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// The current document is gone; drop its state and start `next`.
    pub fn teardown(&mut self, next: DocumentSession) {
        if self.stash.clear(self.session).is_some() {
            debug!("Cleared stashed report for {}", self.session);
        }
        self.overlay.reset();
        self.session = next;
    }

    pub async fn handle(&mut self, action: InspectorAction) -> InspectorResponse {
        let name = action.name();
        match self.dispatch(action).await {
            Ok(data) => InspectorResponse::ok(data),
            Err(e) => {
                info!("Inspector call {} failed: {}", name, e);
                e.into_response()
            }
        }
    }

    async fn dispatch(&mut self, action: InspectorAction) -> Result<InspectorData, InspectorError> {
        match action {
            InspectorAction::InjectEngine => {
                self.engine.inject().await?;
                Ok(InspectorData::Ack)
            }
            InspectorAction::Analyze => {
                let report = self
                    .analyzer
                    .analyze_and_mark(&mut self.engine, &mut self.overlay, &mut self.document)
                    .await?;
                Ok(InspectorData::Report { report })
            }
            InspectorAction::Select(req) => {
                let selected = self
                    .overlay
                    .select(&mut self.document, &req.selector)
                    .await?
                    .is_some();
                Ok(InspectorData::Selection(SelectionOutcome {
                    selector: req.selector,
                    selected,
                }))
            }
            InspectorAction::StashReport(req) => {
                self.stash.put(self.session, req.report);
                Ok(InspectorData::Ack)
            }
            InspectorAction::LoadStash => Ok(InspectorData::Stash {
                report: self.stash.get(self.session).cloned(),
            }),
        }
    }
}
