//! Controller: orchestrates scans and browses the resulting report.
//!
//! A `Controller` lives as long as one inspection session of the operator.
//! Dropping it and creating a new one is the equivalent of closing and
//! reopening the report panel; the Inspector-side stash survives that.

pub mod cache;
pub mod renderer;

pub use cache::SessionCache;
pub use renderer::{FindingRow, RenderedReport, ReportRenderer, ReportView, RowId};

use crate::backend::{Backend, BackendError};
use lumen_common::error_mapping::map_inspector_error;
use lumen_common::model::IssueReport;
use lumen_common::protocol::{
    InspectorAction, InspectorData, InspectorResponse, SelectionOutcome, StashRequest,
};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("No active tab found")]
    NoActiveTarget,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Unexpected {got} response to {action}")]
    UnexpectedResponse {
        action: &'static str,
        got: &'static str,
    },

    #[error("No report to browse. Run 'check' first.")]
    NoReport,

    #[error("No row {0} in the current report")]
    UnknownRow(RowId),
}

#[derive(Debug, Default)]
pub struct Controller {
    cache: SessionCache,
    view: Option<ReportView>,
    calls: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// The report currently on display, if any.
    pub fn view(&self) -> Option<&ReportView> {
        self.view.as_ref()
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Show the last known report for the active document without scanning.
    ///
    /// Looks in this Controller's cache first, then in the document stash.
    /// Returns `None` when there is no target or nothing worth showing.
    pub async fn open<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<Option<ReportView>, ControllerError> {
        let Some(target) = backend.active_target().await? else {
            debug!("Opened without an active target");
            return Ok(None);
        };

        let report = match self.cache.load(target.session) {
            Some(report) => {
                debug!("Using cached report for {}", target.session);
                report.clone()
            }
            None => match self.call(backend, InspectorAction::LoadStash).await? {
                InspectorData::Stash {
                    report: Some(report),
                } => {
                    info!("Restored stashed report for {}", target.session);
                    self.cache.store(target.session, report.clone());
                    report
                }
                InspectorData::Stash { report: None } => return Ok(None),
                other => return Err(unexpected("load_stash", &other)),
            },
        };

        if report.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.show(&report)))
    }

    /// Scan the active document and show the result.
    ///
    /// A scan that finds nothing yields [`ReportView::NoIssues`], not an error.
    pub async fn check_contrast<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<ReportView, ControllerError> {
        let target = backend
            .active_target()
            .await?
            .ok_or(ControllerError::NoActiveTarget)?;
        info!("Checking contrast on {} ({})", target.url, target.session);

        match self.call(backend, InspectorAction::InjectEngine).await? {
            InspectorData::Ack => {}
            other => return Err(unexpected("inject_engine", &other)),
        }

        let report = match self.call(backend, InspectorAction::Analyze).await? {
            InspectorData::Report { report } => report,
            other => return Err(unexpected("analyze", &other)),
        };

        let stash = InspectorAction::StashReport(StashRequest {
            report: report.clone(),
        });
        match self.call(backend, stash).await? {
            InspectorData::Ack => {}
            other => return Err(unexpected("stash_report", &other)),
        }

        self.cache.store(target.session, report.clone());
        Ok(self.show(&report))
    }

    /// Handle a click on a report row: select its element in the document.
    pub async fn select_row<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        id: RowId,
    ) -> Result<SelectionOutcome, ControllerError> {
        let view = self.view.as_ref().ok_or(ControllerError::NoReport)?;
        let action = view
            .row(id)
            .ok_or(ControllerError::UnknownRow(id))?
            .on_click();

        if backend.active_target().await?.is_none() {
            return Err(ControllerError::NoActiveTarget);
        }

        match self.call(backend, action).await? {
            InspectorData::Selection(outcome) => {
                if !outcome.selected {
                    debug!("Row {} no longer matches an element", id);
                }
                Ok(outcome)
            }
            other => Err(unexpected("select", &other)),
        }
    }

    fn show(&mut self, report: &IssueReport) -> ReportView {
        let view = ReportRenderer::render(report);
        self.view = Some(view.clone());
        view
    }

    /// One request, one response. `&mut self` keeps it to one call in flight.
    async fn call<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        action: InspectorAction,
    ) -> Result<InspectorData, ControllerError> {
        self.calls += 1;
        debug!("Inspector call #{}: {}", self.calls, action.name());

        match backend.execute_inspector(action).await? {
            InspectorResponse::Ok { data } => Ok(data),
            InspectorResponse::Error {
                code,
                message,
                details,
                ..
            } => Err(map_inspector_error(&code, &message, details.as_ref()).into()),
        }
    }
}

fn unexpected(action: &'static str, data: &InspectorData) -> ControllerError {
    let got = match data {
        InspectorData::Report { .. } => "report",
        InspectorData::Stash { .. } => "stash",
        InspectorData::Selection(_) => "selection",
        InspectorData::Ack => "ack",
    };
    ControllerError::UnexpectedResponse { action, got }
}
