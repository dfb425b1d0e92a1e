//! Shared command pipeline for Lumen binaries: parse → dispatch → format.

use crate::backend::{Backend, BackendError};
use crate::command::{Command, HELP_TEXT, ParseError};
use crate::controller::{Controller, ControllerError};
use crate::formatter::{format_selection, format_view};

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Error checking contrast: {0}")]
    Check(#[source] ControllerError),

    #[error("{0}")]
    Controller(#[from] ControllerError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] BackendError),
}

impl ExecutorError {
    /// What the operator can do about it, when there is something.
    pub fn hint(&self) -> Option<&'static str> {
        let controller = match self {
            ExecutorError::Check(e) | ExecutorError::Controller(e) => e,
            ExecutorError::Navigation(e) => return Some(e.recovery_hint()),
            ExecutorError::Parse(_) => return Some("Type 'help' for the list of commands"),
        };
        match controller {
            ControllerError::Backend(e) => Some(e.recovery_hint()),
            ControllerError::NoActiveTarget => Some(BackendError::NoActiveTarget.recovery_hint()),
            ControllerError::NoReport => None,
            ControllerError::UnknownRow(_) => Some("Use 'show' to list the rows"),
            ControllerError::UnexpectedResponse { .. } => None,
        }
    }
}

/// Result of executing a command.
pub struct ExecutionResult {
    /// Formatted output string for display.
    pub output: String,
}

#[derive(Default)]
pub struct CommandExecutor {
    controller: Controller,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub async fn execute_line<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        line: &str,
    ) -> Result<ExecutionResult, ExecutorError> {
        let command: Command = line.parse()?;
        let output = self.execute(backend, command).await?;
        Ok(ExecutionResult { output })
    }

    pub async fn execute<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        command: Command,
    ) -> Result<String, ExecutorError> {
        match command {
            Command::GoTo(url) => {
                let res = backend.navigate(&url).await?;
                Ok(format!("Navigated to {} \"{}\"", res.url, res.title))
            }
            Command::Check => {
                let view = self
                    .controller
                    .check_contrast(backend)
                    .await
                    .map_err(ExecutorError::Check)?;
                Ok(format_view(&view))
            }
            Command::Open => {
                self.controller = Controller::new();
                match self.controller.open(backend).await? {
                    Some(view) => Ok(format_view(&view)),
                    None => Ok("No previous report for this page.".to_string()),
                }
            }
            Command::Show => match self.controller.view() {
                Some(view) => Ok(format_view(view)),
                None => Ok("No report to show. Run 'check' first.".to_string()),
            },
            Command::Select(row) => {
                let outcome = self.controller.select_row(backend, row).await?;
                Ok(format_selection(&outcome))
            }
            Command::Help => Ok(HELP_TEXT.to_string()),
        }
    }
}
