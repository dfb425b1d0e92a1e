/// Failures of the execute-in-context primitive and the backends behind it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("No active tab found")]
    NoActiveTarget,

    #[error("Engine injection failed: {0}")]
    EngineInjection(String),

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    #[error("Script execution error: {0}")]
    ScriptError(String),

    #[error("Timeout: {operation}")]
    TimeoutWithContext { operation: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Inspector failed: {0}")]
    Inspector(String),

    #[error("Target context destroyed: {0}")]
    ContextLost(String),

    #[error("Not ready")]
    NotReady,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl BackendError {
    /// Wire code used in `InspectorResponse::Error`.
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Navigation(_) => "NAVIGATION_ERROR",
            BackendError::NoActiveTarget => "NO_ACTIVE_TARGET",
            BackendError::EngineInjection(_) => "ENGINE_INJECTION_FAILED",
            BackendError::SelectorInvalid { .. } => "SELECTOR_INVALID",
            BackendError::ScriptError(_) => "SCRIPT_ERROR",
            BackendError::TimeoutWithContext { .. } => "TIMEOUT",
            BackendError::InvalidRequest(_) => "INVALID_REQUEST",
            BackendError::Inspector(_) => "INSPECTOR_ERROR",
            BackendError::ContextLost(_) => "CONTEXT_LOST",
            BackendError::NotReady => "NOT_READY",
            BackendError::Io(_) => "IO_ERROR",
            BackendError::Serialization(_) => "SERIALIZATION_ERROR",
            BackendError::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            BackendError::NoActiveTarget | BackendError::NotReady => {
                "Open a page before checking contrast"
            }
            BackendError::EngineInjection(_) => "Check engine.script_path in the configuration",
            BackendError::ContextLost(_) => "The page navigated away; run check again",
            BackendError::TimeoutWithContext { .. } => "Dismiss any open dialog and retry",
            BackendError::SelectorInvalid { .. } => "Run check again to refresh selectors",
            BackendError::Navigation(_) => "Check URL and network connectivity",
            _ => "Retry; if it keeps failing, reload the page",
        }
    }
}
