//! Error Code Mapping
//!
//! Maps `InspectorResponse::Error` codes back to `BackendError` variants so the
//! Controller sees one error type whichever side of the boundary failed.

use crate::error::BackendError;
use serde_json::Value;

/// Maps an inspector error code and message to a BackendError.
pub fn map_inspector_error(code: &str, message: &str, details: Option<&Value>) -> BackendError {
    match code {
        "NAVIGATION_ERROR" => BackendError::Navigation(message.to_string()),
        "NO_ACTIVE_TARGET" => BackendError::NoActiveTarget,
        "ENGINE_INJECTION_FAILED" => BackendError::EngineInjection(message.to_string()),
        "SELECTOR_INVALID" => {
            let selector = details
                .and_then(|d| d.get("selector"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            BackendError::SelectorInvalid { selector }
        }
        "SCRIPT_ERROR" => BackendError::ScriptError(message.to_string()),
        "TIMEOUT" => BackendError::TimeoutWithContext {
            operation: message.to_string(),
        },
        "INVALID_REQUEST" | "INVALID_PARAMS" => BackendError::InvalidRequest(message.to_string()),
        "INSPECTOR_ERROR" => BackendError::Inspector(message.to_string()),
        "CONTEXT_LOST" => BackendError::ContextLost(message.to_string()),
        "NOT_READY" => BackendError::NotReady,
        "INTERNAL_ERROR" => BackendError::Other(message.to_string()),
        _ => BackendError::Other(format!("[{}] {}", code, message)),
    }
}
