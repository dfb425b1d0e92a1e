use async_trait::async_trait;
pub use lumen_common::error::BackendError;
use lumen_common::protocol::{InspectorAction, InspectorResponse, TargetInfo};

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub session: lumen_common::protocol::DocumentSession,
}

/// The Backend trait is the execute-in-context primitive every browser driver implements.
///
/// Each call is one request with one response. Callers hold `&mut self`, so a
/// caller never has two calls in flight.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser, connect to remote, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and cleanup resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL. Starts a new document session.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// The document currently open for inspection, if any.
    async fn active_target(&mut self) -> Result<Option<TargetInfo>, BackendError>;

    /// Run one inspector call inside the active document.
    async fn execute_inspector(
        &mut self,
        action: InspectorAction,
    ) -> Result<InspectorResponse, BackendError>;
}
