use crate::cdp::CdpClient;
use crate::document::CdpDocument;
use crate::engine::AxeEngine;
use async_trait::async_trait;
use lumen_engine::backend::{Backend, BackendError, NavigationResult};
use lumen_engine::config::LumenConfig;
use lumen_engine::inspector::Inspector;
use lumen_engine::protocol::{DocumentSession, InspectorAction, InspectorResponse, TargetInfo};
use std::time::Duration;
use tracing::info;

/// Chromium driven over CDP. One page, inspected in-process.
pub struct HeadlessBackend {
    config: LumenConfig,
    client: Option<CdpClient>,
    inspector: Option<Inspector<AxeEngine, CdpDocument>>,
    last_session: u64,
}

impl HeadlessBackend {
    pub fn new(config: LumenConfig) -> Self {
        Self {
            config,
            client: None,
            inspector: None,
            last_session: 0,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    fn next_session(&mut self) -> DocumentSession {
        self.last_session += 1;
        DocumentSession(self.last_session)
    }

    async fn page_info(page: &chromiumoxide::Page) -> Result<(String, String), BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok((url, title))
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(LumenConfig::default())
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Headless Backend (Chromium)...");
        let client = CdpClient::launch(&self.config.browser)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;

        let timeout = Duration::from_millis(self.config.browser.eval_timeout_ms);
        let engine = AxeEngine::new(client.page.clone(), &self.config.engine);
        let document = CdpDocument::new(client.page.clone(), timeout);
        let session = self.next_session();
        self.inspector = Some(Inspector::new(session, engine, document));
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.inspector = None;
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let session = self.next_session();
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        info!("Navigating to: {}", url);
        client
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        if let Some(inspector) = self.inspector.as_mut() {
            inspector.teardown(session);
        }

        let (url, title) = Self::page_info(&client.page).await?;
        Ok(NavigationResult {
            url,
            title,
            session,
        })
    }

    async fn active_target(&mut self) -> Result<Option<TargetInfo>, BackendError> {
        let (Some(client), Some(inspector)) = (self.client.as_ref(), self.inspector.as_ref())
        else {
            return Ok(None);
        };
        let (url, title) = Self::page_info(&client.page).await?;
        Ok(Some(TargetInfo {
            session: inspector.session(),
            url,
            title,
        }))
    }

    async fn execute_inspector(
        &mut self,
        action: InspectorAction,
    ) -> Result<InspectorResponse, BackendError> {
        let inspector = self.inspector.as_mut().ok_or(BackendError::NotReady)?;
        Ok(inspector.handle(action).await)
    }
}
