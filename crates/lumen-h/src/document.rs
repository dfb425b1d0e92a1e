//! [`Document`] over a live Chromium page, driven through the overlay helper.

use crate::inject::{EvalError, evaluate_with_timeout, inject_overlay, retry_on_context_error};
use async_trait::async_trait;
use chromiumoxide::Page;
use lumen_engine::inspector::{Document, DocumentError, ElementRef, Marker, ScrollOptions};
use lumen_scanner::OVERLAY_GLOBAL;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// What every `window.__lumen` call returns.
#[derive(Debug, Deserialize)]
struct HelperReply {
    ok: bool,
    #[serde(default)]
    refs: Vec<u64>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

impl HelperReply {
    fn into_result(self) -> Result<Vec<u64>, DocumentError> {
        if self.ok {
            return Ok(self.refs);
        }
        let message = self.message.unwrap_or_default();
        let detail = |key: &str| self.details.as_ref().and_then(|d| d.get(key)).cloned();
        match self.code.as_deref() {
            Some("SELECTOR_INVALID") => Err(DocumentError::InvalidSelector {
                selector: detail("selector")
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                reason: message,
            }),
            Some("ELEMENT_STALE") => {
                let element = detail("ref").and_then(|v| v.as_u64()).unwrap_or_default();
                Err(DocumentError::Stale(ElementRef(element)))
            }
            code => Err(DocumentError::Context(format!(
                "[{}] {}",
                code.unwrap_or("UNKNOWN"),
                message
            ))),
        }
    }
}

impl From<EvalError> for DocumentError {
    fn from(e: EvalError) -> Self {
        DocumentError::Context(e.to_string())
    }
}

pub struct CdpDocument {
    page: Page,
    timeout: Duration,
}

impl CdpDocument {
    pub fn new(page: Page, timeout: Duration) -> Self {
        Self { page, timeout }
    }

    /// Call `window.__lumen[method](...args)`, installing the helper first if
    /// the document lost it (navigation, reload).
    async fn call(&self, method: &str, args: &[Value]) -> Result<Vec<u64>, DocumentError> {
        let args = args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let expression = format!("window.{}.{}({})", OVERLAY_GLOBAL, method, args);
        tracing::trace!("Overlay call: {}", expression);

        let value = retry_on_context_error(method, || async {
            inject_overlay(&self.page).await?;
            evaluate_with_timeout(&self.page, &expression, self.timeout).await
        })
        .await?;

        let reply: HelperReply = serde_json::from_value(value)
            .map_err(|e| DocumentError::Context(format!("Malformed overlay reply: {}", e)))?;
        reply.into_result()
    }
}

#[async_trait]
impl Document for CdpDocument {
    async fn query_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, DocumentError> {
        let refs = self.call("queryAll", &[json!(selector)]).await?;
        Ok(refs.into_iter().map(ElementRef).collect())
    }

    async fn add_marker(
        &mut self,
        element: ElementRef,
        marker: Marker,
    ) -> Result<(), DocumentError> {
        self.call("mark", &[json!(element.0), json!(marker.as_str())])
            .await
            .map(drop)
    }

    async fn remove_marker(
        &mut self,
        element: ElementRef,
        marker: Marker,
    ) -> Result<(), DocumentError> {
        self.call("unmark", &[json!(element.0), json!(marker.as_str())])
            .await
            .map(drop)
    }

    async fn set_tooltip(&mut self, element: ElementRef, text: &str) -> Result<(), DocumentError> {
        self.call("tooltip", &[json!(element.0), json!(text)])
            .await
            .map(drop)
    }

    async fn scroll_into_view(
        &mut self,
        element: ElementRef,
        options: ScrollOptions,
    ) -> Result<(), DocumentError> {
        self.call(
            "scroll",
            &[
                json!(element.0),
                json!(options.behavior),
                json!(options.block),
            ],
        )
        .await
        .map(drop)
    }
}
