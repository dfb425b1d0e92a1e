use chromiumoxide::Page;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use lumen_scanner::{OVERLAY_GLOBAL, OVERLAY_JS};
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// Maximum retries for context errors during page navigation.
const MAX_CONTEXT_RETRIES: u32 = 10;

/// Delay between retries when context is not found (page navigating).
const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Check if an error indicates the page context is unavailable (e.g., during navigation).
pub(crate) fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

/// Retry an async operation that may fail due to context errors during page navigation.
/// Returns immediately on success or non-context errors; retries only on context errors.
pub(crate) async fn retry_on_context_error<T, F, Fut>(
    operation_name: &str,
    mut operation: F,
) -> Result<T, EvalError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EvalError>>,
{
    let mut last_error = None;

    for attempt in 0..MAX_CONTEXT_RETRIES {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(EvalError::Context(err_str)) => {
                tracing::debug!(
                    "{} context error (attempt {}/{}), retrying...",
                    operation_name,
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err_str);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(EvalError::Context(last_error.unwrap_or_else(|| {
        format!("{} failed after retries", operation_name)
    })))
}

#[derive(Debug)]
pub enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Timeout => {
                write!(f, "Timed out, possibly blocked by a dialog (alert/confirm/prompt)")
            }
            EvalError::Context(msg) => write!(f, "Context unavailable: {}", msg),
            EvalError::Other(msg) => write!(f, "Evaluation failed: {}", msg),
        }
    }
}

impl Error for EvalError {}

fn params(expression: &str) -> Result<EvaluateParams, EvalError> {
    EvaluateParams::builder()
        .expression(expression)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(EvalError::Other)
}

fn classify(err: chromiumoxide::error::CdpError) -> EvalError {
    let err_str = err.to_string();
    if is_context_error(&err_str) {
        EvalError::Context(err_str)
    } else {
        EvalError::Other(err_str)
    }
}

/// Evaluate once, classifying the failure.
async fn evaluate_once(page: &Page, expression: &str) -> Result<serde_json::Value, EvalError> {
    page.evaluate_expression(params(expression)?)
        .await
        .map_err(classify)?
        .into_value::<serde_json::Value>()
        .map_err(|e| EvalError::Other(format!("Failed to get result: {}", e)))
}

/// Run a script for its side effects. Its completion value is ignored.
pub(crate) async fn evaluate_script(page: &Page, source: &str) -> Result<(), EvalError> {
    page.evaluate_expression(params(source)?)
        .await
        .map_err(classify)?;
    Ok(())
}

/// Evaluate with a deadline. A dialog blocking the JS thread shows up as a timeout.
pub(crate) async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
    timeout: Duration,
) -> Result<serde_json::Value, EvalError> {
    match tokio::time::timeout(timeout, evaluate_once(page, expression)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(result) => result,
    }
}

/// Evaluate without a deadline, awaiting any returned promise.
pub(crate) async fn evaluate_unbounded(
    page: &Page,
    expression: &str,
) -> Result<serde_json::Value, EvalError> {
    evaluate_once(page, expression).await
}

/// True when `window[global]` is defined in the current document.
pub(crate) async fn global_defined(page: &Page, global: &str) -> Result<bool, EvalError> {
    let global_json =
        serde_json::to_string(global).map_err(|e| EvalError::Other(e.to_string()))?;
    let expression = format!("typeof window[{}] !== 'undefined'", global_json);
    let value = evaluate_once(page, &expression).await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Install the overlay helper unless the document already has it.
pub async fn inject_overlay(page: &Page) -> Result<(), EvalError> {
    retry_on_context_error("Overlay injection", || try_inject_overlay(page)).await
}

async fn try_inject_overlay(page: &Page) -> Result<(), EvalError> {
    if !global_defined(page, OVERLAY_GLOBAL).await? {
        evaluate_script(page, OVERLAY_JS).await?;
    }
    Ok(())
}
