use crate::inject::{
    EvalError, evaluate_script, evaluate_unbounded, global_defined, retry_on_context_error,
};
use async_trait::async_trait;
use chromiumoxide::Page;
use lumen_engine::config::EngineConfig;
use lumen_engine::engine::{EngineResults, RunConfig};
use lumen_engine::inspector::{AccessibilityEngine, EngineError};
use std::path::PathBuf;
use tracing::{debug, info};

/// axe-core running inside the page.
pub struct AxeEngine {
    page: Page,
    script_path: PathBuf,
    global: String,
    source: Option<String>,
}

impl AxeEngine {
    pub fn new(page: Page, config: &EngineConfig) -> Self {
        Self {
            page,
            script_path: config.script_path.clone(),
            global: config.global.clone(),
            source: None,
        }
    }

    /// The bundle is read once and kept for later documents.
    async fn load_source(&mut self) -> Result<(), EngineError> {
        if self.source.is_none() {
            let source = tokio::fs::read_to_string(&self.script_path)
                .await
                .map_err(|e| {
                    EngineError::Injection(format!(
                        "Cannot read {}: {}",
                        self.script_path.display(),
                        e
                    ))
                })?;
            info!(
                "Loaded accessibility engine from {} ({} bytes)",
                self.script_path.display(),
                source.len()
            );
            self.source = Some(source);
        }
        Ok(())
    }

    fn run_expression(&self, config: &RunConfig) -> Result<String, EngineError> {
        let global = serde_json::to_string(&self.global)
            .map_err(|e| EngineError::Run(e.to_string()))?;
        let options =
            serde_json::to_string(config).map_err(|e| EngineError::Run(e.to_string()))?;
        Ok(format!(
            "(async () => {{ \
                const engine = window[{global}]; \
                if (!engine) {{ throw new Error('accessibility engine is not loaded'); }} \
                const results = await engine.run(document, {options}); \
                return {{ violations: results.violations }}; \
            }})()"
        ))
    }
}

/// A script exception is the engine's own failure. Losing the page is not.
fn run_error(e: EvalError) -> EngineError {
    match e {
        EvalError::Context(_) | EvalError::Timeout => EngineError::Context(e.to_string()),
        EvalError::Other(_) => EngineError::Run(e.to_string()),
    }
}

#[async_trait]
impl AccessibilityEngine for AxeEngine {
    async fn inject(&mut self) -> Result<(), EngineError> {
        let to_engine_error = |e: EvalError| EngineError::Injection(e.to_string());

        if global_defined(&self.page, &self.global)
            .await
            .map_err(to_engine_error)?
        {
            debug!("Engine already present, skipping injection");
            return Ok(());
        }

        self.load_source().await?;
        let page = &self.page;
        let source = self.source.as_deref().unwrap_or_default();
        retry_on_context_error("Engine injection", || evaluate_script(page, source))
            .await
            .map_err(to_engine_error)?;

        if global_defined(&self.page, &self.global)
            .await
            .map_err(to_engine_error)?
        {
            Ok(())
        } else {
            Err(EngineError::NotLoaded)
        }
    }

    async fn run(&mut self, config: &RunConfig) -> Result<EngineResults, EngineError> {
        let expression = self.run_expression(config)?;
        let value = evaluate_unbounded(&self.page, &expression)
            .await
            .map_err(run_error)?;
        serde_json::from_value(value).map_err(|e| EngineError::Malformed(e.to_string()))
    }
}
