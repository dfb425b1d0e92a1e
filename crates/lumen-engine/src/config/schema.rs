use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LumenConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bundle injected into the page before each analysis.
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,
    /// Global the bundle defines.
    #[serde(default = "default_engine_global")]
    pub global: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            global: default_engine_global(),
        }
    }
}

fn default_script_path() -> PathBuf {
    PathBuf::from("lib/axe.min.js")
}

fn default_engine_global() -> String {
    "axe".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub chrome_bin: Option<PathBuf>,
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,
    /// Applies to overlay helper calls only. Engine runs are never timed out.
    #[serde(default = "default_eval_timeout_ms")]
    pub eval_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            visible: false,
            chrome_bin: None,
            user_data_dir: None,
            eval_timeout_ms: default_eval_timeout_ms(),
        }
    }
}

fn default_eval_timeout_ms() -> u64 {
    10000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
