use lumen_engine::config::{ConfigLoader, LumenConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn test_default_values() {
    let config = LumenConfig::default();
    assert_eq!(config.engine.script_path, PathBuf::from("lib/axe.min.js"));
    assert_eq!(config.engine.global, "axe");
    assert!(!config.browser.visible);
    assert_eq!(config.browser.eval_timeout_ms, 10000);
    assert_eq!(config.logging.filter, "info");
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
engine:
  script_path: "/opt/axe/axe.js"
browser:
  visible: true
  eval_timeout_ms: 2500
logging:
  filter: "lumen_engine=debug"
"#
    )
    .unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();
    assert_eq!(config.engine.script_path, PathBuf::from("/opt/axe/axe.js"));
    // Unset keys keep their defaults.
    assert_eq!(config.engine.global, "axe");
    assert!(config.browser.visible);
    assert_eq!(config.browser.eval_timeout_ms, 2500);
    assert!(config.browser.chrome_bin.is_none());
    assert_eq!(config.logging.filter, "lumen_engine=debug");
}

#[tokio::test]
async fn test_partial_section_is_filled_in() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "browser:\n  chrome_bin: /usr/bin/chromium").unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();
    assert_eq!(
        config.browser.chrome_bin.as_deref(),
        Some(Path::new("/usr/bin/chromium"))
    );
    assert_eq!(config.browser.eval_timeout_ms, 10000);
    assert_eq!(config.engine.script_path, PathBuf::from("lib/axe.min.js"));
}

#[tokio::test]
async fn test_load_from_nonexistent_file() {
    let result = ConfigLoader::load_from(Path::new("/nonexistent/path/lumen.yaml")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_from_invalid_yaml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{invalid yaml: [unclosed").unwrap();

    let result = ConfigLoader::load_from(file.path()).await;
    assert!(result.is_err());
}
