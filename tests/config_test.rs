//! Tests for loading and rendering arena configuration.

use std::io::Write;
use strictly_arena::ArenaConfig;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Create temp file");
    file.write_all(content.as_bytes()).expect("Write config");
    file
}

#[test]
fn test_defaults() {
    let config = ArenaConfig::default();
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 3000);
    assert!(*config.continuous_play());
    assert_eq!(*config.recent_bot_limit(), 10);
    assert_eq!(config.log_filter(), "info,strictly_arena=debug");
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
host = "0.0.0.0"
port = 8080
continuous_play = false
recent_bot_limit = 3
log_filter = "warn"
"#,
    );

    let config = ArenaConfig::from_file(file.path()).expect("Load config");
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 8080);
    assert!(!*config.continuous_play());
    assert_eq!(*config.recent_bot_limit(), 3);
    assert_eq!(config.log_filter(), "warn");
}

#[test]
fn test_partial_file_fills_defaults() {
    let file = write_config("port = 4000\n");
    let config = ArenaConfig::from_file(file.path()).expect("Load config");
    assert_eq!(*config.port(), 4000);
    assert_eq!(config.host(), "127.0.0.1");
    assert!(*config.continuous_play());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("Create temp dir");
    let path = dir.path().join("absent.toml");
    let config = ArenaConfig::load(Some(path.as_path())).expect("Load defaults");
    assert_eq!(config, ArenaConfig::default());
    assert_eq!(ArenaConfig::load(None).expect("Load defaults"), ArenaConfig::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("port = \"not a number\"\n");
    let err = ArenaConfig::from_file(file.path()).expect_err("Parse should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_rendered_toml_loads_back() {
    let config = ArenaConfig::default()
        .with_host("localhost")
        .with_port(9001)
        .with_continuous_play(false);
    let rendered = config.to_toml().expect("Render config");
    assert!(rendered.contains("port = 9001"));

    let file = write_config(&rendered);
    assert_eq!(ArenaConfig::from_file(file.path()).expect("Reload"), config);
}
