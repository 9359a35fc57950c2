//! Integration tests for configuration management
//!
//! These tests verify that a full config file is loaded, validated and
//! processed with path expansion.

use std::io::Write;

use focus_engine::config::Config;
use focus_sdk::{BucketSet, Slot};

const FULL_TOML: &str = r#"
[core]
log_level = "debug"
data_dir = "~/.focus-sort-test"

[server]
host = "0.0.0.0"
port = 9090

[llm]
base_url = "http://localhost:1234/v1/"
model = "llama-3.1-8b-instant"
temperature = 0.2
max_tokens = 500
timeout_secs = 10

[buckets]
labels = ["Now", "Later", "Never"]

[generation]
rebalance = false
heuristic_override = false
min_per_bucket = 1
min_tasks = 6
target_tasks = 6
max_tasks = 8

[client]
endpoint = "http://localhost:9090/api/generate-tasks"
timeout_secs = 12
"#;

#[test]
fn test_full_config_parsing() {
    let config = Config::from_toml_str(FULL_TOML).unwrap();

    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    assert_eq!(config.llm.max_tokens, 500);
    assert!(!config.generation.rebalance);
    assert_eq!(config.generation.min_per_bucket, 1);
    assert_eq!(config.buckets.bucket_set(), BucketSet::legacy());
    assert_eq!(config.buckets.bucket_set().label(Slot::Later), "Never");

    let home = dirs::home_dir().unwrap();
    assert_eq!(config.core.data_dir, home.join(".focus-sort-test"));
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_TOML.as_bytes()).unwrap();

    let config = Config::load_from_path(file.path()).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.client.timeout_secs, 12);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_invalid_values_rejected() {
    let cases = [
        "[core]\nlog_level = \"loud\"\n",
        "[core]\n[llm]\ntemperature = 3.5\n",
        "[core]\n[llm]\nmax_tokens = 0\n",
        "[core]\n[buckets]\nlabels = [\"Now\", \"\", \"Never\"]\n",
        "[core]\n[generation]\nmax_tasks = 9\n",
        "[core]\n[generation]\nmin_per_bucket = 3\n",
        "[core]\n[client]\ntimeout_secs = 0\n",
    ];

    for toml in cases {
        assert!(Config::from_toml_str(toml).is_err(), "accepted: {toml}");
    }
}

#[test]
fn test_missing_core_section_rejected() {
    assert!(Config::from_toml_str("[server]\nport = 1\n").is_err());
}
