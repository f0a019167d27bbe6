use crate::config::{CONFIG_FILE_NAME, HooksConfig};
use crate::error::ConfigError;

use std::fs::{read_to_string, write};
use std::time::Duration;

use tempfile::TempDir;

/// **VALUE**: Verifies that a missing config file yields defaults instead of an error.
///
/// **WHY THIS MATTERS**: First launch has no config file. Failing there would mean the
/// client never connects on a fresh install.
#[test]
fn given_no_config_file_when_loading_then_returns_defaults() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().expect("temp dir");

    // WHEN: Loading
    let config = HooksConfig::load(dir.path()).expect("defaults");

    // THEN: Defaults throughout
    assert_eq!(config, HooksConfig::default());
    assert_eq!(config.connection.max_arguments, 20);
    assert_eq!(config.connection.retry_interval(), Duration::from_secs(1));
    assert_eq!(config.launch.url_opener, "gnome-open");
    assert_eq!(config.launch.folder_opener, "nautilus");
    assert_eq!(config.logging.level, "info");
    assert!(config.connection.socket_path.is_none());
}

/// **VALUE**: Verifies that a partial file fills the remaining fields with defaults.
#[test]
fn given_partial_config_file_when_loading_then_missing_fields_defaulted() {
    // GIVEN: A file that only overrides the retry interval
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{ "connection": { "retry_interval_ms": 250 } }"#,
    )
    .expect("write config");

    // WHEN: Loading
    let config = HooksConfig::load(dir.path()).expect("valid config");

    // THEN: Override applied, rest defaulted
    assert_eq!(config.connection.retry_interval_ms, 250);
    assert_eq!(config.connection.max_arguments, 20);
    assert_eq!(config.version, 1);
}

/// **VALUE**: Verifies that save writes a file load reads back identically, with no temp
/// file left behind.
#[test]
fn given_saved_config_when_loading_then_same_values() {
    // GIVEN: A customised config
    let dir = TempDir::new().expect("temp dir");
    let mut config = HooksConfig::default();
    config.connection.socket_path = Some(String::from("/run/user/1000/dropbox/iface_socket"));
    config.launch.url_opener = String::from("xdg-open");
    config.logging.level = String::from("debug");

    // WHEN: Saving into a nested directory that does not exist yet, then loading
    let nested = dir.path().join("dropbox-hooks");
    config.save(&nested).expect("save");
    let loaded = HooksConfig::load(&nested).expect("load");

    // THEN: Identical, and the temp file was renamed away
    assert_eq!(loaded, config);
    assert!(!nested.join(format!("{CONFIG_FILE_NAME}.tmp")).exists());
    let raw = read_to_string(nested.join(CONFIG_FILE_NAME)).expect("read back");
    assert!(raw.contains("xdg-open"));
}

/// **VALUE**: Verifies that invalid JSON is a parse error naming the file.
#[test]
fn given_invalid_json_when_loading_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    write(&path, "{ not json").expect("write config");

    let result = HooksConfig::load(dir.path());

    match result {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

/// **VALUE**: Verifies that out-of-range values are rejected with the offending field.
///
/// **BUG THIS CATCHES**: Would catch a zero retry interval slipping through and turning
/// the reconnect loop into a busy spin.
#[test]
fn given_out_of_range_values_when_validating_then_field_named() {
    let cases: [(&'static str, fn(&mut HooksConfig)); 6] = [
        ("version", |c| c.version = 2),
        ("connection.retry_interval_ms", |c| c.connection.retry_interval_ms = 0),
        ("connection.max_arguments", |c| c.connection.max_arguments = 0),
        ("connection.socket_path", |c| {
            c.connection.socket_path = Some(String::from("relative/iface_socket"))
        }),
        ("launch.url_opener", |c| c.launch.url_opener = String::from("  ")),
        ("logging.level", |c| c.logging.level = String::from("verbose")),
    ];

    for (expected_field, mutate) in cases {
        // GIVEN: Defaults with one bad value
        let mut config = HooksConfig::default();
        mutate(&mut config);

        // WHEN: Validating
        let result = config.validate();

        // THEN: The bad field is named
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected ValidationError for {expected_field}, got {other:?}"),
        }
    }
}

/// **VALUE**: Verifies that invalid values are refused on save too, leaving no file.
#[test]
fn given_invalid_config_when_saving_then_nothing_written() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = HooksConfig::default();
    config.connection.max_arguments = 5_000;

    let result = config.save(dir.path());

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
}

#[test]
fn given_uppercase_log_level_when_validating_then_accepted() {
    let mut config = HooksConfig::default();
    config.logging.level = String::from("DEBUG");

    assert!(config.validate().is_ok());
}
