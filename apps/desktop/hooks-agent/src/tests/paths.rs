use crate::error::AgentError;
use crate::paths::{AgentPaths, HOME_OVERRIDE_ENV};

use std::env::{remove_var, set_var};
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies that an explicit home keeps config and logs side by side.
#[test]
fn given_home_override_when_resolving_then_config_and_logs_under_it() {
    let home = PathBuf::from("/srv/hooks");

    let paths = AgentPaths::resolve_with(
        Some(home.clone()),
        Some(PathBuf::from("/ignored/config")),
        Some(PathBuf::from("/ignored/data")),
    )
    .expect("override resolves");

    assert_eq!(paths.config_dir, home.join("config"));
    assert_eq!(paths.log_dir, home.join("logs"));
}

/// **VALUE**: Verifies the platform fallback layout.
#[test]
fn given_platform_dirs_when_resolving_then_app_subdirectories_used() {
    let paths = AgentPaths::resolve_with(
        None,
        Some(PathBuf::from("/home/u/.config")),
        Some(PathBuf::from("/home/u/.local/share")),
    )
    .expect("platform dirs resolve");

    assert_eq!(paths.config_dir, PathBuf::from("/home/u/.config/dropbox-hooks"));
    assert_eq!(
        paths.log_dir,
        PathBuf::from("/home/u/.local/share/dropbox-hooks/logs")
    );
}

/// **VALUE**: Verifies that missing platform directories produce a Paths error.
///
/// **BUG THIS CATCHES**: Would catch a silent fallback to the working directory, which
/// scatters log files wherever the agent happened to be started.
#[test]
fn given_no_directories_when_resolving_then_paths_error() {
    let result = AgentPaths::resolve_with(None, None, Some(PathBuf::from("/data")));

    assert!(matches!(result, Err(AgentError::Paths { .. })));
}

/// **VALUE**: Verifies that the environment variable is honoured by `resolve`.
#[test]
#[serial]
fn given_env_override_when_resolving_then_uses_env_home() {
    // GIVEN: DROPBOX_HOOKS_HOME pointing at a temp dir
    let home = TempDir::new().expect("temp dir");
    // SAFETY: serialized with every other test that touches the environment
    unsafe { set_var(HOME_OVERRIDE_ENV, home.path()) };

    // WHEN: Resolving
    let result = AgentPaths::resolve();
    unsafe { remove_var(HOME_OVERRIDE_ENV) };

    // THEN: Paths under the override, and the log dir can be created
    let paths = result.expect("override resolves");
    assert_eq!(paths, AgentPaths::under(home.path()));
    paths.ensure_log_dir().expect("log dir created");
    assert!(home.path().join("logs").is_dir());
}

/// **VALUE**: Verifies that an empty variable is treated as unset.
#[test]
#[serial]
fn given_empty_env_override_when_resolving_then_ignored() {
    // SAFETY: serialized with every other test that touches the environment
    unsafe { set_var(HOME_OVERRIDE_ENV, "") };

    let result = AgentPaths::resolve();
    unsafe { remove_var(HOME_OVERRIDE_ENV) };

    if let Ok(paths) = result {
        assert_ne!(paths, AgentPaths::under(&PathBuf::new()));
    }
}
