// Tests for configuration loading

use anyhow::Result;
use loqa_session_monitor::Config;
use std::env;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

// Environment overrides are process-wide; every load in this file holds
// the lock so the override test can't leak into the others.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const POLL_OVERRIDE: &str = "LOQA_SESSIONS__MONITOR__POLL_INTERVAL_MS";

#[test]
fn test_defaults_when_file_missing() -> Result<()> {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("absent");

    let cfg = Config::load(path.to_str().unwrap())?;

    assert_eq!(cfg.poll_interval(), Duration::from_millis(200));
    assert_eq!(cfg.refresh_interval(), Duration::from_millis(250));
    assert_eq!(cfg.log_level(), tracing::Level::INFO);

    Ok(())
}

#[test]
fn test_file_overrides_defaults() -> Result<()> {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("monitor.toml");
    fs::write(
        &path,
        "[monitor]\npoll_interval_ms = 50\n\n[logging]\nlevel = \"debug\"\n",
    )?;

    let cfg = Config::load(path.to_str().unwrap())?;

    assert_eq!(cfg.poll_interval(), Duration::from_millis(50));
    assert_eq!(cfg.refresh_interval(), Duration::from_millis(250), "Untouched keys keep defaults");
    assert_eq!(cfg.log_level(), tracing::Level::DEBUG);

    Ok(())
}

#[test]
fn test_zero_interval_rejected() -> Result<()> {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("monitor.toml");
    fs::write(&path, "[dashboard]\nrefresh_interval_ms = 0\n")?;

    let err = Config::load(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("refresh_interval_ms"));

    Ok(())
}

#[test]
fn test_unknown_log_level_falls_back_to_info() -> Result<()> {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("monitor.toml");
    fs::write(&path, "[logging]\nlevel = \"chatty\"\n")?;

    let cfg = Config::load(path.to_str().unwrap())?;
    assert_eq!(cfg.log_level(), tracing::Level::INFO);

    Ok(())
}

#[test]
fn test_environment_overrides_file_and_defaults() -> Result<()> {
    let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("monitor.toml");
    fs::write(&path, "[monitor]\npoll_interval_ms = 50\n")?;

    env::set_var(POLL_OVERRIDE, "100");
    let with_file = Config::load(path.to_str().unwrap());
    let without_file = Config::load(temp_dir.path().join("absent").to_str().unwrap());
    env::remove_var(POLL_OVERRIDE);

    assert_eq!(with_file?.poll_interval(), Duration::from_millis(100));

    let cfg = without_file?;
    assert_eq!(cfg.poll_interval(), Duration::from_millis(100));
    assert_eq!(cfg.refresh_interval(), Duration::from_millis(250));

    Ok(())
}
