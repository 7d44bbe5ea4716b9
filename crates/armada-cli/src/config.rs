//! Configuration file – reads `~/.armada/config.toml`.
//!
//! ```toml
//! [api]
//! host = "0.0.0.0"
//! port = 3000
//! username = "admin"
//! password = "secret"
//! cert = "/etc/armada/cert.pem"
//! key = "/etc/armada/key.pem"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use armada_api::ApiConfig;
use armada_types::ArmadaError;
use serde::{Deserialize, Serialize};

/// Persisted configuration stored in `~/.armada/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Return the path to `~/.armada/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".armada").join("config.toml")
}

/// Load the file at `path` (defaults when absent), then apply environment
/// overrides.
pub fn resolve(path: &Path) -> Result<Config, ArmadaError> {
    let mut cfg = load_from(path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, ArmadaError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        ArmadaError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    let cfg = toml::from_str(&raw).map_err(|e| {
        ArmadaError::Config(format!("failed to parse config at {}: {e}", path.display()))
    })?;
    Ok(Some(cfg))
}

/// Apply `ARMADA_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ARMADA_HOST` | `api.host` |
/// | `ARMADA_PORT` | `api.port` (ignored unless a valid port) |
/// | `ARMADA_USERNAME` | `api.username` |
/// | `ARMADA_PASSWORD` | `api.password` |
/// | `ARMADA_CERT` | `api.cert` |
/// | `ARMADA_KEY` | `api.key` |
pub fn apply_env_overrides(cfg: &mut Config) {
    let api = &mut cfg.api;
    if let Ok(v) = std::env::var("ARMADA_HOST") {
        api.host = v;
    }
    if let Ok(v) = std::env::var("ARMADA_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        api.port = port;
    }
    if let Ok(v) = std::env::var("ARMADA_USERNAME") {
        api.username = v;
    }
    if let Ok(v) = std::env::var("ARMADA_PASSWORD") {
        api.password = v;
    }
    if let Ok(v) = std::env::var("ARMADA_CERT") {
        api.cert = v;
    }
    if let Ok(v) = std::env::var("ARMADA_KEY") {
        api.key = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn config_path_points_to_armada_dir() {
        let p = config_path_for_home("/home/testuser");
        assert_eq!(p, PathBuf::from("/home/testuser/.armada/config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn load_from_reads_api_table() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write(
            &dir,
            "[api]\nport = 8088\nusername = \"admin\"\npassword = \"secret\"\n",
        );
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.api.port, 8088);
        assert_eq!(cfg.api.host, "0.0.0.0");
        assert!(cfg.api.auth_enabled());
        assert!(!cfg.api.tls_enabled());
    }

    #[test]
    fn empty_file_is_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write(&dir, "");
        assert_eq!(load_from(&path).unwrap(), Some(Config::default()));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write(&dir, "[api]\nport = \"three thousand\"\n");
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ArmadaError::Config(ref msg) if msg.contains("failed to parse")));
    }

    #[test]
    fn apply_env_overrides_changes_host() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("ARMADA_HOST", "127.0.0.1") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.api.host, "127.0.0.1");
        unsafe { std::env::remove_var("ARMADA_HOST") };
    }

    #[test]
    fn apply_env_overrides_port_valid_then_invalid() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("ARMADA_PORT", "9999") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.api.port, 9999);

        unsafe { std::env::set_var("ARMADA_PORT", "not-a-port") };
        let mut cfg = Config::default();
        let original_port = cfg.api.port;
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.api.port, original_port);
        unsafe { std::env::remove_var("ARMADA_PORT") };
    }

    #[test]
    fn apply_env_overrides_changes_credentials() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe {
            std::env::set_var("ARMADA_USERNAME", "ops");
            std::env::set_var("ARMADA_PASSWORD", "hunter2");
        };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.api.username, "ops");
        assert_eq!(cfg.api.password, "hunter2");
        unsafe {
            std::env::remove_var("ARMADA_USERNAME");
            std::env::remove_var("ARMADA_PASSWORD");
        };
    }

    #[test]
    fn apply_env_overrides_changes_tls_paths() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe {
            std::env::set_var("ARMADA_CERT", "/tmp/cert.pem");
            std::env::set_var("ARMADA_KEY", "/tmp/key.pem");
        };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert!(cfg.api.tls_enabled());
        unsafe {
            std::env::remove_var("ARMADA_CERT");
            std::env::remove_var("ARMADA_KEY");
        };
    }
}
