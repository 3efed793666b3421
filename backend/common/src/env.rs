//! # Environment
//!
//! Every `Config::load()` in the workspace goes through these helpers so that
//! business logic never touches the process environment.
//!
//! Secrets are looked up in the environment first, then in `/run/secrets/<NAME>`
//! (docker swarm style). A secret that is missing or blank is an error; the
//! caller is expected to refuse to start.
use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, warn};

pub const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

/// Trimmed, non-empty value of `key`.
pub fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, EnvError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            EnvError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

pub fn require(key: &str) -> Result<String, EnvError> {
    var(key).ok_or_else(|| EnvError::Missing(key.to_string()))
}

pub fn read_secret(secret_name: &str) -> Result<String, EnvError> {
    match var(secret_name) {
        Some(secret) => Ok(secret),
        None => read_secret_file(Path::new(SECRETS_DIR), secret_name),
    }
}

fn read_secret_file(dir: &Path, secret_name: &str) -> Result<String, EnvError> {
    let path: PathBuf = dir.join(secret_name);

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from {}: {e}", path.display());
        })
        .ok()
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| EnvError::Missing(secret_name.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("common-env-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_try_load_default() {
        let port: u16 = try_load("COMMON_TEST_UNSET_PORT", "3001").unwrap();
        assert_eq!(port, 3001);
    }

    #[test]
    fn test_try_load_from_env() {
        unsafe { env::set_var("COMMON_TEST_SET_PORT", " 8080 ") };

        let port: u16 = try_load("COMMON_TEST_SET_PORT", "3001").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_try_load_invalid() {
        unsafe { env::set_var("COMMON_TEST_BAD_PORT", "not-a-port") };

        let err = try_load::<u16>("COMMON_TEST_BAD_PORT", "3001").unwrap_err();
        assert!(matches!(err, EnvError::Invalid { ref key, .. } if key == "COMMON_TEST_BAD_PORT"));
    }

    #[test]
    fn test_require_blank_is_missing() {
        unsafe { env::set_var("COMMON_TEST_BLANK", "   ") };

        assert_eq!(
            require("COMMON_TEST_BLANK"),
            Err(EnvError::Missing("COMMON_TEST_BLANK".to_string()))
        );
    }

    #[test]
    fn test_secret_file_trimmed() {
        let dir = scratch_dir("trimmed");
        fs::write(dir.join("API_KEY"), "s3cret\n").unwrap();

        assert_eq!(read_secret_file(&dir, "API_KEY").unwrap(), "s3cret");
    }

    #[test]
    fn test_secret_file_missing_or_empty() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("EMPTY_KEY"), "\n").unwrap();

        assert!(read_secret_file(&dir, "EMPTY_KEY").is_err());
        assert_eq!(
            read_secret_file(&dir, "ABSENT_KEY"),
            Err(EnvError::Missing("ABSENT_KEY".to_string()))
        );
    }
}
