//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables during request handling; the binaries
//! read them and hand the raw values to the `*_from_env_value` parsers below.

use crate::constants::{
    DEFAULT_DATABASE_FILE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_DIR, TEST_UPLOAD_DIR,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which configuration profile the process runs under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Testing,
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "testing" => Ok(Self::Testing),
            other => Err(CoreError::InvalidInput(format!(
                "unknown configuration {other:?} (expected \"production\" or \"testing\")"
            ))),
        }
    }
}

/// Where the SQLite database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    environment: Environment,
    database: DatabaseLocation,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// Unset values fall back to the defaults of `environment`: production uses
    /// `tuneful.db` and `uploads/`, testing uses an in-memory database and `test-uploads/`.
    pub fn new(
        environment: Environment,
        database_path: Option<PathBuf>,
        upload_dir: Option<PathBuf>,
        max_upload_bytes: Option<usize>,
    ) -> CoreResult<Self> {
        let database = match (database_path, environment) {
            (Some(path), _) => DatabaseLocation::File(path),
            (None, Environment::Production) => {
                DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_FILE))
            }
            (None, Environment::Testing) => DatabaseLocation::InMemory,
        };

        let upload_dir = upload_dir.unwrap_or_else(|| match environment {
            Environment::Production => PathBuf::from(DEFAULT_UPLOAD_DIR),
            Environment::Testing => PathBuf::from(TEST_UPLOAD_DIR),
        });
        if upload_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "upload directory cannot be empty".into(),
            ));
        }

        let max_upload_bytes = max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(CoreError::InvalidInput(
                "maximum upload size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            environment,
            database,
            upload_dir,
            max_upload_bytes,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

/// Parse the configuration profile from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `Environment::Production`.
pub fn environment_from_env_value(value: Option<String>) -> CoreResult<Environment> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<Environment>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse an optional path value; empty/whitespace counts as unset.
pub fn path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parse the maximum upload size in bytes from an optional string value.
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> CoreResult<Option<usize>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<usize>().map_err(|e| {
                CoreError::InvalidInput(format!("invalid maximum upload size {v:?}: {e}"))
            })
        })
        .transpose()
}

/// Build a `CoreConfig` from raw (optional) environment values.
///
/// Binaries read `TUNEFUL_CONFIG`, `TUNEFUL_DATABASE_PATH`, `TUNEFUL_UPLOAD_DIR` and
/// `TUNEFUL_MAX_UPLOAD_BYTES` and pass them here in that order.
pub fn config_from_env_values(
    environment: Option<String>,
    database_path: Option<String>,
    upload_dir: Option<String>,
    max_upload_bytes: Option<String>,
) -> CoreResult<CoreConfig> {
    CoreConfig::new(
        environment_from_env_value(environment)?,
        path_from_env_value(database_path),
        path_from_env_value(upload_dir),
        max_upload_bytes_from_env_value(max_upload_bytes)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_production() {
        assert_eq!(
            environment_from_env_value(None).unwrap(),
            Environment::Production
        );
        assert_eq!(
            environment_from_env_value(Some("  ".into())).unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn test_environment_parses_case_insensitively() {
        assert_eq!(
            environment_from_env_value(Some("Testing".into())).unwrap(),
            Environment::Testing
        );
    }

    #[test]
    fn test_environment_rejects_unknown_values() {
        let err = environment_from_env_value(Some("staging".into())).expect_err("should reject");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("staging")));
    }

    #[test]
    fn test_production_defaults() {
        let cfg = CoreConfig::new(Environment::Production, None, None, None).unwrap();
        assert_eq!(
            cfg.database(),
            &DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_FILE))
        );
        assert_eq!(cfg.upload_dir(), Path::new(DEFAULT_UPLOAD_DIR));
        assert_eq!(cfg.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_testing_defaults() {
        let cfg = CoreConfig::new(Environment::Testing, None, None, None).unwrap();
        assert_eq!(cfg.database(), &DatabaseLocation::InMemory);
        assert_eq!(cfg.upload_dir(), Path::new(TEST_UPLOAD_DIR));
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let cfg = CoreConfig::new(
            Environment::Testing,
            Some(PathBuf::from("/tmp/songs.db")),
            Some(PathBuf::from("/tmp/blobs")),
            Some(1024),
        )
        .unwrap();
        assert_eq!(
            cfg.database(),
            &DatabaseLocation::File(PathBuf::from("/tmp/songs.db"))
        );
        assert_eq!(cfg.upload_dir(), Path::new("/tmp/blobs"));
        assert_eq!(cfg.max_upload_bytes(), 1024);
    }

    #[test]
    fn test_zero_upload_limit_is_rejected() {
        let err = CoreConfig::new(Environment::Production, None, None, Some(0))
            .expect_err("should reject");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_max_upload_bytes_parsing() {
        assert_eq!(max_upload_bytes_from_env_value(None).unwrap(), None);
        assert_eq!(
            max_upload_bytes_from_env_value(Some("2048".into())).unwrap(),
            Some(2048)
        );
        assert!(max_upload_bytes_from_env_value(Some("lots".into())).is_err());
    }

    #[test]
    fn test_path_parsing_ignores_blank_values() {
        assert_eq!(path_from_env_value(Some(" ".into())), None);
        assert_eq!(
            path_from_env_value(Some("data/x.db".into())),
            Some(PathBuf::from("data/x.db"))
        );
    }

    #[test]
    fn test_config_from_env_values() {
        let cfg = config_from_env_values(
            Some("testing".into()),
            None,
            Some("blobs".into()),
            Some("4096".into()),
        )
        .unwrap();
        assert_eq!(cfg.environment(), Environment::Testing);
        assert_eq!(cfg.database(), &DatabaseLocation::InMemory);
        assert_eq!(cfg.upload_dir(), Path::new("blobs"));
        assert_eq!(cfg.max_upload_bytes(), 4096);
    }
}
