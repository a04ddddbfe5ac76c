//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handling never reads process-wide environment variables, which keeps behaviour
//! consistent across multi-threaded runtimes and test harnesses.

use crate::constants::{CUSTOMERS_DIR_NAME, DIVERSITY_DIR_NAME};
use crate::{DiversityError, DiversityResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which document store implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Sharded JSON files under the data directory.
    #[default]
    File,
    /// Process-local maps; contents are lost on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(DiversityError::InvalidInput(format!(
                "unknown store backend '{other}' (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    store_backend: StoreBackend,
    api_base_url: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Root directory for the file store
    /// * `store_backend` - Store implementation to open
    /// * `api_base_url` - Fallback base URL for links in change events, used when a request
    ///   carries none
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::InvalidInput`] if `api_base_url` is blank or is not an
    /// `http`/`https` URL.
    pub fn new(
        data_dir: PathBuf,
        store_backend: StoreBackend,
        api_base_url: Option<String>,
    ) -> DiversityResult<Self> {
        let api_base_url = match api_base_url {
            Some(url) => Some(normalise_base_url(&url)?),
            None => None,
        };

        Ok(Self {
            data_dir,
            store_backend,
            api_base_url,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn diversity_dir(&self) -> PathBuf {
        self.data_dir.join(DIVERSITY_DIR_NAME)
    }

    pub fn customers_dir(&self) -> PathBuf {
        self.data_dir.join(CUSTOMERS_DIR_NAME)
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}

/// Parse the store backend from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`StoreBackend::File`].
pub fn store_backend_from_env_value(value: Option<String>) -> DiversityResult<StoreBackend> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<StoreBackend>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Trim whitespace and a trailing `/` from a base URL and check its scheme.
pub(crate) fn normalise_base_url(url: &str) -> DiversityResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(DiversityError::InvalidInput(
            "api base url cannot be empty".into(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(DiversityError::InvalidInput(format!(
            "api base url must start with http:// or https://, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_defaults_to_file() {
        assert_eq!(store_backend_from_env_value(None).unwrap(), StoreBackend::File);
        assert_eq!(
            store_backend_from_env_value(Some("  ".into())).unwrap(),
            StoreBackend::File
        );
    }

    #[test]
    fn store_backend_parses_case_insensitively() {
        assert_eq!(
            store_backend_from_env_value(Some("Memory".into())).unwrap(),
            StoreBackend::Memory
        );
    }

    #[test]
    fn store_backend_rejects_unknown_value() {
        let err = store_backend_from_env_value(Some("cosmos".into())).unwrap_err();
        assert!(matches!(err, DiversityError::InvalidInput(msg) if msg.contains("cosmos")));
    }

    #[test]
    fn base_url_is_trimmed() {
        let cfg = CoreConfig::new(
            PathBuf::from("data"),
            StoreBackend::Memory,
            Some(" https://api.example.com/ ".into()),
        )
        .unwrap();
        assert_eq!(cfg.api_base_url(), Some("https://api.example.com"));
    }

    #[test]
    fn base_url_requires_http_scheme() {
        let err = CoreConfig::new(
            PathBuf::from("data"),
            StoreBackend::Memory,
            Some("ftp://example.com".into()),
        )
        .unwrap_err();
        assert!(matches!(err, DiversityError::InvalidInput(_)));
    }

    #[test]
    fn record_dirs_live_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/data"), StoreBackend::File, None).unwrap();
        assert_eq!(cfg.diversity_dir(), PathBuf::from("/srv/data/diversity"));
        assert_eq!(cfg.customers_dir(), PathBuf::from("/srv/data/customers"));
    }
}
