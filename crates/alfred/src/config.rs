use std::path::{Path, PathBuf};
use std::time::Duration;

use filesystem::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const CONFIG_ENV_VAR: &str = "ALFRED_CONFIG";

/// What search-then-act tools do when a name matches more than one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityPolicy {
    /// Fail with the list of candidates.
    #[default]
    Refuse,
    /// Act on the first match in completion order.
    PickFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlfredConfig {
    /// Where searches start when the caller names no location.
    pub search_root: String,
    /// Base for relative paths. Defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
    pub search: SearchConfig,
    pub ambiguity: AmbiguityPolicy,
    /// Upper bound on a single search; unbounded when absent.
    pub search_timeout_ms: Option<u64>,
}

impl Default for AlfredConfig {
    fn default() -> Self {
        Self {
            search_root: "/".to_string(),
            working_dir: None,
            search: SearchConfig::default(),
            ambiguity: AmbiguityPolicy::default(),
            search_timeout_ms: None,
        }
    }
}

impl AlfredConfig {
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }
}

/// Loads a JSON config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> CoreResult<AlfredConfig> {
    if !path.exists() {
        log::info!(
            "config {} not found, using defaults",
            path.display()
        );
        return Ok(AlfredConfig::default());
    }

    let data = std::fs::read_to_string(path).map_err(|error| {
        CoreError::Internal(format!(
            "failed to read config {}: {error}",
            path.display()
        ))
    })?;
    let config: AlfredConfig = serde_json::from_str(&data).map_err(|error| {
        CoreError::InvalidInput(format!(
            "failed to parse config {}: {error}",
            path.display()
        ))
    })?;
    config.search.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("alfred.json")).unwrap();
        assert_eq!(config, AlfredConfig::default());
        assert_eq!(config.search_root, "/");
        assert!(config.search_timeout().is_none());
    }

    #[test]
    fn partial_file_is_merged_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alfred.json");
        std::fs::write(
            &path,
            r#"{
                "searchRoot": "~",
                "ambiguity": "pickFirst",
                "searchTimeoutMs": 1500,
                "search": { "maxConcurrency": 2, "excludeNames": ["build"] }
            }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.search_root, "~");
        assert_eq!(config.ambiguity, AmbiguityPolicy::PickFirst);
        assert_eq!(config.search_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.search.max_concurrency, 2);
        assert_eq!(config.search.exclude_names, vec!["build".to_string()]);
        assert!(config.search.use_default_exclusions);
    }

    #[test]
    fn malformed_file_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alfred.json");
        std::fs::write(&path, "{ not json").unwrap();

        match load_config(&path) {
            Err(CoreError::InvalidInput(message)) => {
                assert!(message.contains("failed to parse config"), "{message}");
            }
            other => panic!("expected invalid input, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_search_section_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alfred.json");
        std::fs::write(&path, r#"{ "search": { "workerThreads": 0 } }"#).unwrap();

        let error = load_config(&path).expect_err("zero workers should fail");
        assert!(matches!(error, CoreError::InvalidInput(_)));
    }
}
