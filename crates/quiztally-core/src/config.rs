//! quiztally configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_STORAGE_KEY;

/// Top-level quiztally configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Directory holding the result store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key the result collection is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Question catalog file. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Default directory for exported charts, dashboards and spreadsheets.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quiztally-data")
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quiztally-exports")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            catalog: None,
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quiztally.toml` in the current directory
/// 2. `~/.config/quiztally/config.toml`
///
/// Environment variable overrides: `QUIZTALLY_DATA_DIR`, `QUIZTALLY_CATALOG`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quiztally.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("QUIZTALLY_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(catalog) = std::env::var("QUIZTALLY_CATALOG") {
        config.catalog = Some(PathBuf::from(catalog));
    }

    anyhow::ensure!(
        !config.storage_key.trim().is_empty(),
        "storage_key must not be empty"
    );

    config.data_dir = resolve_path(&config.data_dir);
    config.output_dir = resolve_path(&config.output_dir);
    config.catalog = config.catalog.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quiztally"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZTALLY_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZTALLY_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZTALLY_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_close_${brace"), "no_close_${brace");
        std::env::remove_var("_QUIZTALLY_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_QUIZTALLY_SELF_REF", "${_QUIZTALLY_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_QUIZTALLY_SELF_REF}/data"),
            "${_QUIZTALLY_SELF_REF}/data"
        );
        assert_eq!(resolve_env_vars("a${_QUIZTALLY_UNSET_VAR}b"), "ab");
        std::env::remove_var("_QUIZTALLY_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.storage_key, "quizResults");
        assert_eq!(config.data_dir, PathBuf::from("./quiztally-data"));
        assert!(config.catalog.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/tmp/quiz"
catalog = "catalog.toml"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/quiz"));
        assert_eq!(config.catalog, Some(PathBuf::from("catalog.toml")));
        assert_eq!(config.storage_key, "quizResults");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiztally.toml");
        std::fs::write(&path, "storage_key = \"classResults\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.storage_key, "classResults");
    }

    #[test]
    fn empty_storage_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiztally.toml");
        std::fs::write(&path, "storage_key = \"  \"\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
