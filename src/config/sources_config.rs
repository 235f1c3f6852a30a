use crate::utils::error::{FirehoseError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-source settings read from `<data_dir>/sources.toml`.
///
/// Everything has a default, so a missing file is fine; `${VAR}`
/// references are replaced from the environment before parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub healthkit: HealthkitConfig,
    #[serde(default)]
    pub photos: PhotosConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// RSS/Atom feed URLs handed to the feed importer.
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repositories (owner/name) whose commits and releases are pulled.
    #[serde(default)]
    pub repos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthkitConfig {
    /// Path to the health export archive.
    #[serde(default = "default_healthkit_export")]
    pub export: PathBuf,
}

impl Default for HealthkitConfig {
    fn default() -> Self {
        Self {
            export: default_healthkit_export(),
        }
    }
}

fn default_healthkit_export() -> PathBuf {
    PathBuf::from("exports/healthkit.zip")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotosConfig {
    /// Photos library location; defaults to the library in the home
    /// directory when unset.
    #[serde(default)]
    pub library: Option<PathBuf>,
}

impl SourcesConfig {
    /// Load `sources.toml` from the data directory, falling back to
    /// defaults when the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("sources.toml");
        if !path.is_file() {
            tracing::debug!("no sources.toml in {}, using defaults", data_dir.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| FirehoseError::Config {
            message: format!("sources.toml: {}", e),
        })
    }
}

/// Replace `${VAR}` with the variable's value; unknown variables are
/// left as-is so the parse error points at them.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = SourcesConfig::from_str(
            r#"
[feeds]
urls = ["https://example.com/rss.xml", "https://blog.example/feed"]

[github]
repos = ["octocat/hello-world"]

[healthkit]
export = "exports/latest.zip"
"#,
        )
        .unwrap();

        assert_eq!(config.feeds.urls.len(), 2);
        assert_eq!(config.github.repos, vec!["octocat/hello-world"]);
        assert_eq!(config.healthkit.export, PathBuf::from("exports/latest.zip"));
        assert!(config.photos.library.is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = SourcesConfig::from_str("").unwrap();
        assert!(config.feeds.urls.is_empty());
        assert!(config.github.repos.is_empty());
        assert_eq!(
            config.healthkit.export,
            PathBuf::from("exports/healthkit.zip")
        );
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("FIREHOSE_TEST_FEED", "https://example.com/rss.xml");
        let config = SourcesConfig::from_str(
            r#"
[feeds]
urls = ["${FIREHOSE_TEST_FEED}"]
"#,
        )
        .unwrap();
        assert_eq!(config.feeds.urls, vec!["https://example.com/rss.xml"]);
    }

    #[test]
    fn unknown_variable_is_left_in_place() {
        let config = SourcesConfig::from_str(
            r#"
[feeds]
urls = ["${FIREHOSE_NO_SUCH_VARIABLE}"]
"#,
        )
        .unwrap();
        assert_eq!(config.feeds.urls, vec!["${FIREHOSE_NO_SUCH_VARIABLE}"]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SourcesConfig::load(dir.path()).unwrap();
        assert!(config.feeds.urls.is_empty());
    }
}
