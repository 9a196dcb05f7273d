use crate::domain::PatchSpec;
use crate::error::Result;
use crate::publisher::DEFAULT_COMMIT_MESSAGE;
use crate::release::github::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "dockerfile-bump.toml";

/// Represents the complete configuration for dockerfile-bump.
///
/// Every field has a default, so an empty file (or no file) is valid.
/// Command-line flags override these values.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Target file; relative paths resolve against the repository root
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,

    /// Remote to push to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch to push to; defaults to the checked-out branch
    #[serde(default)]
    pub branch: Option<String>,

    /// Commit message template; `{repo}` is replaced by the watched repository
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Extra or overriding patch rules keyed by context (`owner/name`)
    #[serde(default)]
    pub contexts: HashMap<String, PatchSpec>,
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dockerfile: default_dockerfile(),
            remote: default_remote(),
            branch: None,
            commit_message: default_commit_message(),
            api_url: default_api_url(),
            contexts: HashMap::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `dockerfile-bump.toml` in current directory
/// 3. `.dockerfile-bump.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read(Path::new(path))?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        read(Path::new(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text)?;
    tracing::debug!(contexts = config.contexts.len(), "parsed configuration");
    Ok(config)
}

fn read(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "loading configuration");
    fs::read_to_string(path).map_err(|e| crate::error::BumpError::file_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Precision;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dockerfile, PathBuf::from("Dockerfile"));
        assert_eq!(config.remote, "origin");
        assert_eq!(config.branch, None);
        assert_eq!(config.commit_message, "update version of {repo}");
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_contexts_table() {
        let config = parse_config(
            r#"
dockerfile = "docker/Dockerfile"

[contexts."me/docker-tools"]
pattern = 'TOOLS_VERSION=\S+'
replace = "TOOLS_VERSION={version}"

[contexts."me/docker-lab"]
pattern = ',<\d+\.\d+'
replace = ",<{version}"
precision = "minor"
"#,
        )
        .unwrap();

        assert_eq!(config.dockerfile, PathBuf::from("docker/Dockerfile"));
        let tools = &config.contexts["me/docker-tools"];
        assert_eq!(tools.precision, Precision::Patch);
        assert_eq!(tools.replace, "TOOLS_VERSION={version}");
        assert_eq!(config.contexts["me/docker-lab"].precision, Precision::Minor);
    }

    #[test]
    fn test_invalid_precision_is_rejected() {
        let err = parse_config(
            r#"
[contexts."a/b"]
pattern = "x"
precision = "major"
"#,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
