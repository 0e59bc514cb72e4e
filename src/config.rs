use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::error::{JenkinsError, Result};

/// Configuration file structure for jenkins-nodes.
///
/// Holds the server address and credentials so callers do not have to
/// hard-code them. Files are looked up in the current directory, then in the
/// user configuration directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jenkins: JenkinsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User name for basic auth
    pub username: Option<String>,

    /// API token (or password) for basic auth
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("jenkins-nodes/", env!("CARGO_PKG_VERSION")).to_string()
}

impl JenkinsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credentials are only used when both user name and token are set.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.token) {
            (Some(user), Some(token)) => Some(Credentials::new(user.as_str(), token.as_str())),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jenkins-nodes.toml
    /// 3. ./jenkins-nodes.json
    /// 4. ./jenkins-nodes.yaml
    /// 5. ./jenkins-nodes.yml
    /// 6. `<config dir>/jenkins-nodes/config.toml`
    ///
    /// An explicitly given path must exist. Without one, the default
    /// configuration is returned if no candidate file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "jenkins-nodes.toml",
            "jenkins-nodes.json",
            "jenkins-nodes.yaml",
            "jenkins-nodes.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = user_config_path().filter(|p| p.exists()) {
            return Self::load_from_path(&path);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        debug!("Loading configuration from {}", path.display());

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let parsed: std::result::Result<Self, String> = match extension {
            "toml" => toml::from_str(&contents).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(&contents).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| {
            JenkinsError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(self).map_err(|e| JenkinsError::Config(e.to_string()))?
            }
            _ => toml::to_string_pretty(self).map_err(|e| JenkinsError::Config(e.to_string()))?,
        };

        std::fs::write(path, contents)?;

        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jenkins-nodes").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jenkins.base_url, "http://localhost:8080");
        assert_eq!(config.jenkins.timeout_secs, 30);
        assert!(config.jenkins.user_agent.starts_with("jenkins-nodes/"));
        assert!(config.jenkins.credentials().is_none());
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[jenkins]
base-url = "https://ci.example.com"
username = "builder"
token = "11aa22bb"
timeout-secs = 5
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.jenkins.base_url, "https://ci.example.com");
        assert_eq!(config.jenkins.timeout(), Duration::from_secs(5));

        let creds = config.jenkins.credentials().unwrap();
        assert_eq!(creds.username, "builder");
        assert_eq!(creds.token.as_str(), "11aa22bb");
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        let yaml_content = "jenkins:\n  base-url: https://yaml.example.com\n  username: ops\n";
        write!(temp_file, "{}", yaml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.jenkins.base_url, "https://yaml.example.com");
        // token missing, so no credentials
        assert!(config.jenkins.credentials().is_none());
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(temp_file, "{{ not json").unwrap();

        let err = Config::load_from_path(temp_file.path()).unwrap_err();
        assert!(matches!(err, JenkinsError::Config(_)));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let err = Config::load(Some(Path::new("nonexistent.toml"))).unwrap_err();
        assert!(matches!(err, JenkinsError::Io(_)));
    }

    #[test]
    fn test_save_and_reload_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jenkins-nodes.json");

        let mut config = Config::default();
        config.jenkins.base_url = "https://saved.example.com".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.jenkins.base_url, "https://saved.example.com");
    }
}
