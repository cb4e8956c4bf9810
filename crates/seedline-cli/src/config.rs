//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use seedline_core::{BasicAuth, DatasetDownloader, KAGGLE_BASE_URL, KaggleCredentials};

/// Global configuration for seedline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub kaggle: KaggleConfig,
    pub colleges: CollegesConfig,
    pub sports: SportsConfig,
    pub token: TokenConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KaggleConfig {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub username: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub key: Option<String>,
    /// Dataset cache root (default: platform cache dir)
    pub cache_dir: Option<PathBuf>,
}

impl Default for KaggleConfig {
    fn default() -> Self {
        Self {
            base_url: KAGGLE_BASE_URL.to_string(),
            username: std::env::var("KAGGLE_USERNAME").ok(),
            key: std::env::var("KAGGLE_KEY").ok(),
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollegesConfig {
    pub dataset: String,
    pub file: String,
    pub output: PathBuf,
}

impl Default for CollegesConfig {
    fn default() -> Self {
        Self {
            dataset: seedline_colleges::config::DEFAULT_DATASET.to_string(),
            file: seedline_colleges::config::DEFAULT_FILE.to_string(),
            output: PathBuf::from("data/colleges.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SportsConfig {
    pub dataset: String,
    pub output: PathBuf,
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            dataset: seedline_sports::config::DEFAULT_DATASET.to_string(),
            output: PathBuf::from("data/sports.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub key_file: Option<PathBuf>,
    pub email: String,
    pub ttl_minutes: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            key_file: None,
            email: seedline_token::claims::DEFAULT_EMAIL.to_string(),
            ttl_minutes: seedline_token::claims::DEFAULT_TTL_MINUTES,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

/// `kaggle.json` location: `$KAGGLE_CONFIG_DIR`, else `~/.kaggle`
fn kaggle_json_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("KAGGLE_CONFIG_DIR") {
        return Some(PathBuf::from(dir).join("kaggle.json"));
    }
    directories::BaseDirs::new().map(|d| d.home_dir().join(".kaggle").join("kaggle.json"))
}

fn read_kaggle_json(path: &Path) -> Option<BasicAuth> {
    if !path.exists() {
        return None;
    }
    match KaggleCredentials::from_json_file(path) {
        Ok(creds) => {
            log::debug!("Using Kaggle credentials from {}", path.display());
            Some(creds.into())
        }
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {e}", path.display());
            None
        }
    }
}

impl KaggleConfig {
    /// Credentials from config/env, falling back to `kaggle.json`.
    pub fn credentials(&self) -> Option<BasicAuth> {
        self.inline_credentials()
            .or_else(|| kaggle_json_path().and_then(|p| read_kaggle_json(&p)))
    }

    fn inline_credentials(&self) -> Option<BasicAuth> {
        match (&self.username, &self.key) {
            (Some(username), Some(key)) if !username.is_empty() && !key.is_empty() => {
                Some(BasicAuth {
                    username: username.clone(),
                    password: key.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "seedline")
            .map(|d| d.cache_dir().join("datasets"))
            .unwrap_or_else(|| PathBuf::from(".seedline-cache/datasets"))
    }

    pub fn downloader(&self) -> DatasetDownloader {
        DatasetDownloader::new(self.base_url.clone(), self.credentials(), self.cache_dir())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./seedline.toml (current directory)
    /// 2. ~/.config/seedline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("seedline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "seedline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.kaggle.base_url, KAGGLE_BASE_URL);
        assert_eq!(config.colleges.dataset, "flynn28/college-division-database");
        assert_eq!(config.colleges.file, "colleges.csv");
        assert_eq!(config.colleges.output, PathBuf::from("data/colleges.json"));
        assert_eq!(config.sports.dataset, "umerhaddii/us-collegiate-sports-dataset");
        assert_eq!(config.sports.output, PathBuf::from("data/sports.json"));
        assert_eq!(config.token.ttl_minutes, 15);
        assert_eq!(config.token.email, "user@example.com");
        assert!(config.token.key_file.is_none());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("SEEDLINE_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${SEEDLINE_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("SEEDLINE_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        std::env::set_var("SEEDLINE_TEST_KAGGLE_KEY", "s3cret");
        let toml = r#"
[kaggle]
base_url = "http://localhost:8080/api/v1"
username = "coach"
key = "${SEEDLINE_TEST_KAGGLE_KEY}"
cache_dir = "/tmp/seedline-cache"

[colleges]
file = "Colleges.csv"
output = "/tmp/out/colleges.json"

[token]
key_file = "keys/dev.json"
ttl_minutes = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        std::env::remove_var("SEEDLINE_TEST_KAGGLE_KEY");

        assert_eq!(config.kaggle.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.kaggle.username.as_deref(), Some("coach"));
        assert_eq!(config.kaggle.key.as_deref(), Some("s3cret"));
        assert_eq!(config.kaggle.cache_dir(), PathBuf::from("/tmp/seedline-cache"));
        assert_eq!(config.colleges.file, "Colleges.csv");
        assert_eq!(config.colleges.dataset, "flynn28/college-division-database");
        assert_eq!(config.colleges.output, PathBuf::from("/tmp/out/colleges.json"));
        assert_eq!(config.sports.output, PathBuf::from("data/sports.json"));
        assert_eq!(config.token.key_file, Some(PathBuf::from("keys/dev.json")));
        assert_eq!(config.token.ttl_minutes, 60);
        assert_eq!(config.token.email, "user@example.com");
    }

    #[test]
    fn inline_credentials_need_both_parts() {
        let mut kaggle = KaggleConfig {
            username: Some("coach".into()),
            key: None,
            ..KaggleConfig::default()
        };
        assert!(kaggle.inline_credentials().is_none());

        kaggle.key = Some("abc".into());
        assert_eq!(
            kaggle.inline_credentials(),
            Some(BasicAuth {
                username: "coach".into(),
                password: "abc".into(),
            })
        );
    }

    #[test]
    fn kaggle_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kaggle.json");
        assert!(read_kaggle_json(&path).is_none());

        std::fs::write(&path, r#"{"username": "coach", "key": "abc"}"#).unwrap();
        let auth = read_kaggle_json(&path).unwrap();
        assert_eq!(auth.username, "coach");
        assert_eq!(auth.password, "abc");

        std::fs::write(&path, "not json").unwrap();
        assert!(read_kaggle_json(&path).is_none());
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedline.toml");
        std::fs::write(&path, "[sports]\noutput = 3\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("seedline.toml"));
    }
}
