//! Configuration management for fsds-email
//!
//! Configuration lives in `~/.config/fsds-email/config.yaml`. Every key is
//! optional; the Jira credentials may also come from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deadline::{check_format, DEFAULT_DEADLINE_FORMAT};
use crate::error::{Error, Result};
use crate::html::DEFAULT_SITE_SUFFIX;
use crate::ticket::DEFAULT_PROJECT_KEY;

/// The name of the package, used for config directory naming
const PKG_NAME: &str = "fsds-email";

/// Name of the config file inside the config directory
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: ProjectConfig,
    pub jira: JiraConfig,
    pub templates: TemplateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Prefix given to bare ticket numbers
    pub key: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_PROJECT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JiraConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub token: Option<String>,
    /// Trailing part of page titles in saved exports, e.g. "OCC Jira"
    pub site_suffix: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            token: None,
            site_suffix: DEFAULT_SITE_SUFFIX.to_string(),
        }
    }
}

/// Template overrides; the built-in templates are used when unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub review: Option<PathBuf>,
    pub approved: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where review emails and ticket records are written
    pub dir: PathBuf,
    /// strftime pattern for the review deadline
    pub deadline_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            deadline_format: DEFAULT_DEADLINE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, applying environment overrides
    ///
    /// A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read the YAML file only, without looking at the environment
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.project.key = config.project.key.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    /// Override Jira settings from `JIRA_URL`, `JIRA_USER` and `JIRA_TOKEN`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("JIRA_URL") {
            self.jira.url = Some(url);
        }
        if let Some(user) = non_empty("JIRA_USER") {
            self.jira.user = Some(user);
        }
        if let Some(token) = non_empty("JIRA_TOKEN") {
            self.jira.token = Some(token);
        }
    }

    fn validate(&self) -> Result<()> {
        let key = self.project.key.as_str();
        if key.is_empty() {
            return Err(Error::Config("project.key must not be empty".into()));
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Config(format!(
                "project.key must be alphanumeric, got {:?}",
                key
            )));
        }
        check_format(&self.output.deadline_format).map_err(|_| {
            Error::Config(format!(
                "output.deadline_format is not a valid date format: {:?}",
                self.output.deadline_format
            ))
        })
    }
}

/// Get the default configuration file path
///
/// Returns `~/.config/fsds-email/config.yaml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Get the configuration directory path
///
/// Returns the path to `~/.config/fsds-email/`.
pub fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join(PKG_NAME))
}

/// Ensure the directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
