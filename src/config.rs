use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{TagPrefix, DEFAULT_TAG_PREFIX};
use crate::error::{Result, VersioningError};
use crate::git::repository::DEFAULT_REMOTE;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "versioning.toml";

/// Default branch releases may be created from
pub const DEFAULT_RELEASE_BRANCH: &str = "develop";

fn default_tag_prefix() -> String {
    DEFAULT_TAG_PREFIX.to_string()
}

fn default_release_branch() -> String {
    DEFAULT_RELEASE_BRANCH.to_string()
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_versioned() -> bool {
    true
}

/// Represents the complete configuration for git-versioning.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Prefix that marks release tags, e.g. "releases/"
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// The only branch a release may be created on
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    /// Remote that new release tags are pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// When false, build naming uses fixed stand-in values
    #[serde(default = "default_versioned")]
    pub versioned: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: default_tag_prefix(),
            release_branch: default_release_branch(),
            remote: default_remote(),
            versioned: default_versioned(),
        }
    }
}

impl Config {
    pub fn prefix(&self) -> TagPrefix {
        TagPrefix::new(self.tag_prefix.clone())
    }

    /// Reject settings that could never produce a valid release tag
    pub fn validate(&self) -> Result<()> {
        self.prefix().validate()?;

        if self.release_branch.trim().is_empty() {
            return Err(VersioningError::config("release_branch must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(VersioningError::config("remote must not be empty"));
        }

        Ok(())
    }
}

/// Interpret a "versioned" switch the way build properties do: only a
/// case-insensitive "true" enables versioning.
pub fn parse_versioned_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versioning.toml` in current directory
/// 3. `versioning.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration, validated
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| VersioningError::config(format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
    config.validate()?;
    Ok(config)
}
