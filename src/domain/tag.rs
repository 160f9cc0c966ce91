use crate::domain::Version;
use crate::error::{Result, VersioningError};

/// Default prefix for release tags
pub const DEFAULT_TAG_PREFIX: &str = "releases/";

/// Prefix that marks a tag as a release tag (e.g. "releases/")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPrefix {
    pub prefix: String,
}

impl TagPrefix {
    /// Create a new tag prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPrefix {
            prefix: prefix.into(),
        }
    }

    /// Full tag name for a version
    /// Example: prefix="releases/", version=1.2.3 -> "releases/1.2.3"
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Whether a short tag name belongs to this prefix
    pub fn matches(&self, tag: &str) -> bool {
        tag.starts_with(&self.prefix)
    }

    /// Remove the prefix from a description, leaving it untouched when absent
    pub fn strip<'a>(&self, description: &'a str) -> &'a str {
        description
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(description)
    }

    /// Check that the prefix can start a valid tag reference name
    pub fn validate(&self) -> Result<()> {
        let probe = format!("refs/tags/{}", self.format(&Version::default()));
        if git2::Reference::is_valid_name(&probe) {
            Ok(())
        } else {
            Err(VersioningError::config(format!(
                "Tag prefix '{}' does not form a valid tag name",
                self.prefix
            )))
        }
    }
}

impl Default for TagPrefix {
    fn default() -> Self {
        TagPrefix::new(DEFAULT_TAG_PREFIX)
    }
}
