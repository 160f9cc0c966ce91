use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{TagPrefix, Version};
use crate::error::{Result, VersioningError};

/// Commit count recorded when no release tag exists anywhere in history
pub const NO_TAG: i32 = -1;

fn describe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<version>[^-]+)(?:-(?P<count>[0-9]+)-g(?P<sha>[0-9a-fA-F]+))?$")
            .expect("describe pattern is valid")
    })
}

/// Version information for the current revision, decoded from a describe string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionVersionInfo {
    pub last_version: Version,
    /// 0 when the revision is tagged, [`NO_TAG`] when there is no tag at all
    pub commits_since_last_tag: i32,
    /// Abbreviated id of the current revision, present only past a tag
    pub current_revision_sha: Option<String>,
}

impl RevisionVersionInfo {
    /// Decode `<prefix><version>` or `<prefix><version>-<count>-g<sha>`.
    ///
    /// The prefix is optional in the input so that bare versions decode too.
    pub fn from_describe(description: Option<&str>, prefix: &TagPrefix) -> Result<Self> {
        let Some(description) = description else {
            return Ok(RevisionVersionInfo {
                last_version: Version::default(),
                commits_since_last_tag: NO_TAG,
                current_revision_sha: None,
            });
        };

        let stripped = prefix.strip(description);
        let captures = describe_pattern().captures(stripped).ok_or_else(|| {
            VersioningError::version(format!("Unrecognized describe output: '{}'", description))
        })?;

        let last_version = Version::parse(&captures["version"])?;

        let (commits_since_last_tag, current_revision_sha) =
            match (captures.name("count"), captures.name("sha")) {
                (Some(count), Some(sha)) => {
                    let count = count.as_str().parse::<i32>().map_err(|_| {
                        VersioningError::version(format!(
                            "Invalid commit count in describe output: '{}'",
                            description
                        ))
                    })?;
                    if count == 0 {
                        return Err(VersioningError::version(format!(
                            "Describe output past a tag must count at least one commit: '{}'",
                            description
                        )));
                    }
                    (count, Some(sha.as_str().to_string()))
                }
                _ => (0, None),
            };

        Ok(RevisionVersionInfo {
            last_version,
            commits_since_last_tag,
            current_revision_sha,
        })
    }

    /// Whether the current revision is exactly a release tag
    pub fn has_version_tag(&self) -> bool {
        self.commits_since_last_tag == 0
    }

    /// Whether any release tag was found in history
    pub fn has_any_tag(&self) -> bool {
        self.commits_since_last_tag != NO_TAG
    }
}
