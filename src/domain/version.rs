use crate::error::{Result, VersioningError};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from exactly `major.minor.patch`
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split('.').collect();
        if parts.len() != 3 {
            return Err(VersioningError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                value
            )));
        }

        let component = |name: &str, part: &str| {
            // u32::from_str accepts a leading '+', which is not part of the format
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersioningError::version(format!(
                    "Invalid {} version: '{}'",
                    name, part
                )));
            }
            part.parse::<u32>().map_err(|_| {
                VersioningError::version(format!("Invalid {} version: '{}'", name, part))
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Return the version increased in the given scope
    ///
    /// Fails when the bumped component does not fit in a `u32`.
    pub fn bump(&self, scope: Scope) -> Result<Self> {
        let overflow = || {
            VersioningError::version(format!("Cannot increase {} version of {}", scope, self))
        };

        Ok(match scope {
            Scope::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            Scope::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            Scope::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Granularity of a version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Major,
    Minor,
    Patch,
}

impl Scope {
    /// Parse a scope token, ignoring case
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "major" => Ok(Scope::Major),
            "minor" => Ok(Scope::Minor),
            "patch" => Ok(Scope::Patch),
            _ => Err(VersioningError::config(format!(
                "Scope should be one of [major, minor, patch], got '{}'",
                value
            ))),
        }
    }
}

impl FromStr for Scope {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        Scope::parse(s)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Major => "MAJOR",
            Scope::Minor => "MINOR",
            Scope::Patch => "PATCH",
        };
        f.write_str(name)
    }
}
