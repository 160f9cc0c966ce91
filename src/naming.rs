//! Build code and build name for ordinary (non-release) builds.
//!
//! The build code packs the version as `major*10000 + minor*1000 +
//! patch*100 + commits`. It only orders builds correctly while minor and
//! patch stay below 10 and fewer than 100 commits follow the tag; past that
//! codes overlap. Downstream consumers rely on this exact arithmetic, so it
//! is kept as is, in wrapping `i32` like the platform field it feeds.

use tracing::debug;

use crate::domain::{RevisionVersionInfo, TagPrefix};
use crate::error::Result;
use crate::git::{Repository, ScopedRepository};

/// Build code reported when versioning is disabled
pub const STUB_VERSION_CODE: i32 = 1;

/// Build name reported when versioning is disabled
pub const STUB_VERSION_NAME: &str = "non-versioned";

/// Source of a build's numeric code and human readable name
pub trait VersionNaming {
    fn version_code(&self) -> i32;
    fn version_name(&self) -> &str;
}

/// Naming derived from the closest release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultVersionNaming {
    version_code: i32,
    version_name: String,
}

impl DefaultVersionNaming {
    /// Compute naming from the repository, closing it afterwards.
    pub fn from_repository<R: Repository>(repository: R, prefix: &TagPrefix) -> Result<Self> {
        let repository = ScopedRepository::new(repository);

        let info = RevisionVersionInfo::from_describe(repository.describe()?.as_deref(), prefix)?;
        let branch = if info.commits_since_last_tag > 0 {
            Some(repository.current_branch_name()?)
        } else {
            None
        };

        let naming = DefaultVersionNaming::from_info(&info, branch.as_deref());
        debug!(code = naming.version_code, name = %naming.version_name, "derived build naming");
        Ok(naming)
    }

    /// Compute naming from already decoded version information.
    ///
    /// `branch` is only used when the revision is past its tag.
    pub fn from_info(info: &RevisionVersionInfo, branch: Option<&str>) -> Self {
        let version = info.last_version;
        let version_code = (version.major as i32)
            .wrapping_mul(10000)
            .wrapping_add((version.minor as i32).wrapping_mul(1000))
            .wrapping_add((version.patch as i32).wrapping_mul(100))
            .wrapping_add(info.commits_since_last_tag);

        let mut version_name = version.to_string();
        if info.commits_since_last_tag > 0 {
            version_name.push_str(&format!("-{}", info.commits_since_last_tag));
            version_name.push_str(&format!("-{}", branch.unwrap_or_default()));
            if let Some(sha) = &info.current_revision_sha {
                version_name.push_str(&format!("-{}", sha));
            }
        }

        DefaultVersionNaming {
            version_code,
            version_name,
        }
    }
}

impl VersionNaming for DefaultVersionNaming {
    fn version_code(&self) -> i32 {
        self.version_code
    }

    fn version_name(&self) -> &str {
        &self.version_name
    }
}

/// Fixed naming for environments where versioning is disabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StubVersionNaming;

impl VersionNaming for StubVersionNaming {
    fn version_code(&self) -> i32 {
        STUB_VERSION_CODE
    }

    fn version_name(&self) -> &str {
        STUB_VERSION_NAME
    }
}

/// Pick the naming strategy for an environment.
///
/// `open` is only called when versioning is enabled, so an unversioned
/// environment never touches a repository.
pub fn naming_strategy<R, F>(
    versioned: bool,
    open: F,
    prefix: &TagPrefix,
) -> Result<Box<dyn VersionNaming>>
where
    R: Repository,
    F: FnOnce() -> Result<R>,
{
    if versioned {
        Ok(Box::new(DefaultVersionNaming::from_repository(
            open()?,
            prefix,
        )?))
    } else {
        Ok(Box::new(StubVersionNaming))
    }
}
