//! Release workflow: check preconditions, bump the version and tag the
//! current revision.

use tracing::{info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{RevisionVersionInfo, Scope, TagPrefix, Version};
use crate::error::{Result, VersioningError};
use crate::git::{PushOutcome, Repository, ScopedRepository};

/// Settings for a release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSettings {
    /// The only branch a release may be created on
    pub release_branch: String,

    pub prefix: TagPrefix,

    /// Compute the tag without creating it
    pub dry_run: bool,
}

impl ReleaseSettings {
    pub fn from_config(config: &Config) -> Self {
        ReleaseSettings {
            release_branch: config.release_branch.clone(),
            prefix: config.prefix(),
            dry_run: false,
        }
    }
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings::from_config(&Config::default())
    }
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Last release tag, None if this is the first release
    pub previous_tag: Option<String>,

    pub version: Version,

    /// The tag that was created (or would be, in a dry run)
    pub tag: String,

    /// None in a dry run
    pub push: Option<PushOutcome>,

    /// Non-fatal conditions met on the way
    pub warnings: Vec<BoundaryWarning>,
}

/// Increase the version in `scope` and tag the current revision with it.
///
/// Preconditions are checked in order and the first failure aborts:
/// 1. the current branch is the release branch
/// 2. the working tree is clean
/// 3. a valid scope was given
/// 4. the current revision is not already a release
///
/// The repository is closed exactly once before this returns.
pub fn increase_version<R: Repository>(
    repository: R,
    scope: Option<&str>,
    settings: &ReleaseSettings,
) -> Result<ReleaseOutcome> {
    let repository = ScopedRepository::new(repository);

    info!("Checking current branch and repository status");
    check_branch(&*repository, &settings.release_branch)?;

    let scope = scope.ok_or_else(|| {
        VersioningError::config("Scope should be specified with --scope [major|minor|patch]")
    })?;
    let scope = Scope::parse(scope)?;
    info!(%scope, "Increasing version");

    let info =
        RevisionVersionInfo::from_describe(repository.describe()?.as_deref(), &settings.prefix)?;
    info!(
        last_version = %info.last_version,
        commits_since_last_tag = info.commits_since_last_tag,
        current_revision = info.current_revision_sha.as_deref().unwrap_or("-"),
        "Read version information"
    );

    if info.has_version_tag() {
        return Err(VersioningError::state(format!(
            "Cannot change version twice for the same revision: it is already tagged {}",
            settings.prefix.format(&info.last_version)
        )));
    }

    let mut warnings = Vec::new();
    let previous_tag = if info.has_any_tag() {
        Some(settings.prefix.format(&info.last_version))
    } else {
        warnings.push(BoundaryWarning::NoReleaseTag {
            prefix: settings.prefix.prefix.clone(),
        });
        None
    };

    let version = info.last_version.bump(scope)?;
    let tag = settings.prefix.format(&version);
    info!(new_version = %version, tag = %tag, "Computed new version");

    if settings.dry_run {
        return Ok(ReleaseOutcome {
            previous_tag,
            version,
            tag,
            push: None,
            warnings,
        });
    }

    info!(tag = %tag, "Creating and pushing tag");
    let push = repository.add_and_push_tag(&tag)?;
    if let PushOutcome::PushFailed { remote, reason } = &push {
        warn!(tag = %tag, remote = %remote, "Tag push failed, push it manually");
        warnings.push(BoundaryWarning::TagPushFailed {
            tag: tag.clone(),
            remote: remote.clone(),
            reason: reason.clone(),
        });
    }

    Ok(ReleaseOutcome {
        previous_tag,
        version,
        tag,
        push: Some(push),
        warnings,
    })
}

fn check_branch<R: Repository>(repository: &R, release_branch: &str) -> Result<()> {
    let branch = repository.current_branch_name()?;
    if branch != release_branch {
        return Err(VersioningError::state(format!(
            "Release can only be created on branch '{}', current branch is '{}'",
            release_branch, branch
        )));
    }

    if !repository.is_clean()? {
        return Err(VersioningError::state(format!(
            "Repository must be clean to create a release on '{}'",
            branch
        )));
    }

    Ok(())
}
