//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! operations git-versioning needs, allowing for multiple implementations.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [noop::NoOpRepository]: A stand-in for environments without versioning
//! - [mock::MockRepository]: A scriptable implementation for testing
//!
//! Operations hold a repository through [ScopedRepository], which closes it
//! exactly once when the operation ends, whichever way it ends.
//!
//! The describe engine lives in [describe] and walks any [graph::CommitGraph].

pub mod describe;
pub mod graph;
pub mod mock;
pub mod noop;
pub mod repository;
pub mod walk;

pub use describe::{DescribeWithPrefix, MAX_CANDIDATES};
pub use graph::{CommitGraph, Git2Graph, TagTarget};
pub use mock::MockRepository;
pub use noop::NoOpRepository;
pub use repository::Git2Repository;

use std::ops::{Deref, DerefMut};

use crate::error::Result;

/// What happened to the remote copy of a freshly created tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The tag reached the remote
    Pushed { remote: String },
    /// The tag exists locally only
    PushFailed { remote: String, reason: String },
}

impl PushOutcome {
    pub fn is_pushed(&self) -> bool {
        matches!(self, PushOutcome::Pushed { .. })
    }
}

/// Repository capability consumed by the release and naming logic
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::VersioningError] variants. A failed push is not an error:
/// it is reported through [PushOutcome::PushFailed].
pub trait Repository {
    /// Describe the current revision relative to the closest release tag
    ///
    /// # Returns
    /// * `Ok(Some(String))` - `<tag>` or `<tag>-<depth>-g<abbrev>`
    /// * `Ok(None)` - No release tag is reachable
    /// * `Err` - If the repository has no commits or a Git error occurs
    fn describe(&self) -> Result<Option<String>>;

    /// Short name of the checked out branch ("HEAD" when detached)
    fn current_branch_name(&self) -> Result<String>;

    /// Whether the working tree has no staged, unstaged or untracked changes
    fn is_clean(&self) -> Result<bool>;

    /// Create an annotated tag at the current revision and try to push it
    ///
    /// # Returns
    /// * `Ok(PushOutcome)` - The tag exists locally; the outcome tells whether it was pushed
    /// * `Err` - If the tag could not be created
    fn add_and_push_tag(&self, name: &str) -> Result<PushOutcome>;

    /// Release underlying resources
    fn close(&mut self);
}

/// Holds a repository for the duration of one operation and closes it on drop
pub struct ScopedRepository<R: Repository> {
    inner: R,
}

impl<R: Repository> ScopedRepository<R> {
    pub fn new(inner: R) -> Self {
        ScopedRepository { inner }
    }
}

impl<R: Repository> Deref for ScopedRepository<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.inner
    }
}

impl<R: Repository> DerefMut for ScopedRepository<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: Repository> Drop for ScopedRepository<R> {
    fn drop(&mut self) {
        self.inner.close();
    }
}
