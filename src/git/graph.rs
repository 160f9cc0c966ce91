//! Read-only view of a commit history used by the describe engine.

use std::fmt;
use std::hash::Hash;

use git2::{ErrorCode, Oid, Repository as Git2Repo};

use crate::error::Result;

/// A tag together with the commit it ultimately points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTarget<Id> {
    /// Tag name without the `refs/tags/` namespace
    pub short_name: String,
    pub commit: Id,
}

/// The commit history the describe engine walks
pub trait CommitGraph {
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// The revision to describe, `None` when the history has no commits
    fn head(&self) -> Result<Option<Self::Id>>;

    /// Every tag in the repository, peeled to its commit
    fn tags(&self) -> Result<Vec<TagTarget<Self::Id>>>;

    fn parents(&self, id: Self::Id) -> Result<Vec<Self::Id>>;

    /// Commit timestamp in seconds, used to order the walk newest first
    fn commit_time(&self, id: Self::Id) -> Result<i64>;

    /// Shortest unambiguous hex abbreviation of a commit id
    fn abbreviate(&self, id: Self::Id) -> Result<String>;
}

/// [`CommitGraph`] over a libgit2 repository
pub struct Git2Graph<'r> {
    repo: &'r Git2Repo,
}

impl<'r> Git2Graph<'r> {
    pub fn new(repo: &'r Git2Repo) -> Self {
        Git2Graph { repo }
    }
}

impl CommitGraph for Git2Graph<'_> {
    type Id = Oid;

    fn head(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn tags(&self) -> Result<Vec<TagTarget<Oid>>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags on trees or blobs can never be reached by a commit walk
            if let Ok(commit) = reference.peel_to_commit() {
                tags.push(TagTarget {
                    short_name: name.to_string(),
                    commit: commit.id(),
                });
            }
        }

        Ok(tags)
    }

    fn parents(&self, id: Oid) -> Result<Vec<Oid>> {
        let commit = self.repo.find_commit(id)?;
        Ok(commit.parent_ids().collect())
    }

    fn commit_time(&self, id: Oid) -> Result<i64> {
        let commit = self.repo.find_commit(id)?;
        Ok(commit.time().seconds())
    }

    fn abbreviate(&self, id: Oid) -> Result<String> {
        let object = self.repo.find_object(id, None)?;
        let short = object.short_id()?;
        Ok(short
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string()))
    }
}
