use crate::domain::TagPrefix;
use crate::error::{Result, VersioningError};
use crate::git::{DescribeWithPrefix, Git2Graph, PushOutcome};
use git2::{ErrorCode, Repository as Git2Repo, Signature, StatusOptions};
use std::path::Path;
use tracing::{info, warn};

/// Default remote that release tags are pushed to
pub const DEFAULT_REMOTE: &str = "origin";

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Option<Git2Repo>,
    prefix: TagPrefix,
    remote: String,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Some(repo),
            prefix: TagPrefix::default(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Use a different release tag prefix
    pub fn with_prefix(mut self, prefix: TagPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Push tags to a different remote
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    fn repo(&self) -> Result<&Git2Repo> {
        self.repo
            .as_ref()
            .ok_or_else(|| VersioningError::state("repository has already been closed"))
    }

    fn push_tag(&self, repo: &Git2Repo, tag_name: &str) -> Result<()> {
        let mut remote = repo
            .find_remote(&self.remote)
            .map_err(|_| VersioningError::remote(format!("No remote named '{}'", self.remote)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }
            git2::Cred::default()
        });

        // The push itself can succeed while the remote rejects the reference
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{0}:refs/tags/{0}", tag_name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    VersioningError::remote(format!("Network error during push: {}", e))
                } else {
                    VersioningError::remote(format!("Failed to push tag '{}': {}", tag_name, e))
                }
            })
    }
}

impl super::Repository for Git2Repository {
    fn describe(&self) -> Result<Option<String>> {
        let repo = self.repo()?;
        let graph = Git2Graph::new(repo);
        DescribeWithPrefix::new(&graph, &self.prefix).describe()
    }

    fn current_branch_name(&self) -> Result<String> {
        let repo = self.repo()?;

        match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
            Ok(_) => Ok("HEAD".to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // HEAD names a branch that has no commits yet
                let head = repo.find_reference("HEAD")?;
                let target = head.symbolic_target().unwrap_or("HEAD");
                Ok(target
                    .strip_prefix("refs/heads/")
                    .unwrap_or(target)
                    .to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_clean(&self) -> Result<bool> {
        let repo = self.repo()?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        Ok(repo.statuses(Some(&mut options))?.is_empty())
    }

    fn add_and_push_tag(&self, name: &str) -> Result<PushOutcome> {
        let repo = self.repo()?;

        let head = match repo.head() {
            Ok(head) => head.peel_to_commit()?,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                return Err(VersioningError::NoCurrentRevision)
            }
            Err(e) => return Err(e.into()),
        };

        let signature = match repo.signature() {
            Ok(signature) => signature,
            Err(_) => Signature::now("git-versioning", "git-versioning@localhost")?,
        };

        repo.tag(name, head.as_object(), &signature, name, false)
            .map_err(|e| VersioningError::state(format!("Cannot create tag '{}': {}", name, e)))?;
        info!(tag = name, commit = %head.id(), "created tag");

        match self.push_tag(repo, name) {
            Ok(()) => {
                info!(tag = name, remote = %self.remote, "pushed tag");
                Ok(PushOutcome::Pushed {
                    remote: self.remote.clone(),
                })
            }
            Err(e) => {
                warn!(tag = name, remote = %self.remote, error = %e, "tag push failed");
                Ok(PushOutcome::PushFailed {
                    remote: self.remote.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn close(&mut self) {
        self.repo = None;
    }
}
