#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::Path;

use git2::{Commit, Oid, Repository, Signature, Time};
use git_versioning::git::Git2Repository;
use tempfile::TempDir;

/// A throwaway repository on disk with one initial commit on `develop`.
///
/// Every commit is one minute newer than the previous one, so walks over
/// merges visit commits in a predictable order.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: Cell<i64>,
    files: Cell<u32>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        repo.set_head("refs/heads/develop")
            .expect("Could not point HEAD at develop");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        let test_repo = TestRepo {
            dir,
            repo,
            clock: Cell::new(1_700_000_000),
            files: Cell::new(0),
        };
        test_repo.commit("Initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh handle, the way the tool opens the repository
    pub fn versioning(&self) -> Git2Repository {
        Git2Repository::open(self.path()).expect("Could not open repository")
    }

    fn signature(&self) -> Signature<'static> {
        let now = self.clock.get() + 60;
        self.clock.set(now);
        Signature::new("Test User", "test@example.com", &Time::new(now, 0))
            .expect("Could not create signature")
    }

    /// Write and stage a new file, returning the resulting tree
    fn stage_new_file(&self) -> Oid {
        let n = self.files.get() + 1;
        self.files.set(n);

        let name = format!("file-{}.txt", n);
        fs::write(self.path().join(&name), format!("content {}\n", n))
            .expect("Could not write file");

        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new(&name))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
        index.write_tree().expect("Could not write tree")
    }

    fn head_commit(&self) -> Option<Commit<'_>> {
        self.repo.head().ok().and_then(|h| h.peel_to_commit().ok())
    }

    /// Commit a new file on the current branch
    pub fn commit(&self, message: &str) -> Oid {
        let parents: Vec<Oid> = self.head_commit().map(|c| c.id()).into_iter().collect();
        self.commit_with(Some("HEAD"), &parents, message)
    }

    /// Commit with explicit parents without moving any branch
    pub fn commit_detached(&self, parents: &[Oid], message: &str) -> Oid {
        self.commit_with(None, parents, message)
    }

    /// Merge `other` into the current branch
    pub fn merge(&self, other: Oid, message: &str) -> Oid {
        let head = self.head_commit().expect("merge needs a head").id();
        self.commit_with(Some("HEAD"), &[head, other], message)
    }

    fn commit_with(&self, update_ref: Option<&str>, parents: &[Oid], message: &str) -> Oid {
        let tree_id = self.stage_new_file();
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let parents: Vec<Commit<'_>> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("Could not find parent"))
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        let signature = self.signature();

        self.repo
            .commit(
                update_ref,
                &signature,
                &signature,
                message,
                &tree,
                &parent_refs,
            )
            .expect("Could not create commit")
    }

    pub fn head(&self) -> Oid {
        self.head_commit().expect("repository has a head").id()
    }

    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn tag_annotated(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        self.repo
            .tag(name, &object, &self.signature(), name, false)
            .expect("Could not create tag");
    }

    pub fn checkout_new_branch(&self, name: &str) {
        let head = self.head_commit().expect("branching needs a head");
        self.repo
            .branch(name, &head, false)
            .expect("Could not create branch");
        self.repo
            .set_head(&format!("refs/heads/{}", name))
            .expect("Could not switch branch");
    }

    pub fn write_untracked(&self, name: &str) {
        fs::write(self.path().join(name), "untracked\n").expect("Could not write file");
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/tags/{}", name))
            .is_ok()
    }
}

/// Default seven character abbreviation of a commit id
pub fn abbrev(oid: Oid) -> String {
    oid.to_string()[..7].to_string()
}
