mod common;

use common::{abbrev, TestRepo};
use git2::Repository as Git2Repo;
use git_versioning::domain::TagPrefix;
use git_versioning::git::{Git2Repository, PushOutcome, Repository};

// ============================================================================
// Branch and working tree state
// ============================================================================

#[test]
fn test_reads_branch_name() {
    let repo = TestRepo::new();
    assert_eq!(repo.versioning().current_branch_name().unwrap(), "develop");

    repo.checkout_new_branch("master");
    assert_eq!(repo.versioning().current_branch_name().unwrap(), "master");

    repo.checkout_new_branch("feature/release");
    assert_eq!(
        repo.versioning().current_branch_name().unwrap(),
        "feature/release"
    );
}

#[test]
fn test_detached_head_branch_name() {
    let repo = TestRepo::new();
    repo.repo.set_head_detached(repo.head()).unwrap();
    assert_eq!(repo.versioning().current_branch_name().unwrap(), "HEAD");
}

#[test]
fn test_reads_clean_state() {
    let repo = TestRepo::new();
    assert!(repo.versioning().is_clean().unwrap());

    // Untracked file
    repo.write_untracked("someFile");
    assert!(!repo.versioning().is_clean().unwrap());

    // Staged file
    let mut index = repo.repo.index().unwrap();
    index.add_path(std::path::Path::new("someFile")).unwrap();
    index.write().unwrap();
    assert!(!repo.versioning().is_clean().unwrap());

    // Committed - clean again
    repo.commit("commit");
    assert!(repo.versioning().is_clean().unwrap());
}

// ============================================================================
// Describe
// ============================================================================

#[test]
fn test_describes_progression() {
    let repo = TestRepo::new();

    // No tag
    assert_eq!(repo.versioning().describe().unwrap(), None);

    // Non-release tag
    repo.tag_lightweight("notReleases/1.0.0", repo.head());
    assert_eq!(repo.versioning().describe().unwrap(), None);

    // Directly on tag
    repo.tag_annotated("releases/1.0.0", repo.head());
    assert_eq!(
        repo.versioning().describe().unwrap().as_deref(),
        Some("releases/1.0.0")
    );

    // n commits away from latest tag
    for n in 1..=5 {
        let last = repo.commit("msg");
        assert_eq!(
            repo.versioning().describe().unwrap(),
            Some(format!("releases/1.0.0-{}-g{}", n, abbrev(last)))
        );
    }

    // Directly on tag again
    repo.tag_annotated("releases/1.5.0", repo.head());
    assert_eq!(
        repo.versioning().describe().unwrap().as_deref(),
        Some("releases/1.5.0")
    );
}

#[test]
fn test_describes_lightweight_release_tag() {
    let repo = TestRepo::new();
    repo.tag_lightweight("releases/0.1.0", repo.head());
    let head = repo.commit("next");

    assert_eq!(
        repo.versioning().describe().unwrap(),
        Some(format!("releases/0.1.0-1-g{}", abbrev(head)))
    );
}

#[test]
fn test_ignores_closer_foreign_tag() {
    let repo = TestRepo::new();
    repo.tag_annotated("releases/1.0.0", repo.head());
    let closer = repo.commit("one");
    repo.tag_annotated("nightly/2024-01-01", closer);
    let head = repo.commit("two");

    assert_eq!(
        repo.versioning().describe().unwrap(),
        Some(format!("releases/1.0.0-2-g{}", abbrev(head)))
    );
}

#[test]
fn test_describes_through_merge() {
    let repo = TestRepo::new();
    let base = repo.head();
    repo.tag_annotated("releases/1.0.0", base);

    let side = repo.commit_detached(&[base], "side");
    repo.tag_annotated("releases/1.1.0", side);
    repo.commit("main");
    let merge = repo.merge(side, "merge side");

    // Only the merge and the main-line commit are not contained in 1.1.0
    assert_eq!(
        repo.versioning().describe().unwrap(),
        Some(format!("releases/1.1.0-2-g{}", abbrev(merge)))
    );
}

#[test]
fn test_describes_with_custom_prefix() {
    let repo = TestRepo::new();
    repo.tag_annotated("v3.0.0", repo.head());
    repo.tag_annotated("releases/1.0.0", repo.head());
    let head = repo.commit("next");

    let versioning = repo.versioning().with_prefix(TagPrefix::new("v"));
    assert_eq!(
        versioning.describe().unwrap(),
        Some(format!("v3.0.0-1-g{}", abbrev(head)))
    );
}

// ============================================================================
// Tagging
// ============================================================================

#[test]
fn test_adds_and_pushes_tag() {
    let repo = TestRepo::new();
    let remote_dir = tempfile::TempDir::new().unwrap();
    let remote = Git2Repo::init_bare(remote_dir.path()).unwrap();
    repo.repo
        .remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    let outcome = repo.versioning().add_and_push_tag("releases/1.0.0").unwrap();

    assert_eq!(
        outcome,
        PushOutcome::Pushed {
            remote: "origin".to_string()
        }
    );
    assert_eq!(
        repo.versioning().describe().unwrap().as_deref(),
        Some("releases/1.0.0")
    );

    // The local tag is annotated
    let local = repo.repo.find_reference("refs/tags/releases/1.0.0").unwrap();
    assert!(local.peel_to_tag().is_ok());

    assert!(remote.find_reference("refs/tags/releases/1.0.0").is_ok());
}

#[test]
fn test_failed_push_keeps_local_tag() {
    let repo = TestRepo::new();

    let outcome = repo
        .versioning()
        .with_remote("nowhere")
        .add_and_push_tag("releases/2.0.0")
        .unwrap();

    match outcome {
        PushOutcome::PushFailed { remote, reason } => {
            assert_eq!(remote, "nowhere");
            assert!(reason.contains("nowhere"));
        }
        other => panic!("expected a failed push, got {:?}", other),
    }
    assert!(repo.has_tag("releases/2.0.0"));
}

#[test]
fn test_existing_tag_is_an_error() {
    let repo = TestRepo::new();
    repo.tag_annotated("releases/1.0.0", repo.head());

    assert!(repo
        .versioning()
        .with_remote("nowhere")
        .add_and_push_tag("releases/1.0.0")
        .is_err());
}

#[test]
fn test_from_git2_uses_defaults() {
    let repo = TestRepo::new();
    repo.tag_annotated("releases/4.2.0", repo.head());

    let versioning = Git2Repository::from_git2(Git2Repo::open(repo.path()).unwrap());
    assert_eq!(
        versioning.describe().unwrap().as_deref(),
        Some("releases/4.2.0")
    );
}
