use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;
use crate::git::{PushOutcome, Repository};

/// Mock repository for testing without actual git operations
///
/// Created tags and `close` calls are recorded in shared cells so they stay
/// observable after the repository has been moved into an operation.
pub struct MockRepository {
    description: Option<String>,
    branch: String,
    clean: bool,
    push_fails: bool,
    created_tags: Rc<RefCell<Vec<String>>>,
    closes: Rc<Cell<usize>>,
}

impl MockRepository {
    /// Create a new mock: clean, on `develop`, no tags
    pub fn new() -> Self {
        MockRepository {
            description: None,
            branch: "develop".to_string(),
            clean: true,
            push_fails: false,
            created_tags: Rc::new(RefCell::new(Vec::new())),
            closes: Rc::new(Cell::new(0)),
        }
    }

    /// Set the describe output
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the current branch
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set whether the working tree is clean
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Make every push fail after the local tag is created
    pub fn with_failing_push(mut self) -> Self {
        self.push_fails = true;
        self
    }

    /// Tags created so far
    pub fn created_tags(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.created_tags)
    }

    /// Number of `close` calls so far
    pub fn close_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn describe(&self) -> Result<Option<String>> {
        Ok(self.description.clone())
    }

    fn current_branch_name(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn add_and_push_tag(&self, name: &str) -> Result<PushOutcome> {
        self.created_tags.borrow_mut().push(name.to_string());

        if self.push_fails {
            Ok(PushOutcome::PushFailed {
                remote: "origin".to_string(),
                reason: "mock push failure".to_string(),
            })
        } else {
            Ok(PushOutcome::Pushed {
                remote: "origin".to_string(),
            })
        }
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_defaults() {
        let repo = MockRepository::default();
        assert_eq!(repo.describe().unwrap(), None);
        assert_eq!(repo.current_branch_name().unwrap(), "develop");
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn test_mock_repository_records_tags() {
        let repo = MockRepository::new();
        let tags = repo.created_tags();

        let outcome = repo.add_and_push_tag("releases/1.0.0").unwrap();

        assert!(outcome.is_pushed());
        assert_eq!(*tags.borrow(), vec!["releases/1.0.0".to_string()]);
    }

    #[test]
    fn test_mock_repository_failing_push_keeps_tag() {
        let repo = MockRepository::new().with_failing_push();
        let tags = repo.created_tags();

        let outcome = repo.add_and_push_tag("releases/1.0.0").unwrap();

        assert!(!outcome.is_pushed());
        assert_eq!(tags.borrow().len(), 1);
    }

    #[test]
    fn test_mock_repository_counts_closes() {
        let mut repo = MockRepository::new()
            .with_description("releases/1.0.0")
            .on_branch("master")
            .with_clean(false);
        let closes = repo.close_count();

        assert_eq!(repo.describe().unwrap().as_deref(), Some("releases/1.0.0"));
        assert_eq!(repo.current_branch_name().unwrap(), "master");
        assert!(!repo.is_clean().unwrap());

        repo.close();
        assert_eq!(closes.get(), 1);
    }
}
