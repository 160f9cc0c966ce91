use crate::error::Result;
use crate::git::{PushOutcome, Repository};

/// Repository stand-in for environments where versioning is disabled.
///
/// Never touches the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRepository;

impl Repository for NoOpRepository {
    fn describe(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn current_branch_name(&self) -> Result<String> {
        Ok(String::new())
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(false)
    }

    fn add_and_push_tag(&self, _name: &str) -> Result<PushOutcome> {
        Ok(PushOutcome::PushFailed {
            remote: String::new(),
            reason: "versioning is disabled".to_string(),
        })
    }

    fn close(&mut self) {}
}
