use std::fmt;

/// Non-fatal conditions met while versioning that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No release tag is reachable, so versions start from 0.0.0
    NoReleaseTag { prefix: String },
    /// The tag was created locally but did not reach the remote
    TagPushFailed {
        tag: String,
        remote: String,
        reason: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoReleaseTag { prefix } => {
                write!(
                    f,
                    "No tag matching '{}*' found in history, starting from 0.0.0",
                    prefix
                )
            }
            BoundaryWarning::TagPushFailed {
                tag,
                remote,
                reason,
            } => {
                write!(
                    f,
                    "Tag '{}' was created locally but pushing to '{}' failed: {}",
                    tag, remote, reason
                )
            }
        }
    }
}
