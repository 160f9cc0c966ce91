//! Domain logic - pure business rules independent of git operations

pub mod revision;
pub mod tag;
pub mod version;

pub use revision::{RevisionVersionInfo, NO_TAG};
pub use tag::{TagPrefix, DEFAULT_TAG_PREFIX};
pub use version::{Scope, Version};
