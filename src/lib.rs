pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod naming;
pub mod release;
pub mod ui;

pub use error::{Result, VersioningError};
