//! CLI commands for release-notes
//!
//! - **notes**: Preview the release notes for the next version
//! - **release**: Validate, write notes, optionally commit/push and publish
//!
//! All commands take a `&ReleaseContext` built once in main.rs.

pub mod notes;
pub mod release;

pub use notes::run_notes;
pub use release::run_release;
