//! Core plumbing shared by every command
//!
//! - **context**: Resolved configuration, version and repository handles
//! - **config**: release.toml parsing and version resolution
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git operations (SystemGit) behind the `Vcs` trait

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
