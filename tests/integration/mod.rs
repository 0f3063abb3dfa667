//! Integration tests for the release-notes binary
//!
//! GitHub is replaced by a wiremock server; git runs for real in temp dirs.

mod helpers;
mod test_notes;
mod test_release;
