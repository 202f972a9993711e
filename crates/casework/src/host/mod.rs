//! Host adapter for Rust's built-in test harness
//!
//! libtest has no nested sub-tests, so [`Harness`] provides them: create one
//! per `#[test]`, run suites on it, then call [`Harness::finish`] to print
//! the report and fail the `#[test]` if any sub-test failed.

pub mod harness;
pub mod reporter;

pub use harness::{Harness, Outcome, SubTestReport};
pub use reporter::{ColorMode, ReportConfig, Reporter};
