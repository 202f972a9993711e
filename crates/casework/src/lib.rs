//! Casework - method-based test suites for Rust
//!
//! Groups related test cases as methods on one suite value, runs each method
//! as an independent sub-test, and turns panics inside a case into a failure
//! of that case only.
//!
//! - [`suite`]: registry of cases, the `Setup` hook, and [`run_suite`]
//! - [`comparator`]: `expect_*` assertions with a uniform failure message
//! - [`deep`]: value trees behind deep equality
//! - [`format`]: how actual/expected values are rendered
//! - [`panic`]: containment boundary and panic payload inspection
//! - [`host`]: a [`TestContext`] implementation on top of `#[test]`
//!
//! # Example
//!
//! ```
//! use casework::{expect_eq, run_suite, suite, Harness, TestContext};
//! use std::cell::Cell;
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: Cell<i32>,
//! }
//!
//! impl Counter {
//!     fn setup(&self) {
//!         self.value.set(1);
//!     }
//!
//!     fn increments(&self, t: &mut dyn TestContext) {
//!         self.value.set(self.value.get() + 1);
//!         expect_eq(t, self.value.get(), 2, None);
//!     }
//! }
//!
//! suite!(Counter {
//!     setup: setup,
//!     cases: [increments],
//! });
//!
//! let mut harness = Harness::new("counter");
//! run_suite(&mut harness, &Counter::default());
//! harness.finish();
//! ```

/// Casework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod comparator;
pub mod context;
pub mod deep;
pub mod format;
pub mod host;
pub mod panic;
pub mod suite;

mod macros;

// Re-export commonly used types
pub use comparator::{
    deep_equal, expect_deep_eq, expect_eq, expect_eqf, expect_false, expect_panic_err_eq,
    expect_panic_err_eq_in, expect_true, CompareError, FailureReport, DEFAULT_MESSAGE,
    NO_PANIC_ERROR_SUFFIX,
};
pub use context::TestContext;
pub use format::{BinByte, Format, HexByte, TwoHexBytes};
pub use host::{ColorMode, Harness, Outcome, ReportConfig, Reporter, SubTestReport};
pub use panic::{guard, raise, stop_sub_test, PanicError, PanicPayload, TEST_PANICKED_PREFIX};
pub use suite::{run_suite, Operations, Suite, SETUP_NAME};
