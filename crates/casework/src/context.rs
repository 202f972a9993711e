//! The host test-context capability set.
//!
//! Everything in this crate talks to the surrounding test facility through
//! [`TestContext`] only: run a named sub-test, report a non-fatal failure,
//! report a fatal one. [`crate::Harness`] is the bundled implementation.

/// A handle to the currently running test or sub-test.
pub trait TestContext {
    /// Full name of this test, nested names joined with `/`.
    fn name(&self) -> &str;

    /// Register and run a named sub-test.
    ///
    /// `body` receives the sub-test's own context; failures reported on it
    /// belong to the sub-test (and mark this context failed as well).
    /// Returns `true` when the sub-test passed.
    fn run(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn TestContext)) -> bool;

    /// Record a failure and keep going.
    fn error(&mut self, message: String);

    /// Record a failure and stop this test immediately.
    ///
    /// Siblings of this test are unaffected. Implementations usually unwind
    /// with [`crate::panic::stop_sub_test`] so the enclosing [`TestContext::run`]
    /// can resume with the next sibling.
    fn fatal(&mut self, message: String) -> !;

    /// Whether this test (or any of its sub-tests) has failed.
    fn failed(&self) -> bool;
}
