//! Harness - a root test context with synchronous sub-tests

use crate::context::TestContext;
use crate::host::reporter::{ReportConfig, Reporter};
use crate::panic::{guard, stop_sub_test, TEST_PANICKED_PREFIX};
use std::mem;
use std::time::{Duration, Instant};

/// Outcome of a single sub-test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No failure was reported
    Pass,
    /// One or more failures, in the order they were reported
    Fail { failures: Vec<String> },
}

/// Record of one finished sub-test
#[derive(Debug, Clone)]
pub struct SubTestReport {
    /// Full name, nested names joined with `/`
    pub name: String,
    /// Nesting level below the harness (0 for direct children)
    pub depth: usize,
    pub outcome: Outcome,
    pub duration: Duration,
}

impl SubTestReport {
    fn pending(name: String, depth: usize) -> Self {
        Self {
            name,
            depth,
            outcome: Outcome::Pass,
            duration: Duration::ZERO,
        }
    }

    /// Check if this sub-test passed
    pub fn is_pass(&self) -> bool {
        matches!(self.outcome, Outcome::Pass)
    }

    /// Check if this sub-test failed
    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// Failure messages (empty for a pass)
    pub fn failures(&self) -> &[String] {
        match &self.outcome {
            Outcome::Pass => &[],
            Outcome::Fail { failures } => failures,
        }
    }

    /// Last path segment of the name
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Root test context, one per `#[test]` function.
pub struct Harness {
    name: String,
    failures: Vec<String>,
    child_failed: bool,
    reports: Vec<SubTestReport>,
    reporter: Reporter,
}

impl Harness {
    /// Create a harness with default report settings
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, ReportConfig::default())
    }

    /// Create a harness with explicit report settings
    pub fn with_config(name: impl Into<String>, config: ReportConfig) -> Self {
        Self {
            name: name.into(),
            failures: Vec::new(),
            child_failed: false,
            reports: Vec::new(),
            reporter: Reporter::new(config),
        }
    }

    /// Failures reported directly on the harness, outside any sub-test
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Sub-test records so far, in start order
    pub fn reports(&self) -> &[SubTestReport] {
        &self.reports
    }

    /// Consume the harness and return its sub-test records without reporting.
    pub fn into_reports(self) -> Vec<SubTestReport> {
        self.reports
    }

    /// Print the report and fail the calling test if anything failed.
    pub fn finish(self) {
        self.reporter.report(&self.name, &self.reports, &self.failures);

        if self.failed() {
            let failed = self.reports.iter().filter(|r| r.is_fail()).count();
            panic!(
                "{}: {} of {} sub-tests failed",
                self.name,
                failed,
                self.reports.len()
            );
        }
    }
}

impl TestContext for Harness {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn TestContext)) -> bool {
        let passed = run_sub_test(&self.name, 0, &mut self.reports, name, body);
        if !passed {
            self.child_failed = true;
        }
        passed
    }

    fn error(&mut self, message: String) {
        self.failures.push(message);
    }

    fn fatal(&mut self, message: String) -> ! {
        self.failures.push(message.clone());
        self.reporter.report(&self.name, &self.reports, &self.failures);
        panic!("{}: {}", self.name, message);
    }

    fn failed(&self) -> bool {
        !self.failures.is_empty() || self.child_failed
    }
}

/// Context handed to a sub-test body
struct SubTest<'h> {
    name: String,
    depth: usize,
    failures: Vec<String>,
    child_failed: bool,
    reports: &'h mut Vec<SubTestReport>,
}

impl TestContext for SubTest<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn TestContext)) -> bool {
        let passed = run_sub_test(&self.name, self.depth + 1, self.reports, name, body);
        if !passed {
            self.child_failed = true;
        }
        passed
    }

    fn error(&mut self, message: String) {
        self.failures.push(message);
    }

    fn fatal(&mut self, message: String) -> ! {
        self.failures.push(message);
        stop_sub_test()
    }

    fn failed(&self) -> bool {
        !self.failures.is_empty() || self.child_failed
    }
}

/// Run `body` as a child of `parent` and record the result.
///
/// A fatal stop ends the body quietly; any other panic that reaches this
/// point is recorded as a failure of the child.
fn run_sub_test(
    parent: &str,
    depth: usize,
    reports: &mut Vec<SubTestReport>,
    name: &str,
    body: &mut dyn FnMut(&mut dyn TestContext),
) -> bool {
    let full_name = format!("{}/{}", parent, name);
    let slot = reports.len();
    reports.push(SubTestReport::pending(full_name.clone(), depth));

    let start = Instant::now();
    let mut sub = SubTest {
        name: full_name,
        depth,
        failures: Vec::new(),
        child_failed: false,
        reports: &mut *reports,
    };

    if let Err(payload) = guard(|| body(&mut sub)) {
        if !payload.is_fatal_stop() {
            sub.failures.push(format!("{}\n{}", TEST_PANICKED_PREFIX, payload));
        }
    }

    let passed = !sub.failed();
    let failures = mem::take(&mut sub.failures);
    drop(sub);

    let record = &mut reports[slot];
    record.duration = start.elapsed();
    if !passed {
        record.outcome = Outcome::Fail { failures };
    }
    tracing::trace!(test = %record.name, passed, "sub-test finished");
    passed
}
