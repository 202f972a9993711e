//! Suite registry and runner
//!
//! A suite is any value whose type lists its cases in an [`Operations`]
//! registry, usually through the [`crate::suite!`] macro. [`run_suite`]
//! resolves that registry once and then runs every case as its own sub-test:
//!
//! 1. the operation named [`SETUP_NAME`] (if any) becomes the setup action
//!    and is not run as a case;
//! 2. each remaining operation, in registration order, becomes a sub-test
//!    named after it;
//! 3. inside the sub-test a containment boundary is installed, the setup
//!    action runs, then the case runs with the sub-test's own context.
//!
//! A panic in one case fails that sub-test only. `run_suite` never returns
//! an error; all outcomes are reported through the context.

use crate::context::TestContext;
use crate::panic::contain_case;
use std::any::type_name;

/// Name of the operation that runs before every case.
pub const SETUP_NAME: &str = "Setup";

/// A case body: receives the suite and the sub-test context.
pub type CaseFn<S> = fn(&S, &mut dyn TestContext);

/// The setup hook: receives the suite only.
pub type SetupFn<S> = fn(&S);

/// One registered operation.
pub enum Operation<S> {
    Case(CaseFn<S>),
    Setup(SetupFn<S>),
}

/// Ordered operation set of a suite type.
///
/// Names are unique; registering a name twice replaces the earlier operation
/// in place.
pub struct Operations<S> {
    entries: Vec<(String, Operation<S>)>,
}

impl<S> Default for Operations<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Operations<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a case under `name`.
    pub fn case(mut self, name: impl Into<String>, func: CaseFn<S>) -> Self {
        self.insert(name.into(), Operation::Case(func));
        self
    }

    /// Register the setup hook under [`SETUP_NAME`].
    pub fn setup(mut self, func: SetupFn<S>) -> Self {
        self.insert(SETUP_NAME.to_string(), Operation::Setup(func));
        self
    }

    fn insert(&mut self, name: String, op: Operation<S>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = op,
            None => self.entries.push((name, op)),
        }
    }

    /// Registered names in order, setup included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A type whose values can be run as a suite.
pub trait Suite: Sized {
    /// The suite's operation set.
    fn operations() -> Operations<Self>;

    /// Name used in logs. Defaults to the type's name without its module path.
    fn suite_name(&self) -> &str {
        short_type_name::<Self>()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// A case bound for dispatch.
pub struct Case<S> {
    name: String,
    func: CaseFn<S>,
}

impl<S> Case<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, suite: &S, ctx: &mut dyn TestContext) {
        (self.func)(suite, ctx)
    }
}

/// The setup action of one run.
pub enum SetupAction<'s, S> {
    Noop,
    Bound { suite: &'s S, func: SetupFn<S> },
}

impl<S> SetupAction<'_, S> {
    pub fn invoke(&self) {
        if let SetupAction::Bound { suite, func } = self {
            (*func)(*suite);
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, SetupAction::Noop)
    }
}

/// A suite with its operation set resolved.
pub struct Dispatch<'s, S> {
    suite: &'s S,
    setup: SetupAction<'s, S>,
    cases: Vec<Case<S>>,
}

impl<'s, S: Suite> Dispatch<'s, S> {
    /// Resolve the suite's operations into a setup action and an ordered case list.
    pub fn resolve(suite: &'s S) -> Self {
        let mut setup = SetupAction::Noop;
        let mut cases = Vec::new();

        for (name, op) in S::operations().entries {
            match op {
                Operation::Setup(func) if name == SETUP_NAME => {
                    setup = SetupAction::Bound { suite, func };
                }
                Operation::Case(_) if name == SETUP_NAME => {
                    tracing::warn!(
                        suite = suite.suite_name(),
                        "case registered as `{}` is reserved for setup and will not run",
                        SETUP_NAME
                    );
                }
                Operation::Case(func) => cases.push(Case { name, func }),
                Operation::Setup(_) => {}
            }
        }

        Self {
            suite,
            setup,
            cases,
        }
    }

    pub fn setup(&self) -> &SetupAction<'s, S> {
        &self.setup
    }

    pub fn cases(&self) -> &[Case<S>] {
        &self.cases
    }

    /// Run every case as a sub-test of `ctx`.
    pub fn run<C>(&self, ctx: &mut C)
    where
        C: TestContext + ?Sized,
    {
        tracing::debug!(
            suite = self.suite.suite_name(),
            cases = self.cases.len(),
            has_setup = !self.setup.is_noop(),
            "running suite"
        );
        for case in &self.cases {
            self.run_case(ctx, case);
        }
    }

    fn run_case<C>(&self, ctx: &mut C, case: &Case<S>)
    where
        C: TestContext + ?Sized,
    {
        let span = tracing::info_span!("case", suite = self.suite.suite_name(), case = case.name());
        let _enter = span.enter();

        ctx.run(case.name(), &mut |t: &mut dyn TestContext| {
            contain_case(t, |t| {
                self.setup.invoke();
                case.invoke(self.suite, t);
            });
        });
    }
}

/// Run every case of `suite` as a named, independent sub-test of `ctx`.
pub fn run_suite<C, S>(ctx: &mut C, suite: &S)
where
    C: TestContext + ?Sized,
    S: Suite,
{
    Dispatch::resolve(suite).run(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::expect_eq;
    use crate::host::{Harness, Outcome};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recording {
        log: RefCell<Vec<String>>,
    }

    impl Recording {
        fn setup(&self) {
            self.log.borrow_mut().push("setup".to_string());
        }

        fn first(&self, _t: &mut dyn TestContext) {
            self.log.borrow_mut().push("first".to_string());
        }

        fn second(&self, _t: &mut dyn TestContext) {
            self.log.borrow_mut().push("second".to_string());
        }
    }

    impl Suite for Recording {
        fn operations() -> Operations<Self> {
            Operations::new()
                .case("first", Recording::first)
                .setup(Recording::setup)
                .case("second", Recording::second)
        }
    }

    #[test]
    fn test_resolve_splits_setup_from_cases() {
        let suite = Recording::default();
        let dispatch = Dispatch::resolve(&suite);

        assert!(!dispatch.setup().is_noop());
        let names: Vec<_> = dispatch.cases().iter().map(Case::name).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_setup_runs_before_each_case() {
        let suite = Recording::default();
        let mut harness = Harness::new("recording");
        run_suite(&mut harness, &suite);

        assert_eq!(
            *suite.log.borrow(),
            ["setup", "first", "setup", "second"]
        );
        assert!(!harness.failed());
    }

    struct NoSetup {
        runs: Cell<u32>,
    }

    impl NoSetup {
        fn only(&self, t: &mut dyn TestContext) {
            self.runs.set(self.runs.get() + 1);
            expect_eq(t, self.runs.get(), 1, None);
        }
    }

    impl Suite for NoSetup {
        fn operations() -> Operations<Self> {
            Operations::new().case("only", NoSetup::only)
        }
    }

    #[test]
    fn test_missing_setup_is_noop() {
        let suite = NoSetup { runs: Cell::new(0) };
        let dispatch = Dispatch::resolve(&suite);
        assert!(dispatch.setup().is_noop());

        let mut harness = Harness::new("no_setup");
        dispatch.run(&mut harness);
        let reports = harness.into_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, Outcome::Pass);
    }

    struct Reserved;

    impl Reserved {
        fn misnamed(&self, t: &mut dyn TestContext) {
            t.error("should never run".to_string());
        }
    }

    impl Suite for Reserved {
        fn operations() -> Operations<Self> {
            Operations::new().case(SETUP_NAME, Reserved::misnamed)
        }
    }

    #[test]
    fn test_case_named_setup_is_not_registered() {
        let mut harness = Harness::new("reserved");
        run_suite(&mut harness, &Reserved);
        assert!(harness.into_reports().is_empty());
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let ops = Operations::<Recording>::new()
            .case("a", Recording::first)
            .case("b", Recording::second)
            .case("a", Recording::second);
        assert_eq!(ops.names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Recording>(), "Recording");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec<u8>");
    }
}
