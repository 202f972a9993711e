/// Implement [`Suite`](crate::Suite) for a type from a list of its methods.
///
/// Cases are `fn(&self, &mut dyn TestContext)` methods and run under their
/// method names. The optional `setup` method is `fn(&self)` and is registered
/// as the suite's `Setup` operation.
///
/// ```
/// use casework::{suite, Suite, TestContext};
///
/// struct Parser;
///
/// impl Parser {
///     fn reset(&self) {}
///     fn empty_input(&self, _t: &mut dyn TestContext) {}
///     fn nested_lists(&self, _t: &mut dyn TestContext) {}
/// }
///
/// suite!(Parser {
///     setup: reset,
///     cases: [empty_input, nested_lists],
/// });
///
/// let names: Vec<_> = Parser::operations().names().map(String::from).collect();
/// assert_eq!(names, ["Setup", "empty_input", "nested_lists"]);
/// ```
#[macro_export]
macro_rules! suite {
    ($suite:ty { setup: $setup:ident, cases: [$($case:ident),* $(,)?] $(,)? }) => {
        impl $crate::Suite for $suite {
            fn operations() -> $crate::Operations<Self> {
                $crate::Operations::new()
                    .setup(<$suite>::$setup)
                    $(.case(stringify!($case), <$suite>::$case))*
            }
        }
    };
    ($suite:ty { cases: [$($case:ident),* $(,)?] $(,)? }) => {
        impl $crate::Suite for $suite {
            fn operations() -> $crate::Operations<Self> {
                $crate::Operations::new()
                    $(.case(stringify!($case), <$suite>::$case))*
            }
        }
    };
}
