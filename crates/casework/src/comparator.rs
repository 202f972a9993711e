//! Comparison assertions
//!
//! Every `expect_*` function either returns silently or records one
//! non-fatal failure on the context and returns; the calling case keeps
//! running. Failures share one three-line shape:
//!
//! ```text
//! <msg>:
//!     actual:   <actual>
//!     expected: <expected>
//! ```
//!
//! Other tests may parse or snapshot this text, so its layout is fixed.

use crate::context::TestContext;
use crate::deep::{self, CaptureError};
use crate::format::{self, Format, WithType};
use crate::panic::{guard, PanicPayload};
use serde::Serialize;
use std::any::type_name;
use std::fmt;
use thiserror::Error;

/// Message used when the caller does not supply one.
pub const DEFAULT_MESSAGE: &str = "unexpected value";

/// Appended to the message when a recovered panic carried no error.
pub const NO_PANIC_ERROR_SUFFIX: &str = " (panic didn't return error)";

/// Shown as `actual` when a guarded block did not panic at all.
const NOTHING_RECOVERED: &str = "<no panic>";

/// Errors raised while comparing, as opposed to comparison mismatches.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("cannot serialize {side} value: {source}")]
    Serialize {
        side: &'static str,
        #[source]
        source: CaptureError,
    },
}

/// One rendered assertion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub message: String,
    pub actual: String,
    pub expected: String,
}

impl FailureReport {
    /// Render both values with the same format.
    pub fn new<T, F>(message: impl Into<String>, actual: &T, expected: &T, format: &F) -> Self
    where
        T: ?Sized,
        F: Format<T>,
    {
        Self {
            message: message.into(),
            actual: format.render(actual),
            expected: format.render(expected),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:\n    actual:   {}\n    expected: {}",
            self.message, self.actual, self.expected
        )
    }
}

fn message_or_default(msg: Option<&str>) -> &str {
    msg.unwrap_or(DEFAULT_MESSAGE)
}

fn signal<C>(ctx: &mut C, report: FailureReport)
where
    C: TestContext + ?Sized,
{
    tracing::debug!(
        test = ctx.name(),
        actual = %report.actual,
        expected = %report.expected,
        "assertion failed"
    );
    ctx.error(report.to_string());
}

/// Fail unless `actual == expected`. Values render with `{:?}`.
///
/// Strings therefore show up quoted and escaped (`actual:   "a"`). Pass
/// [`format::Display`] to [`expect_eqf`] for the bare text.
pub fn expect_eq<C, T>(ctx: &mut C, actual: T, expected: T, msg: Option<&str>)
where
    C: TestContext + ?Sized,
    T: PartialEq + fmt::Debug,
{
    expect_eqf(ctx, actual, expected, format::Debug, msg);
}

/// Fail unless `actual == expected`, rendering both sides with `format`.
///
/// ```
/// use casework::{expect_eqf, Harness, HexByte};
///
/// let mut t = Harness::new("registers");
/// expect_eqf(&mut t, 0x0au8, 0x0bu8, HexByte, Some("status register"));
/// assert_eq!(
///     t.failures()[0],
///     "status register:\n    actual:   0xa\n    expected: 0xb"
/// );
/// ```
pub fn expect_eqf<C, T, F>(ctx: &mut C, actual: T, expected: T, format: F, msg: Option<&str>)
where
    C: TestContext + ?Sized,
    T: PartialEq,
    F: Format<T>,
{
    if actual != expected {
        let report = FailureReport::new(message_or_default(msg), &actual, &expected, &format);
        signal(ctx, report);
    }
}

/// Fail unless `value` is `true`.
pub fn expect_true<C>(ctx: &mut C, value: bool, msg: Option<&str>)
where
    C: TestContext + ?Sized,
{
    expect_eq(ctx, value, true, msg);
}

/// Fail unless `value` is `false`.
pub fn expect_false<C>(ctx: &mut C, value: bool, msg: Option<&str>)
where
    C: TestContext + ?Sized,
{
    expect_eq(ctx, value, false, msg);
}

/// Structural equality without a `PartialEq` bound.
///
/// Both values must have the same type and capture to equal value trees
/// (see [`crate::deep`]).
pub fn deep_equal<A, E>(actual: &A, expected: &E) -> Result<bool, CompareError>
where
    A: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    if type_name::<A>() != type_name::<E>() {
        return Ok(false);
    }
    let actual = deep::capture(actual).map_err(|source| CompareError::Serialize {
        side: "actual",
        source,
    })?;
    let expected = deep::capture(expected).map_err(|source| CompareError::Serialize {
        side: "expected",
        source,
    })?;
    Ok(actual == expected)
}

/// Fail unless `actual` and `expected` are deeply equal (see [`deep_equal`]).
///
/// Both sides render as `<value> (<type>)`.
pub fn expect_deep_eq<C, A, E>(ctx: &mut C, actual: &A, expected: &E, msg: Option<&str>)
where
    C: TestContext + ?Sized,
    A: Serialize + fmt::Debug + ?Sized,
    E: Serialize + fmt::Debug + ?Sized,
{
    let message = match deep_equal(actual, expected) {
        Ok(true) => return,
        Ok(false) => message_or_default(msg).to_string(),
        Err(err) => format!("{} ({})", message_or_default(msg), err),
    };
    let report = FailureReport {
        message,
        actual: WithType::<_, A>::new(format::Debug).render(actual),
        expected: WithType::<_, E>::new(format::Debug).render(expected),
    };
    signal(ctx, report);
}

/// Check the payload recovered by a containment boundary.
///
/// Call this only with the result of a guarded block, e.g.
/// `guard(|| code_under_test()).err()`; `None` means the block did not
/// panic. An error-shaped payload must have the text `text`. Anything else
/// fails with the message suffixed by `(panic didn't return error)` and the
/// raw payload shown as `actual`.
pub fn expect_panic_err_eq<C>(
    ctx: &mut C,
    recovered: Option<&PanicPayload>,
    text: &str,
    msg: Option<&str>,
) where
    C: TestContext + ?Sized,
{
    match recovered.and_then(PanicPayload::as_error) {
        Some(err) => expect_eqf(ctx, err.to_string(), text.to_string(), format::Display, msg),
        None => {
            let message = format!("{}{}", message_or_default(msg), NO_PANIC_ERROR_SUFFIX);
            let actual = recovered
                .map(|payload| payload.to_string())
                .unwrap_or_else(|| NOTHING_RECOVERED.to_string());
            signal(
                ctx,
                FailureReport {
                    message,
                    actual,
                    expected: text.to_string(),
                },
            );
        }
    }
}

/// Run `f` in its own containment boundary and check what it panicked with.
pub fn expect_panic_err_eq_in<C, F>(ctx: &mut C, f: F, text: &str, msg: Option<&str>)
where
    C: TestContext + ?Sized,
    F: FnOnce(),
{
    let recovered = match guard(f) {
        Ok(()) => None,
        Err(payload) if payload.is_fatal_stop() => payload.resume(),
        Err(payload) => Some(payload),
    };
    expect_panic_err_eq(ctx, recovered.as_ref(), text, msg);
}
