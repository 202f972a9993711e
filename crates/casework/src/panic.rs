//! Panic containment and payload inspection
//!
//! A containment boundary is one `catch_unwind` around one unit of work. The
//! suite runner installs one per case ([`contain_case`]) so a panicking case
//! fails alone. [`guard`] is the same boundary for callers that want to
//! inspect what was recovered, e.g. with [`crate::expect_panic_err_eq`].

use crate::context::TestContext;
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Prefix of the failure reported for a case that panicked.
pub const TEST_PANICKED_PREFIX: &str = "test panicked:";

/// An error built from text, for code under test that panics with an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PanicError(pub String);

impl PanicError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Unwind marker used after a fatal report. Carries nothing; the message was
/// already recorded on the context.
#[derive(Debug)]
pub(crate) struct FatalStop;

/// Stop the current sub-test without reporting anything further.
///
/// For [`TestContext`] implementations: call this at the end of
/// [`TestContext::fatal`]. Containment boundaries let it pass through to the
/// enclosing [`TestContext::run`].
pub fn stop_sub_test() -> ! {
    panic::resume_unwind(Box::new(FatalStop))
}

/// The value a panic unwound with.
pub struct PanicPayload(Box<dyn Any + Send>);

impl PanicPayload {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self(payload)
    }

    /// The payload's text when it is a plain string panic (`panic!("...")`).
    pub fn message(&self) -> Option<&str> {
        if let Some(s) = self.0.downcast_ref::<&'static str>() {
            Some(*s)
        } else if let Some(s) = self.0.downcast_ref::<String>() {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// The payload viewed as an error, when it is one.
    ///
    /// Recognized shapes: `Box<dyn Error + Send + Sync>` (what [`raise`]
    /// produces), [`anyhow::Error`], and [`PanicError`].
    pub fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        if let Some(err) = self.0.downcast_ref::<Box<dyn Error + Send + Sync>>() {
            Some(&**err)
        } else if let Some(err) = self.0.downcast_ref::<anyhow::Error>() {
            Some(&**err)
        } else if let Some(err) = self.0.downcast_ref::<PanicError>() {
            Some(err)
        } else {
            None
        }
    }

    pub(crate) fn is_fatal_stop(&self) -> bool {
        self.0.is::<FatalStop>()
    }

    /// Continue unwinding with the original payload.
    pub fn resume(self) -> ! {
        panic::resume_unwind(self.0)
    }

    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.0
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.message() {
            f.write_str(message)
        } else if let Some(err) = self.as_error() {
            write!(f, "{}", err)
        } else {
            f.write_str("Box<dyn Any>")
        }
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PanicPayload")
            .field(&self.to_string())
            .finish()
    }
}

impl From<Box<dyn Any + Send>> for PanicPayload {
    fn from(payload: Box<dyn Any + Send>) -> Self {
        Self::new(payload)
    }
}

/// Run `f` inside a containment boundary.
pub fn guard<R>(f: impl FnOnce() -> R) -> Result<R, PanicPayload> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(PanicPayload::new)
}

/// Panic with an error-shaped payload.
///
/// [`crate::expect_panic_err_eq`] compares the text of such payloads; a plain
/// `panic!("...")` is not error-shaped.
pub fn raise<E>(err: E) -> !
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    let boxed: Box<dyn Error + Send + Sync> = err.into();
    panic::panic_any(boxed)
}

/// Run one case body inside its own containment boundary.
///
/// A panic in `body` becomes a fatal failure on `ctx` with the message
/// `test panicked:\n<payload>`. A fatal stop raised by `ctx` itself passes
/// through untouched.
pub fn contain_case<C, F>(ctx: &mut C, body: F)
where
    C: TestContext + ?Sized,
    F: FnOnce(&mut C),
{
    let outcome = guard(|| body(&mut *ctx));
    if let Err(payload) = outcome {
        if payload.is_fatal_stop() {
            payload.resume();
        }
        tracing::debug!(test = ctx.name(), payload = %payload, "case panicked");
        ctx.fatal(format!("{}\n{}", TEST_PANICKED_PREFIX, payload));
    }
}
