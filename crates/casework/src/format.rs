//! Value renderings for assertion failure messages
//!
//! A [`Format`] turns one value into the text shown after `actual:` or
//! `expected:`. Both sides of a comparison always go through the same format.
//!
//! # Provided formats
//! - [`Debug`]: `{:?}`, the default for [`crate::expect_eq`]
//! - [`Display`]: `{}`
//! - [`HexByte`]: `{:#02x}`, e.g. `0xa`
//! - [`TwoHexBytes`]: `{:#04x}`, e.g. `0x0a`
//! - [`BinByte`]: `{:08b}`, e.g. `00001010`
//! - [`WithType`]: another format followed by the value's type name
//!
//! Any `Fn(&T) -> String` closure is a format as well.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Renders a value of type `T` for a failure message.
pub trait Format<T: ?Sized> {
    fn render(&self, value: &T) -> String;
}

impl<T: ?Sized, F> Format<T> for F
where
    F: Fn(&T) -> String,
{
    fn render(&self, value: &T) -> String {
        self(value)
    }
}

/// `{:?}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Debug;

impl<T: fmt::Debug + ?Sized> Format<T> for Debug {
    fn render(&self, value: &T) -> String {
        format!("{:?}", value)
    }
}

/// `{}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Display;

impl<T: fmt::Display + ?Sized> Format<T> for Display {
    fn render(&self, value: &T) -> String {
        format!("{}", value)
    }
}

/// Alternate lower hex with a minimum width of two: `0xa`, `0xff`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexByte;

impl<T: fmt::LowerHex + ?Sized> Format<T> for HexByte {
    fn render(&self, value: &T) -> String {
        format!("{:#02x}", value)
    }
}

/// Alternate lower hex padded to a width of four: `0x0a`, `0xff`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoHexBytes;

impl<T: fmt::LowerHex + ?Sized> Format<T> for TwoHexBytes {
    fn render(&self, value: &T) -> String {
        format!("{:#04x}", value)
    }
}

/// Binary padded to eight digits: `00001010`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinByte;

impl<T: fmt::Binary + ?Sized> Format<T> for BinByte {
    fn render(&self, value: &T) -> String {
        format!("{:08b}", value)
    }
}

/// Renders `<inner> (<type name>)`.
pub struct WithType<F, T: ?Sized> {
    inner: F,
    _marker: PhantomData<fn(&T)>,
}

impl<F, T: ?Sized> WithType<F, T> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<F: Format<T>, T: ?Sized> Format<T> for WithType<F, T> {
    fn render(&self, value: &T) -> String {
        format!("{} ({})", self.inner.render(value), type_name::<T>())
    }
}
