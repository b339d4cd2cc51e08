// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric abstraction used by setups and pickers.
//!
//! The picker works over a single numeric type at a time. [`Numeric`] is
//! implemented for `i32`, `i64`, `f32` and `f64`; all kind-specific arithmetic,
//! parsing and formatting lives behind it, so nothing downstream branches on
//! whether a value is an integer or a float.

use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt::{Debug, Display};

use crate::SetupError;

/// The two numeric kinds a picker can operate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Float,
}

/// A kind-tagged numeric value, used where values arrive untyped (for example
/// from attribute-style configuration).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyNumber {
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
}

impl AnyNumber {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(self) -> NumericKind {
        match self {
            Self::Integer(_) => NumericKind::Integer,
            Self::Float(_) => NumericKind::Float,
        }
    }
}

impl From<i32> for AnyNumber {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for AnyNumber {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for AnyNumber {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for AnyNumber {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Numeric value type a picker can select.
///
/// Integer implementations use checked arithmetic; float implementations treat a
/// non-finite result as overflow.
pub trait Numeric: Copy + PartialEq + PartialOrd + Debug + Display + 'static {
    /// The kind of this type.
    const KIND: NumericKind;

    /// Additive identity.
    fn zero() -> Self;

    /// Returns `self + step`, or `None` on overflow.
    fn checked_add_step(self, step: Self) -> Option<Self>;

    /// Returns `self - step`, or `None` on overflow.
    fn checked_sub_step(self, step: Self) -> Option<Self>;

    /// Returns `self + step * count`, or `None` on overflow.
    ///
    /// Used to enumerate value domains without accumulating rounding error.
    fn offset_by(self, step: Self, count: usize) -> Option<Self>;

    /// Returns `true` if the value is strictly greater than zero.
    fn is_positive(self) -> bool {
        self > Self::zero()
    }

    /// Total ordering used for sorting and searching value domains.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Parses a plain number, without any prefix or suffix.
    fn parse(text: &str) -> Option<Self>;

    /// Formats the value, with a fixed number of decimals for float kinds.
    ///
    /// `None` uses the shortest representation that parses back to the same value.
    fn format(self, decimals: Option<usize>) -> String;

    /// Number of fractional digits in the shortest representation; zero for integers.
    fn decimals(self) -> usize;

    /// Rounds to `decimals` fractional digits. Integers are returned unchanged.
    fn quantize(self, decimals: usize) -> Self;

    /// Converts a kind-tagged value, failing on a kind mismatch.
    fn from_any(value: AnyNumber) -> Result<Self, SetupError>;

    /// Converts into a kind-tagged value.
    fn into_any(self) -> AnyNumber;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Numeric for $ty {
            const KIND: NumericKind = NumericKind::Integer;

            fn zero() -> Self {
                0
            }

            fn checked_add_step(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }

            fn checked_sub_step(self, step: Self) -> Option<Self> {
                self.checked_sub(step)
            }

            fn offset_by(self, step: Self, count: usize) -> Option<Self> {
                let count = Self::try_from(count).ok()?;
                self.checked_add(step.checked_mul(count)?)
            }

            fn total_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn parse(text: &str) -> Option<Self> {
                text.parse().ok()
            }

            fn format(self, _decimals: Option<usize>) -> String {
                format!("{self}")
            }

            fn decimals(self) -> usize {
                0
            }

            fn quantize(self, _decimals: usize) -> Self {
                self
            }

            fn from_any(value: AnyNumber) -> Result<Self, SetupError> {
                match value {
                    AnyNumber::Integer(v) => {
                        Self::try_from(v).map_err(|_| SetupError::Unrepresentable)
                    }
                    AnyNumber::Float(_) => Err(SetupError::KindMismatch {
                        expected: NumericKind::Integer,
                        found: NumericKind::Float,
                    }),
                }
            }

            fn into_any(self) -> AnyNumber {
                AnyNumber::Integer(self.into())
            }
        }
    )*};
}

impl_integer!(i32, i64);

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl Numeric for $ty {
            const KIND: NumericKind = NumericKind::Float;

            fn zero() -> Self {
                0.0
            }

            fn checked_add_step(self, step: Self) -> Option<Self> {
                Some(self + step).filter(|v| v.is_finite())
            }

            fn checked_sub_step(self, step: Self) -> Option<Self> {
                Some(self - step).filter(|v| v.is_finite())
            }

            fn offset_by(self, step: Self, count: usize) -> Option<Self> {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "Domain sizes stay far below the float mantissa range"
                )]
                let count = count as Self;
                Some(self + step * count).filter(|v| v.is_finite())
            }

            fn total_cmp(&self, other: &Self) -> Ordering {
                <$ty>::total_cmp(self, other)
            }

            fn parse(text: &str) -> Option<Self> {
                text.parse::<Self>().ok().filter(|v| v.is_finite())
            }

            fn format(self, decimals: Option<usize>) -> String {
                match decimals {
                    Some(decimals) => format!("{self:.decimals$}"),
                    None => format!("{self}"),
                }
            }

            fn decimals(self) -> usize {
                format!("{self}")
                    .split_once('.')
                    .map_or(0, |(_, fraction)| fraction.len())
            }

            fn quantize(self, decimals: usize) -> Self {
                format!("{self:.decimals$}")
                    .parse::<Self>()
                    .ok()
                    .filter(|v| v.is_finite())
                    // Adding zero turns a rounded `-0.0` into `0.0`.
                    .map_or(self, |v| v + 0.0)
            }

            fn from_any(value: AnyNumber) -> Result<Self, SetupError> {
                match value {
                    AnyNumber::Float(v) => {
                        #[allow(
                            trivial_numeric_casts,
                            clippy::cast_possible_truncation,
                            reason = "Narrowing to f32 is checked below; for f64 this is a no-op"
                        )]
                        let v = v as Self;
                        if v.is_finite() {
                            Ok(v)
                        } else {
                            Err(SetupError::Unrepresentable)
                        }
                    }
                    AnyNumber::Integer(_) => Err(SetupError::KindMismatch {
                        expected: NumericKind::Float,
                        found: NumericKind::Integer,
                    }),
                }
            }

            fn into_any(self) -> AnyNumber {
                AnyNumber::Float(self.into())
            }
        }
    )*};
}

impl_float!(f32, f64);
