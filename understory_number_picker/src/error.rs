// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use crate::NumericKind;

/// An invalid setup or configuration.
///
/// These are the only errors surfaced as `Err`. Rejected or unparsable values
/// are reported through the picker's invalid-value listener instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// An explicit value list was empty.
    #[error("the value domain must not be empty")]
    EmptyDomain,
    /// The default value is not part of an explicit value list.
    #[error("the default value must be part of the value domain")]
    DefaultNotInDomain,
    /// An explicit value list is not strictly ascending.
    #[error("the value domain must be strictly ascending without duplicates")]
    UnsortedDomain,
    /// The minimum is greater than the maximum.
    #[error("the minimum must not exceed the maximum")]
    InvalidRange,
    /// A step size is zero or negative.
    #[error("step sizes must be positive")]
    NonPositiveStep,
    /// The default value lies outside `[min, max]`.
    #[error("the default value must lie within the minimum and maximum")]
    DefaultOutOfRange,
    /// A value of one numeric kind was supplied where another was expected.
    #[error("expected a {expected:?} value, found a {found:?} value")]
    KindMismatch {
        /// Kind required by the picker.
        expected: NumericKind,
        /// Kind that was supplied.
        found: NumericKind,
    },
    /// A value does not fit into the picker's numeric type.
    #[error("the value does not fit the picker's numeric type")]
    Unrepresentable,
}
