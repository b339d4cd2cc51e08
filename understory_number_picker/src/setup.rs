// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The setup policy: formatting, parsing, validity and the value domain.
//!
//! A setup is an immutable value. Pickers never mutate it; they swap it
//! wholesale with [`NumberPicker::set_setup`](crate::NumberPicker::set_setup).
//!
//! Two setups are provided: [`RangeSetup`](crate::RangeSetup) for
//! `min..=max` in fixed steps and [`ListSetup`](crate::ListSetup) for an explicit
//! list. Anything else can implement [`PickerSetup`] directly; only
//! [`PickerSetup::default_value`], [`PickerSetup::format`],
//! [`PickerSetup::parse`], [`PickerSetup::is_value_allowed`],
//! [`PickerSetup::visible_offset_items`] and [`PickerSetup::values`] are required.

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::{Numeric, NumericKind};

/// How a picker presents its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresentationMode {
    /// An editable text field with stepping buttons.
    TextEntry,
    /// A snapping scroll wheel over the value domain.
    ScrollWheel,
}

/// Direction of a stepping button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepDirection {
    /// Towards larger values.
    Up,
    /// Towards smaller values.
    Down,
}

/// Which of the two step sizes a button uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepSize {
    /// The regular step.
    Primary,
    /// The large step, if the setup has one.
    Secondary,
}

/// A stepping button of a text-entry picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepButton {
    /// Step direction.
    pub direction: StepDirection,
    /// Step size.
    pub size: StepSize,
}

impl StepButton {
    /// Regular step up.
    pub const UP: Self = Self::new(StepDirection::Up, StepSize::Primary);
    /// Regular step down.
    pub const DOWN: Self = Self::new(StepDirection::Down, StepSize::Primary);
    /// Large step up.
    pub const UP_LARGE: Self = Self::new(StepDirection::Up, StepSize::Secondary);
    /// Large step down.
    pub const DOWN_LARGE: Self = Self::new(StepDirection::Down, StepSize::Secondary);

    /// Creates a button.
    #[must_use]
    pub const fn new(direction: StepDirection, size: StepSize) -> Self {
        Self { direction, size }
    }
}

/// Value policy injected into a picker.
///
/// Implementations must keep [`format`](Self::format) and [`parse`](Self::parse)
/// inverse for every value of [`values`](Self::values), keep `values` strictly
/// ascending, and agree with domain membership in
/// [`is_value_allowed`](Self::is_value_allowed) for
/// [`PresentationMode::ScrollWheel`].
pub trait PickerSetup<T: Numeric>: Debug {
    /// Numeric kind of the setup.
    fn kind(&self) -> NumericKind {
        T::KIND
    }

    /// Value used when no valid value is available.
    fn default_value(&self) -> T;

    /// Display text for a value.
    fn format(&self, value: T) -> String;

    /// Value for display text, `None` if the text is not a number.
    fn parse(&self, text: &str) -> Option<T>;

    /// Whether `value` may become the picker's value in the given mode.
    fn is_value_allowed(&self, mode: PresentationMode, value: T) -> bool;

    /// Number of neighbours kept visible on each side of the selected wheel item.
    fn visible_offset_items(&self) -> usize;

    /// The ordered value domain.
    fn values(&self) -> &[T];

    /// The domain value with the longest label, used to size text fields and wheel
    /// items. The last one wins on ties.
    fn longest_value(&self) -> T {
        longest_label(self.values(), |v| self.format(v)).unwrap_or_else(|| self.default_value())
    }

    /// The value a button produces from `value`, or `None` if there is none.
    ///
    /// The default moves to the neighbouring domain value; a value outside the
    /// domain steps to itself.
    fn step_value(&self, value: T, direction: StepDirection, size: StepSize) -> Option<T> {
        let _ = size;
        neighbour(self.values(), value, direction)
    }

    /// Whether secondary (large) step buttons are offered.
    fn supports_secondary_step(&self) -> bool {
        false
    }

    /// Position of `value` in the domain.
    fn index_of(&self, value: T) -> Option<usize> {
        domain_index(self.values(), value)
    }
}

pub(crate) fn domain_index<T: Numeric>(values: &[T], value: T) -> Option<usize> {
    values.binary_search_by(|probe| probe.total_cmp(&value)).ok()
}

pub(crate) fn neighbour<T: Numeric>(values: &[T], value: T, direction: StepDirection) -> Option<T> {
    let Some(index) = domain_index(values, value) else {
        return Some(value);
    };
    match direction {
        StepDirection::Up => values.get(index + 1).copied(),
        StepDirection::Down => index.checked_sub(1).map(|i| values[i]),
    }
}

pub(crate) fn longest_label<T: Numeric>(values: &[T], format: impl Fn(T) -> String) -> Option<T> {
    let mut longest: Option<(usize, T)> = None;
    for &value in values {
        let width = format(value).chars().count();
        if longest.is_none_or(|(w, _)| width >= w) {
            longest = Some((width, value));
        }
    }
    longest.map(|(_, value)| value)
}

pub(crate) fn is_strictly_ascending<T: Numeric>(values: &[T]) -> bool {
    values
        .windows(2)
        .all(|pair| pair[0].total_cmp(&pair[1]) == Ordering::Less)
}
