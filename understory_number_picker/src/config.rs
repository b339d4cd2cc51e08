// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picker behaviour flags and attribute-style setup construction.

use alloc::string::String;

use understory_event_state::repeat::RepeatTimings;

use crate::{Affix, AnyNumber, Numeric, PickerSetup, PresentationMode, RangeSetup, SetupError};

/// Behaviour flags of a [`NumberPicker`](crate::NumberPicker).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickerConfig {
    /// Keep stepping while a button is held.
    pub long_press_repeat: bool,
    /// Delay before a held button starts repeating, in milliseconds.
    pub repeat_first_delay: u64,
    /// Delay between repeated steps, in milliseconds.
    pub repeat_consecutive_delay: u64,
    /// Hide the keyboard after a button step.
    pub close_keyboard_on_step: bool,
    /// Hide the keyboard when the user commits a new value by text.
    pub close_keyboard_on_new_value: bool,
    /// Pointer travel after which a button press counts as a drag, or `None`.
    pub drag_threshold: Option<f64>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            long_press_repeat: true,
            repeat_first_delay: 300,
            repeat_consecutive_delay: 100,
            close_keyboard_on_step: true,
            close_keyboard_on_new_value: true,
            drag_threshold: Some(8.0),
        }
    }
}

impl PickerConfig {
    /// The repeat delays as [`RepeatTimings`].
    #[must_use]
    pub const fn repeat_timings(&self) -> RepeatTimings {
        RepeatTimings::new(self.repeat_first_delay, self.repeat_consecutive_delay)
    }
}

/// Untyped range configuration, as it arrives from markup or settings.
///
/// Numbers are [`AnyNumber`]s; [`build`](Self::build) fails with
/// [`SetupError::KindMismatch`] if their kind differs from the picker's.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeAttributes {
    /// Smallest value.
    pub min: AnyNumber,
    /// Largest value.
    pub max: AnyNumber,
    /// Primary step.
    pub step: AnyNumber,
    /// Large step for the secondary buttons.
    pub step_secondary: Option<AnyNumber>,
    /// Initial value. Zero when unset.
    pub value: Option<AnyNumber>,
    /// Label prefix.
    pub prefix: String,
    /// Label suffix.
    pub suffix: String,
    /// Fixed decimals for floats.
    pub decimals: Option<usize>,
    /// Wheel neighbours on each side of the selection.
    pub visible_offset_items: usize,
}

impl RangeAttributes {
    /// Integer attributes over `0..=100` in steps of one.
    #[must_use]
    pub fn integer() -> Self {
        Self::with_bounds(AnyNumber::Integer(0), AnyNumber::Integer(100), AnyNumber::Integer(1))
    }

    /// Float attributes over `0.0..=100.0` in steps of one.
    #[must_use]
    pub fn float() -> Self {
        Self::with_bounds(AnyNumber::Float(0.0), AnyNumber::Float(100.0), AnyNumber::Float(1.0))
    }

    fn with_bounds(min: AnyNumber, max: AnyNumber, step: AnyNumber) -> Self {
        Self {
            min,
            max,
            step,
            step_secondary: None,
            value: None,
            prefix: String::new(),
            suffix: String::new(),
            decimals: None,
            visible_offset_items: 2,
        }
    }

    /// Builds the setup and resolves the initial value.
    ///
    /// An initial value the setup rejects in `mode` falls back to the setup's
    /// default.
    pub fn build<T: Numeric>(
        &self,
        mode: PresentationMode,
    ) -> Result<(RangeSetup<T>, T), SetupError> {
        let affix = Affix {
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            decimals: self.decimals,
        };
        let mut builder = RangeSetup::builder(
            T::from_any(self.min)?,
            T::from_any(self.max)?,
            T::from_any(self.step)?,
        )
        .affix(affix)
        .visible_offset_items(self.visible_offset_items);
        if let Some(step) = self.step_secondary {
            builder = builder.secondary_step(T::from_any(step)?);
        }
        let setup = builder.build()?;
        let value = match self.value {
            Some(value) => T::from_any(value)?,
            None => T::zero(),
        };
        let value = if setup.is_value_allowed(mode, value) {
            value
        } else {
            setup.default_value()
        };
        Ok((setup, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NumericKind;

    #[test]
    fn defaults_match_the_documented_behaviour() {
        let config = PickerConfig::default();
        assert!(config.long_press_repeat);
        assert_eq!(config.repeat_timings(), RepeatTimings::new(300, 100));
        assert!(config.close_keyboard_on_step);
        assert!(config.close_keyboard_on_new_value);
    }

    #[test]
    fn attributes_build_a_range_setup() {
        let attrs = RangeAttributes {
            min: AnyNumber::Integer(5),
            max: AnyNumber::Integer(50),
            step: AnyNumber::Integer(5),
            step_secondary: Some(AnyNumber::Integer(10)),
            value: Some(AnyNumber::Integer(15)),
            prefix: "#".into(),
            ..RangeAttributes::integer()
        };
        let (setup, value) = attrs.build::<i32>(PresentationMode::TextEntry).unwrap();
        assert_eq!(value, 15);
        assert_eq!(setup.default_value(), 5, "zero is out of range, so min");
        assert_eq!(setup.format(15), "#15");
        assert!(setup.supports_secondary_step());
    }

    #[test]
    fn rejected_initial_value_falls_back_to_the_default() {
        let attrs = RangeAttributes {
            value: Some(AnyNumber::Float(2.5)),
            ..RangeAttributes::float()
        };
        let (_, text_value) = attrs.build::<f64>(PresentationMode::TextEntry).unwrap();
        assert_eq!(text_value, 2.5);
        let (_, wheel_value) = attrs.build::<f64>(PresentationMode::ScrollWheel).unwrap();
        assert_eq!(wheel_value, 0.0, "2.5 is not a wheel value with step 1");
    }

    #[test]
    fn kinds_must_match() {
        assert_eq!(
            RangeAttributes::float()
                .build::<i32>(PresentationMode::TextEntry)
                .unwrap_err(),
            SetupError::KindMismatch {
                expected: NumericKind::Integer,
                found: NumericKind::Float,
            }
        );
        let attrs = RangeAttributes {
            value: Some(AnyNumber::Integer(3)),
            ..RangeAttributes::float()
        };
        assert!(attrs.build::<f32>(PresentationMode::TextEntry).is_err());
    }
}
