// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A setup over `min..=max` in fixed steps.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::setup::{domain_index, longest_label};
use crate::{
    Affix, Format, Numeric, PickerSetup, PresentationMode, SetupError, StepDirection, StepSize,
};

/// Values between a minimum and a maximum, reachable in primary and secondary steps.
///
/// The domain holds every value `min + i·step + j·secondary_step` (for
/// non-negative `i` and `j`) up to `max`, plus `max` itself. With `min = 0`,
/// `max = 10`, `step = 3` and `secondary_step = 5` that is
/// `[0, 3, 5, 6, 8, 9, 10]`.
///
/// While typing, any value in `[min, max]` is allowed; the scroll wheel only
/// accepts domain values.
///
/// Float values are rounded to the finest precision among `min`, `max` and the
/// steps, then passed through the formatter and parser, so `0.1` steps give
/// `0.3` rather than `0.30000000000000004` and every domain value parses back
/// to itself.
///
/// ```
/// use understory_number_picker::{PickerSetup, RangeSetup};
///
/// let setup = RangeSetup::builder(0, 10, 3).secondary_step(5).build().unwrap();
/// assert_eq!(setup.values(), &[0, 3, 5, 6, 8, 9, 10]);
/// assert!(setup.supports_secondary_step());
/// ```
#[derive(Debug)]
pub struct RangeSetup<T> {
    min: T,
    max: T,
    step: T,
    secondary_step: T,
    default_value: T,
    format: Format<T>,
    visible_offset_items: usize,
    values: Vec<T>,
    longest: T,
    /// Fractional digits generated values are rounded to.
    precision: usize,
}

/// Builder for [`RangeSetup`].
#[derive(Debug)]
pub struct RangeSetupBuilder<T> {
    min: T,
    max: T,
    step: T,
    secondary_step: Option<T>,
    default_value: Option<T>,
    format: Format<T>,
    visible_offset_items: usize,
}

impl<T: Numeric> RangeSetup<T> {
    /// Starts a setup over `min..=max` with the given primary step.
    #[must_use]
    pub fn builder(min: T, max: T, step: T) -> RangeSetupBuilder<T> {
        RangeSetupBuilder {
            min,
            max,
            step,
            secondary_step: None,
            default_value: None,
            format: Format::default(),
            visible_offset_items: 2,
        }
    }

    /// Smallest allowed value.
    #[must_use]
    pub fn min(&self) -> T {
        self.min
    }

    /// Largest allowed value.
    #[must_use]
    pub fn max(&self) -> T {
        self.max
    }

    /// Primary step.
    #[must_use]
    pub fn step(&self) -> T {
        self.step
    }

    /// Secondary step; equal to the primary step when none was configured.
    #[must_use]
    pub fn secondary_step(&self) -> T {
        self.secondary_step
    }

    fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

impl<T: Numeric> RangeSetupBuilder<T> {
    /// Sets the large step used by the secondary buttons.
    #[must_use]
    pub fn secondary_step(mut self, step: T) -> Self {
        self.secondary_step = Some(step);
        self
    }

    /// Sets the default value. Without one, the default is zero when it lies in
    /// `[min, max]` and `min` otherwise.
    #[must_use]
    pub fn default_value(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the formatter and parser.
    #[must_use]
    pub fn format(mut self, format: impl Into<Format<T>>) -> Self {
        self.format = format.into();
        self
    }

    /// Shorthand for [`format`](Self::format) with an [`Affix`].
    #[must_use]
    pub fn affix(self, affix: Affix) -> Self {
        self.format(affix)
    }

    /// Sets how many neighbours the wheel shows on each side of the selection.
    #[must_use]
    pub fn visible_offset_items(mut self, count: usize) -> Self {
        self.visible_offset_items = count;
        self
    }

    /// Validates the configuration and enumerates the domain.
    pub fn build(self) -> Result<RangeSetup<T>, SetupError> {
        let Self {
            min,
            max,
            step,
            secondary_step,
            default_value,
            format,
            visible_offset_items,
        } = self;
        if !matches!(
            min.partial_cmp(&max),
            Some(Ordering::Less | Ordering::Equal)
        ) {
            return Err(SetupError::InvalidRange);
        }
        let secondary_step = secondary_step.unwrap_or(step);
        if !step.is_positive() || !secondary_step.is_positive() {
            return Err(SetupError::NonPositiveStep);
        }
        let in_range = |v: T| min <= v && v <= max;
        let default_value = match default_value {
            Some(v) if in_range(v) => v,
            Some(_) => return Err(SetupError::DefaultOutOfRange),
            None if in_range(T::zero()) => T::zero(),
            None => min,
        };
        let precision = [min, max, step, secondary_step]
            .into_iter()
            .map(T::decimals)
            .max()
            .unwrap_or(0);
        let values = range_domain(min, max, step, secondary_step, |v| {
            normalized(&format, precision, v)
        });
        let longest = longest_label(&values, |v| format.format(v)).unwrap_or(default_value);
        Ok(RangeSetup {
            min,
            max,
            step,
            secondary_step,
            default_value,
            format,
            visible_offset_items,
            values,
            longest,
            precision,
        })
    }
}

struct Ordered<T>(T);

impl<T: Numeric> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Numeric> Eq for Ordered<T> {}

impl<T: Numeric> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Numeric> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Rounds `value` to `precision` digits and then to what the format displays.
fn normalized<T: Numeric>(format: &Format<T>, precision: usize, value: T) -> T {
    let value = value.quantize(precision);
    format.parse(&format.format(value)).unwrap_or(value)
}

/// Every `min + i·step + j·secondary` up to `max`, plus `max`, ascending.
///
/// Each secondary offset starts a chain of primary steps. A chain whose start
/// was already produced by an earlier chain contributes nothing new and is
/// skipped. Bounds are checked on the raw values; `normalize` only decides what
/// is stored.
fn range_domain<T: Numeric>(
    min: T,
    max: T,
    step: T,
    secondary: T,
    normalize: impl Fn(T) -> T,
) -> Vec<T> {
    let mut domain = BTreeSet::new();
    let mut insert = |value: T| {
        let value = normalize(value);
        min <= value && value <= max && domain.insert(Ordered(value))
    };
    let mut previous_base: Option<T> = None;
    for j in 0.. {
        let Some(base) = min.offset_by(secondary, j) else {
            break;
        };
        // Stop on overflow past `max`, or when the step vanishes in float precision.
        if base > max || previous_base.is_some_and(|p| base <= p) {
            break;
        }
        previous_base = Some(base);
        if !insert(base) {
            continue;
        }
        let mut previous = base;
        for i in 1.. {
            let Some(value) = base.offset_by(step, i) else {
                break;
            };
            if value > max || value <= previous {
                break;
            }
            insert(value);
            previous = value;
        }
    }
    insert(max);
    domain.into_iter().map(|Ordered(v)| v).collect()
}

impl<T: Numeric> PickerSetup<T> for RangeSetup<T> {
    fn default_value(&self) -> T {
        self.default_value
    }

    fn format(&self, value: T) -> String {
        self.format.format(value)
    }

    fn parse(&self, text: &str) -> Option<T> {
        self.format.parse(text)
    }

    fn is_value_allowed(&self, mode: PresentationMode, value: T) -> bool {
        match mode {
            PresentationMode::TextEntry => self.contains(value),
            PresentationMode::ScrollWheel => domain_index(&self.values, value).is_some(),
        }
    }

    fn visible_offset_items(&self) -> usize {
        self.visible_offset_items
    }

    fn values(&self) -> &[T] {
        &self.values
    }

    fn longest_value(&self) -> T {
        self.longest
    }

    fn step_value(&self, value: T, direction: StepDirection, size: StepSize) -> Option<T> {
        let step = match size {
            StepSize::Primary => self.step,
            StepSize::Secondary => self.secondary_step,
        };
        let next = match direction {
            StepDirection::Up => value.checked_add_step(step),
            StepDirection::Down => value.checked_sub_step(step),
        }?;
        // Typed values may carry more digits than the domain.
        let precision = self.precision.max(value.decimals());
        Some(normalized(&self.format, precision, next))
    }

    fn supports_secondary_step(&self) -> bool {
        self.secondary_step != self.step
    }
}
