// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A setup over an explicit list of values.

use alloc::string::String;
use alloc::vec::Vec;

use crate::setup::{domain_index, is_strictly_ascending, longest_label};
use crate::{Format, Numeric, PickerSetup, PresentationMode, SetupError};

/// An explicit, strictly ascending value domain.
///
/// Only listed values are allowed, in every presentation mode. Buttons move to
/// the neighbouring value and stop at both ends.
#[derive(Debug)]
pub struct ListSetup<T> {
    values: Vec<T>,
    default_value: T,
    format: Format<T>,
    visible_offset_items: usize,
    longest: T,
}

impl<T: Numeric> ListSetup<T> {
    /// Creates a setup over `values`, which must be non-empty, strictly ascending
    /// and contain `default_value`.
    pub fn new(values: impl Into<Vec<T>>, default_value: T) -> Result<Self, SetupError> {
        let values = values.into();
        if values.is_empty() {
            return Err(SetupError::EmptyDomain);
        }
        if !is_strictly_ascending(&values) {
            return Err(SetupError::UnsortedDomain);
        }
        if domain_index(&values, default_value).is_none() {
            return Err(SetupError::DefaultNotInDomain);
        }
        let format = Format::default();
        let longest = longest_label(&values, |v| format.format(v)).unwrap_or(default_value);
        Ok(Self {
            values,
            default_value,
            format,
            visible_offset_items: 2,
            longest,
        })
    }

    /// Replaces the formatter and parser.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<Format<T>>) -> Self {
        self.format = format.into();
        self.longest =
            longest_label(&self.values, |v| self.format.format(v)).unwrap_or(self.default_value);
        self
    }

    /// Sets how many neighbours the wheel shows on each side of the selection.
    #[must_use]
    pub fn with_visible_offset_items(mut self, count: usize) -> Self {
        self.visible_offset_items = count;
        self
    }
}

impl<T: Numeric> PickerSetup<T> for ListSetup<T> {
    fn default_value(&self) -> T {
        self.default_value
    }

    fn format(&self, value: T) -> String {
        self.format.format(value)
    }

    fn parse(&self, text: &str) -> Option<T> {
        self.format.parse(text)
    }

    fn is_value_allowed(&self, _mode: PresentationMode, value: T) -> bool {
        domain_index(&self.values, value).is_some()
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
}
