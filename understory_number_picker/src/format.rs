// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value formatting and parsing.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::Numeric;

/// Prefix/suffix decoration around a plain number.
///
/// Formatting produces `prefix + number + suffix`. Parsing accepts the decorated
/// form as well as the bare number, so users do not have to type the affixes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affix {
    /// Text placed before the number.
    pub prefix: String,
    /// Text placed after the number.
    pub suffix: String,
    /// Fixed number of decimals for float kinds; ignored for integers.
    ///
    /// Leave this unset when every domain value must parse back to itself
    /// exactly; a fixed precision only round-trips values that need no more
    /// decimals than it shows.
    pub decimals: Option<usize>,
}

impl Affix {
    /// An affix that adds nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets a fixed number of decimals.
    #[must_use]
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Formats a value.
    #[must_use]
    pub fn format<T: Numeric>(&self, value: T) -> String {
        let number = value.format(self.decimals);
        let mut out = String::with_capacity(self.prefix.len() + number.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&number);
        out.push_str(&self.suffix);
        out
    }

    /// Parses a value, with or without the affixes.
    #[must_use]
    pub fn parse<T: Numeric>(&self, text: &str) -> Option<T> {
        let text = text.trim();
        let text = text.strip_prefix(self.prefix.as_str()).unwrap_or(text);
        let text = text.strip_suffix(self.suffix.as_str()).unwrap_or(text);
        T::parse(text.trim())
    }
}

type FormatFn<T> = Box<dyn Fn(T) -> String>;
type ParseFn<T> = Box<dyn Fn(&str) -> Option<T>>;

/// Formatter/parser pair used by the built-in setups.
pub enum Format<T> {
    /// Plain number with optional prefix, suffix and decimals.
    Affix(Affix),
    /// Caller supplied functions. They must be inverses for every domain value.
    Custom {
        /// Value to display text.
        format: FormatFn<T>,
        /// Display text to value; `None` for unparsable text.
        parse: ParseFn<T>,
    },
}

impl<T: Numeric> Format<T> {
    /// Creates a custom formatter/parser pair.
    pub fn custom(
        format: impl Fn(T) -> String + 'static,
        parse: impl Fn(&str) -> Option<T> + 'static,
    ) -> Self {
        Self::Custom {
            format: Box::new(format),
            parse: Box::new(parse),
        }
    }

    /// Formats a value.
    #[must_use]
    pub fn format(&self, value: T) -> String {
        match self {
            Self::Affix(affix) => affix.format(value),
            Self::Custom { format, .. } => format(value),
        }
    }

    /// Parses text; `None` if it is not a number.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<T> {
        match self {
            Self::Affix(affix) => affix.parse(text),
            Self::Custom { parse, .. } => parse(text),
        }
    }
}

impl<T> Default for Format<T> {
    fn default() -> Self {
        Self::Affix(Affix::default())
    }
}

impl<T> From<Affix> for Format<T> {
    fn from(affix: Affix) -> Self {
        Self::Affix(affix)
    }
}

impl<T> fmt::Debug for Format<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affix(affix) => f.debug_tuple("Affix").field(affix).finish(),
            Self::Custom { .. } => f.debug_struct("Custom").finish_non_exhaustive(),
        }
    }
}
