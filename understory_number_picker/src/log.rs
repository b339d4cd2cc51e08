// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Injectable diagnostics.
//!
//! Pickers report what they do (rejected values, stale callbacks, scroll intent
//! transitions) to a [`LogSink`] passed at construction. The default
//! [`NoopLog`] drops everything, and since [`Record::args`] is a lazily formatted
//! [`fmt::Arguments`], an unobserved picker never formats a message.
//!
//! [`TracingLog`] forwards records to [`tracing`].

use core::fmt;

/// Severity of a [`Record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Step-by-step diagnostics.
    Debug,
    /// Notable state changes.
    Info,
    /// Recoverable misuse.
    Warn,
    /// Failures.
    Error,
}

/// A single diagnostic message.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// Severity.
    pub level: Level,
    /// Component that produced the record, for example `"Scroller"`.
    pub tag: &'static str,
    /// The message, formatted on demand.
    pub args: fmt::Arguments<'a>,
}

/// Receiver for picker diagnostics.
pub trait LogSink {
    /// Handles one record.
    fn log(&self, record: &Record<'_>);
}

impl<F: Fn(&Record<'_>)> LogSink for F {
    fn log(&self, record: &Record<'_>) {
        self(record);
    }
}

/// Sink that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLog;

impl LogSink for NoopLog {
    fn log(&self, _record: &Record<'_>) {}
}

/// Sink that emits records as `tracing` events, with the tag as a field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn log(&self, record: &Record<'_>) {
        let tag = record.tag;
        match record.level {
            Level::Debug => tracing::debug!(tag, "{}", record.args),
            Level::Info => tracing::info!(tag, "{}", record.args),
            Level::Warn => tracing::warn!(tag, "{}", record.args),
            Level::Error => tracing::error!(tag, "{}", record.args),
        }
    }
}

macro_rules! log_record {
    ($sink:expr, $level:ident, $tag:literal, $($arg:tt)+) => {
        $crate::log::LogSink::log(
            $sink,
            &$crate::log::Record {
                level: $crate::log::Level::$level,
                tag: $tag,
                args: format_args!($($arg)+),
            },
        )
    };
}

pub(crate) use log_record;
