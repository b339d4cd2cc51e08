// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_number_picker --heading-base-level=0

//! Understory Number Picker: a headless number picker core.
//!
//! A number picker lets a user pick one value from a numeric domain, either by
//! typing into a text field flanked by stepping buttons, or by flicking a
//! snapping scroll wheel. This crate owns the value and every decision about it;
//! the host framework owns the widgets and forwards events.
//!
//! The core concepts are:
//!
//! - [`PickerSetup`]: the policy describing the domain, its formatting and
//!   parsing, stepping and validation. [`RangeSetup`] covers `min..=max` ranges
//!   with a primary and an optional secondary step; [`ListSetup`] covers an
//!   explicit sorted list of values.
//! - [`NumberPicker`]: the value state machine. It validates every change against
//!   the setup, keeps the presentation in sync and reports each change exactly
//!   once, with a flag telling user input from programmatic updates.
//! - [`TextSurface`] and [`ScrollSurface`]: what the host implements for the two
//!   presentations, selected with [`Surface`].
//! - [`WheelEngine`] and [`SlotStrip`]: scroll-to-centre, snapping and settle
//!   detection for the wheel, including the padding slots that let the first and
//!   last values reach the centre.
//! - Press-and-hold repetition of the stepping buttons, built on
//!   [`understory_event_state::repeat`].
//!
//! Values are generic over [`Numeric`], implemented for `i32`, `i64`, `f32` and
//! `f64`.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_number_picker::{
//!     NumberPicker, PickerConfig, RangeSetup, StepButton, Surface, TextSurface,
//! };
//!
//! #[derive(Default)]
//! struct Field {
//!     text: String,
//! }
//!
//! impl TextSurface for Field {
//!     fn set_text(&mut self, text: &str) {
//!         self.text = text.to_owned();
//!     }
//!     fn set_hint(&mut self, _hint: &str) {}
//!     fn clear_focus(&mut self) {}
//!     fn hide_keyboard(&mut self) {}
//! }
//!
//! // 0 to 100 in steps of 5, with large steps of 25.
//! let setup = RangeSetup::builder(0, 100, 5)
//!     .secondary_step(25)
//!     .affix(understory_number_picker::Affix::new().with_suffix(" %"))
//!     .build()
//!     .unwrap();
//! let surface = Surface::text(Field::default());
//! let mut picker = NumberPicker::new(setup, 50, surface, PickerConfig::default());
//!
//! picker.on_value_changed(|value, from_user| {
//!     assert_eq!((value, from_user), (75, true));
//! });
//! assert!(picker.step(StepButton::UP_LARGE));
//! assert_eq!(picker.value(), 75);
//!
//! // Values outside the domain are refused.
//! assert!(!picker.set_value(101));
//! ```
//!
//! ## Host events
//!
//! The picker owns no timers and no widgets. Hosts forward pointer events on the
//! stepping buttons together with a millisecond clock, call
//! [`NumberPicker::tick`] at [`NumberPicker::next_repeat_deadline`], report text
//! focus and edits, and deliver the one-shot callbacks the wheel arms on its
//! [`ScrollSurface`] through [`NumberPicker::resume`].
//!
//! Diagnostics go to a [`LogSink`]; [`TracingLog`] forwards them to `tracing`.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod config;
mod error;
mod format;
mod list;
mod log;
mod numeric;
mod picker;
mod range;
mod setup;
mod slots;
mod text;
mod wheel;

#[cfg(test)]
mod testing;

pub use config::{PickerConfig, RangeAttributes};
pub use error::SetupError;
pub use format::{Affix, Format};
pub use list::ListSetup;
pub use log::{Level, LogSink, NoopLog, Record, TracingLog};
pub use numeric::{AnyNumber, Numeric, NumericKind};
pub use picker::{InvalidValue, NumberPicker, SavedState, Surface};
pub use range::{RangeSetup, RangeSetupBuilder};
pub use setup::{PickerSetup, PresentationMode, StepButton, StepDirection, StepSize};
pub use slots::SlotStrip;
pub use text::{Commit, EditState, EditorAction, TextInput, TextSurface};
pub use wheel::{CallbackId, SNAP_TOLERANCE, ScrollIntent, ScrollSurface, WheelEngine};

pub use understory_event_state::repeat::RepeatTimings;
