// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: event state managers for UI interactions.
//!
//! This crate provides small, focused state machines for UI interactions that
//! require stateful tracking across multiple events:
//!
//! - [`repeat`]: press-and-hold repetition for stepping buttons, with tap and
//!   drag discrimination.
//!
//! ## Design Philosophy
//!
//! Each state manager is designed to be:
//!
//! - **Minimal and focused**: Each handles one specific interaction pattern
//! - **Stateful but simple**: Track just enough state to compute transitions
//! - **Clock-agnostic**: Timestamps are passed in by the caller, no timers are owned
//! - **Generic**: Accept application-specific node/widget ID types
//!
//! The crate does not assume any particular UI framework or event loop. The host
//! forwards pointer events and timer wakeups, and the managers report what the
//! application should do next.
//!
//! ## Usage Patterns
//!
//! ### Press-and-hold repetition
//!
//! Use [`repeat::RepeatPress`] to turn a held button into a stream of steps:
//!
//! ```rust
//! use kurbo::Point;
//! use understory_event_state::repeat::{ReleaseOutcome, RepeatPress, RepeatTimings};
//!
//! let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
//!
//! // Press down on button 7 at t = 1000ms.
//! press.on_down(7_u32, Point::new(4.0, 4.0), 1000);
//! assert_eq!(press.next_deadline(), Some(1300));
//!
//! // The host timer wakes up at t = 1500ms: the first step plus two repeats are due.
//! let mut steps = 0;
//! while let Some(button) = press.poll(1500) {
//!     assert_eq!(button, 7);
//!     steps += 1;
//!     press.complete(true);
//! }
//! assert_eq!(steps, 3);
//!
//! // Releasing after a repeat was delivered is not a tap.
//! assert_eq!(press.on_up(), ReleaseOutcome::Released(Some(7)));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod repeat;
