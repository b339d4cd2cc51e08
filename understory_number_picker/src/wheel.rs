// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-wheel selection engine.
//!
//! The engine drives a virtualized, snapping list (the [`ScrollSurface`]) so a
//! target slot ends up centred, and turns user scrolls that come to rest into
//! settled slots.
//!
//! ## Scroll intents
//!
//! Exactly one [`ScrollIntent`] is live at a time:
//!
//! - `None`: nothing programmatic is in progress.
//! - `ScrollToIndex`: a programmatic scroll towards a slot. It waits for the first
//!   layout pass if the surface has none yet, jumps the slot into view, then
//!   applies the residual snap distance (animated or instant) until it is below
//!   half a unit.
//! - `SettledFromUserGesture`: a user scroll came to rest on a new slot. The
//!   owner resolves the slot and then calls [`WheelEngine::finish_settle`].
//!
//! Every wait is a one-shot continuation armed on the surface. Starting a new
//! intent cancels the armed continuation and any animation first, so a callback
//! that fires for a superseded intent finds no matching continuation and is
//! ignored.

use crate::SlotStrip;
use crate::log::{LogSink, log_record};

/// Residual snap distances below this count as centred.
pub const SNAP_TOLERANCE: f64 = 0.5;

/// Handle of a one-shot callback armed on a [`ScrollSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub u64);

/// The virtualized scrolling list hosting the wheel.
///
/// One-shot callbacks armed with [`on_next_layout`](Self::on_next_layout) and
/// [`on_scroll_idle`](Self::on_scroll_idle) are delivered back through
/// [`NumberPicker::resume`](crate::NumberPicker::resume). Independently, every
/// time scrolling comes to rest the host calls
/// [`NumberPicker::scroll_idle`](crate::NumberPicker::scroll_idle).
pub trait ScrollSurface {
    /// Extent of a slot showing `label`, along the scroll axis.
    fn measure_label(&mut self, label: &str) -> f64;

    /// Replaces all slots. Slot labels are fetched with
    /// [`NumberPicker::wheel_label`](crate::NumberPicker::wheel_label).
    fn rebuild(&mut self, strip: &SlotStrip);

    /// Whether at least one layout pass happened since the last rebuild.
    fn is_laid_out(&self) -> bool;

    /// Arms a callback for the next layout pass.
    fn on_next_layout(&mut self) -> CallbackId;

    /// Arms a callback for the next time scrolling comes to rest.
    fn on_scroll_idle(&mut self) -> CallbackId;

    /// Disarms a callback. Unknown or already delivered ids are ignored.
    fn cancel(&mut self, id: CallbackId);

    /// Jumps so `slot` is materialized and visible, without animation.
    fn scroll_to_slot(&mut self, slot: usize);

    /// Signed distance that centres `slot`, or `None` if it is not materialized.
    fn snap_distance(&self, slot: usize) -> Option<f64>;

    /// Scrolls by `delta`, animated or instantly.
    fn scroll_by(&mut self, delta: f64, animated: bool);

    /// Stops any running scroll animation.
    fn stop_scroll(&mut self);

    /// The slot the snap logic currently considers centred.
    fn snapped_slot(&self) -> Option<usize>;
}

/// What the engine is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollIntent {
    /// Idle.
    #[default]
    None,
    /// Programmatic scroll towards `slot`.
    ScrollToIndex {
        /// Target slot.
        slot: usize,
        /// Animate the residual scroll.
        animated: bool,
    },
    /// A scroll came to rest on `slot` and awaits resolution.
    SettledFromUserGesture {
        /// The centred slot.
        slot: usize,
        /// Always `false`: programmatic scrolls never settle.
        programmatic: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    /// Waiting for the first layout pass before jumping to the target.
    Start(CallbackId),
    /// Waiting for a layout pass or the end of an animation before re-measuring.
    Check(CallbackId),
}

impl Continuation {
    const fn id(self) -> CallbackId {
        match self {
            Self::Start(id) | Self::Check(id) => id,
        }
    }
}

/// Snap-and-settle state machine of the scroll wheel.
#[derive(Clone, Debug)]
pub struct WheelEngine {
    strip: SlotStrip,
    intent: ScrollIntent,
    pending: Option<Continuation>,
    animating: bool,
    /// Slot currently shown or targeted, used to skip redundant settles and scrolls.
    displayed: Option<usize>,
}

impl Default for WheelEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_snapped(distance: f64) -> bool {
    -SNAP_TOLERANCE < distance && distance < SNAP_TOLERANCE
}

impl WheelEngine {
    /// Creates an engine with an empty strip.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip: SlotStrip::new(0, 0, 0.0),
            intent: ScrollIntent::None,
            pending: None,
            animating: false,
            displayed: None,
        }
    }

    /// The current slot layout.
    #[must_use]
    pub const fn strip(&self) -> &SlotStrip {
        &self.strip
    }

    /// The live intent.
    #[must_use]
    pub const fn intent(&self) -> ScrollIntent {
        self.intent
    }

    /// Whether a continuation is armed on the surface.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the wheel needs a scroll to show `slot`.
    #[must_use]
    pub fn needs_resync(&self, slot: usize) -> bool {
        self.displayed != Some(slot)
    }

    /// Cancels all work and replaces the slots.
    ///
    /// All slots share the extent of `longest_label`, so the snap midpoint does
    /// not move while scrolling.
    pub fn rebuild(
        &mut self,
        surface: &mut dyn ScrollSurface,
        longest_label: &str,
        domain_len: usize,
        offset_items: usize,
        log: &dyn LogSink,
    ) {
        self.cancel(surface);
        self.intent = ScrollIntent::None;
        self.displayed = None;
        let extent = surface.measure_label(longest_label);
        self.strip = SlotStrip::new(domain_len, offset_items, extent);
        surface.rebuild(&self.strip);
        log_record!(
            log,
            Debug,
            "Scroller",
            "rebuilt {} slots ({} values, {} padding per side, extent {})",
            self.strip.len(),
            domain_len,
            offset_items,
            self.strip.item_extent()
        );
    }

    /// Starts a programmatic scroll to `slot`, superseding any previous intent.
    pub fn scroll_to_slot(
        &mut self,
        surface: &mut dyn ScrollSurface,
        slot: usize,
        animated: bool,
        log: &dyn LogSink,
    ) {
        self.cancel(surface);
        log_record!(
            log,
            Debug,
            "Scroller",
            "scroll to slot {slot} (animated = {animated}, replaces {:?})",
            self.intent
        );
        self.intent = ScrollIntent::ScrollToIndex { slot, animated };
        self.displayed = Some(slot);
        if surface.is_laid_out() {
            self.start(surface, log);
        } else {
            self.pending = Some(Continuation::Start(surface.on_next_layout()));
        }
    }

    /// Delivers an armed callback. Returns `false` for stale or unknown ids.
    pub fn resume(
        &mut self,
        surface: &mut dyn ScrollSurface,
        id: CallbackId,
        log: &dyn LogSink,
    ) -> bool {
        match self.pending {
            Some(continuation) if continuation.id() == id => {
                self.pending = None;
                match continuation {
                    Continuation::Start(_) => self.start(surface, log),
                    Continuation::Check(_) => {
                        self.animating = false;
                        self.check(surface, log);
                    }
                }
                true
            }
            _ => {
                log_record!(log, Debug, "Scroller", "ignoring stale callback {}", id.0);
                false
            }
        }
    }

    /// Handles scrolling coming to rest.
    ///
    /// Returns the newly centred slot when a user scroll settled on a slot other
    /// than the displayed one; the intent is then `SettledFromUserGesture` until
    /// [`finish_settle`](Self::finish_settle). Returns `None` while a programmatic
    /// scroll is in progress.
    pub fn scroll_idle(
        &mut self,
        surface: &mut dyn ScrollSurface,
        log: &dyn LogSink,
    ) -> Option<usize> {
        if self.intent != ScrollIntent::None {
            return None;
        }
        // Any click animation has come to rest.
        self.animating = false;
        let slot = surface.snapped_slot()?;
        if self.displayed == Some(slot) {
            return None;
        }
        log_record!(
            log,
            Debug,
            "Scroller",
            "settled on slot {slot} (previous {:?})",
            self.displayed
        );
        self.displayed = Some(slot);
        self.intent = ScrollIntent::SettledFromUserGesture {
            slot,
            programmatic: false,
        };
        Some(slot)
    }

    /// Ends a settle started by [`scroll_idle`](Self::scroll_idle). An intent
    /// issued while resolving the settle is kept.
    pub fn finish_settle(&mut self) {
        if matches!(self.intent, ScrollIntent::SettledFromUserGesture { .. }) {
            self.intent = ScrollIntent::None;
        }
    }

    /// Smoothly centres a clicked value slot. The scroll then settles like any
    /// user scroll. Returns `false` for padding slots and slots already centred.
    pub fn item_clicked(&mut self, surface: &mut dyn ScrollSurface, slot: usize) -> bool {
        if self.strip.index_at(slot).is_none() {
            return false;
        }
        self.cancel(surface);
        self.intent = ScrollIntent::None;
        match surface.snap_distance(slot) {
            Some(distance) if !is_snapped(distance) => {
                surface.scroll_by(distance, true);
                self.animating = true;
                true
            }
            _ => false,
        }
    }

    /// Cancels the armed continuation and any animation of the current intent.
    pub fn cancel(&mut self, surface: &mut dyn ScrollSurface) {
        if let Some(continuation) = self.pending.take() {
            surface.cancel(continuation.id());
        }
        if self.animating {
            surface.stop_scroll();
            self.animating = false;
        }
    }

    fn start(&mut self, surface: &mut dyn ScrollSurface, log: &dyn LogSink) {
        let ScrollIntent::ScrollToIndex { slot, .. } = self.intent else {
            return;
        };
        surface.scroll_to_slot(slot);
        self.check(surface, log);
    }

    fn check(&mut self, surface: &mut dyn ScrollSurface, log: &dyn LogSink) {
        let ScrollIntent::ScrollToIndex { slot, animated } = self.intent else {
            return;
        };
        let Some(distance) = surface.snap_distance(slot) else {
            self.pending = Some(Continuation::Check(surface.on_next_layout()));
            return;
        };
        if is_snapped(distance) {
            self.finish(slot, log);
            return;
        }
        surface.scroll_by(distance, animated);
        if animated {
            self.animating = true;
            self.pending = Some(Continuation::Check(surface.on_scroll_idle()));
            return;
        }
        // Instant scrolls usually land right away; otherwise wait for the layout.
        match surface.snap_distance(slot) {
            Some(residual) if is_snapped(residual) => self.finish(slot, log),
            _ => self.pending = Some(Continuation::Check(surface.on_next_layout())),
        }
    }

    fn finish(&mut self, slot: usize, log: &dyn LogSink) {
        self.intent = ScrollIntent::None;
        self.animating = false;
        log_record!(log, Debug, "Scroller", "slot {slot} centred");
    }
}

#[cfg(test)]
mod tests {
    use super::{CallbackId, ScrollIntent, WheelEngine};
    use crate::log::NoopLog;
    use crate::testing::MockScroll;

    fn engine_with(surface: &mut MockScroll) -> WheelEngine {
        let mut engine = WheelEngine::new();
        // 7 values, 2 padding slots per side.
        engine.rebuild(surface, "10", 7, 2, &NoopLog);
        engine
    }

    #[test]
    fn waits_for_layout_before_scrolling() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        assert_eq!(surface.state().rebuilds, 1);
        assert_eq!(engine.strip().len(), 11);

        engine.scroll_to_slot(&mut surface, 5, false, &NoopLog);
        assert!(engine.has_pending());
        assert!(surface.state().scrolls.is_empty(), "nothing scrolls before layout");

        for id in surface.layout() {
            assert!(engine.resume(&mut surface, id, &NoopLog));
        }
        assert_eq!(engine.intent(), ScrollIntent::None);
        assert!(!engine.has_pending());
        assert_eq!(surface.centered_slot(), Some(5));
    }

    #[test]
    fn instant_scroll_completes_synchronously_when_laid_out() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 8, false, &NoopLog);
        assert_eq!(engine.intent(), ScrollIntent::None);
        assert_eq!(surface.centered_slot(), Some(8));
        assert!(!engine.needs_resync(8));
        assert!(engine.needs_resync(7));
    }

    #[test]
    fn animated_scroll_finishes_on_idle() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 6, true, &NoopLog);
        assert_eq!(
            engine.intent(),
            ScrollIntent::ScrollToIndex {
                slot: 6,
                animated: true
            }
        );
        assert_eq!(surface.state().scrolls.last().map(|s| s.1), Some(true));

        // The persistent idle signal is ignored while the intent is live.
        for id in surface.finish_animation() {
            assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), None);
            assert!(engine.resume(&mut surface, id, &NoopLog));
        }
        assert_eq!(engine.intent(), ScrollIntent::None);
        assert_eq!(surface.centered_slot(), Some(6));
        assert_eq!(
            engine.scroll_idle(&mut surface, &NoopLog),
            None,
            "arriving at the target is not a user settle"
        );
    }

    #[test]
    fn new_intent_supersedes_pending_one() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);

        engine.scroll_to_slot(&mut surface, 5, true, &NoopLog);
        let first = surface.state().layout_waiters.clone();
        engine.scroll_to_slot(&mut surface, 8, true, &NoopLog);
        assert_eq!(surface.state().cancelled, first, "the first continuation is cancelled");

        // A stale delivery of the first continuation does nothing.
        for &id in &first {
            assert!(!engine.resume(&mut surface, id, &NoopLog));
        }
        for id in surface.layout() {
            assert!(engine.resume(&mut surface, id, &NoopLog));
        }
        for id in surface.finish_animation() {
            assert!(engine.resume(&mut surface, id, &NoopLog));
        }
        assert_eq!(surface.centered_slot(), Some(8));
        assert_eq!(engine.intent(), ScrollIntent::None);
    }

    #[test]
    fn new_intent_stops_a_running_animation() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 3, true, &NoopLog);
        let idle_waiters = surface.state().idle_waiters.clone();
        engine.scroll_to_slot(&mut surface, 7, false, &NoopLog);
        assert_eq!(surface.state().stops, 1);
        assert_eq!(surface.state().cancelled, idle_waiters);
        assert_eq!(surface.centered_slot(), Some(7));
        for id in idle_waiters {
            assert!(!engine.resume(&mut surface, id, &NoopLog));
        }
        assert_eq!(surface.centered_slot(), Some(7));
    }

    #[test]
    fn user_scroll_settles_once_per_slot() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 2, false, &NoopLog);

        surface.drag_to_slot(4);
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), Some(4));
        assert_eq!(
            engine.intent(),
            ScrollIntent::SettledFromUserGesture {
                slot: 4,
                programmatic: false
            }
        );
        engine.finish_settle();
        assert_eq!(engine.intent(), ScrollIntent::None);
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), None, "same slot again");
    }

    #[test]
    fn settling_back_on_a_programmatic_target_is_not_deduplicated_away() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        surface.drag_to_slot(6);
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), Some(6));
        engine.finish_settle();

        engine.scroll_to_slot(&mut surface, 3, false, &NoopLog);
        surface.drag_to_slot(6);
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), Some(6));
    }

    #[test]
    fn clicking_an_item_scrolls_it_to_the_centre() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 4, false, &NoopLog);

        assert!(!engine.item_clicked(&mut surface, 0), "padding is inert");
        assert!(!engine.item_clicked(&mut surface, 4), "already centred");
        assert!(engine.item_clicked(&mut surface, 5));
        surface.finish_animation();
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), Some(5));
    }

    #[test]
    fn new_intent_stops_a_click_animation() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        surface.layout();
        engine.scroll_to_slot(&mut surface, 4, false, &NoopLog);

        assert!(engine.item_clicked(&mut surface, 6));
        engine.scroll_to_slot(&mut surface, 3, false, &NoopLog);
        assert_eq!(surface.state().stops, 1, "the click scroll is stopped");
        surface.finish_animation();
        assert_eq!(surface.centered_slot(), Some(3));
        assert_eq!(engine.scroll_idle(&mut surface, &NoopLog), None);
    }

    #[test]
    fn rebuild_cancels_everything() {
        let mut surface = MockScroll::new();
        let mut engine = engine_with(&mut surface);
        engine.scroll_to_slot(&mut surface, 5, false, &NoopLog);
        let waiters = surface.state().layout_waiters.clone();
        engine.rebuild(&mut surface, "1000", 3, 1, &NoopLog);
        assert_eq!(surface.state().cancelled, waiters);
        assert_eq!(engine.intent(), ScrollIntent::None);
        assert_eq!(engine.strip().len(), 5);
        assert!(!engine.resume(&mut surface, CallbackId(999), &NoopLog));
    }
}
