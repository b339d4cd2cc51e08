// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press-and-hold repetition for stepping buttons.
//!
//! A held button (for example the `+`/`-` buttons of a spin box or number picker)
//! should keep stepping while it is held, but a quick tap must still step exactly
//! once, and a press that turns into a drag of a surrounding scroll container must
//! not step at all.
//!
//! [`RepeatPress`] tracks a single active press and decides when a step is due.
//! It owns no timers: the host passes timestamps in and asks for the next deadline
//! so it can schedule a wakeup.
//!
//! ## Usage
//!
//! The step action stays with the host. [`RepeatPress::poll`] reports that a step
//! is due, the host performs it, and [`RepeatPress::complete`] tells the state
//! machine whether the step succeeded. A failed step ends the repeat chain.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::repeat::{ReleaseOutcome, RepeatPress, RepeatTimings};
//!
//! let mut press: RepeatPress<u32> = RepeatPress::new(RepeatTimings::new(300, 100));
//!
//! // A quick tap: released before the initial delay elapsed.
//! press.on_down(1, Point::new(0.0, 0.0), 0);
//! assert_eq!(press.poll(120), None);
//! assert_eq!(press.on_up(), ReleaseOutcome::Tap(1));
//! ```
//!
//! ## Step Generation Rules
//!
//! 1. **Hold**: The first step is due `initial_delay` after the press, then every
//!    `consecutive_delay` after the previous *scheduled* step, so a late wakeup
//!    catches up instead of drifting.
//! 2. **Failure**: A step completed with `false` stops the repeat chain.
//! 3. **Tap**: A release with no step delivered and no drag yields [`ReleaseOutcome::Tap`].
//! 4. **Drag**: Moving beyond the drag threshold stops the repeat chain and suppresses the tap.
//! 5. **Cancel/Disable**: [`RepeatPress::cancel`] and disabling drop the press without a tap.
//!
//! With repetition turned off ([`RepeatPress::set_repeat`]), only taps are reported.

use kurbo::Point;

/// Delays driving press-and-hold repetition, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatTimings {
    /// Delay between the press and the first repeated step.
    pub initial_delay: u64,
    /// Delay between consecutive repeated steps.
    pub consecutive_delay: u64,
}

impl RepeatTimings {
    /// Creates timings from an initial and a consecutive delay in milliseconds.
    #[must_use]
    pub const fn new(initial_delay: u64, consecutive_delay: u64) -> Self {
        Self {
            initial_delay,
            consecutive_delay,
        }
    }
}

impl Default for RepeatTimings {
    fn default() -> Self {
        Self::new(300, 100)
    }
}

/// State for the active press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Target element where press occurred
    pub target: K,
    /// Pointer position at press time
    pub down_position: Point,
    /// Timestamp when press occurred
    pub down_time: u64,
    /// Scheduled time of the next step, `None` once the chain stopped
    pub next_step: Option<u64>,
    /// A step was reported by `poll` and awaits `complete`
    pub in_flight: bool,
    /// Number of completed steps
    pub steps: u32,
    /// True if the drag threshold was exceeded
    pub dragged: bool,
}

/// Result of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome<K> {
    /// The press was a tap and should step once on the target.
    Tap(K),
    /// No step should be generated; contains the pressed target if there was one.
    Released(Option<K>),
}

/// Press-and-hold repetition state machine.
///
/// Tracks at most one press at a time; a new press replaces the previous one,
/// which also drops any pending step of the old press.
#[derive(Clone, Debug)]
pub struct RepeatPress<K> {
    timings: RepeatTimings,
    /// Pointer travel before a press is treated as a drag, or `None` to never detect drags
    pub drag_threshold: Option<f64>,
    repeat: bool,
    enabled: bool,
    press: Option<Press<K>>,
}

impl<K: Copy + PartialEq> RepeatPress<K> {
    /// Creates a press tracker with the given timings and an 8 pixel drag threshold.
    #[must_use]
    pub fn new(timings: RepeatTimings) -> Self {
        Self {
            timings,
            drag_threshold: Some(8.0),
            repeat: true,
            enabled: true,
            press: None,
        }
    }

    /// Sets the drag threshold, builder style.
    #[must_use]
    pub fn with_drag_threshold(mut self, drag_threshold: Option<f64>) -> Self {
        self.drag_threshold = drag_threshold;
        self
    }

    /// Returns the repetition timings.
    #[must_use]
    pub const fn timings(&self) -> RepeatTimings {
        self.timings
    }

    /// Replaces the repetition timings. Affects the next scheduled step.
    pub fn set_timings(&mut self, timings: RepeatTimings) {
        self.timings = timings;
    }

    /// Turns press-and-hold repetition on or off. Taps are reported either way.
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
        if let Some(press) = self.press.as_mut().filter(|_| !repeat) {
            press.next_step = None;
        }
    }

    /// Enables or disables the tracker. Disabling drops the active press.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.press = None;
        }
    }

    /// Returns `true` if the tracker accepts presses.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a pointer down event at `now` (milliseconds).
    pub fn on_down(&mut self, target: K, position: Point, now: u64) {
        if !self.enabled {
            return;
        }
        let next_step = self
            .repeat
            .then(|| now.saturating_add(self.timings.initial_delay));
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: now,
            next_step,
            in_flight: false,
            steps: 0,
            dragged: false,
        });
    }

    /// Process a pointer move event.
    ///
    /// Returns `Some(target)` when the press newly turned into a drag. From then on no
    /// further steps are generated and the release is not a tap.
    pub fn on_move(&mut self, position: Point) -> Option<K> {
        let threshold = self.drag_threshold?;
        let press = self.press.as_mut()?;
        if press.dragged || press.down_position.distance(position) <= threshold {
            return None;
        }
        press.dragged = true;
        press.next_step = None;
        press.in_flight = false;
        Some(press.target)
    }

    /// Returns the target if a step is due at `now`.
    ///
    /// The step stays in flight until [`RepeatPress::complete`] is called; polling
    /// again in the meantime returns `None`.
    pub fn poll(&mut self, now: u64) -> Option<K> {
        if !self.enabled {
            return None;
        }
        let press = self.press.as_mut()?;
        if press.in_flight {
            return None;
        }
        let due = press.next_step?;
        if due > now {
            return None;
        }
        press.in_flight = true;
        Some(press.target)
    }

    /// Report the result of the step returned by the last [`RepeatPress::poll`].
    ///
    /// On success the next step is scheduled `consecutive_delay` after the one just
    /// delivered. On failure the repeat chain stops. Calls without a step in flight
    /// are ignored.
    pub fn complete(&mut self, success: bool) {
        let consecutive = self.timings.consecutive_delay;
        let repeat = self.repeat;
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.in_flight {
            return;
        }
        press.in_flight = false;
        press.steps = press.steps.saturating_add(1);
        press.next_step = match press.next_step {
            Some(scheduled) if success && repeat => Some(scheduled.saturating_add(consecutive)),
            _ => None,
        };
    }

    /// Process a pointer up event and decide whether it was a tap.
    pub fn on_up(&mut self) -> ReleaseOutcome<K> {
        let Some(press) = self.press.take() else {
            return ReleaseOutcome::Released(None);
        };
        if press.dragged || press.steps > 0 || press.in_flight {
            ReleaseOutcome::Released(Some(press.target))
        } else {
            ReleaseOutcome::Tap(press.target)
        }
    }

    /// Cancel the active press without generating a tap.
    ///
    /// Returns `true` if a press was canceled, `false` if no press was active.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Time of the next due step, for scheduling a host timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        let press = self.press.as_ref()?;
        if press.in_flight {
            None
        } else {
            press.next_step
        }
    }

    /// Check if there is an active press.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Get the active press, if any.
    #[must_use]
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }
}

impl<K: Copy + PartialEq> Default for RepeatPress<K> {
    fn default() -> Self {
        Self::new(RepeatTimings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(press: &mut RepeatPress<u32>, now: u64, mut step: impl FnMut(u32) -> bool) -> u32 {
        let mut count = 0;
        while let Some(target) = press.poll(now) {
            count += 1;
            let ok = step(target);
            press.complete(ok);
        }
        count
    }

    #[test]
    fn held_press_steps_once_then_repeats() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(1, Point::ZERO, 1000);

        // Held past initial + 3 * consecutive: first step plus three repeats.
        let count = drain(&mut press, 1000 + 300 + 3 * 100, |_| true);
        assert_eq!(count, 4, "expected first step plus three repeats");
        assert_eq!(press.next_deadline(), Some(1700));
    }

    #[test]
    fn incremental_polling_matches_batch_polling() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(1, Point::ZERO, 0);

        let mut total = 0;
        for now in (0..=600).step_by(10) {
            total += drain(&mut press, now, |_| true);
        }
        assert_eq!(total, 4, "steps at 300, 400, 500 and 600");
    }

    #[test]
    fn quick_release_is_a_tap() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(5, Point::new(10.0, 10.0), 0);
        assert_eq!(drain(&mut press, 200, |_| true), 0, "nothing due before the initial delay");
        assert_eq!(press.on_up(), ReleaseOutcome::Tap(5));
        assert!(!press.is_pressed());
    }

    #[test]
    fn release_after_repeat_is_not_a_tap() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(5, Point::ZERO, 0);
        assert_eq!(drain(&mut press, 350, |_| true), 1);
        assert_eq!(press.on_up(), ReleaseOutcome::Released(Some(5)));
    }

    #[test]
    fn failed_step_stops_the_chain() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(2, Point::ZERO, 0);
        assert_eq!(drain(&mut press, 10_000, |_| false), 1, "a failure ends repetition");
        assert_eq!(press.next_deadline(), None);
        assert!(press.is_pressed(), "the press itself lasts until release");
        assert_eq!(press.on_up(), ReleaseOutcome::Released(Some(2)));
    }

    #[test]
    fn drag_suppresses_tap_and_repeat() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(3, Point::new(0.0, 0.0), 0);

        // Small jitter is tolerated.
        assert_eq!(press.on_move(Point::new(3.0, 4.0)), None);
        // Beyond the threshold the press becomes a drag, reported once.
        assert_eq!(press.on_move(Point::new(0.0, 30.0)), Some(3));
        assert_eq!(press.on_move(Point::new(0.0, 60.0)), None);

        assert_eq!(drain(&mut press, 10_000, |_| true), 0);
        assert_eq!(press.on_up(), ReleaseOutcome::Released(Some(3)));
    }

    #[test]
    fn no_drag_threshold_never_detects_drags() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100)).with_drag_threshold(None);
        press.on_down(3, Point::ZERO, 0);
        assert_eq!(press.on_move(Point::new(500.0, 500.0)), None);
        assert_eq!(press.on_up(), ReleaseOutcome::Tap(3));
    }

    #[test]
    fn cancel_and_disable_drop_the_press() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(4, Point::ZERO, 0);
        assert!(press.cancel());
        assert!(!press.cancel());
        assert_eq!(press.on_up(), ReleaseOutcome::Released(None));

        press.on_down(4, Point::ZERO, 0);
        press.set_enabled(false);
        assert_eq!(press.poll(1000), None);
        assert_eq!(press.on_up(), ReleaseOutcome::Released(None));

        // Presses are ignored while disabled.
        press.on_down(4, Point::ZERO, 0);
        assert!(!press.is_pressed());
    }

    #[test]
    fn repeat_off_reports_only_taps() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.set_repeat(false);
        press.on_down(6, Point::ZERO, 0);
        assert_eq!(press.next_deadline(), None);
        assert_eq!(drain(&mut press, 5_000, |_| true), 0);
        assert_eq!(press.on_up(), ReleaseOutcome::Tap(6));
    }

    #[test]
    fn in_flight_step_blocks_polling_and_stray_completions_are_ignored() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.complete(true);
        press.on_down(8, Point::ZERO, 0);
        assert_eq!(press.poll(300), Some(8));
        assert_eq!(press.poll(1000), None, "previous step still in flight");
        assert_eq!(press.next_deadline(), None);
        press.complete(true);
        press.complete(true);
        assert_eq!(press.press().map(|p| p.steps), Some(1));
        assert_eq!(press.next_deadline(), Some(400));
    }

    #[test]
    fn new_press_replaces_previous_one() {
        let mut press = RepeatPress::new(RepeatTimings::new(300, 100));
        press.on_down(1, Point::ZERO, 0);
        press.on_down(2, Point::ZERO, 1000);
        assert_eq!(press.poll(400), None, "old schedule is gone");
        assert_eq!(press.poll(1300), Some(2));
    }
}
