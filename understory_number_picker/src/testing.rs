// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording surfaces shared by the unit tests.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};

use crate::{CallbackId, ScrollSurface, SlotStrip, TextSurface};

/// Uniform extent the mock reports for every label.
pub(crate) const ITEM_EXTENT: f64 = 10.0;

#[derive(Debug)]
pub(crate) struct ScrollState {
    pub(crate) laid_out: bool,
    pub(crate) strip: SlotStrip,
    pub(crate) offset: f64,
    pub(crate) next_id: u64,
    pub(crate) layout_waiters: Vec<CallbackId>,
    pub(crate) idle_waiters: Vec<CallbackId>,
    pub(crate) cancelled: Vec<CallbackId>,
    pub(crate) scrolls: Vec<(f64, bool)>,
    pub(crate) animation: Option<f64>,
    pub(crate) stops: usize,
    pub(crate) rebuilds: usize,
    pub(crate) measured: Vec<String>,
}

/// A scroll surface laid out with [`SlotStrip`] geometry.
///
/// Only slots overlapping the viewport (plus one on each side) are
/// materialized. Animated scrolls land when the test calls
/// [`MockScroll::finish_animation`].
#[derive(Clone, Debug)]
pub(crate) struct MockScroll {
    state: Rc<RefCell<ScrollState>>,
}

impl MockScroll {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ScrollState {
                laid_out: false,
                strip: SlotStrip::new(0, 0, 0.0),
                offset: 0.0,
                next_id: 0,
                layout_waiters: Vec::new(),
                idle_waiters: Vec::new(),
                cancelled: Vec::new(),
                scrolls: Vec::new(),
                animation: None,
                stops: 0,
                rebuilds: 0,
                measured: Vec::new(),
            })),
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, ScrollState> {
        self.state.borrow()
    }

    /// Runs a layout pass and returns the callbacks to deliver.
    pub(crate) fn layout(&self) -> Vec<CallbackId> {
        let mut state = self.state.borrow_mut();
        state.laid_out = true;
        core::mem::take(&mut state.layout_waiters)
    }

    /// Lands the running animation and returns the idle callbacks to deliver.
    pub(crate) fn finish_animation(&self) -> Vec<CallbackId> {
        let mut state = self.state.borrow_mut();
        if let Some(target) = state.animation.take() {
            state.offset = target;
        }
        core::mem::take(&mut state.idle_waiters)
    }

    /// Simulates a user fling that comes to rest centred on `slot`.
    pub(crate) fn drag_to_slot(&self, slot: usize) {
        let mut state = self.state.borrow_mut();
        state.animation = None;
        state.offset = state.strip.centered_scroll_offset(slot);
    }

    /// Simulates a user scroll that rests at `offset`, possibly off-centre.
    pub(crate) fn drag_to_offset(&self, offset: f64) {
        let mut state = self.state.borrow_mut();
        state.animation = None;
        state.offset = offset;
    }

    pub(crate) fn centered_slot(&self) -> Option<usize> {
        let state = self.state.borrow();
        state.strip.slot_at_center(state.offset)
    }
}

impl ScrollState {
    fn clamp(&self, offset: f64) -> f64 {
        let max = (self.strip.content_extent() - self.strip.viewport_extent()).max(0.0);
        offset.clamp(0.0, max)
    }

    fn arm(&mut self) -> CallbackId {
        self.next_id += 1;
        CallbackId(self.next_id)
    }
}

impl ScrollSurface for MockScroll {
    fn measure_label(&mut self, label: &str) -> f64 {
        self.state.borrow_mut().measured.push(label.to_string());
        ITEM_EXTENT
    }

    fn rebuild(&mut self, strip: &SlotStrip) {
        let mut state = self.state.borrow_mut();
        state.strip = *strip;
        state.offset = 0.0;
        state.laid_out = false;
        state.rebuilds += 1;
    }

    fn is_laid_out(&self) -> bool {
        self.state.borrow().laid_out
    }

    fn on_next_layout(&mut self) -> CallbackId {
        let mut state = self.state.borrow_mut();
        let id = state.arm();
        state.layout_waiters.push(id);
        id
    }

    fn on_scroll_idle(&mut self) -> CallbackId {
        let mut state = self.state.borrow_mut();
        let id = state.arm();
        state.idle_waiters.push(id);
        id
    }

    fn cancel(&mut self, id: CallbackId) {
        let mut state = self.state.borrow_mut();
        state.layout_waiters.retain(|&w| w != id);
        state.idle_waiters.retain(|&w| w != id);
        state.cancelled.push(id);
    }

    fn scroll_to_slot(&mut self, slot: usize) {
        let mut state = self.state.borrow_mut();
        // Brings the slot to the start of the viewport, like a plain scroll-into-view.
        let start = state.strip.item_extent() * slot as f64;
        state.offset = state.clamp(start);
    }

    fn snap_distance(&self, slot: usize) -> Option<f64> {
        let state = self.state.borrow();
        if !state.laid_out || slot >= state.strip.len() {
            return None;
        }
        let extent = state.strip.item_extent();
        let first = state.offset / extent - 1.0;
        let last = (state.offset + state.strip.viewport_extent()) / extent + 1.0;
        let slot_f = slot as f64;
        if slot_f < first || slot_f > last {
            return None;
        }
        Some(state.strip.snap_distance(slot, state.offset))
    }

    fn scroll_by(&mut self, delta: f64, animated: bool) {
        let mut state = self.state.borrow_mut();
        state.scrolls.push((delta, animated));
        let target = state.clamp(state.offset + delta);
        if animated {
            state.animation = Some(target);
        } else {
            state.offset = target;
        }
    }

    fn stop_scroll(&mut self) {
        let mut state = self.state.borrow_mut();
        state.animation = None;
        state.stops += 1;
    }

    fn snapped_slot(&self) -> Option<usize> {
        self.centered_slot()
    }
}

#[derive(Debug, Default)]
pub(crate) struct TextState {
    pub(crate) text: String,
    pub(crate) hint: String,
    pub(crate) texts_set: usize,
    pub(crate) focus_clears: usize,
    pub(crate) keyboard_hides: usize,
    pub(crate) focused_appearance: Option<bool>,
}

/// A text field that records what the picker does to it.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockText {
    state: Rc<RefCell<TextState>>,
}

impl MockText {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> Ref<'_, TextState> {
        self.state.borrow()
    }
}

impl TextSurface for MockText {
    fn set_text(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.texts_set += 1;
    }

    fn set_hint(&mut self, hint: &str) {
        self.state.borrow_mut().hint = hint.to_string();
    }

    fn clear_focus(&mut self) {
        self.state.borrow_mut().focus_clears += 1;
    }

    fn hide_keyboard(&mut self) {
        self.state.borrow_mut().keyboard_hides += 1;
    }

    fn set_focused_appearance(&mut self, focused: bool) {
        self.state.borrow_mut().focused_appearance = Some(focused);
    }
}
