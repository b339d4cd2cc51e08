// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value state machine.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use understory_event_state::repeat::{ReleaseOutcome, RepeatPress};

use crate::log::{LogSink, NoopLog, log_record};
use crate::text::{Commit, TextInput};
use crate::wheel::WheelEngine;
use crate::{
    CallbackId, EditorAction, Numeric, PickerConfig, PickerSetup, PresentationMode,
    RangeAttributes, ScrollIntent, ScrollSurface, SetupError, SlotStrip, StepButton, TextSurface,
};

/// The host surface a picker presents its value on. Also selects the
/// [`PresentationMode`].
pub enum Surface {
    /// An editable text field with stepping buttons.
    Text(Box<dyn TextSurface>),
    /// A snapping scroll wheel.
    Wheel(Box<dyn ScrollSurface>),
}

impl Surface {
    /// Wraps a text field.
    pub fn text(surface: impl TextSurface + 'static) -> Self {
        Self::Text(Box::new(surface))
    }

    /// Wraps a scroll wheel.
    pub fn wheel(surface: impl ScrollSurface + 'static) -> Self {
        Self::Wheel(Box::new(surface))
    }

    /// The presentation mode this surface implies.
    #[must_use]
    pub const fn mode(&self) -> PresentationMode {
        match self {
            Self::Text(_) => PresentationMode::TextEntry,
            Self::Wheel(_) => PresentationMode::ScrollWheel,
        }
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.debug_tuple("Text").finish_non_exhaustive(),
            Self::Wheel(_) => f.debug_tuple("Wheel").finish_non_exhaustive(),
        }
    }
}

enum Presentation {
    Text {
        surface: Box<dyn TextSurface>,
        input: TextInput,
    },
    Wheel {
        surface: Box<dyn ScrollSurface>,
        engine: WheelEngine,
    },
}

/// A value the user tried to select but the setup rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidValue<T> {
    /// Typed text, for text commits.
    pub input: Option<String>,
    /// The rejected value, if there was one.
    pub parsed: Option<T>,
    /// Whether a stepping button produced the value.
    pub from_button: bool,
}

/// State worth keeping across a view recreation: the value only.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState<T> {
    /// The picker's value.
    pub value: T,
}

type ChangedListener<T> = Box<dyn FnMut(T, bool)>;
type InvalidListener<T> = Box<dyn FnMut(&InvalidValue<T>)>;
type FocusListener = Box<dyn FnMut(bool)>;

/// A number picker: the current value, its setup and one presentation.
///
/// The value only changes through [`set_value`](Self::set_value) and the user
/// events forwarded by the host; every change is validated against the setup
/// and reported once to the value-changed listener, in order.
///
/// Host events:
///
/// - Buttons: [`button_down`](Self::button_down),
///   [`button_move`](Self::button_move), [`button_up`](Self::button_up),
///   [`button_cancel`](Self::button_cancel), and [`tick`](Self::tick) at
///   [`next_repeat_deadline`](Self::next_repeat_deadline).
/// - Text: [`text_focus_changed`](Self::text_focus_changed),
///   [`text_edited`](Self::text_edited), [`editor_action`](Self::editor_action).
/// - Wheel: [`resume`](Self::resume) for armed callbacks,
///   [`scroll_idle`](Self::scroll_idle), and
///   [`wheel_item_clicked`](Self::wheel_item_clicked).
pub struct NumberPicker<T: Numeric> {
    setup: Box<dyn PickerSetup<T>>,
    value: T,
    presentation: Presentation,
    config: PickerConfig,
    press: RepeatPress<StepButton>,
    log: Box<dyn LogSink>,
    on_value_changed: Option<ChangedListener<T>>,
    on_invalid_value: Option<InvalidListener<T>>,
    on_focus_changed: Option<FocusListener>,
}

impl<T: Numeric> fmt::Debug for NumberPicker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberPicker")
            .field("value", &self.value)
            .field("mode", &self.mode())
            .field("setup", &self.setup)
            .field("config", &self.config)
            .field("press", &self.press)
            .finish_non_exhaustive()
    }
}

fn resolve_initial<T: Numeric>(
    setup: &dyn PickerSetup<T>,
    mode: PresentationMode,
    candidate: T,
    log: &dyn LogSink,
) -> T {
    if setup.is_value_allowed(mode, candidate) {
        return candidate;
    }
    let default = setup.default_value();
    let fallback = if setup.is_value_allowed(mode, default) {
        default
    } else {
        setup.values().first().copied().unwrap_or(default)
    };
    log_record!(
        log,
        Warn,
        "NumberPicker",
        "value {candidate} is not allowed, falling back to {fallback}"
    );
    fallback
}

impl<T: Numeric> NumberPicker<T> {
    /// Creates a picker. An initial value the setup rejects falls back to the
    /// setup's default.
    pub fn new(
        setup: impl PickerSetup<T> + 'static,
        initial_value: T,
        surface: Surface,
        config: PickerConfig,
    ) -> Self {
        Self::with_log(setup, initial_value, surface, config, NoopLog)
    }

    /// Creates a picker that reports diagnostics to `log`.
    pub fn with_log(
        setup: impl PickerSetup<T> + 'static,
        initial_value: T,
        surface: Surface,
        config: PickerConfig,
        log: impl LogSink + 'static,
    ) -> Self {
        let setup: Box<dyn PickerSetup<T>> = Box::new(setup);
        let log: Box<dyn LogSink> = Box::new(log);
        let value = resolve_initial(&*setup, surface.mode(), initial_value, &*log);
        let presentation = match surface {
            Surface::Text(surface) => Presentation::Text {
                surface,
                input: TextInput::new(),
            },
            Surface::Wheel(surface) => Presentation::Wheel {
                surface,
                engine: WheelEngine::new(),
            },
        };
        let mut picker = Self {
            setup,
            value,
            presentation,
            config,
            press: RepeatPress::default(),
            log,
            on_value_changed: None,
            on_invalid_value: None,
            on_focus_changed: None,
        };
        picker.set_config(config);
        picker.rebuild();
        picker
    }

    /// Creates a range picker from untyped attributes.
    pub fn from_attributes(
        attributes: &RangeAttributes,
        surface: Surface,
        config: PickerConfig,
    ) -> Result<Self, SetupError> {
        let (setup, value) = attributes.build::<T>(surface.mode())?;
        Ok(Self::new(setup, value, surface, config))
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    /// The active setup.
    #[must_use]
    pub fn setup(&self) -> &dyn PickerSetup<T> {
        &*self.setup
    }

    /// The presentation mode.
    #[must_use]
    pub const fn mode(&self) -> PresentationMode {
        match self.presentation {
            Presentation::Text { .. } => PresentationMode::TextEntry,
            Presentation::Wheel { .. } => PresentationMode::ScrollWheel,
        }
    }

    /// The behaviour flags.
    #[must_use]
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Replaces the behaviour flags.
    pub fn set_config(&mut self, config: PickerConfig) {
        self.config = config;
        self.press.set_timings(config.repeat_timings());
        self.press.set_repeat(config.long_press_repeat);
        self.press.drag_threshold = config.drag_threshold;
    }

    /// Sets the listener called with `(value, from_user)` after every change.
    pub fn on_value_changed(&mut self, listener: impl FnMut(T, bool) + 'static) {
        self.on_value_changed = Some(Box::new(listener));
    }

    /// Sets the listener called when user input is rejected.
    pub fn on_invalid_value(&mut self, listener: impl FnMut(&InvalidValue<T>) + 'static) {
        self.on_invalid_value = Some(Box::new(listener));
    }

    /// Sets the listener called when the text field gains or loses focus.
    pub fn on_focus_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.on_focus_changed = Some(Box::new(listener));
    }

    /// Sets the value with an animated scroll, notifying the listener.
    ///
    /// See [`set_value_with`](Self::set_value_with).
    pub fn set_value(&mut self, value: T) -> bool {
        self.set_value_with(value, true, true)
    }

    /// Sets the value.
    ///
    /// Returns `false`, changing nothing, if the setup does not allow `value` in
    /// the current mode. Otherwise the presentation is brought up to date and,
    /// if the value actually changed and `notify` is set, the listener is called
    /// with `from_user = false`. Setting the current value again never notifies.
    pub fn set_value_with(&mut self, value: T, animated: bool, notify: bool) -> bool {
        if !self.setup.is_value_allowed(self.mode(), value) {
            log_record!(&*self.log, Debug, "NumberPicker", "set_value({value}) rejected");
            return false;
        }
        let changed = value != self.value;
        self.value = value;
        if changed || self.needs_resync() {
            self.render(animated);
        }
        if changed && notify {
            self.notify_changed(value, false);
        }
        true
    }

    /// Replaces the setup and rebuilds the presentation.
    ///
    /// If the new setup does not allow the current value, the value falls back to
    /// the new default and the listener is notified with `from_user = false`.
    /// A held button is released without stepping.
    pub fn set_setup(&mut self, setup: impl PickerSetup<T> + 'static) {
        self.press.cancel();
        self.setup = Box::new(setup);
        let value = resolve_initial(&*self.setup, self.mode(), self.value, &*self.log);
        let changed = value != self.value;
        self.value = value;
        self.rebuild();
        if changed {
            self.notify_changed(value, false);
        }
    }

    /// Step buttons to show, in layout order: large down, down, up, large up.
    ///
    /// Scroll wheels have no buttons.
    #[must_use]
    pub fn available_buttons(&self) -> SmallVec<[StepButton; 4]> {
        let mut buttons = SmallVec::new();
        if self.mode() == PresentationMode::ScrollWheel {
            return buttons;
        }
        let secondary = self.setup.supports_secondary_step();
        if secondary {
            buttons.push(StepButton::DOWN_LARGE);
        }
        buttons.push(StepButton::DOWN);
        buttons.push(StepButton::UP);
        if secondary {
            buttons.push(StepButton::UP_LARGE);
        }
        buttons
    }

    /// Performs one button step. Returns `true` if the value changed.
    ///
    /// Uncommitted text in a focused field is read once and used as the
    /// baseline; the field loses focus without committing, so the step reports
    /// exactly one change or one rejection.
    pub fn step(&mut self, button: StepButton) -> bool {
        self.apply_step(button) == Some(true)
    }

    /// Runs one step; `None` if the setup rejected it, else whether the value changed.
    fn apply_step(&mut self, button: StepButton) -> Option<bool> {
        let pending = match &mut self.presentation {
            Presentation::Text { surface, input } => {
                let pending = input.take_pending();
                if pending.is_some() {
                    surface.clear_focus();
                }
                pending
            }
            Presentation::Wheel { .. } => None,
        };
        let baseline = pending
            .and_then(|text| self.setup.parse(&text))
            .unwrap_or(self.value);
        let next = self
            .setup
            .step_value(baseline, button.direction, button.size);
        let outcome = match next {
            Some(next) if self.setup.is_value_allowed(self.mode(), next) => {
                let changed = next != self.value;
                self.value = next;
                self.render(true);
                if changed {
                    self.notify_changed(next, true);
                }
                Some(changed)
            }
            parsed => {
                self.notify_invalid(InvalidValue {
                    input: None,
                    parsed,
                    from_button: true,
                });
                if self.needs_resync() {
                    self.render(false);
                }
                None
            }
        };
        if self.config.close_keyboard_on_step {
            self.hide_keyboard();
        }
        outcome
    }

    /// Pointer down on a step button at `now` milliseconds.
    pub fn button_down(&mut self, button: StepButton, position: Point, now: u64) {
        self.press.on_down(button, position, now);
    }

    /// Pointer moved during a button press. Returns `true` when the press just
    /// turned into a drag of the surrounding container.
    pub fn button_move(&mut self, position: Point) -> bool {
        self.press.on_move(position).is_some()
    }

    /// Pointer released. A tap steps once; returns `true` if that changed the value.
    pub fn button_up(&mut self) -> bool {
        match self.press.on_up() {
            ReleaseOutcome::Tap(button) => self.step(button),
            ReleaseOutcome::Released(_) => false,
        }
    }

    /// Pointer press canceled; no step.
    pub fn button_cancel(&mut self) {
        self.press.cancel();
    }

    /// Runs the repeat steps due at `now`. Returns how many steps ran.
    ///
    /// A step the setup rejects ends the repetition.
    pub fn tick(&mut self, now: u64) -> usize {
        let mut steps = 0;
        while let Some(button) = self.press.poll(now) {
            let allowed = self.apply_step(button).is_some();
            self.press.complete(allowed);
            steps += 1;
        }
        steps
    }

    /// When [`tick`](Self::tick) should be called next.
    #[must_use]
    pub fn next_repeat_deadline(&self) -> Option<u64> {
        self.press.next_deadline()
    }

    /// Enables or disables the buttons. Disabling drops a held press.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.press.set_enabled(enabled);
    }

    /// The text field gained or lost focus. Losing focus commits pending text.
    pub fn text_focus_changed(&mut self, focused: bool) {
        let Presentation::Text { surface, input } = &mut self.presentation else {
            return;
        };
        if !input.set_focused(focused) {
            return;
        }
        surface.set_focused_appearance(focused);
        if let Some(listener) = self.on_focus_changed.as_mut() {
            listener(focused);
        }
        if !focused {
            self.commit_text();
        }
    }

    /// The text field's content changed.
    pub fn text_edited(&mut self, text: &str) {
        if let Presentation::Text { input, .. } = &mut self.presentation {
            input.edited(text);
        }
    }

    /// An editor action. `Done` commits pending text and clears focus.
    ///
    /// Returns `true` if the action was handled.
    pub fn editor_action(&mut self, action: EditorAction) -> bool {
        if action != EditorAction::Done || self.mode() != PresentationMode::TextEntry {
            return false;
        }
        self.clear_input_focus();
        true
    }

    /// Commits pending text and removes focus from the text field.
    pub fn clear_input_focus(&mut self) {
        if let Presentation::Text { surface, .. } = &mut self.presentation {
            surface.clear_focus();
        }
        self.commit_text();
    }

    /// Delivers a callback armed on the scroll surface. Stale ids are ignored;
    /// returns whether the id was current.
    pub fn resume(&mut self, id: CallbackId) -> bool {
        match &mut self.presentation {
            Presentation::Wheel { surface, engine } => {
                engine.resume(&mut **surface, id, &*self.log)
            }
            Presentation::Text { .. } => false,
        }
    }

    /// Scrolling came to rest.
    ///
    /// A user scroll that settled on a new value changes it, notifying with
    /// `from_user = true`. A rejected value or a padding slot snaps back to the
    /// current value.
    pub fn scroll_idle(&mut self) {
        let Presentation::Wheel { surface, engine } = &mut self.presentation else {
            return;
        };
        let Some(slot) = engine.scroll_idle(&mut **surface, &*self.log) else {
            return;
        };
        let settled = engine
            .strip()
            .index_at(slot)
            .and_then(|index| self.setup.values().get(index).copied());
        match settled {
            Some(value) if self.setup.is_value_allowed(PresentationMode::ScrollWheel, value) => {
                if value != self.value {
                    self.value = value;
                    self.notify_changed(value, true);
                }
            }
            Some(value) => {
                self.notify_invalid(InvalidValue {
                    input: None,
                    parsed: Some(value),
                    from_button: false,
                });
                self.render(true);
            }
            None => {
                log_record!(
                    &*self.log,
                    Debug,
                    "Scroller",
                    "settled on padding slot {slot}, snapping back"
                );
                self.render(true);
            }
        }
        if let Presentation::Wheel { engine, .. } = &mut self.presentation {
            engine.finish_settle();
        }
    }

    /// A wheel item was clicked; it scrolls to the centre and then settles.
    pub fn wheel_item_clicked(&mut self, slot: usize) -> bool {
        match &mut self.presentation {
            Presentation::Wheel { surface, engine } => engine.item_clicked(&mut **surface, slot),
            Presentation::Text { .. } => false,
        }
    }

    /// Label of a wheel slot, `None` for padding.
    #[must_use]
    pub fn wheel_label(&self, slot: usize) -> Option<String> {
        let strip = self.wheel_strip()?;
        let value = self.setup.values().get(strip.index_at(slot)?)?;
        Some(self.setup.format(*value))
    }

    /// The wheel's slot layout.
    #[must_use]
    pub fn wheel_strip(&self) -> Option<&SlotStrip> {
        match &self.presentation {
            Presentation::Wheel { engine, .. } => Some(engine.strip()),
            Presentation::Text { .. } => None,
        }
    }

    /// The wheel's live scroll intent.
    #[must_use]
    pub fn wheel_intent(&self) -> Option<ScrollIntent> {
        match &self.presentation {
            Presentation::Wheel { engine, .. } => Some(engine.intent()),
            Presentation::Text { .. } => None,
        }
    }

    /// Captures the state to restore after a view recreation.
    #[must_use]
    pub fn saved_state(&self) -> SavedState<T> {
        SavedState { value: self.value }
    }

    /// Restores a saved value without notifying or animating. Returns `false`
    /// if the active setup does not allow it.
    pub fn restore(&mut self, state: SavedState<T>) -> bool {
        if !self.setup.is_value_allowed(self.mode(), state.value) {
            log_record!(
                &*self.log,
                Warn,
                "NumberPicker",
                "saved value {} is not allowed by the active setup",
                state.value
            );
            return false;
        }
        self.value = state.value;
        self.render(false);
        true
    }

    fn commit_text(&mut self) {
        let pending = match &mut self.presentation {
            Presentation::Text { input, .. } => input.take_pending(),
            Presentation::Wheel { .. } => None,
        };
        let Some(text) = pending else {
            return;
        };
        match Commit::resolve(&*self.setup, self.mode(), text) {
            Commit::Empty => self.render(false),
            Commit::Rejected { input, parsed } => {
                self.notify_invalid(InvalidValue {
                    input: Some(input),
                    parsed,
                    from_button: false,
                });
                self.render(false);
            }
            Commit::Accepted(value) => {
                let changed = value != self.value;
                self.value = value;
                self.render(false);
                if changed {
                    self.notify_changed(value, true);
                    if self.config.close_keyboard_on_new_value {
                        self.hide_keyboard();
                    }
                }
            }
        }
    }

    /// Rebuilds the presentation for the active setup and shows the value.
    fn rebuild(&mut self) {
        let longest = self.setup.format(self.setup.longest_value());
        match &mut self.presentation {
            Presentation::Text { surface, input } => {
                input.rebuild(&mut **surface, &longest);
            }
            Presentation::Wheel { surface, engine } => {
                engine.rebuild(
                    &mut **surface,
                    &longest,
                    self.setup.values().len(),
                    self.setup.visible_offset_items(),
                    &*self.log,
                );
            }
        }
        self.render(false);
    }

    fn render(&mut self, animated: bool) {
        match &mut self.presentation {
            Presentation::Text { surface, input } => {
                input.render(&mut **surface, self.setup.format(self.value));
            }
            Presentation::Wheel { surface, engine } => match self.setup.index_of(self.value) {
                Some(index) => {
                    let slot = engine.strip().slot_of(index);
                    engine.scroll_to_slot(&mut **surface, slot, animated, &*self.log);
                }
                None => log_record!(
                    &*self.log,
                    Warn,
                    "Scroller",
                    "value {} is not on the wheel",
                    self.value
                ),
            },
        }
    }

    fn needs_resync(&self) -> bool {
        match &self.presentation {
            Presentation::Text { input, .. } => input.needs_resync(&self.setup.format(self.value)),
            Presentation::Wheel { engine, .. } => self
                .setup
                .index_of(self.value)
                .is_some_and(|index| engine.needs_resync(engine.strip().slot_of(index))),
        }
    }

    fn hide_keyboard(&mut self) {
        if let Presentation::Text { surface, .. } = &mut self.presentation {
            surface.hide_keyboard();
        }
    }

    fn notify_changed(&mut self, value: T, from_user: bool) {
        log_record!(
            &*self.log,
            Info,
            "NumberPicker",
            "value changed to {value} (from user: {from_user})"
        );
        if let Some(listener) = self.on_value_changed.as_mut() {
            listener(value, from_user);
        }
    }

    fn notify_invalid(&mut self, invalid: InvalidValue<T>) {
        log_record!(
            &*self.log,
            Info,
            "NumberPicker",
            "invalid value: input {:?}, parsed {:?}, from button: {}",
            invalid.input,
            invalid.parsed,
            invalid.from_button
        );
        if let Some(listener) = self.on_invalid_value.as_mut() {
            listener(&invalid);
        }
    }
}
