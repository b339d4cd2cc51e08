// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text-entry presentation.
//!
//! The field shows the formatted value. Typing never changes the picker's value
//! directly: the text is committed when the field loses focus or the editor
//! reports [`EditorAction::Done`]. A stepping button pressed while the field holds
//! uncommitted text consumes that text once as its baseline, so the blur that
//! follows has nothing left to commit.

use alloc::borrow::ToOwned;
use alloc::string::String;

use crate::{Numeric, PickerSetup, PresentationMode};

/// The editable text field hosting a text-entry picker.
pub trait TextSurface {
    /// Replaces the field's text.
    fn set_text(&mut self, text: &str);

    /// Sets the placeholder used to size the field to the widest label.
    fn set_hint(&mut self, hint: &str);

    /// Removes focus from the field.
    fn clear_focus(&mut self);

    /// Hides the on-screen keyboard.
    fn hide_keyboard(&mut self);

    /// Switches the focused background on or off.
    fn set_focused_appearance(&mut self, focused: bool) {
        let _ = focused;
    }
}

/// Editor action reported by the text field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// The user confirmed the input.
    Done,
    /// Any other action; ignored.
    Other,
}

/// Whether the field holds uncommitted text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditState {
    /// The field shows the committed value.
    #[default]
    Idle,
    /// The field has focus and may hold unsaved keystrokes.
    PendingEdit,
}

/// Outcome of committing typed text.
#[derive(Clone, Debug, PartialEq)]
pub enum Commit<T> {
    /// The field was empty; the display is restored.
    Empty,
    /// The text parsed to an allowed value.
    Accepted(T),
    /// The text did not parse, or parsed to a value the setup rejects.
    Rejected {
        /// The raw text.
        input: String,
        /// The parsed value, if the text was a number.
        parsed: Option<T>,
    },
}

impl<T: Numeric> Commit<T> {
    /// Resolves `input` against `setup`.
    pub fn resolve(setup: &dyn PickerSetup<T>, mode: PresentationMode, input: String) -> Self {
        if input.trim().is_empty() {
            return Self::Empty;
        }
        match setup.parse(&input) {
            Some(value) if setup.is_value_allowed(mode, value) => Self::Accepted(value),
            parsed => Self::Rejected { input, parsed },
        }
    }
}

/// Edit-cycle tracking for the text field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    state: EditState,
    focused: bool,
    text: String,
    shown: Option<String>,
}

impl TextInput {
    /// Creates an idle adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The edit state.
    #[must_use]
    pub const fn state(&self) -> EditState {
        self.state
    }

    /// Whether the field has focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Shows `label` in the field.
    pub fn render(&mut self, surface: &mut dyn TextSurface, label: String) {
        surface.set_text(&label);
        self.text.clone_from(&label);
        self.shown = Some(label);
    }

    /// Applies a new setup's widest label.
    pub fn rebuild(&mut self, surface: &mut dyn TextSurface, longest_label: &str) {
        surface.set_hint(longest_label);
        self.shown = None;
    }

    /// Whether the field must be re-rendered to show `label`.
    ///
    /// While an edit is pending the field belongs to the user.
    #[must_use]
    pub fn needs_resync(&self, label: &str) -> bool {
        self.state == EditState::Idle && self.shown.as_deref() != Some(label)
    }

    /// Records a focus change. Returns `true` if focus actually changed.
    pub fn set_focused(&mut self, focused: bool) -> bool {
        if self.focused == focused {
            return false;
        }
        self.focused = focused;
        if focused {
            self.state = EditState::PendingEdit;
        }
        true
    }

    /// Records the field's current text.
    ///
    /// Echoes of the rendered label are ignored; anything else makes the field
    /// user-owned until the next render.
    pub fn edited(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        if self.shown.as_deref() == Some(text) {
            return;
        }
        self.shown = None;
        if self.focused {
            self.state = EditState::PendingEdit;
        }
    }

    /// Takes the uncommitted text, ending the edit cycle.
    ///
    /// Returns `None` when nothing is pending, so each edit is committed at most once.
    pub fn take_pending(&mut self) -> Option<String> {
        if self.state != EditState::PendingEdit {
            return None;
        }
        self.state = EditState::Idle;
        Some(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::RangeSetup;
    use crate::testing::MockText;

    #[test]
    fn commit_classifies_input() {
        let setup = RangeSetup::builder(0, 10, 1).build().unwrap();
        let resolve = |s: &str| Commit::resolve(&setup, PresentationMode::TextEntry, s.to_string());
        assert_eq!(resolve("  "), Commit::Empty);
        assert_eq!(resolve("7"), Commit::Accepted(7));
        assert_eq!(
            resolve("70"),
            Commit::Rejected {
                input: "70".to_string(),
                parsed: Some(70)
            }
        );
        assert_eq!(
            resolve("seven"),
            Commit::Rejected {
                input: "seven".to_string(),
                parsed: None
            }
        );
    }

    #[test]
    fn pending_text_is_taken_once() {
        let mut input = TextInput::new();
        assert_eq!(input.take_pending(), None, "nothing pending before focus");

        assert!(input.set_focused(true));
        assert!(!input.set_focused(true));
        input.edited("12");
        assert_eq!(input.state(), EditState::PendingEdit);
        assert_eq!(input.take_pending(), Some("12".to_string()));
        assert_eq!(input.take_pending(), None);
        assert_eq!(input.state(), EditState::Idle);
        assert!(input.is_focused());
    }

    #[test]
    fn render_tracks_the_shown_label() {
        let mut surface = MockText::new();
        let mut input = TextInput::new();
        input.rebuild(&mut surface, "100");
        assert_eq!(surface.state().hint, "100");
        assert!(input.needs_resync("5"));

        input.render(&mut surface, "5".to_string());
        assert_eq!(surface.state().text, "5");
        assert!(!input.needs_resync("5"));

        input.edited("5");
        assert_eq!(input.state(), EditState::Idle, "echo of the rendered label");

        input.set_focused(true);
        input.edited("6");
        assert!(!input.needs_resync("7"), "the user owns the field while editing");
        assert_eq!(input.take_pending(), Some("6".to_string()));
        assert!(input.needs_resync("5"), "typed text must be replaced");
    }
}
