//! Terminal view of the todo list.
//!
//! The view holds no list state of its own. It derives everything it shows
//! from a [`TodoState`] snapshot plus the local [`InputForm`] draft, and turns
//! row numbers back into ids for the per-row controls.

use crate::types::{FilterMode, TodoAction, TodoId, TodoState};
use std::fmt;

/// Placeholder shown while the draft is empty
pub const PLACEHOLDER: &str = "Add new todo";

/// One-line summary of the controls
pub const CONTROLS: &str =
    "add <text> | toggle <row> | delete <row> | filter all|active|completed | help | quit";

/// Static explanation shown under the list
pub const EXPLANATION: [&str; 4] = [
    "Manages complex state logic in a single function",
    "Similar to Redux pattern with actions and reducers",
    "Perfect for related state transitions",
    "More predictable state updates than multiple useState calls",
];

/// Local state of the text input
///
/// The draft is not part of the store; it only becomes an action on submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputForm {
    draft: String,
}

impl InputForm {
    /// Empty form
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draft: String::new(),
        }
    }

    /// Current draft text
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft text
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit the draft
    ///
    /// Blank drafts (empty after trimming) are ignored and kept as they are.
    /// Otherwise the draft is taken verbatim into an [`TodoAction::AddTodo`]
    /// and the field is cleared.
    pub fn submit(&mut self) -> Option<TodoAction> {
        if self.draft.trim().is_empty() {
            return None;
        }
        Some(TodoAction::AddTodo(std::mem::take(&mut self.draft)))
    }
}

/// Id of the item shown on visible row `row` (numbered from 1)
#[must_use]
pub fn row_id(state: &TodoState, row: usize) -> Option<TodoId> {
    let index = row.checked_sub(1)?;
    state.filtered().nth(index).map(|item| item.id)
}

/// One rendered frame
#[derive(Clone, Copy, Debug)]
pub struct Screen<'a> {
    state: &'a TodoState,
    form: &'a InputForm,
}

impl<'a> Screen<'a> {
    /// Frame for `state` with the draft from `form`
    #[must_use]
    pub const fn new(state: &'a TodoState, form: &'a InputForm) -> Self {
        Self { state, form }
    }

    fn write_filter_bar(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Show:")?;
        for mode in FilterMode::ALL {
            if mode == self.state.filter {
                write!(f, " [{mode}]")?;
            } else {
                write!(f, "  {mode} ")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Todo List")?;
        writeln!(f, "=========")?;

        let draft = self.form.draft();
        if draft.is_empty() {
            writeln!(f, "New: ({PLACEHOLDER})")?;
        } else {
            writeln!(f, "New: {draft}")?;
        }
        writeln!(f)?;

        self.write_filter_bar(f)?;
        writeln!(f)?;

        let mut shown = 0;
        for (index, item) in self.state.filtered().enumerate() {
            let mark = if item.completed { 'x' } else { ' ' };
            let row = index + 1;
            let toggle = if item.completed { "undo" } else { "done" };
            writeln!(
                f,
                "{row:>3}. [{mark}] {}    ({toggle}: toggle {row}, remove: delete {row})",
                item.text
            )?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(f, "     (nothing to show)")?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{} total, {} active, {} completed",
            self.state.count(),
            self.state.active_count(),
            self.state.completed_count()
        )?;
        writeln!(f, "Controls: {CONTROLS}")?;
        writeln!(f)?;

        writeln!(f, "About this list")?;
        for line in EXPLANATION {
            writeln!(f, "  - {line}")?;
        }
        Ok(())
    }
}
