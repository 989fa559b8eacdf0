//! Prompt commands.
//!
//! Each input line is one user interaction: it either edits the local input
//! form or turns into at most one [`TodoAction`].

use crate::types::{FilterMode, TodoAction, TodoState};
use crate::view::{row_id, InputForm};
use std::str::FromStr;
use thiserror::Error;

/// A line the prompt could not understand
#[derive(Debug, Error)]
pub enum ParseError {
    /// Blank line
    #[error("empty input")]
    Empty,

    /// First word is not a command
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// Command needs an argument
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// Row is not a positive number
    #[error("`{0}` is not a row number")]
    InvalidRow(String),

    /// Filter is not one of the three buttons
    #[error("unknown filter `{0}`, expected all, active or completed")]
    UnknownFilter(String),

    /// `dispatch` payload is not an action
    #[error("invalid action: {0}")]
    InvalidAction(#[from] serde_json::Error),
}

/// One parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add [text]`: set the draft (if given) and submit it
    Add(Option<String>),
    /// `type [text]`: set the draft without submitting
    Type(String),
    /// `toggle <row>`
    Toggle(usize),
    /// `delete <row>`
    Delete(usize),
    /// `filter <all|active|completed>`
    Filter(FilterMode),
    /// `dispatch <json>`: apply a raw `{type, payload}` action
    Dispatch(TodoAction),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// What the prompt should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Apply this action to the store
    Dispatch(TodoAction),
    /// Only the form changed; draw again
    Redraw,
    /// Print the command list
    ShowHelp,
    /// Leave the prompt
    Quit,
}

impl Command {
    /// Resolve the command against the visible list and the input form
    ///
    /// Returns `None` when the interaction does nothing: a blank submit, or a
    /// row number with no item on it.
    pub fn step(self, state: &TodoState, form: &mut InputForm) -> Option<Step> {
        match self {
            Self::Add(text) => {
                if let Some(text) = text {
                    form.set_draft(text);
                }
                form.submit().map(Step::Dispatch)
            },
            Self::Type(text) => {
                form.set_draft(text);
                Some(Step::Redraw)
            },
            Self::Toggle(row) => row_id(state, row).map(|id| Step::Dispatch(TodoAction::ToggleTodo(id))),
            Self::Delete(row) => row_id(state, row).map(|id| Step::Dispatch(TodoAction::DeleteTodo(id))),
            Self::Filter(mode) => Some(Step::Dispatch(TodoAction::SetFilter(mode))),
            Self::Dispatch(action) => Some(Step::Dispatch(action)),
            Self::Help => Some(Step::ShowHelp),
            Self::Quit => Some(Step::Quit),
        }
    }
}

fn parse_row(arg: &str) -> Result<usize, ParseError> {
    arg.parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .ok_or_else(|| ParseError::InvalidRow(arg.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start().trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            // Text after `add ` is kept as typed so the form sees it verbatim.
            "add" | "+" => Ok(Self::Add((!rest.is_empty()).then(|| rest.to_string()))),
            "type" => Ok(Self::Type(rest.to_string())),
            "toggle" | "t" => {
                if arg.is_empty() {
                    return Err(ParseError::MissingArgument("toggle"));
                }
                parse_row(arg).map(Self::Toggle)
            },
            "delete" | "del" | "d" => {
                if arg.is_empty() {
                    return Err(ParseError::MissingArgument("delete"));
                }
                parse_row(arg).map(Self::Delete)
            },
            "filter" | "f" => {
                if arg.is_empty() {
                    return Err(ParseError::MissingArgument("filter"));
                }
                FilterMode::from_label(arg)
                    .map(Self::Filter)
                    .ok_or_else(|| ParseError::UnknownFilter(arg.to_string()))
            },
            "dispatch" => {
                if arg.is_empty() {
                    return Err(ParseError::MissingArgument("dispatch"));
                }
                Ok(Self::Dispatch(serde_json::from_str(arg)?))
            },
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

/// Command reference printed by `help`
pub const HELP: &str = "\
Commands:
  add <text>        add an item (blank text is ignored)
  add               submit the current draft
  type <text>       put text in the input field without submitting
  toggle <row>      mark the item on that row done / not done
  delete <row>      remove the item on that row
  filter <mode>     show all, active or completed items
  dispatch <json>   apply a raw action, e.g. {\"type\":\"SET_FILTER\",\"payload\":\"ACTIVE\"}
  help              show this list
  quit              leave";
