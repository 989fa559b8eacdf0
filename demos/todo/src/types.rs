//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items plus the filter that decides
//! which of them are visible. Items are held behind `Arc` so a transition that
//! touches one item leaves every other item pointer-identical to the previous
//! state.

use chrono::{DateTime, Utc};
use composable_todo_macros::Action;
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Text as the user typed it
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was added
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Returns a copy with `completed` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Which items the list shows
///
/// On the wire a mode is its label. A label that is not one of the three
/// buttons is kept as [`FilterMode::Other`]: it is stored and re-encoded as
/// given, no button is highlighted for it, and it shows every item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterMode {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
    /// Any other label, kept verbatim
    Other(String),
}

impl FilterMode {
    /// The three button modes, in the order the filter bar shows them
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Label (`ALL`, `ACTIVE`, `COMPLETED`, or the stored one)
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Other(label) => label,
        }
    }

    /// Parses a button label, ignoring case
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Whether `item` is visible under this filter
    #[must_use]
    pub const fn matches(&self, item: &TodoItem) -> bool {
        match self {
            Self::All | Self::Other(_) => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for FilterMode {
    fn from(label: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == label)
            .unwrap_or(Self::Other(label))
    }
}

impl From<FilterMode> for String {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// State of the todo list
///
/// Insertion order is display order: new items are appended at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos, oldest first
    pub todos: Vec<Arc<TodoItem>>,
    /// Current filter
    pub filter: FilterMode,
}

impl TodoState {
    /// Creates an empty list showing all items
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: FilterMode::All,
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns the number of todos still open
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.count() - self.completed_count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id).map(|t| &**t)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Items visible under the current filter, in list order
    pub fn filtered(&self) -> impl Iterator<Item = &Arc<TodoItem>> {
        self.todos.iter().filter(|item| self.filter.matches(item))
    }

    /// Items visible under `mode`, in list order
    pub fn filtered_by(&self, mode: FilterMode) -> impl Iterator<Item = &Arc<TodoItem>> {
        self.todos.iter().filter(move |item| mode.matches(item))
    }
}

/// Wire kinds of [`TodoAction`]
///
/// [`TodoAction::name`], encoding and decoding all read these.
pub mod kinds {
    /// [`TodoAction::AddTodo`](super::TodoAction::AddTodo)
    pub const ADD_TODO: &str = "ADD_TODO";
    /// [`TodoAction::ToggleTodo`](super::TodoAction::ToggleTodo)
    pub const TOGGLE_TODO: &str = "TOGGLE_TODO";
    /// [`TodoAction::DeleteTodo`](super::TodoAction::DeleteTodo)
    pub const DELETE_TODO: &str = "DELETE_TODO";
    /// [`TodoAction::SetFilter`](super::TodoAction::SetFilter)
    pub const SET_FILTER: &str = "SET_FILTER";
    /// [`TodoAction::Unrecognized`](super::TodoAction::Unrecognized)
    pub const UNRECOGNIZED: &str = "UNRECOGNIZED";
}

/// Actions that change the todo list
///
/// On the wire an action is `{"type": KIND, "payload": ..}`, with `KIND`
/// equal to [`TodoAction::name`]. Any unknown `type` decodes as
/// [`TodoAction::Unrecognized`].
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    /// Append an item with this text
    #[action(rename = kinds::ADD_TODO)]
    AddTodo(String),

    /// Flip `completed` on the matching item
    #[action(rename = kinds::TOGGLE_TODO)]
    ToggleTodo(TodoId),

    /// Remove the matching item
    #[action(rename = kinds::DELETE_TODO)]
    DeleteTodo(TodoId),

    /// Change the visible subset
    #[action(rename = kinds::SET_FILTER)]
    SetFilter(FilterMode),

    /// An action of a kind this list does not know
    #[action(rename = kinds::UNRECOGNIZED)]
    Unrecognized,
}

impl Serialize for TodoAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = if matches!(self, Self::Unrecognized) { 1 } else { 2 };
        let mut wire = serializer.serialize_struct("TodoAction", fields)?;
        wire.serialize_field("type", self.name())?;
        match self {
            Self::AddTodo(text) => wire.serialize_field("payload", text)?,
            Self::ToggleTodo(id) | Self::DeleteTodo(id) => wire.serialize_field("payload", id)?,
            Self::SetFilter(mode) => wire.serialize_field("payload", mode)?,
            Self::Unrecognized => {},
        }
        wire.end()
    }
}

/// Untyped `{type, payload}` pair, decoded before the payload is interpreted
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

impl TryFrom<RawAction> for TodoAction {
    type Error = serde_json::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let RawAction { kind, payload } = raw;
        Ok(match kind.as_str() {
            kinds::ADD_TODO => Self::AddTodo(serde_json::from_value(payload)?),
            kinds::TOGGLE_TODO => Self::ToggleTodo(serde_json::from_value(payload)?),
            kinds::DELETE_TODO => Self::DeleteTodo(serde_json::from_value(payload)?),
            kinds::SET_FILTER => Self::SetFilter(serde_json::from_value(payload)?),
            _ => Self::Unrecognized,
        })
    }
}

impl<'de> Deserialize<'de> for TodoAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAction::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: u64, text: &str, completed: bool) -> Arc<TodoItem> {
        let mut item = TodoItem::new(TodoId::new(id), text.to_string(), Utc::now());
        item.completed = completed;
        Arc::new(item)
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
        assert_eq!(TodoId::new(42).get(), 42);
    }

    #[test]
    fn todo_item_new() {
        let now = Utc::now();
        let item = TodoItem::new(TodoId::new(1), "Test todo".to_string(), now);

        assert_eq!(item.text, "Test todo");
        assert!(!item.completed);
        assert_eq!(item.created_at, now);
    }

    #[test]
    fn todo_item_toggled_twice_restores() {
        let item = TodoItem::new(TodoId::new(1), "Test".to_string(), Utc::now());
        let once = item.toggled();
        assert!(once.completed);
        assert_eq!(once.toggled(), item);
    }

    #[test]
    fn filter_labels() {
        assert_eq!(FilterMode::from_label("active"), Some(FilterMode::Active));
        assert_eq!(FilterMode::from_label(" COMPLETED "), Some(FilterMode::Completed));
        assert_eq!(FilterMode::from_label("done"), None);
        assert_eq!(FilterMode::from("ACTIVE".to_string()), FilterMode::Active);
        assert_eq!(FilterMode::from("active".to_string()), FilterMode::Other("active".into()));
        assert_eq!(FilterMode::default().to_string(), "ALL");
    }

    #[test]
    fn todo_state_counts_and_filters() {
        let state = TodoState {
            todos: vec![item(1, "a", false), item(2, "b", true), item(3, "c", false)],
            filter: FilterMode::Active,
        };

        assert_eq!(state.count(), 3);
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.active_count(), 2);

        let visible: Vec<_> = state.filtered().map(|t| t.id.get()).collect();
        assert_eq!(visible, vec![1, 3]);

        let done: Vec<_> = state
            .filtered_by(FilterMode::Completed)
            .map(|t| t.id.get())
            .collect();
        assert_eq!(done, vec![2]);
        assert_eq!(state.filtered_by(FilterMode::All).count(), 3);
    }

    #[test]
    fn todo_state_lookup() {
        let state = TodoState {
            todos: vec![item(7, "a", false)],
            filter: FilterMode::All,
        };
        assert!(state.exists(TodoId::new(7)));
        assert!(!state.exists(TodoId::new(8)));
        assert_eq!(state.get(TodoId::new(7)).map(|t| t.text.as_str()), Some("a"));
    }

    #[test]
    fn action_names() {
        assert_eq!(TodoAction::AddTodo("x".into()).name(), "ADD_TODO");
        assert_eq!(TodoAction::ToggleTodo(TodoId::new(1)).name(), "TOGGLE_TODO");
        assert_eq!(TodoAction::DeleteTodo(TodoId::new(1)).name(), "DELETE_TODO");
        assert_eq!(TodoAction::SetFilter(FilterMode::All).name(), "SET_FILTER");
        assert_eq!(TodoAction::Unrecognized.name(), "UNRECOGNIZED");
    }

    #[test]
    fn action_wire_shape() {
        let json = serde_json::to_value(TodoAction::ToggleTodo(TodoId::new(3))).unwrap();
        assert_eq!(json, json!({"type": "TOGGLE_TODO", "payload": 3}));

        let json = serde_json::to_value(TodoAction::SetFilter(FilterMode::Completed)).unwrap();
        assert_eq!(json, json!({"type": "SET_FILTER", "payload": "COMPLETED"}));
    }

    #[test]
    fn action_decodes_known_kinds() {
        let action: TodoAction =
            serde_json::from_str(r#"{"type":"ADD_TODO","payload":"buy milk"}"#).unwrap();
        assert_eq!(action, TodoAction::AddTodo("buy milk".to_string()));

        let action: TodoAction =
            serde_json::from_str(r#"{"payload":5,"type":"DELETE_TODO"}"#).unwrap();
        assert_eq!(action, TodoAction::DeleteTodo(TodoId::new(5)));
    }

    #[test]
    fn action_decodes_unknown_kind_as_unrecognized() {
        let action: TodoAction =
            serde_json::from_str(r#"{"type":"CLEAR_ALL","payload":{"x":1}}"#).unwrap();
        assert_eq!(action, TodoAction::Unrecognized);

        let action: TodoAction = serde_json::from_str(r#"{"type":"RESET"}"#).unwrap();
        assert_eq!(action, TodoAction::Unrecognized);
    }

    #[test]
    fn action_keeps_unknown_filter_label() {
        let action: TodoAction =
            serde_json::from_str(r#"{"type":"SET_FILTER","payload":"DONE"}"#).unwrap();
        assert_eq!(action, TodoAction::SetFilter(FilterMode::Other("DONE".to_string())));

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, json!({"type": "SET_FILTER", "payload": "DONE"}));

        let state = TodoState {
            todos: vec![item(1, "a", false), item(2, "b", true)],
            filter: FilterMode::Other("DONE".to_string()),
        };
        assert_eq!(state.filtered().count(), 2);
    }

    #[test]
    fn action_kinds_agree_with_names() {
        let actions = [
            (TodoAction::AddTodo("x".into()), kinds::ADD_TODO),
            (TodoAction::ToggleTodo(TodoId::new(1)), kinds::TOGGLE_TODO),
            (TodoAction::DeleteTodo(TodoId::new(2)), kinds::DELETE_TODO),
            (TodoAction::SetFilter(FilterMode::Active), kinds::SET_FILTER),
            (TodoAction::Unrecognized, kinds::UNRECOGNIZED),
        ];

        for (action, kind) in actions {
            assert_eq!(action.name(), kind);
            let json = serde_json::to_value(&action).unwrap();
            assert_eq!(json["type"], kind);
            let decoded: TodoAction = serde_json::from_value(json).unwrap();
            assert_eq!(decoded, action);
        }
    }

    #[test]
    fn action_rejects_bad_payload() {
        let result: Result<TodoAction, _> =
            serde_json::from_str(r#"{"type":"TOGGLE_TODO","payload":"one"}"#);
        assert!(result.is_err());

        let result: Result<TodoAction, _> = serde_json::from_str(r#"{"payload":1}"#);
        assert!(result.is_err());
    }
}
