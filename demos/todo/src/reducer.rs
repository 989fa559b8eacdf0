//! Reducer logic for the todo list.
//!
//! Every action is total: toggling or deleting an id that is not in the list,
//! actions of unknown kind, and adds after the id space is used up leave the
//! state as it was. Text validation is
//! the caller's job (see [`crate::view::InputForm`]); the reducer stores
//! whatever it is given.

use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use composable_todo_core::{
    effect::Effect,
    environment::{Clock, IdGenerator, SequentialIdGenerator, SystemClock},
    reducer::Reducer,
    SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of item ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and a counter starting at `first_id`
    #[must_use]
    pub fn production(first_id: u64) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(SequentialIdGenerator::starting_at(first_id)),
        )
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn toggle(state: &mut TodoState, id: TodoId) {
        for slot in state.todos.iter_mut().filter(|item| item.id == id) {
            *slot = Arc::new(slot.toggled());
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo(text) => {
                let Some(raw) = env.ids.next_id() else {
                    tracing::warn!("Id space exhausted; item not added");
                    return SmallVec::new();
                };
                let item = TodoItem::new(TodoId::new(raw), text, env.clock.now());
                state.todos.push(Arc::new(item));
            },
            TodoAction::ToggleTodo(id) => Self::toggle(state, id),
            TodoAction::DeleteTodo(id) => state.todos.retain(|item| item.id != id),
            TodoAction::SetFilter(mode) => state.filter = mode,
            TodoAction::Unrecognized => {},
        }

        SmallVec::new()
    }
}

/// Value-to-value form of [`TodoReducer`]
///
/// Returns the next state and leaves `state` untouched.
#[must_use]
pub fn reduce(state: &TodoState, action: TodoAction, env: &TodoEnvironment) -> TodoState {
    let mut next = state.clone();
    // The todo reducer never describes effects.
    let _ = TodoReducer.reduce(&mut next, action, env);
    next
}
