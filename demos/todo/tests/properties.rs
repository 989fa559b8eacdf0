//! Property tests for the todo reducer.

#![allow(clippy::unwrap_used)]

use composable_todo_core::environment::SequentialIdGenerator;
use composable_todo_testing::test_clock;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{reduce, FilterMode, TodoAction, TodoEnvironment, TodoId, TodoState};

fn env() -> TodoEnvironment {
    TodoEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
    )
}

fn filter_mode() -> impl Strategy<Value = FilterMode> {
    prop_oneof![
        Just(FilterMode::All),
        Just(FilterMode::Active),
        Just(FilterMode::Completed),
        "[a-z]{1,6}".prop_map(|label: String| FilterMode::from(label)),
    ]
}

/// Any action, with ids drawn from a small range so some hit existing items
fn action() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(TodoAction::AddTodo),
        (0u64..12).prop_map(|id| TodoAction::ToggleTodo(TodoId::new(id))),
        (0u64..12).prop_map(|id| TodoAction::DeleteTodo(TodoId::new(id))),
        filter_mode().prop_map(TodoAction::SetFilter),
        Just(TodoAction::Unrecognized),
    ]
}

fn replay(actions: Vec<TodoAction>, env: &TodoEnvironment) -> TodoState {
    actions
        .into_iter()
        .fold(TodoState::new(), |state, action| reduce(&state, action, env))
}

proptest! {
    #[test]
    fn ids_stay_unique(actions in prop::collection::vec(action(), 0..40)) {
        let state = replay(actions, &env());
        let ids: HashSet<_> = state.todos.iter().map(|t| t.id).collect();
        prop_assert_eq!(ids.len(), state.count());
    }

    #[test]
    fn adds_produce_distinct_ids(texts in prop::collection::vec("[a-z]{1,8}", 0..30)) {
        let n = texts.len();
        let state = replay(texts.into_iter().map(TodoAction::AddTodo).collect(), &env());
        prop_assert_eq!(state.count(), n);
        let ids: HashSet<_> = state.todos.iter().map(|t| t.id).collect();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn absent_ids_are_noops(actions in prop::collection::vec(action(), 0..20), missing in 1000u64..2000) {
        let env = env();
        let state = replay(actions, &env);
        let id = TodoId::new(missing);

        prop_assert_eq!(&reduce(&state, TodoAction::ToggleTodo(id), &env), &state);
        prop_assert_eq!(&reduce(&state, TodoAction::DeleteTodo(id), &env), &state);
    }

    #[test]
    fn toggle_twice_restores(actions in prop::collection::vec(action(), 1..20), pick in any::<prop::sample::Index>()) {
        let env = env();
        let state = replay(actions, &env);
        prop_assume!(state.count() > 0);
        let id = state.todos[pick.index(state.count())].id;

        let once = reduce(&state, TodoAction::ToggleTodo(id), &env);
        prop_assert_ne!(&once, &state);
        let twice = reduce(&once, TodoAction::ToggleTodo(id), &env);
        prop_assert_eq!(&twice, &state);
    }

    #[test]
    fn active_and_completed_partition_the_list(actions in prop::collection::vec(action(), 0..40)) {
        let state = replay(actions, &env());

        let all: Vec<_> = state.filtered_by(FilterMode::All).map(|t| t.id).collect();
        let active: HashSet<_> = state.filtered_by(FilterMode::Active).map(|t| t.id).collect();
        let completed: HashSet<_> = state.filtered_by(FilterMode::Completed).map(|t| t.id).collect();

        prop_assert_eq!(all.len(), state.count());
        prop_assert!(active.is_disjoint(&completed));
        prop_assert_eq!(active.len() + completed.len(), state.count());
        prop_assert_eq!(active.len(), state.active_count());
    }

    #[test]
    fn set_filter_keeps_items(actions in prop::collection::vec(action(), 0..20), mode in filter_mode()) {
        let env = env();
        let state = replay(actions, &env);
        let next = reduce(&state, TodoAction::SetFilter(mode.clone()), &env);

        prop_assert_eq!(next.filter, mode);
        prop_assert_eq!(&next.todos, &state.todos);
    }
}
