//! Drives the prompt loop with scripted input.

#![allow(clippy::unwrap_used)]

use composable_todo_testing::init_test_tracing;
use todo::{run, store_from_config, FilterMode, TodoConfig, TodoStore};

async fn session(script: &str) -> (TodoStore, String) {
    init_test_tracing();
    let store = store_from_config(&TodoConfig::default());
    let mut output = Vec::new();

    run(&store, script.as_bytes(), &mut output).await.unwrap();

    (store, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn draws_initial_frame_and_exits_on_eof() {
    let (store, output) = session("").await;

    assert!(output.contains("Todo List"));
    assert!(output.contains("(nothing to show)"));
    assert!(output.contains("[ALL]"));
    assert_eq!(store.snapshot().await.count(), 0);
}

#[tokio::test]
async fn add_toggle_and_filter() {
    let script = "add buy milk\nadd walk dog\ntoggle 1\nfilter completed\nquit\n";
    let (store, output) = session(script).await;

    let state = store.snapshot().await;
    assert_eq!(state.count(), 2);
    assert!(state.todos[0].completed);
    assert!(!state.todos[1].completed);
    assert_eq!(state.filter, FilterMode::Completed);

    let last_frame = output.rsplit("Todo List").next().unwrap();
    assert!(last_frame.contains("[COMPLETED]"));
    assert!(last_frame.contains("  1. [x] buy milk"));
    assert!(!last_frame.contains("walk dog"));
}

#[tokio::test]
async fn blank_add_and_missing_rows_change_nothing() {
    let (store, _) = session("add    \ntoggle 3\ndelete 1\n").await;
    assert_eq!(store.snapshot().await.count(), 0);
}

#[tokio::test]
async fn type_then_add_uses_the_draft() {
    let (store, output) = session("type call mom\nadd\n").await;

    assert!(output.contains("New: call mom"));
    assert_eq!(store.snapshot().await.todos[0].text, "call mom");
}

#[tokio::test]
async fn bad_input_prints_hint_and_keeps_going() {
    let (store, output) = session("frobnicate\nfilter done\nadd ok\n").await;

    assert!(output.contains("unknown command `frobnicate`"));
    assert!(output.contains("unknown filter `done`"));
    assert!(output.contains("type `help` for commands"));
    assert_eq!(store.snapshot().await.count(), 1);
}

#[tokio::test]
async fn dispatch_applies_raw_actions() {
    let script = concat!(
        "add a\n",
        "dispatch {\"type\":\"TOGGLE_TODO\",\"payload\":1}\n",
        "dispatch {\"type\":\"UNDO\",\"payload\":null}\n",
    );
    let (store, _) = session(script).await;

    let state = store.snapshot().await;
    assert_eq!(state.count(), 1);
    assert!(state.todos[0].completed);
}

#[tokio::test]
async fn help_lists_commands() {
    let (_, output) = session("help\n").await;
    assert!(output.contains("Commands:"));
    assert!(output.contains("dispatch <json>"));
}

#[tokio::test]
async fn store_is_closed_after_quit() {
    let (store, _) = session("quit\nadd never\n").await;

    assert_eq!(store.snapshot().await.count(), 0);
    assert!(store.send(todo::TodoAction::AddTodo("late".into())).await.is_err());
}

#[tokio::test]
async fn unknown_filter_from_dispatch_is_kept_and_shows_everything() {
    let script = concat!(
        "add a\n",
        "add b\n",
        "toggle 1\n",
        "dispatch {\"type\":\"SET_FILTER\",\"payload\":\"DONE\"}\n",
    );
    let (store, output) = session(script).await;

    let state = store.snapshot().await;
    assert_eq!(state.filter, FilterMode::Other("DONE".to_string()));

    let last_frame = output.rsplit("Todo List").next().unwrap();
    assert!(last_frame.contains("Show:  ALL   ACTIVE   COMPLETED \n"));
    assert!(last_frame.contains("  1. [x] a"));
    assert!(last_frame.contains("  2. [ ] b"));
}
