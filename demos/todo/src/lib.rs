//! Todo list driven by a single reducer.
//!
//! Every change to the list is described as a [`TodoAction`] and applied by
//! [`TodoReducer`] inside one [`Store`](composable_todo_runtime::Store). The
//! terminal front end only reads state snapshots and sends actions.
//!
//! - [`types`]: items, filter modes, list state and the action vocabulary
//! - [`reducer`]: the transition function and its environment
//! - [`view`]: input form, row lookup and frame rendering
//! - [`command`]: prompt command parsing
//! - [`config`]: settings read from the environment
//! - [`app`]: the prompt loop
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{store_from_config, TodoAction, TodoConfig, TodoId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = store_from_config(&TodoConfig::default());
//!
//! store.send(TodoAction::AddTodo("buy milk".to_string())).await?;
//! store.send(TodoAction::ToggleTodo(TodoId::new(1))).await?;
//!
//! let state = store.snapshot().await;
//! println!("{} of {} done", state.completed_count(), state.count());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod reducer;
pub mod types;
pub mod view;

pub use app::{run, store_from_config, AppError, TodoStore};
pub use command::{Command, ParseError, Step};
pub use config::{ConfigError, TodoConfig};
pub use reducer::{reduce, TodoEnvironment, TodoReducer};
pub use types::{FilterMode, TodoAction, TodoId, TodoItem, TodoState};
pub use view::{InputForm, Screen};
