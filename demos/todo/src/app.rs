//! Interactive prompt loop.
//!
//! Reads one command per line, turns it into at most one action, sends it to
//! the store and draws the next frame from the store's state subscription.

use crate::command::{Command, ParseError, Step, HELP};
use crate::config::TodoConfig;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoState};
use crate::view::{InputForm, Screen};
use composable_todo_runtime::{Store, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Store type used by the todo app
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Errors that end the prompt loop
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading input or writing a frame failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused an action or did not shut down cleanly
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Build an empty store from `config`
#[must_use]
pub fn store_from_config(config: &TodoConfig) -> TodoStore {
    Store::with_config(
        TodoState::new(),
        TodoReducer::new(),
        TodoEnvironment::production(config.first_id),
        config.store_config(),
    )
}

async fn draw<W>(output: &mut W, state: &TodoState, form: &InputForm) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = format!("{}\n> ", Screen::new(state, form));
    output.write_all(frame.as_bytes()).await?;
    output.flush().await
}

async fn say<W>(output: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("{message}\n> ").as_bytes()).await?;
    output.flush().await
}

/// Run the prompt until `quit` or end of input, then close the store
///
/// # Errors
///
/// Returns [`AppError`] if the terminal fails or the store rejects an action.
pub async fn run<R, W>(store: &TodoStore, input: R, mut output: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut state_rx = store.subscribe();
    let mut form = InputForm::new();
    let mut lines = input.lines();

    let mut current = Arc::clone(&state_rx.borrow_and_update());
    draw(&mut output, &current, &form).await?;

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => {
                say(&mut output, "").await?;
                continue;
            },
            Err(error) => {
                tracing::debug!(%error, "Unparseable input");
                say(&mut output, &format!("{error} (type `help` for commands)")).await?;
                continue;
            },
        };

        match command.step(&current, &mut form) {
            None => {
                tracing::debug!("Input did not describe a change");
                say(&mut output, "").await?;
            },
            Some(Step::Dispatch(action)) => {
                tracing::info!(action = action.name(), "Dispatching");
                store.send(action).await?;
                current = Arc::clone(&state_rx.borrow_and_update());
                draw(&mut output, &current, &form).await?;
            },
            Some(Step::Redraw) => draw(&mut output, &current, &form).await?,
            Some(Step::ShowHelp) => say(&mut output, HELP).await?,
            Some(Step::Quit) => break,
        }
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    store.close().await?;
    tracing::info!("Prompt closed");
    Ok(())
}
