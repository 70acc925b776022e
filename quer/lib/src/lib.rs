//! Quer library: queue shell commands, then run, record or replay them.
//!
//! The centre of the crate is [`QueueSession`], a line-driven editor for a
//! command queue. Each input line is either a directive (`done`, `quit`,
//! `show`, `undo`, `undo <n>`, `undo all`) or a command to queue. When the
//! input ends the queue is flushed according to the session's [`RunMode`].
//!
//! ## Core Types
//!
//! - [`QueueSession`] - The read/interpret/flush loop
//! - [`RunMode`] - Run, record, or play
//! - [`CommandQueue`] - The ordered commands being edited
//! - [`Directive`] / [`UndoTarget`] - Classification of an input line
//!
//! ## Capabilities
//!
//! - [`CommandExecutor`] / [`ShellExecutor`] - Run a command in the shell
//! - [`ScriptStore`] / [`DirScriptStore`] / [`MemoryScriptStore`] - Querscript storage
//!
//! ## Configuration
//!
//! - [`QuerConfig`] - Script directory and extension, honouring `$QUER_SCRIPT_DIR`

mod config;
mod error;
mod executor;
mod parse;
mod queue;
mod session;
mod store;
mod types;

pub use config::{QuerConfig, SCRIPT_DIR_ENV};
pub use error::{ExecError, SessionError, StoreError, UndoError};
pub use executor::{CommandExecutor, ShellExecutor};
pub use parse::{parse_directive, parse_script_name};
pub use queue::{CommandQueue, Undone};
pub use session::{QueueSession, SessionOutcome};
pub use store::{DirScriptStore, MemoryScriptStore, ScriptStore};
pub use types::{Directive, RunMode, UndoTarget};
