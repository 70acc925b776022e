//! The interactive queue session.
//!
//! A [`QueueSession`] reads lines one at a time, treats `done`, `quit`,
//! `show` and `undo ...` as directives and queues everything else. When the
//! input ends (or `done` arrives) the queue is flushed: saved to a querscript
//! in [`RunMode::Record`], executed in [`RunMode::Run`] and
//! [`RunMode::Play`]. `quit` ends the session without flushing.
//!
//! ## Examples
//!
//! ```
//! use quer_lib::{CommandExecutor, ExecError, MemoryScriptStore, QueueSession, RunMode, SessionOutcome};
//!
//! #[derive(Default)]
//! struct Recorder(Vec<String>);
//!
//! impl CommandExecutor for Recorder {
//!     fn execute(&mut self, command: &str) -> Result<(), ExecError> {
//!         self.0.push(command.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let store = MemoryScriptStore::new();
//! let mut executor = Recorder::default();
//! let mut transcript = Vec::new();
//!
//! let input = "echo a\necho b\nundo\necho c\ndone\n".as_bytes();
//! let outcome = QueueSession::new(RunMode::Run, &store, &mut executor, &mut transcript)
//!     .run(input)
//!     .unwrap();
//!
//! assert!(matches!(outcome, SessionOutcome::Executed { commands: 2, .. }));
//! assert_eq!(executor.0, vec!["echo a", "echo c"]);
//! ```

use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::{Local, TimeDelta};
use tracing::{debug, info, warn};

use crate::error::{SessionError, UndoError};
use crate::executor::CommandExecutor;
use crate::parse::parse_directive;
use crate::queue::{CommandQueue, Undone};
use crate::store::ScriptStore;
use crate::types::{Directive, RunMode, UndoTarget};

const BANNER_WIDTH: usize = 40;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The queue was saved to a querscript.
    Recorded {
        /// Where the script was written.
        path: PathBuf,
        /// How many commands were saved.
        commands: usize,
    },
    /// The queue was handed to the executor.
    Executed {
        /// How many commands were queued.
        commands: usize,
        /// How many of those could not be started.
        failed_to_start: usize,
        /// Wall-clock time spent executing.
        elapsed: TimeDelta,
    },
    /// The user quit; nothing was saved or executed.
    Quit {
        /// How many queued commands were thrown away.
        discarded: usize,
    },
}

/// Why the input loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopEnd {
    Flush,
    Quit,
}

/// One run of the queue editor.
///
/// The session borrows its script store and executor so callers keep
/// ownership of both, and writes its transcript (prompts, echoes, banners,
/// diagnostics) to `out`.
pub struct QueueSession<'a, S: ?Sized, E: ?Sized, W> {
    mode: RunMode,
    script: Option<String>,
    store: &'a S,
    executor: &'a mut E,
    out: W,
    queue: CommandQueue,
    sequence: usize,
}

impl<'a, S, E, W> QueueSession<'a, S, E, W>
where
    S: ScriptStore + ?Sized,
    E: CommandExecutor + ?Sized,
    W: Write,
{
    /// Creates a session in `mode`.
    ///
    /// Record and playback sessions also need [`with_script`](Self::with_script).
    #[must_use]
    pub fn new(mode: RunMode, store: &'a S, executor: &'a mut E, out: W) -> Self {
        Self {
            mode,
            script: None,
            store,
            executor,
            out,
            queue: CommandQueue::new(),
            sequence: 1,
        }
    }

    /// Names the querscript to record to or play from.
    #[must_use]
    pub fn with_script(mut self, name: impl Into<String>) -> Self {
        self.script = Some(name.into());
        self
    }

    /// Runs the session to completion.
    ///
    /// `interactive` is the line source for run and record sessions; playback
    /// sessions read the named script instead and ignore it.
    ///
    /// ## Errors
    ///
    /// - [`SessionError::MissingScript`] if record/play has no script name
    /// - [`SessionError::AlreadyExists`] if the script to record exists
    /// - [`SessionError::DoesNotExist`] if the script to play is missing
    /// - [`SessionError::CouldNotRead`] if the script to play cannot be opened
    /// - [`SessionError::Read`] if reading input fails mid-session
    /// - [`SessionError::Write`] if the recorded script cannot be saved
    /// - [`SessionError::Output`] if the transcript cannot be written
    #[tracing::instrument(skip_all, fields(mode = %self.mode, script = ?self.script))]
    pub fn run<R: BufRead>(mut self, interactive: R) -> Result<SessionOutcome, SessionError> {
        let script = self.check_preconditions()?;
        self.print_header()?;

        let end = match (self.mode, script.as_deref()) {
            (RunMode::Play, Some(name)) => {
                let source = self
                    .store
                    .open(name)
                    .map_err(|source| SessionError::CouldNotRead {
                        name: name.to_string(),
                        source,
                    })?;
                self.read_loop(source)?
            }
            _ => self.read_loop(interactive)?,
        };

        match end {
            LoopEnd::Quit => {
                let discarded = self.queue.len();
                info!(discarded, "session quit without flushing");
                self.out.flush()?;
                Ok(SessionOutcome::Quit { discarded })
            }
            LoopEnd::Flush => self.flush(script.as_deref()),
        }
    }

    fn check_preconditions(&self) -> Result<Option<String>, SessionError> {
        if !self.mode.needs_script() {
            return Ok(None);
        }

        let name = self
            .script
            .clone()
            .ok_or(SessionError::MissingScript { mode: self.mode })?;
        let exists = self.store.exists(&name);

        match self.mode {
            RunMode::Record if exists => Err(SessionError::AlreadyExists { name }),
            RunMode::Play if !exists => Err(SessionError::DoesNotExist { name }),
            _ => Ok(Some(name)),
        }
    }

    fn print_header(&mut self) -> Result<(), SessionError> {
        writeln!(self.out, "{}", banner(self.mode.title()))?;

        if !self.mode.reads_script() {
            for line in [
                "Queue some commands.",
                "",
                "> done  - Starts the queue.",
                "> quit  - Cancels the queue.",
                "> undo  - Removes the last command.",
                "> show  - Lists queued commands.",
                "(Use 'quer --help' for more.)",
            ] {
                writeln!(self.out, "| {line:<width$} |", width = BANNER_WIDTH - 2)?;
            }
            writeln!(self.out, "+{}+", "-".repeat(BANNER_WIDTH))?;
        }

        Ok(())
    }

    fn read_loop<R: BufRead>(&mut self, mut source: R) -> Result<LoopEnd, SessionError> {
        let echo = self.mode.reads_script();
        let mut buffer = Vec::new();

        loop {
            if !echo {
                write!(self.out, "{}. ", self.sequence)?;
                self.out.flush()?;
            }

            buffer.clear();
            let read = source
                .read_until(b'\n', &mut buffer)
                .map_err(SessionError::Read)?;
            if read == 0 {
                debug!(sequence = self.sequence, "end of input");
                if !echo {
                    writeln!(self.out)?;
                }
                return Ok(LoopEnd::Flush);
            }

            let line = decode_line(&buffer);
            if echo {
                writeln!(self.out, "{}. {line}", self.sequence)?;
            }
            self.sequence += 1;

            let directive = parse_directive(&line);
            debug!(?directive, "classified input line");

            match directive {
                Directive::Done => return Ok(LoopEnd::Flush),
                Directive::Quit => return Ok(LoopEnd::Quit),
                Directive::Show => self.show()?,
                Directive::Undo(target) => self.undo(&target)?,
                Directive::Queue(command) => self.queue.push(command),
            }
        }
    }

    fn show(&mut self) -> Result<(), SessionError> {
        if self.queue.is_empty() {
            writeln!(self.out, "(The queue is empty.)")?;
            return Ok(());
        }

        writeln!(self.out, "Queued commands:")?;
        for (position, command) in self.queue.numbered() {
            writeln!(self.out, "{position}. {command}")?;
        }
        Ok(())
    }

    fn undo(&mut self, target: &UndoTarget) -> Result<(), SessionError> {
        match self.queue.undo(target) {
            Ok(Undone::Removed { position, command }) => {
                writeln!(self.out, "(Command {position}. {command} will not be performed.)")?;
            }
            Ok(Undone::Cleared { count }) => {
                writeln!(self.out, "(All {count} queued commands have been erased.)")?;
            }
            Err(UndoError::Empty) => {
                writeln!(self.out, "(Nothing to undo. Queue some commands first.)")?;
            }
            Err(UndoError::OutOfRange { len, .. }) => {
                writeln!(self.out, "(Enter a number between 1 and {len}.)")?;
            }
            Err(UndoError::InvalidArgument(_)) => {
                writeln!(
                    self.out,
                    "(Expected 'undo', 'undo <number>' or 'undo all'.)"
                )?;
            }
        }
        Ok(())
    }

    fn flush(mut self, script: Option<&str>) -> Result<SessionOutcome, SessionError> {
        let commands = self.queue.len();

        let outcome = if self.mode.executes() {
            self.execute_queue()?
        } else {
            let name = script.ok_or(SessionError::MissingScript { mode: self.mode })?;
            writeln!(self.out, "{}", banner("Recording"))?;
            let path = self
                .store
                .write(name, self.queue.as_slice())
                .map_err(|source| SessionError::Write {
                    name: name.to_string(),
                    source,
                })?;
            info!(path = %path.display(), commands, "recorded quer script");
            SessionOutcome::Recorded { path, commands }
        };

        writeln!(self.out, "{}", banner("Done"))?;
        if let SessionOutcome::Executed { elapsed, .. } = &outcome {
            let plural = if commands == 1 { "" } else { "s" };
            writeln!(
                self.out,
                "(Ran {commands} command{plural} in {:.2}s)",
                elapsed.num_milliseconds() as f64 / 1000.0
            )?;
        }
        self.out.flush()?;

        Ok(outcome)
    }

    fn execute_queue(&mut self) -> Result<SessionOutcome, SessionError> {
        writeln!(self.out, "{}", banner("Executing"))?;
        self.out.flush()?;

        let queued = std::mem::take(&mut self.queue).into_commands();
        let commands = queued.len();
        let started = Local::now();
        let mut failed_to_start = 0;
        for command in &queued {
            if let Err(err) = self.executor.execute(command) {
                warn!(%err, "command could not be started");
                writeln!(self.out, "(Could not start '{command}': {err})")?;
                failed_to_start += 1;
            }
            self.out.flush()?;
        }
        let elapsed = Local::now() - started;

        info!(commands, failed_to_start, elapsed_ms = elapsed.num_milliseconds(), "executed queue");
        Ok(SessionOutcome::Executed {
            commands,
            failed_to_start,
            elapsed,
        })
    }
}

/// Strips the line ending and decodes the rest, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }

    let line = String::from_utf8_lossy(&raw[..end]);
    if let Cow::Owned(_) = line {
        warn!("input line was not valid UTF-8; invalid bytes replaced");
    }
    line
}

/// Centers ` title ` in a dashed box edge.
fn banner(title: &str) -> String {
    format!("+{:-^width$}+", format!(" {title} "), width = BANNER_WIDTH)
}
