//! Core data types for the quer session.

use std::fmt;

/// How a queue session treats its input and where the queue is flushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Queue commands interactively, then execute them.
    #[default]
    Run,
    /// Queue commands interactively, then save them to a querscript.
    Record,
    /// Read commands from a querscript, then execute them.
    Play,
}

impl RunMode {
    /// Returns true if the mode reads its commands from a script file.
    #[must_use]
    pub const fn reads_script(&self) -> bool {
        matches!(self, Self::Play)
    }

    /// Returns true if the mode needs a script name.
    #[must_use]
    pub const fn needs_script(&self) -> bool {
        matches!(self, Self::Record | Self::Play)
    }

    /// Returns true if flushing executes the queue rather than saving it.
    #[must_use]
    pub const fn executes(&self) -> bool {
        matches!(self, Self::Run | Self::Play)
    }

    /// Title shown in the session header.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Run => "Quer",
            Self::Record => "Quer (Record Mode)",
            Self::Play => "Quer (Playback Mode)",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Run => "run",
            Self::Record => "record",
            Self::Play => "play",
        };
        f.write_str(name)
    }
}

/// What an `undo` directive asks to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoTarget {
    /// Bare `undo`: the most recently queued command.
    Last,
    /// `undo <n>`: the command at 1-based position `n`, as typed.
    ///
    /// Zero and negative values are kept so they can be reported as out of
    /// range rather than malformed.
    Position(i64),
    /// `undo all`: every queued command.
    All,
    /// `undo <arg>` where `arg` is neither a number nor `all`.
    Invalid(String),
}

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Stop reading and flush the queue.
    Done,
    /// Stop immediately and discard the queue.
    Quit,
    /// Print the current queue.
    Show,
    /// Remove one or more queued commands.
    Undo(UndoTarget),
    /// Any other line: a command to queue verbatim.
    Queue(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_default_is_run() {
        assert_eq!(RunMode::default(), RunMode::Run);
    }

    #[test]
    fn only_play_reads_a_script() {
        assert!(!RunMode::Run.reads_script());
        assert!(!RunMode::Record.reads_script());
        assert!(RunMode::Play.reads_script());
    }

    #[test]
    fn record_and_play_need_a_script() {
        assert!(!RunMode::Run.needs_script());
        assert!(RunMode::Record.needs_script());
        assert!(RunMode::Play.needs_script());
    }

    #[test]
    fn record_is_the_only_mode_that_does_not_execute() {
        assert!(RunMode::Run.executes());
        assert!(!RunMode::Record.executes());
        assert!(RunMode::Play.executes());
    }

    #[test]
    fn run_mode_displays_lowercase() {
        assert_eq!(RunMode::Record.to_string(), "record");
        assert_eq!(RunMode::Play.to_string(), "play");
    }
}
