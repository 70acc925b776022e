//! The in-memory command queue edited during a session.

use crate::error::UndoError;
use crate::types::UndoTarget;

/// Result of a successful `undo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undone {
    /// A single command was removed.
    Removed {
        /// The 1-based position the command occupied.
        position: usize,
        /// The removed command.
        command: String,
    },
    /// The whole queue was cleared.
    Cleared {
        /// How many commands were erased.
        count: usize,
    },
}

/// Ordered commands waiting to be recorded or executed.
///
/// Insertion order is execution order. A failed [`undo`](CommandQueue::undo)
/// never changes the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    commands: Vec<String>,
}

impl CommandQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command to the end of the queue.
    pub fn push(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    /// Returns the number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates over the queued commands in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    /// Iterates over `(position, command)` pairs with 1-based positions.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.iter().enumerate().map(|(index, command)| (index + 1, command))
    }

    /// Returns the queued commands as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.commands
    }

    /// Consumes the queue, returning its commands.
    #[must_use]
    pub fn into_commands(self) -> Vec<String> {
        self.commands
    }

    /// Removes commands according to `target`.
    ///
    /// ## Errors
    ///
    /// - [`UndoError::Empty`] if nothing is queued, whatever the target
    /// - [`UndoError::OutOfRange`] if a position is outside `1..=len`
    /// - [`UndoError::InvalidArgument`] if the argument was malformed
    ///
    /// ## Examples
    ///
    /// ```
    /// use quer_lib::{CommandQueue, UndoTarget, Undone};
    ///
    /// let mut queue = CommandQueue::new();
    /// queue.push("a");
    /// queue.push("b");
    /// queue.push("c");
    ///
    /// let undone = queue.undo(&UndoTarget::Position(2)).unwrap();
    /// assert_eq!(undone, Undone::Removed { position: 2, command: "b".to_string() });
    /// assert_eq!(queue.as_slice(), ["a", "c"]);
    /// ```
    pub fn undo(&mut self, target: &UndoTarget) -> Result<Undone, UndoError> {
        if self.commands.is_empty() {
            return Err(UndoError::Empty);
        }

        match target {
            UndoTarget::Last => {
                let position = self.commands.len();
                let command = self.commands.remove(position - 1);
                Ok(Undone::Removed { position, command })
            }
            UndoTarget::Position(requested) => {
                let position = usize::try_from(*requested)
                    .ok()
                    .filter(|position| (1..=self.commands.len()).contains(position))
                    .ok_or(UndoError::OutOfRange {
                        position: *requested,
                        len: self.commands.len(),
                    })?;
                let command = self.commands.remove(position - 1);
                Ok(Undone::Removed { position, command })
            }
            UndoTarget::All => {
                let count = self.commands.len();
                self.commands.clear();
                Ok(Undone::Cleared { count })
            }
            UndoTarget::Invalid(argument) => Err(UndoError::InvalidArgument(argument.clone())),
        }
    }
}
