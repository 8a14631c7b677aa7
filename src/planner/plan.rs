//! Command plan types.
//!
//! A plan is the ordered command list produced for one resource and mode,
//! with block-enter lines and literal `exit`s interleaved.

use serde::Serialize;

use crate::config::Mode;
use crate::resources::ResourceKind;

/// Prompt text of a confirmation-requiring command.
pub const CONFIRM_PROMPT: &str = "yes/no";

/// Answer sent to a confirmation prompt.
pub const CONFIRM_ANSWER: &str = "yes";

/// Literal block terminator.
pub const EXIT: &str = "exit";

/// A single device command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Plain command line.
    Plain(String),
    /// Command that provokes an interactive confirmation.
    Prompted {
        /// Command line.
        command: String,
        /// Expected prompt.
        prompt: String,
        /// Answer to give.
        answer: String,
    },
}

impl Command {
    /// Creates a plain command.
    #[must_use]
    pub fn plain(line: impl Into<String>) -> Self {
        Self::Plain(line.into())
    }

    /// Creates a command answered with `yes` at a `yes/no` prompt.
    #[must_use]
    pub fn prompted(line: impl Into<String>) -> Self {
        Self::Prompted {
            command: line.into(),
            prompt: String::from(CONFIRM_PROMPT),
            answer: String::from(CONFIRM_ANSWER),
        }
    }

    /// Creates the block terminator.
    #[must_use]
    pub fn exit() -> Self {
        Self::Plain(String::from(EXIT))
    }

    /// Returns the command line.
    #[must_use]
    pub fn line(&self) -> &str {
        match self {
            Self::Plain(line) | Self::Prompted { command: line, .. } => line,
        }
    }

    /// Returns true for negated commands.
    #[must_use]
    pub fn is_negation(&self) -> bool {
        self.line().starts_with("no ")
    }

    /// Returns true for commands that need a confirmation.
    #[must_use]
    pub const fn is_prompted(&self) -> bool {
        matches!(self, Self::Prompted { .. })
    }

    /// Returns true for the block terminator.
    #[must_use]
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Plain(line) if line == EXIT)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(line) => write!(f, "{line}"),
            Self::Prompted {
                command,
                prompt,
                answer,
            } => write!(f, "{command} [{prompt}: {answer}]"),
        }
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Self::plain(line)
    }
}

/// Commands produced for one resource and mode.
#[derive(Debug, Clone, Serialize)]
pub struct CommandPlan {
    /// Resource the commands apply to.
    pub resource: ResourceKind,
    /// Mode that produced them.
    pub mode: Mode,
    /// Commands in device order.
    pub commands: Vec<Command>,
}

impl CommandPlan {
    /// Creates a plan.
    #[must_use]
    pub const fn new(resource: ResourceKind, mode: Mode, commands: Vec<Command>) -> Self {
        Self {
            resource,
            mode,
            commands,
        }
    }

    /// Returns true if the plan is empty (no changes).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true when applying the plan would change the device.
    #[must_use]
    pub fn changes_device(&self) -> bool {
        self.mode != Mode::Rendered && !self.commands.is_empty()
    }

    /// Returns the number of negated commands.
    #[must_use]
    pub fn negation_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_negation()).count()
    }

    /// Returns the number of commands that need a confirmation.
    #[must_use]
    pub fn prompted_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_prompted()).count()
    }

    /// Returns the command lines.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.commands.iter().map(Command::line).collect()
    }
}

impl std::fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.commands.is_empty() {
            return write!(f, "No changes required");
        }

        writeln!(
            f,
            "{} {} ({} commands):",
            self.resource,
            self.mode,
            self.commands.len()
        )?;
        for command in &self.commands {
            writeln!(f, "  {command}")?;
        }
        Ok(())
    }
}
