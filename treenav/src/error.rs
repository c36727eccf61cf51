use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = NavError> = std::result::Result<T, E>;

/// Recoverable failures reported back to the user by verb handlers.
///
/// None of these end the session. Every variant leaves the navigation state
/// and the open container untouched.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("please open a file")]
    NoFileOpen,

    #[error("invalid number of arguments")]
    InvalidArgumentCount,

    #[error("unknown label")]
    UnknownLabel(String),

    #[error("can only cd into groups")]
    NotAGroup(String),

    #[error("can only read datasets")]
    NotADataset(String),

    #[error("previous position no longer exists")]
    StaleHistory(String),

    #[error("interrupted")]
    Interrupted,

    #[error("Can't access file {}", .0.display())]
    CannotAccess(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Failures of the command layer: verb lookup plus any verb error.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown syntax: {0}")]
    UnknownSyntax(String),

    #[error("{0} is a shortcut to several commands\nPlease give more characters for disambiguation")]
    Ambiguous(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Nav(#[from] NavError),
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Nav(NavError::Io(err))
    }
}
