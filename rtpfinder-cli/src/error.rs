//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the terminal user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Finder(#[from] rtpfinder::FinderError),

    #[error("{0}")]
    Table(#[from] rtpfinder::TableError),

    #[error("{0}")]
    Usage(String),

    /// The requested asset does not exist. Carries no message; the command
    /// has already printed what it wanted to say.
    #[error("not found")]
    NotFound,
}
