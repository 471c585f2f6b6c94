//! Console adapter errors.

use thiserror::Error;

/// Errors raised by the console adapter.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// `@actor` prefix is not a numeric id.
    #[error("invalid actor id: {0}")]
    InvalidActor(String),

    /// Media line without a file handle.
    #[error("usage: {kind} <file id> [caption]")]
    MissingPayload {
        /// Media keyword that was typed
        kind: &'static str,
    },

    /// Reading input or writing replies failed.
    #[error("console i/o error: {0}")]
    Io(#[from] std::io::Error),
}
