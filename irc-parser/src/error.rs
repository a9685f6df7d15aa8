//! Error types for the parser.

use thiserror::Error;

/// Faults the parser can latch.
///
/// Once latched, the parser consumes nothing further until
/// [`reset`](crate::Parser::reset).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A byte appeared where the message grammar forbids it.
    #[error("byte not allowed by the message grammar")]
    Malformed,

    /// The 512-byte message bound was exceeded before a terminator.
    #[error("message longer than 512 bytes")]
    TooLong,

    /// A bound handler answered [`Status::Abort`](crate::Status::Abort).
    #[error("aborted by event handler")]
    Aborted,
}

impl ParseError {
    /// Fixed description, identical to the `Display` rendering.
    pub const fn as_str(self) -> &'static str {
        match self {
            ParseError::Malformed => "byte not allowed by the message grammar",
            ParseError::TooLong => "message longer than 512 bytes",
            ParseError::Aborted => "aborted by event handler",
        }
    }
}
