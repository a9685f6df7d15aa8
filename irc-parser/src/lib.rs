//! Streaming IRC message parser
//!
//! This crate parses the line-oriented IRC wire grammar — optional
//! `:nick!user@host` prefix, command, space-delimited parameters, trailing
//! parameter — from a raw byte stream into handler callbacks.
//!
//! The parser is:
//! - Streaming: consumes chunks of any size at any boundary
//! - Reentrant: all state lives in one [`Parser`] value, typically one per
//!   connection
//! - Callback-driven: tokens are handed to bound handlers as borrowed views
//!   into the internal buffer, with no per-message allocation
//! - Bounded: a message longer than 512 bytes latches a sticky error
//!
//! The parser owns no transport: something else reads the socket and feeds
//! bytes in, and something else decides what the commands mean.

pub mod error;
pub mod event;
pub mod parser;

pub use error::ParseError;
pub use event::{Event, Handler, Status};
pub use parser::{Parser, MAX_MESSAGE_LEN};
