//! Streaming IRC message parser
//!
//! Implements a reentrant state machine over the line-oriented IRC message
//! grammar: an optional `:nick!user@host` prefix, a command, space-delimited
//! parameters, and an optional trailing parameter introduced by `:`.
//!
//! The parser handles arbitrary chunk boundaries and fires bound handlers
//! as tokens complete. All mutable state lives in the [`Parser`] value, so
//! one parser per connection is the scale-out unit; nothing is shared.
//!
//! States:
//! - Init: start of a message, nothing buffered
//! - Nick/Name/Host: inside the optional prefix
//! - Command: collecting the command token
//! - Params: between and inside middle parameters
//! - Trailing: inside the trailing parameter
//! - End: terminator seen, end handler firing
//! - Error: sticky fault, waiting for [`Parser::reset`]

use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::error::ParseError;
use crate::event::{Bindings, Event, Status};

/// Hard upper bound on a single message, terminator bytes excluded.
pub const MAX_MESSAGE_LEN: usize = 512;

/// Raw buffer capacity: 512 payload bytes plus one slack byte, the classic
/// 513-byte message window.
const RAW_CAPACITY: usize = MAX_MESSAGE_LEN + 1;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of a message, nothing buffered
    Init,
    /// Inside the nick portion of a prefix
    Nick,
    /// Inside the user portion of a prefix
    Name,
    /// Inside the host portion of a prefix
    Host,
    /// Collecting the command token
    Command,
    /// Between and inside middle parameters
    Params,
    /// Inside the trailing parameter
    Trailing,
    /// Terminator seen, end handler firing
    End,
    /// Sticky fault, waiting for reset
    Error,
}

/// The message parser
///
/// Owns a fixed in-place buffer for the in-progress message and six
/// optional event handlers. Feed it the inbound byte stream with
/// [`advance`](Parser::advance); it fires handlers as tokens complete and
/// silently readies itself for the next message after each one ends.
pub struct Parser<'h> {
    state: State,
    error: Option<ParseError>,
    /// Bytes buffered for the in-progress message
    len: usize,
    /// Start of the token currently being accumulated
    token_start: usize,
    raw: [u8; RAW_CAPACITY],
    bindings: Bindings<'h>,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("len", &self.len)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<'h> Parser<'h> {
    /// Create a parser in its initial state with no handlers bound.
    pub fn new() -> Self {
        Parser {
            state: State::Init,
            error: None,
            len: 0,
            token_start: 0,
            raw: [0; RAW_CAPACITY],
            bindings: Bindings::default(),
        }
    }

    /// Return the parser to its initial state, clearing any latched error
    /// while keeping bound handlers.
    ///
    /// This is the recovery path after a fault: inspect
    /// [`error`](Parser::error), clean up, then `reset` and resume feeding.
    pub fn reset(&mut self) {
        self.state = State::Init;
        self.error = None;
        self.len = 0;
        self.token_start = 0;
    }

    /// Bind `handler` to `event`, replacing any previous binding.
    pub fn bind<F>(&mut self, event: Event, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        *self.bindings.slot(event) = Some(Box::new(handler));
    }

    /// Drop the handler bound to `event`, if any.
    pub fn unbind(&mut self, event: Event) {
        *self.bindings.slot(event) = None;
    }

    /// Bind the handler fired for the nick portion of a message prefix.
    pub fn on_nick<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::Nick, handler);
    }

    /// Bind the handler fired for the user portion of a message prefix.
    pub fn on_name<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::Name, handler);
    }

    /// Bind the handler fired for the host portion of a message prefix.
    pub fn on_host<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::Host, handler);
    }

    /// Bind the handler fired for the command token.
    pub fn on_command<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::Command, handler);
    }

    /// Bind the handler fired once per parameter, the trailing included.
    pub fn on_param<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::Param, handler);
    }

    /// Bind the handler fired when a message completes. The view passed to
    /// it is always empty.
    pub fn on_end<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) -> Status + 'h,
    {
        self.bind(Event::End, handler);
    }

    /// Whether the parser is latched in an error state.
    pub fn has_error(&self) -> bool {
        self.state == State::Error
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<ParseError> {
        self.error
    }

    /// Fixed description of the latched error, or `None` when the parser
    /// is healthy.
    pub fn error_string(&self) -> Option<&'static str> {
        self.error.map(ParseError::as_str)
    }

    /// Feed a chunk of the inbound byte stream through the state machine,
    /// firing handlers as tokens complete.
    ///
    /// Returns the number of bytes consumed. A return value shorter than
    /// `bytes.len()` means a fault was latched; the unconsumed remainder
    /// must not be re-fed — call [`reset`](Parser::reset) first, then
    /// resume with fresh input. A completed message is followed by the next
    /// one within the same call, so one chunk can carry many messages.
    pub fn advance(&mut self, bytes: &[u8]) -> usize {
        if self.state == State::Error {
            return 0;
        }
        for (consumed, &byte) in bytes.iter().enumerate() {
            if !self.consume(byte) {
                return consumed;
            }
        }
        bytes.len()
    }

    /// Drive the state machine with one byte. Returns false when this byte
    /// latched a fault.
    fn consume(&mut self, byte: u8) -> bool {
        if byte == b'\r' || byte == b'\n' {
            return self.terminator();
        }
        if self.len >= MAX_MESSAGE_LEN {
            return self.fail(ParseError::TooLong);
        }
        self.raw[self.len] = byte;
        self.len += 1;
        match self.state {
            State::Init => self.message_start(byte),
            State::Nick => self.nick(byte),
            State::Name => self.name(byte),
            State::Host => self.host(byte),
            State::Command => self.command(byte),
            State::Params => self.params(byte),
            State::Trailing => self.trailing(byte),
            // Not reachable from the byte loop: End never persists between
            // bytes and Error short-circuits in advance().
            State::End | State::Error => self.fail(ParseError::Malformed),
        }
    }

    /// Handle a CR or LF, which is never buffered.
    fn terminator(&mut self) -> bool {
        match self.state {
            // Blank lines and the second half of CRLF land here
            State::Init => true,
            State::Command => {
                if self.token_start == self.len {
                    // Terminator before any command byte
                    return self.fail(ParseError::Malformed);
                }
                self.fire(Event::Command, self.len) && self.end_of_message()
            }
            State::Params => {
                if self.token_start < self.len && !self.fire(Event::Param, self.len) {
                    return false;
                }
                self.end_of_message()
            }
            State::Trailing => self.fire(Event::Param, self.len) && self.end_of_message(),
            // A message cannot end inside its prefix
            State::Nick | State::Name | State::Host => self.fail(ParseError::Malformed),
            State::End | State::Error => self.fail(ParseError::Malformed),
        }
    }

    /// First byte of a message.
    fn message_start(&mut self, byte: u8) -> bool {
        if byte == b':' {
            // The prefix sigil is structural, not part of the nick
            self.state = State::Nick;
            self.token_start = self.len;
            true
        } else {
            self.state = State::Command;
            self.command(byte)
        }
    }

    fn nick(&mut self, byte: u8) -> bool {
        match byte {
            b'!' => {
                self.state = State::Name;
                self.fire(Event::Nick, self.len - 1)
            }
            b'@' => {
                self.state = State::Host;
                self.fire(Event::Nick, self.len - 1)
            }
            b' ' => {
                self.state = State::Command;
                self.fire(Event::Nick, self.len - 1)
            }
            _ if byte.is_ascii_control() => self.fail(ParseError::Malformed),
            _ => true,
        }
    }

    fn name(&mut self, byte: u8) -> bool {
        match byte {
            b'@' => {
                self.state = State::Host;
                self.fire(Event::Name, self.len - 1)
            }
            b' ' => {
                self.state = State::Command;
                self.fire(Event::Name, self.len - 1)
            }
            _ if byte.is_ascii_control() => self.fail(ParseError::Malformed),
            _ => true,
        }
    }

    fn host(&mut self, byte: u8) -> bool {
        match byte {
            b' ' => {
                self.state = State::Command;
                self.fire(Event::Host, self.len - 1)
            }
            _ if byte.is_ascii_control() => self.fail(ParseError::Malformed),
            _ => true,
        }
    }

    fn command(&mut self, byte: u8) -> bool {
        match byte {
            b' ' if self.token_start == self.len - 1 => {
                // Leading space, not part of the command token
                self.token_start = self.len;
                true
            }
            b' ' => {
                self.state = State::Params;
                self.fire(Event::Command, self.len - 1)
            }
            _ if byte.is_ascii_alphanumeric() => true,
            _ => self.fail(ParseError::Malformed),
        }
    }

    fn params(&mut self, byte: u8) -> bool {
        match byte {
            b':' if self.token_start == self.len - 1 => {
                // Trailing sigil, not part of the parameter
                self.state = State::Trailing;
                self.token_start = self.len;
                true
            }
            b' ' if self.token_start == self.len - 1 => {
                // Redundant separator
                self.token_start = self.len;
                true
            }
            b' ' => self.fire(Event::Param, self.len - 1),
            _ if byte.is_ascii_control() => self.fail(ParseError::Malformed),
            _ => true,
        }
    }

    fn trailing(&mut self, byte: u8) -> bool {
        // Trailing content is free-form; only NUL can never appear
        if byte == 0 {
            return self.fail(ParseError::Malformed);
        }
        true
    }

    /// Fire `event` with the token spanning `token_start..end`, then move
    /// the token boundary past whatever has been buffered so far.
    fn fire(&mut self, event: Event, end: usize) -> bool {
        let start = mem::replace(&mut self.token_start, self.len);
        trace!("{event:?} token, {} bytes", end - start);
        let view = &self.raw[start..end];
        let status = match self.bindings.slot(event).as_mut() {
            Some(handler) => handler(view),
            None => Status::Continue,
        };
        match status {
            Status::Continue => true,
            Status::Abort => self.fail(ParseError::Aborted),
        }
    }

    /// Fire the end handler and ready the parser for the next message.
    fn end_of_message(&mut self) -> bool {
        self.state = State::End;
        let status = match self.bindings.slot(Event::End).as_mut() {
            Some(handler) => handler(&[]),
            None => Status::Continue,
        };
        if status == Status::Abort {
            return self.fail(ParseError::Aborted);
        }
        trace!("message complete, {} bytes buffered", self.len);
        self.len = 0;
        self.token_start = 0;
        self.state = State::Init;
        true
    }

    fn fail(&mut self, error: ParseError) -> bool {
        debug!("fault after {} buffered bytes: {error}", self.len);
        self.state = State::Error;
        self.error = Some(error);
        false
    }
}
