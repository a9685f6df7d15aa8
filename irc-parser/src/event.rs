//! Parser events and the handler plumbing around them.
//!
//! The parser reports progress through six event kinds, each with at most
//! one bound handler. A handler receives a borrowed view into the parser's
//! internal buffer and answers with a [`Status`]: keep parsing, or abort
//! the current message.

/// The token kinds a parser reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Nick portion of a message prefix
    Nick,
    /// User portion of a message prefix
    Name,
    /// Host portion of a message prefix
    Host,
    /// The command token
    Command,
    /// One parameter: fired per middle parameter and once for the trailing
    Param,
    /// Message complete; the view is always empty
    End,
}

/// Verdict returned by an event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Keep parsing
    Continue,
    /// Latch a user abort and stop consuming input
    Abort,
}

/// A bound event handler.
///
/// The `&[u8]` view aliases the parser's internal buffer and is only valid
/// for the duration of the call; handlers that need the bytes later must
/// copy them out.
pub type Handler<'h> = Box<dyn FnMut(&[u8]) -> Status + 'h>;

/// One optional handler slot per event kind. Rebinding overwrites.
#[derive(Default)]
pub(crate) struct Bindings<'h> {
    pub(crate) nick: Option<Handler<'h>>,
    pub(crate) name: Option<Handler<'h>>,
    pub(crate) host: Option<Handler<'h>>,
    pub(crate) command: Option<Handler<'h>>,
    pub(crate) param: Option<Handler<'h>>,
    pub(crate) end: Option<Handler<'h>>,
}

impl<'h> Bindings<'h> {
    pub(crate) fn slot(&mut self, event: Event) -> &mut Option<Handler<'h>> {
        match event {
            Event::Nick => &mut self.nick,
            Event::Name => &mut self.name,
            Event::Host => &mut self.host,
            Event::Command => &mut self.command,
            Event::Param => &mut self.param,
            Event::End => &mut self.end,
        }
    }
}
