#![no_main]

use libfuzzer_sys::fuzz_target;
use irc_parser::{Event, Parser, Status, MAX_MESSAGE_LEN};

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();

    // Handler views must never exceed the message bound
    for event in [
        Event::Nick,
        Event::Name,
        Event::Host,
        Event::Command,
        Event::Param,
        Event::End,
    ] {
        parser.bind(event, |bytes: &[u8]| {
            assert!(bytes.len() <= MAX_MESSAGE_LEN);
            Status::Continue
        });
    }

    // Feeding arbitrary bytes must never panic
    let used = parser.advance(data);
    assert!(used <= data.len());

    if used < data.len() {
        // A short consume always comes with a latched, queryable error
        assert!(parser.has_error());
        assert!(parser.error().is_some());
        assert!(parser.error_string().is_some());

        // The error is sticky until reset
        assert_eq!(parser.advance(&data[used..]), 0);
        parser.reset();
        assert!(!parser.has_error());
        let _ = parser.advance(&data[used..]);
    } else {
        assert!(!parser.has_error());
    }
});
