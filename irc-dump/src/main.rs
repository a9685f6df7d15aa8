//! Decode a raw IRC byte stream into human-readable messages.
//!
//! Reads bytes from a file or stdin, feeds them through the parser in
//! fixed-size chunks to exercise the streaming path, and prints one line
//! per decoded message as text or JSON. On a parse error the tool logs the
//! fault, resets the parser, and resyncs to the next line.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use irc_parser::Status;

#[derive(Parser)]
#[command(name = "irc-dump", about = "Decode a raw IRC byte stream into messages")]
struct Args {
    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Print one JSON object per message instead of text
    #[arg(long)]
    json: bool,

    /// Chunk size used to feed the parser
    #[arg(long, default_value_t = 4096)]
    chunk: usize,
}

/// One decoded message, accumulated across handler calls.
#[derive(Debug, Default, Clone, Serialize)]
struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    nick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    command: String,
    params: Vec<String>,
}

impl Record {
    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(nick) = &self.nick {
            out.push_str(nick);
            if let Some(user) = &self.user {
                out.push('!');
                out.push_str(user);
            }
            if let Some(host) = &self.host {
                out.push('@');
                out.push_str(host);
            }
            out.push_str(" -> ");
        }
        out.push_str(&self.command);
        for param in &self.params {
            out.push(' ');
            if param.is_empty() || param.contains(' ') {
                out.push('"');
                out.push_str(param);
                out.push('"');
            } else {
                out.push_str(param);
            }
        }
        out
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.chunk == 0 {
        error!("--chunk must be at least 1");
        return ExitCode::FAILURE;
    }

    let data = match read_input(args.file.as_deref()) {
        Ok(data) => data,
        Err(err) => {
            error!("reading input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let current = Rc::new(RefCell::new(Record::default()));
    let messages = Rc::new(RefCell::new(0u64));

    let mut parser = irc_parser::Parser::new();
    {
        let rec = Rc::clone(&current);
        parser.on_nick(move |bytes| {
            rec.borrow_mut().nick = Some(lossy(bytes));
            Status::Continue
        });
    }
    {
        let rec = Rc::clone(&current);
        parser.on_name(move |bytes| {
            rec.borrow_mut().user = Some(lossy(bytes));
            Status::Continue
        });
    }
    {
        let rec = Rc::clone(&current);
        parser.on_host(move |bytes| {
            rec.borrow_mut().host = Some(lossy(bytes));
            Status::Continue
        });
    }
    {
        let rec = Rc::clone(&current);
        parser.on_command(move |bytes| {
            rec.borrow_mut().command = lossy(bytes);
            Status::Continue
        });
    }
    {
        let rec = Rc::clone(&current);
        parser.on_param(move |bytes| {
            rec.borrow_mut().params.push(lossy(bytes));
            Status::Continue
        });
    }
    {
        let rec = Rc::clone(&current);
        let messages = Rc::clone(&messages);
        let json = args.json;
        parser.on_end(move |_| {
            let record = std::mem::take(&mut *rec.borrow_mut());
            if json {
                match serde_json::to_string(&record) {
                    Ok(line) => println!("{line}"),
                    Err(err) => error!("serializing message: {err}"),
                }
            } else {
                println!("{}", record.render());
            }
            *messages.borrow_mut() += 1;
            Status::Continue
        });
    }

    let mut errors = 0u64;
    let mut offset = 0;
    while offset < data.len() {
        let end = usize::min(offset + args.chunk, data.len());
        let chunk = &data[offset..end];
        let used = parser.advance(chunk);
        offset += used;
        if used < chunk.len() {
            if let Some(reason) = parser.error_string() {
                error!("parse error at byte {offset}: {reason}");
            }
            errors += 1;
            parser.reset();
            *current.borrow_mut() = Record::default();
            // Resync: drop everything up to and including the next LF
            match data[offset..].iter().position(|&b| b == b'\n') {
                Some(skip) => offset += skip + 1,
                None => break,
            }
        }
    }

    info!(
        "{} messages, {} errors, {} bytes",
        messages.borrow(),
        errors,
        data.len()
    );
    ExitCode::SUCCESS
}
