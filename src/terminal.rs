//! The real clock, keyboard and screen behind the countdown traits.

use std::io::{self, Read, Stdout, Write};
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Local};
use rustyline::DefaultEditor;
use termion::raw::{IntoRawMode, RawTerminal};
use termion::{clear, AsyncReader};

use crate::countdown::{LineInput, Printer, TimeSource, RESTART_ALL};

const CTRL_C: u8 = 0x03;
const CTRL_R: u8 = 0x12;
const BACKSPACE: u8 = 0x7f;

pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&mut self, duration: StdDuration) {
        thread::sleep(duration);
    }
}

/// Reads raw-mode key bytes from `keys` until a line is complete or no more
/// bytes are waiting. Enter arrives as '\r'; Ctrl-R and Ctrl-C arrive as plain
/// bytes and complete at once, dropping whatever was half typed. Printable keys
/// are kept in `pending` between calls.
pub fn decode_keys(keys: &mut impl Read, pending: &mut String) -> Option<String> {
    let mut byte = [0u8; 1];
    while let Ok(1) = keys.read(&mut byte) {
        match byte[0] {
            b'\r' | b'\n' => return Some(std::mem::take(pending)),
            CTRL_R => {
                pending.clear();
                return Some(RESTART_ALL.to_owned());
            }
            CTRL_C => {
                pending.clear();
                return Some("q".to_owned());
            }
            BACKSPACE => {
                pending.pop();
            }
            b if b.is_ascii_graphic() || b == b' ' => pending.push(b as char),
            _ => {}
        }
    }
    None
}

/// Blocking reads go through the line editor. Polling switches to termion's
/// background stdin reader, which is only started on the first poll so the
/// two never compete for input.
pub struct TerminalInput {
    editor: DefaultEditor,
    keys: Option<AsyncReader>,
    pending: String,
}

impl TerminalInput {
    pub fn new() -> rustyline::Result<TerminalInput> {
        Ok(TerminalInput {
            editor: DefaultEditor::new()?,
            keys: None,
            pending: String::new(),
        })
    }
}

impl LineInput for TerminalInput {
    fn read_line(&mut self) -> Option<String> {
        self.editor.readline("").ok()
    }

    fn poll_line(&mut self) -> Option<String> {
        let keys = self.keys.get_or_insert_with(termion::async_stdin);
        decode_keys(keys, &mut self.pending)
    }

    fn pending(&self) -> &str {
        &self.pending
    }
}

/// Raw-mode stdout. Lines end in "\r\n" because raw mode does not translate
/// newlines; the terminal is restored when this is dropped.
pub struct TerminalPrinter {
    out: RawTerminal<Stdout>,
}

impl TerminalPrinter {
    pub fn new() -> io::Result<TerminalPrinter> {
        Ok(TerminalPrinter {
            out: io::stdout().into_raw_mode()?,
        })
    }
}

impl Printer for TerminalPrinter {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        write!(self.out, "{}\r\n", line)?;
        self.out.flush()
    }

    fn write_status(&mut self, status: &str) -> io::Result<()> {
        write!(self.out, "\r{}{}", clear::CurrentLine, status)?;
        self.out.flush()
    }

    fn clear_status(&mut self) -> io::Result<()> {
        write!(self.out, "\r{}", clear::CurrentLine)?;
        self.out.flush()
    }
}
