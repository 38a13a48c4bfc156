//! Crossterm terminal adapter.
//!
//! Puts the terminal in raw mode so single keypresses arrive without Enter,
//! and restores it on drop. Raw mode disables output post-processing, so
//! `\n` is expanded to `\r\n` on the way out.

use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{debug, info};

use super::ConsoleIo;

/// Ctrl+C arrives as this byte so the engine can treat it like any key.
const ETX: char = '\x03';

pub struct TerminalIo {
    out: Stdout,
    _guard: RawModeGuard,
}

struct RawModeGuard;

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        info!("Terminal raw mode enabled");
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl TerminalIo {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            out: stdout(),
            _guard: RawModeGuard::new()?,
        })
    }
}

/// Map a terminal event to the single character the console works with.
fn key_from_event(ev: Event) -> Option<char> {
    let Event::Key(key_event) = ev else {
        return None;
    };
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(ETX),
        (_, KeyCode::Char(c)) => Some(c),
        (_, KeyCode::Enter) => Some('\r'),
        (_, KeyCode::Backspace) => Some('\x08'),
        (_, KeyCode::Tab) => Some('\t'),
        (_, KeyCode::Esc) => Some('\x1b'),
        _ => None,
    }
}

impl ConsoleIo for TerminalIo {
    fn read_key(&mut self) -> io::Result<char> {
        self.out.flush()?;
        loop {
            if let Some(c) = key_from_event(event::read()?) {
                return Ok(c);
            }
        }
    }

    fn poll_key(&mut self) -> io::Result<Option<char>> {
        self.out.flush()?;
        while event::poll(Duration::ZERO)? {
            if let Some(c) = key_from_event(event::read()?) {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let mut rest = s;
        while let Some(pos) = rest.find('\n') {
            self.out.write_all(rest[..pos].as_bytes())?;
            self.out.write_all(b"\r\n")?;
            rest = &rest[pos + 1..];
        }
        self.out.write_all(rest.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
