//! # Console I/O Adapter
//!
//! The only two primitives the engine needs from a platform: read one key,
//! write text. Everything above this module is platform independent.
//!
//! - [`terminal`]: crossterm raw-mode terminal (the binary uses this)
//! - [`scripted`]: canned key sequence + captured output, for tests and
//!   harnesses driving the engine without a human

pub mod scripted;
pub mod terminal;

use std::io;

pub use scripted::{ScriptedIo, Transcript};
pub use terminal::TerminalIo;

/// Platform hooks the console is built on.
///
/// Writes are treated as always succeeding by the layers above; errors are
/// logged and dropped there. A failing `read_key` ends the session.
pub trait ConsoleIo {
    /// Blocks until exactly one key is available.
    fn read_key(&mut self) -> io::Result<char>;

    /// Returns a key if one is already waiting, without blocking.
    fn poll_key(&mut self) -> io::Result<Option<char>> {
        Ok(None)
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }

    fn write_str(&mut self, s: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
