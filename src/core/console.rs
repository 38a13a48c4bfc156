//! # Console
//!
//! Level-gated printing and blocking prompts on top of a [`ConsoleIo`].
//!
//! Every print call names the level it belongs to. It reaches the adapter
//! only when the console's active level is enabled and at least as verbose:
//!
//! ```text
//! active = Level1
//!   print(Level0, ..)  → written
//!   print(Level1, ..)  → written
//!   print(Level2, ..)  → dropped
//! active = Disabled    → everything dropped
//! ```
//!
//! Formatted output is staged in the rotating [`BufferPool`], so a single
//! print is bounded by `STRING_BUFFER_SIZE`.

use std::fmt::{self, Write as _};
use std::io;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::format::{
    self, AnsiColor, BufferPool, ANSI_COLOR_RESET, CONSOLE_WIDTH, DBL_LINE_CHAR, ERASE_SCREEN,
    SGL_LINE_CHAR, TEXT_BLOCK_SIZE,
};
use crate::core::menu::Menu;
use crate::core::pager::{self, PAGE_LENGTH};
use crate::io::ConsoleIo;

const KEY_ENTER: char = '\r';
const KEY_LINE_FEED: char = '\n';
const KEY_BACKSPACE: char = '\x08';
const KEY_DELETE: char = '\x7f';

/// Color reset followed by a newline, closing a colored line.
const RESET_EOL: &str = "\x1b[0m\n";

pub const ANY_KEY_PROMPT: &str = "Press any key to continue...";

// ============================================================================
// Logging level
// ============================================================================

/// Verbosity filter for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum LoggingLevel {
    Disabled,
    #[default]
    Level0,
    Level1,
    Level2,
    Level3,
}

impl LoggingLevel {
    /// True if a call at `call_level` is emitted while `self` is active.
    pub fn allows(self, call_level: LoggingLevel) -> bool {
        self != LoggingLevel::Disabled && call_level != LoggingLevel::Disabled && call_level <= self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLoggingLevel(pub String);

impl fmt::Display for InvalidLoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid logging level '{}' (expected disabled, -1, 0, 1, 2 or 3)", self.0)
    }
}

impl std::error::Error for InvalidLoggingLevel {}

impl TryFrom<i8> for LoggingLevel {
    type Error = InvalidLoggingLevel;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(LoggingLevel::Disabled),
            0 => Ok(LoggingLevel::Level0),
            1 => Ok(LoggingLevel::Level1),
            2 => Ok(LoggingLevel::Level2),
            3 => Ok(LoggingLevel::Level3),
            other => Err(InvalidLoggingLevel(other.to_string())),
        }
    }
}

impl From<LoggingLevel> for i8 {
    fn from(level: LoggingLevel) -> i8 {
        match level {
            LoggingLevel::Disabled => -1,
            LoggingLevel::Level0 => 0,
            LoggingLevel::Level1 => 1,
            LoggingLevel::Level2 => 2,
            LoggingLevel::Level3 => 3,
        }
    }
}

impl FromStr for LoggingLevel {
    type Err = InvalidLoggingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("disabled") {
            return Ok(LoggingLevel::Disabled);
        }
        trimmed
            .parse::<i8>()
            .map_err(|_| InvalidLoggingLevel(s.to_string()))
            .and_then(LoggingLevel::try_from)
    }
}

// ============================================================================
// Console
// ============================================================================

pub struct Console {
    io: Box<dyn ConsoleIo>,
    level: LoggingLevel,
    small_headers: bool,
    pool: BufferPool,
}

impl Console {
    pub fn new(io: Box<dyn ConsoleIo>, level: LoggingLevel, small_headers: bool) -> Self {
        Self {
            io,
            level,
            small_headers,
            pool: BufferPool::new(),
        }
    }

    pub fn logging_level(&self) -> LoggingLevel {
        self.level
    }

    pub fn set_logging_level(&mut self, level: LoggingLevel) {
        self.level = level;
    }

    pub fn small_headers(&self) -> bool {
        self.small_headers
    }

    pub fn set_small_headers(&mut self, enable: bool) {
        self.small_headers = enable;
    }

    pub fn enabled(&self, level: LoggingLevel) -> bool {
        self.level.allows(level)
    }

    /// Index of the next output buffer in the rotating pool.
    pub fn string_buffer_index(&self) -> usize {
        self.pool.index()
    }

    // ------------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------------

    pub fn put_str(&mut self, level: LoggingLevel, s: &str) {
        if !self.enabled(level) {
            return;
        }
        if let Err(e) = self.io.write_str(s) {
            warn!("Console write failed: {}", e);
        }
    }

    pub fn put_char(&mut self, level: LoggingLevel, c: char) {
        if !self.enabled(level) {
            return;
        }
        if let Err(e) = self.io.write_char(c) {
            warn!("Console write failed: {}", e);
        }
    }

    /// Blocks for one key. Reading is never filtered by the logging level.
    pub fn get_char(&mut self) -> io::Result<char> {
        if let Err(e) = self.io.flush() {
            warn!("Console flush failed: {}", e);
        }
        self.io.read_key()
    }

    /// Formats `msg` through the buffer pool, framed by `prefix`/`suffix`.
    fn emit(&mut self, level: LoggingLevel, prefix: &str, msg: &dyn fmt::Display, suffix: &str) {
        if !self.enabled(level) {
            return;
        }
        let Self { io, pool, .. } = self;
        let mut buf = pool.next_buffer();
        let _ = write!(buf, "{msg}");
        if buf.truncated() {
            debug!("Console output truncated to {} bytes", buf.len());
        }
        for part in [prefix, buf.as_str(), suffix] {
            if part.is_empty() {
                continue;
            }
            if let Err(e) = io.write_str(part) {
                warn!("Console write failed: {}", e);
                return;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Print family
    // ------------------------------------------------------------------------

    /// Prints one line. Accepts anything printable, including `format_args!`.
    pub fn print(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, "", &msg, "\n");
    }

    pub fn print_no_eol(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, "", &msg, "");
    }

    /// Rewrites the current line, for progress counters.
    pub fn print_in_place(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, "\r", &msg, "");
    }

    pub fn print_new_line(&mut self, level: LoggingLevel) {
        self.put_str(level, "\n");
    }

    /// Prints a paragraph wrapped to the text block width.
    pub fn print_block(&mut self, level: LoggingLevel, block: &str) {
        if !self.enabled(level) {
            return;
        }
        for line in format::wrap_block(block, TEXT_BLOCK_SIZE) {
            self.put_str(level, &line);
            self.put_str(level, "\n");
        }
    }

    pub fn print_color(&mut self, level: LoggingLevel, color: AnsiColor, inner: &str) {
        self.emit(level, color.code(), &inner, ANSI_COLOR_RESET);
    }

    pub fn print_error(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, AnsiColor::Red.code(), &msg, RESET_EOL);
    }

    pub fn print_warn(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, AnsiColor::Yellow.code(), &msg, RESET_EOL);
    }

    pub fn print_success(&mut self, level: LoggingLevel, msg: impl fmt::Display) {
        self.emit(level, AnsiColor::Green.code(), &msg, RESET_EOL);
    }

    /// Main header: framed title between two `=` rules, or just the framed
    /// title when small headers are on.
    pub fn print_header(&mut self, level: LoggingLevel, title: impl fmt::Display) {
        self.print_header_internal(level, DBL_LINE_CHAR, &title.to_string());
    }

    pub fn print_sub_header(&mut self, level: LoggingLevel, title: impl fmt::Display) {
        self.print_header_internal(level, SGL_LINE_CHAR, &title.to_string());
    }

    pub fn print_header_internal(&mut self, level: LoggingLevel, rule: char, title: &str) {
        if !self.enabled(level) {
            return;
        }
        let framed = format::format_header(title, CONSOLE_WIDTH, rule);
        if self.small_headers {
            self.print(level, framed);
            return;
        }
        let divider = format::format_divider(CONSOLE_WIDTH, rule);
        self.print(level, &divider);
        self.print(level, framed);
        self.print(level, &divider);
    }

    pub fn print_divider(&mut self, level: LoggingLevel) {
        self.print(level, format::format_divider(CONSOLE_WIDTH, SGL_LINE_CHAR));
    }

    pub fn erase_screen(&mut self, level: LoggingLevel) {
        self.put_str(level, ERASE_SCREEN);
    }

    /// Renders the current page of `menu`: header, page indicator and one
    /// row per item keyed by its slot digit.
    pub fn print_menu(&mut self, menu: &Menu) {
        let level = LoggingLevel::Level0;
        if !self.enabled(level) {
            return;
        }
        let count = menu.item_count();
        let pages = pager::total_pages(count, PAGE_LENGTH);
        let range = pager::page_range(count, menu.current_page, PAGE_LENGTH);

        self.print_header(level, menu.id.name());
        if !menu.id.description().is_empty() {
            self.print(level, menu.id.description());
        }
        if pages > 1 {
            self.print(level, format_args!("Page {} of {}", menu.current_page + 1, pages));
        }
        if range.is_empty() {
            self.print(level, "(no items)");
            return;
        }

        let page = &menu.items[range];
        let name_width = page
            .iter()
            .map(|item| unicode_width::UnicodeWidthStr::width(item.id.name()))
            .max()
            .unwrap_or(0);
        for (slot, item) in page.iter().enumerate() {
            let row = format::format_item_row(slot, item.id.name(), item.id.description(), name_width);
            self.print(level, row);
        }
    }

    // ------------------------------------------------------------------------
    // Key helpers
    // ------------------------------------------------------------------------

    pub fn prompt_for_any_key_blocking(&mut self) -> io::Result<()> {
        self.print_no_eol(LoggingLevel::Level0, ANY_KEY_PROMPT);
        self.get_char()?;
        self.print_new_line(LoggingLevel::Level0);
        Ok(())
    }

    pub fn check_for_key_blocking(&mut self) -> io::Result<char> {
        self.get_char()
    }

    /// Returns a waiting key without blocking, if the adapter supports it.
    pub fn check_for_key(&mut self) -> io::Result<Option<char>> {
        self.io.poll_key()
    }

    // ------------------------------------------------------------------------
    // Value prompts
    // ------------------------------------------------------------------------

    /// Reads an edited line: echoes typed characters, honors backspace,
    /// finishes on Enter.
    fn read_line(&mut self, prompt: &str, default_display: &str) -> io::Result<String> {
        let level = LoggingLevel::Level0;
        self.print_no_eol(level, format_args!("{prompt} [{default_display}]: "));
        let mut line = String::new();
        loop {
            match self.get_char()? {
                KEY_ENTER | KEY_LINE_FEED => break,
                KEY_BACKSPACE | KEY_DELETE => {
                    if line.pop().is_some() {
                        self.put_str(level, "\x08 \x08");
                    }
                }
                c if c.is_control() => {}
                c => {
                    if line.len() < TEXT_BLOCK_SIZE {
                        line.push(c);
                        self.put_char(level, c);
                    }
                }
            }
        }
        self.print_new_line(level);
        Ok(line)
    }

    /// Prompts until a value parses. Empty input picks the default.
    fn prompt_for_value<T>(
        &mut self,
        prompt: &str,
        default_display: &str,
        default_val: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        loop {
            let line = self.read_line(prompt, default_display)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(default_val);
            }
            match parse(trimmed) {
                Some(v) => return Ok(v),
                None => self.print_error(
                    LoggingLevel::Level0,
                    format_args!("'{trimmed}' is not a valid value, try again"),
                ),
            }
        }
    }

    pub fn prompt_for_int(&mut self, prompt: &str, default_val: u32) -> io::Result<u32> {
        self.prompt_for_value(prompt, &default_val.to_string(), default_val, |s| s.parse().ok())
    }

    pub fn prompt_for_hex_u32(&mut self, prompt: &str, default_val: u32) -> io::Result<u32> {
        self.prompt_for_value(prompt, &format!("0x{default_val:08X}"), default_val, |s| {
            u32::from_str_radix(strip_hex_prefix(s), 16).ok()
        })
    }

    pub fn prompt_for_hex_u64(&mut self, prompt: &str, default_val: u64) -> io::Result<u64> {
        self.prompt_for_value(prompt, &format!("0x{default_val:016X}"), default_val, |s| {
            u64::from_str_radix(strip_hex_prefix(s), 16).ok()
        })
    }

    pub fn prompt_for_string(&mut self, prompt: &str, default_val: &str) -> io::Result<String> {
        let line = self.read_line(prompt, default_val)?;
        if line.trim().is_empty() {
            return Ok(default_val.to_string());
        }
        Ok(line)
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::STRING_BUFFER_SIZE;
    use crate::core::menu::{MenuItem, MenuTree};
    use crate::io::{ScriptedIo, Transcript};

    fn console(keys: &str, level: LoggingLevel) -> (Console, Transcript) {
        let (io, transcript) = ScriptedIo::from_keys(keys);
        (Console::new(Box::new(io), level, false), transcript)
    }

    #[test]
    fn test_level_filter() {
        assert!(LoggingLevel::Level1.allows(LoggingLevel::Level0));
        assert!(LoggingLevel::Level1.allows(LoggingLevel::Level1));
        assert!(!LoggingLevel::Level1.allows(LoggingLevel::Level2));
        assert!(!LoggingLevel::Disabled.allows(LoggingLevel::Level0));
        assert!(LoggingLevel::Level3.allows(LoggingLevel::Level3));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("disabled".parse::<LoggingLevel>(), Ok(LoggingLevel::Disabled));
        assert_eq!("-1".parse::<LoggingLevel>(), Ok(LoggingLevel::Disabled));
        assert_eq!(" 2 ".parse::<LoggingLevel>(), Ok(LoggingLevel::Level2));
        assert!("7".parse::<LoggingLevel>().is_err());
        assert!("loud".parse::<LoggingLevel>().is_err());
        assert_eq!(i8::from(LoggingLevel::Level3), 3);
    }

    #[test]
    fn test_print_respects_level() {
        let (mut console, transcript) = console("", LoggingLevel::Level1);
        console.print(LoggingLevel::Level0, "shown");
        console.print(LoggingLevel::Level2, "hidden");
        console.print(LoggingLevel::Level1, format_args!("value={}", 42));
        assert_eq!(transcript.output(), "shown\nvalue=42\n");

        console.set_logging_level(LoggingLevel::Disabled);
        console.print(LoggingLevel::Level0, "gone");
        console.print_header(LoggingLevel::Level0, "gone");
        assert!(!transcript.contains("gone"));
    }

    #[test]
    fn test_print_is_bounded_by_buffer_size() {
        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_no_eol(LoggingLevel::Level0, "z".repeat(STRING_BUFFER_SIZE * 3));
        assert_eq!(transcript.output().len(), STRING_BUFFER_SIZE - 1);
    }

    #[test]
    fn test_print_variants() {
        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_in_place(LoggingLevel::Level0, "50%");
        console.print_error(LoggingLevel::Level0, "bad");
        console.print_color(LoggingLevel::Level0, AnsiColor::Cyan, "c");
        let out = transcript.output();
        assert!(out.starts_with("\r50%"));
        assert!(out.contains("\x1b[31mbad\x1b[0m\n"));
        assert!(out.ends_with("\x1b[36mc\x1b[0m"));
    }

    #[test]
    fn test_headers_large_and_small() {
        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_header(LoggingLevel::Level0, "Main");
        assert_eq!(transcript.output().lines().count(), 3);

        transcript.clear();
        console.set_small_headers(true);
        console.print_header(LoggingLevel::Level0, "Main");
        let out = transcript.output();
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out.trim_end().len(), CONSOLE_WIDTH);
        assert!(out.contains("[ Main ]"));
    }

    #[test]
    fn test_print_block_wraps() {
        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_block(LoggingLevel::Level0, &"lorem ipsum ".repeat(30));
        let out = transcript.output();
        assert!(out.lines().count() > 1);
        assert!(out.lines().all(|l| l.len() <= TEXT_BLOCK_SIZE));
    }

    #[test]
    fn test_print_menu_shows_current_page() {
        let mut tree = MenuTree::new();
        let menu = tree.add_menu("Registers", "Peripheral registers");
        tree.add_items(menu, (0..12).map(|i| MenuItem::empty(format!("REG{i}"), "")));
        tree.menu_mut(menu).current_page = 1;

        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_menu(tree.menu(menu));
        let out = transcript.output();
        assert!(out.contains("[ Registers ]"));
        assert!(out.contains("Page 2 of 2"));
        assert!(out.contains("[0] REG10"));
        assert!(out.contains("[1] REG11"));
        assert!(!out.contains("REG9"));
    }

    #[test]
    fn test_print_empty_menu() {
        let mut tree = MenuTree::new();
        let menu = tree.add_menu("Empty", "");
        let (mut console, transcript) = console("", LoggingLevel::Level0);
        console.print_menu(tree.menu(menu));
        assert!(transcript.contains("(no items)"));
        assert!(!transcript.contains("Page"));
    }

    #[test]
    fn test_prompt_for_int_default_and_retry() {
        let (mut console, transcript) = console("\rx1\r43\x082\r", LoggingLevel::Level0);
        assert_eq!(console.prompt_for_int("Count", 7).unwrap(), 7);
        assert_eq!(console.prompt_for_int("Count", 7).unwrap(), 42);
        assert!(transcript.contains("Count [7]: "));
        assert!(transcript.contains("not a valid value"));
    }

    #[test]
    fn test_prompt_for_hex() {
        let (mut console, transcript) = console("0xdeadBEEF\rff\r\r", LoggingLevel::Level0);
        assert_eq!(console.prompt_for_hex_u32("Addr", 0).unwrap(), 0xDEAD_BEEF);
        assert_eq!(console.prompt_for_hex_u64("Mask", 0).unwrap(), 0xFF);
        assert_eq!(console.prompt_for_hex_u64("Mask", 0x10).unwrap(), 0x10);
        assert!(transcript.contains("Addr [0x00000000]: "));
    }

    #[test]
    fn test_prompt_for_string() {
        let (mut console, _transcript) = console("eth0\n\r", LoggingLevel::Level0);
        assert_eq!(console.prompt_for_string("Iface", "lo").unwrap(), "eth0");
        assert_eq!(console.prompt_for_string("Iface", "lo").unwrap(), "lo");
    }

    #[test]
    fn test_any_key_and_eof() {
        let (mut console, transcript) = console("z", LoggingLevel::Level0);
        console.prompt_for_any_key_blocking().unwrap();
        assert!(transcript.contains(ANY_KEY_PROMPT));
        assert!(console.check_for_key_blocking().is_err());
        assert_eq!(console.check_for_key().unwrap(), None);
    }
}
