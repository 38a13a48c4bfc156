//! # Formatter
//!
//! Builds the fixed-width text the console prints: framed headers, rule
//! dividers, option rows and wrapped text blocks. Everything here is a pure
//! function of its input.
//!
//! Formatted print output is staged in a small rotating [`BufferPool`].
//! Handles borrow the pool mutably, so a handle can never outlive the next
//! request for a buffer.

use std::fmt;
use std::ops::Deref;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ============================================================================
// Layout constants
// ============================================================================

pub const CONSOLE_WIDTH: usize = 120;
/// Width of wrapped paragraphs printed with `print_block`.
pub const TEXT_BLOCK_SIZE: usize = CONSOLE_WIDTH - 40;
pub const STRING_BUFFER_SIZE: usize = CONSOLE_WIDTH + 100;
pub const NUM_STRING_BUFFERS: usize = 5;
/// `=[  ]=` framing around a header title.
pub const HEADER_TITLE_EXTRAS_WIDTH: usize = 6;
pub const MAX_HEADER_TITLE_WIDTH: usize = CONSOLE_WIDTH - HEADER_TITLE_EXTRAS_WIDTH;

// ASCII on purpose: box drawing glyphs come out mangled in captured logs.
pub const DBL_LINE_CHAR: char = '=';
pub const SGL_LINE_CHAR: char = '-';

/// Gap between options laid out on one line.
const OPTION_SPACING: &str = "   ";

// ============================================================================
// ANSI sequences
// ============================================================================

pub const ANSI_COLOR_RESET: &str = "\x1b[0m";
pub const ERASE_SCREEN: &str = "\x1b[2J";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl AnsiColor {
    pub fn code(self) -> &'static str {
        match self {
            AnsiColor::Red => "\x1b[31m",
            AnsiColor::Green => "\x1b[32m",
            AnsiColor::Yellow => "\x1b[33m",
            AnsiColor::Blue => "\x1b[34m",
            AnsiColor::Magenta => "\x1b[35m",
            AnsiColor::Cyan => "\x1b[36m",
        }
    }
}

pub fn colorize(color: AnsiColor, inner: &str) -> String {
    format!("{}{}{}", color.code(), inner, ANSI_COLOR_RESET)
}

// ============================================================================
// Headers, dividers, rows
// ============================================================================

/// Centers `text` inside rule characters, e.g. `=====[ Main ]=====`.
///
/// The result is exactly `width` columns wide. Titles wider than
/// `width - 6` are cut so the `=[  ]=` framing always fits.
pub fn format_header(text: &str, width: usize, rule: char) -> String {
    let title = truncate_to_width(text, width.saturating_sub(HEADER_TITLE_EXTRAS_WIDTH));
    let framed_width = title.width() + 4;
    let remaining = width.saturating_sub(framed_width);
    let left = remaining / 2;
    let right = remaining - left;

    let mut out = String::with_capacity(width + 4);
    out.extend(std::iter::repeat_n(rule, left));
    out.push_str("[ ");
    out.push_str(title);
    out.push_str(" ]");
    out.extend(std::iter::repeat_n(rule, right));
    out
}

pub fn format_divider(width: usize, rule: char) -> String {
    std::iter::repeat_n(rule, width).collect()
}

/// A navigation option as shown in the prompt: `[n] Next page`.
pub fn format_option(key: char, description: &str) -> String {
    format!("[{key}] {description}")
}

/// One item row of a menu page. Names are padded to `name_width` columns so
/// descriptions line up.
pub fn format_item_row(slot: usize, name: &str, description: &str, name_width: usize) -> String {
    let pad = name_width.saturating_sub(name.width());
    if description.is_empty() {
        return format!("[{slot}] {name}");
    }
    format!("[{slot}] {name}{} : {description}", " ".repeat(pad))
}

/// Lays out option labels either one per line or packed into lines no
/// wider than `width`.
pub fn layout_options(labels: &[String], width: usize, vertical: bool) -> Vec<String> {
    if vertical {
        return labels.to_vec();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for label in labels {
        if !line.is_empty() && line.width() + OPTION_SPACING.len() + label.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push_str(OPTION_SPACING);
        }
        line.push_str(label);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wraps a paragraph to `width` columns.
pub fn wrap_block(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, textwrap::Options::new(width.max(1)).break_words(true))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Longest prefix of `s` that fits in `max_width` display columns.
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

// ============================================================================
// Rotating buffer pool
// ============================================================================

/// Fixed set of reusable output buffers, handed out round-robin.
pub struct BufferPool {
    buffers: [String; NUM_STRING_BUFFERS],
    next: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            buffers: std::array::from_fn(|_| String::with_capacity(STRING_BUFFER_SIZE)),
            next: 0,
        }
    }

    /// Index the next call to [`BufferPool::next_buffer`] will hand out.
    pub fn index(&self) -> usize {
        self.next
    }

    /// Clears and returns the next buffer in rotation.
    pub fn next_buffer(&mut self) -> PoolBuffer<'_> {
        let index = self.next;
        self.next = (index + 1) % NUM_STRING_BUFFERS;
        let buf = &mut self.buffers[index];
        buf.clear();
        PoolBuffer {
            buf,
            index,
            truncated: false,
        }
    }
}

/// Borrowed view of one pool buffer. Writes past the buffer size are dropped.
pub struct PoolBuffer<'a> {
    buf: &'a mut String,
    index: usize,
    truncated: bool,
}

impl PoolBuffer<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_str(&self) -> &str {
        self.buf
    }

    /// True if some output did not fit.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl Deref for PoolBuffer<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        self.buf
    }
}

impl fmt::Write for PoolBuffer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // One byte stays reserved, mirroring a NUL terminated buffer.
        let room = (STRING_BUFFER_SIZE - 1).saturating_sub(self.buf.len());
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        self.truncated = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_header_is_exact_width_and_centered() {
        let header = format_header("Main", CONSOLE_WIDTH, DBL_LINE_CHAR);
        assert_eq!(header.chars().count(), CONSOLE_WIDTH);
        assert!(header.contains("[ Main ]"));
        let left = header.find('[').unwrap();
        let right = header.len() - header.rfind(']').unwrap() - 1;
        assert!(left.abs_diff(right) <= 1);
    }

    #[test]
    fn test_header_truncates_long_titles() {
        let title = "T".repeat(CONSOLE_WIDTH);
        let header = format_header(&title, CONSOLE_WIDTH, SGL_LINE_CHAR);
        assert_eq!(header.chars().count(), CONSOLE_WIDTH);
        assert!(header.starts_with("-[ "));
        assert!(header.ends_with(" ]-"));
        assert_eq!(header.matches('T').count(), MAX_HEADER_TITLE_WIDTH);
    }

    #[test]
    fn test_header_narrow_width() {
        let header = format_header("abc", 20, '=');
        assert_eq!(header, "======[ abc ]=======");
    }

    #[test]
    fn test_divider() {
        assert_eq!(format_divider(5, '-'), "-----");
        assert_eq!(format_divider(CONSOLE_WIDTH, '=').len(), CONSOLE_WIDTH);
    }

    #[test]
    fn test_item_row_alignment() {
        let a = format_item_row(0, "Net", "Network tools", 8);
        let b = format_item_row(1, "Storage", "Disks", 8);
        assert_eq!(a.find(':'), b.find(':'));
        assert_eq!(format_item_row(3, "Bare", "", 8), "[3] Bare");
    }

    #[test]
    fn test_layout_options_horizontal_wraps() {
        let labels: Vec<String> = (0..6).map(|i| format!("[{i}] option")).collect();
        let lines = layout_options(&labels, 30, false);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 30));
        assert_eq!(lines.join(" ").matches("option").count(), 6);

        let vertical = layout_options(&labels, 30, true);
        assert_eq!(vertical.len(), 6);
    }

    #[test]
    fn test_wrap_block() {
        let text = "word ".repeat(40);
        let lines = wrap_block(&text, TEXT_BLOCK_SIZE);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.len() <= TEXT_BLOCK_SIZE));
    }

    #[test]
    fn test_colorize() {
        assert_eq!(colorize(AnsiColor::Red, "oops"), "\x1b[31moops\x1b[0m");
    }

    #[test]
    fn test_pool_rotates_through_all_buffers() {
        let mut pool = BufferPool::new();
        for expected in (0..NUM_STRING_BUFFERS).chain(0..2) {
            assert_eq!(pool.index(), expected);
            let buf = pool.next_buffer();
            assert_eq!(buf.index(), expected);
        }
    }

    #[test]
    fn test_pool_buffer_is_cleared_and_bounded() {
        let mut pool = BufferPool::new();
        {
            let mut buf = pool.next_buffer();
            write!(buf, "{}", "a".repeat(STRING_BUFFER_SIZE * 2)).unwrap();
            assert_eq!(buf.len(), STRING_BUFFER_SIZE - 1);
            assert!(buf.truncated());
        }
        for _ in 1..NUM_STRING_BUFFERS {
            pool.next_buffer();
        }
        let mut buf = pool.next_buffer();
        assert_eq!(buf.index(), 0);
        assert!(buf.is_empty());
        write!(buf, "x={}", 7).unwrap();
        assert_eq!(buf.as_str(), "x=7");
        assert!(!buf.truncated());
    }
}
