//! # Selection Prompt
//!
//! Shows the options available on the current page and blocks until the
//! user presses a key that means something. This is the only place input
//! is validated: callers never see an unknown key.
//!
//! ```text
//! ----------------------------------------------------------------------
//! [0-4] Select item   [n] Next page   [b] Back
//! ----------------------------------------------------------------------
//! Select an option:
//! ```

use std::io;
use std::ops::BitOr;

use log::debug;

use crate::core::console::{Console, LoggingLevel};
use crate::core::format::{self, CONSOLE_WIDTH};
use crate::core::pager::PAGE_LENGTH;

/// Printed once per render, right before the key is read.
pub const RESPONSE_PROMPT: &str = "Select an option: ";

/// A fixed navigation option such as next page or quit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub key: char,
    pub description: String,
}

impl Selection {
    pub fn new(key: char, description: impl Into<String>) -> Self {
        Self {
            key,
            description: description.into(),
        }
    }
}

/// Layout flags for [`prompt_and_get_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionFlags(u8);

impl OptionFlags {
    /// Options horizontal, dividers drawn.
    pub const NONE: OptionFlags = OptionFlags(0);
    /// One option per line.
    pub const VERTICAL: OptionFlags = OptionFlags(1 << 0);
    pub const NO_DIVIDERS: OptionFlags = OptionFlags(1 << 1);

    pub fn contains(self, other: OptionFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OptionFlags {
    type Output = OptionFlags;

    fn bitor(self, rhs: OptionFlags) -> OptionFlags {
        OptionFlags(self.0 | rhs.0)
    }
}

/// Digit key for an item slot, if the slot fits on a page.
pub fn slot_key(slot: usize) -> Option<char> {
    if slot >= PAGE_LENGTH {
        return None;
    }
    char::from_digit(slot as u32, 10)
}

/// Item slot addressed by `key`, if it is one of the first `num_menu_selections` digits.
pub fn slot_for_key(key: char, num_menu_selections: usize) -> Option<usize> {
    let slot = key.to_digit(10)? as usize;
    (slot < num_menu_selections.min(PAGE_LENGTH)).then_some(slot)
}

fn is_valid_key(key: char, selections: &[Selection], num_menu_selections: usize) -> bool {
    selections.iter().any(|s| s.key == key) || slot_for_key(key, num_menu_selections).is_some()
}

fn render(console: &mut Console, selections: &[Selection], num_menu_selections: usize, flags: OptionFlags) {
    let level = LoggingLevel::Level0;
    let num_menu_selections = num_menu_selections.min(PAGE_LENGTH);

    let mut labels = Vec::with_capacity(selections.len() + 1);
    match num_menu_selections {
        0 => {}
        1 => labels.push(format::format_option('0', "Select item")),
        n => labels.push(format!("[0-{}] Select item", n - 1)),
    }
    labels.extend(selections.iter().map(|s| format::format_option(s.key, &s.description)));

    let dividers = !flags.contains(OptionFlags::NO_DIVIDERS);
    if dividers {
        console.print_divider(level);
    }
    for line in format::layout_options(&labels, CONSOLE_WIDTH, flags.contains(OptionFlags::VERTICAL)) {
        console.print(level, line);
    }
    if dividers {
        console.print_divider(level);
    }
    console.print_no_eol(level, RESPONSE_PROMPT);
}

/// Renders the options and blocks until a valid key arrives.
///
/// Valid keys are the explicit selection keys plus `'0'` up to
/// `num_menu_selections - 1`. Anything else re-renders and waits again.
/// Only an adapter read failure ends the loop early.
pub fn prompt_and_get_response(
    console: &mut Console,
    selections: &[Selection],
    num_menu_selections: usize,
    flags: OptionFlags,
) -> io::Result<char> {
    loop {
        render(console, selections, num_menu_selections, flags);
        let key = console.get_char()?;
        if is_valid_key(key, selections, num_menu_selections) {
            console.put_char(LoggingLevel::Level0, key);
            console.print_new_line(LoggingLevel::Level0);
            return Ok(key);
        }
        debug!("Ignoring invalid key {:?}", key);
        console.print_new_line(LoggingLevel::Level0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{ScriptedIo, Transcript};

    fn console(keys: &str) -> (Console, Transcript) {
        let (io, transcript) = ScriptedIo::from_keys(keys);
        (Console::new(Box::new(io), LoggingLevel::Level0, false), transcript)
    }

    fn nav() -> Vec<Selection> {
        vec![Selection::new('n', "Next page"), Selection::new('q', "Quit")]
    }

    #[test]
    fn test_flags() {
        let flags = OptionFlags::VERTICAL | OptionFlags::NO_DIVIDERS;
        assert!(flags.contains(OptionFlags::VERTICAL));
        assert!(flags.contains(OptionFlags::NO_DIVIDERS));
        assert!(!OptionFlags::NONE.contains(OptionFlags::VERTICAL));
    }

    #[test]
    fn test_slot_keys() {
        assert_eq!(slot_key(0), Some('0'));
        assert_eq!(slot_key(9), Some('9'));
        assert_eq!(slot_key(10), None);
        assert_eq!(slot_for_key('3', 4), Some(3));
        assert_eq!(slot_for_key('4', 4), None);
        assert_eq!(slot_for_key('a', 4), None);
        assert_eq!(slot_for_key('9', 25), Some(9));
    }

    #[test]
    fn test_returns_first_valid_key() {
        let (mut console, transcript) = console("n");
        let key = prompt_and_get_response(&mut console, &nav(), 3, OptionFlags::NONE).unwrap();
        assert_eq!(key, 'n');
        assert_eq!(transcript.count(RESPONSE_PROMPT), 1);
        assert!(transcript.contains("[0-2] Select item"));
        assert!(transcript.contains("[q] Quit"));
    }

    #[test]
    fn test_rerenders_once_per_invalid_key() {
        // 'x' unknown, '5' beyond the page, 'p' not offered
        let (mut console, transcript) = console("x5p2");
        let key = prompt_and_get_response(&mut console, &nav(), 3, OptionFlags::NONE).unwrap();
        assert_eq!(key, '2');
        assert_eq!(transcript.count(RESPONSE_PROMPT), 4);
        assert_eq!(transcript.keys_read(), 4);
    }

    #[test]
    fn test_no_item_keys_on_empty_page() {
        let (mut console, transcript) = console("0q");
        let key = prompt_and_get_response(&mut console, &nav(), 0, OptionFlags::NONE).unwrap();
        assert_eq!(key, 'q');
        assert!(!transcript.contains("Select item"));
    }

    #[test]
    fn test_vertical_without_dividers() {
        let (mut console, transcript) = console("q");
        prompt_and_get_response(&mut console, &nav(), 1, OptionFlags::VERTICAL | OptionFlags::NO_DIVIDERS)
            .unwrap();
        let out = transcript.output();
        assert!(!out.contains("-----"));
        let option_lines: Vec<&str> = out.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(option_lines, vec!["[0] Select item", "[n] Next page", "[q] Quit"]);
    }

    #[test]
    fn test_horizontal_with_dividers() {
        let (mut console, transcript) = console("q");
        prompt_and_get_response(&mut console, &nav(), 2, OptionFlags::NONE).unwrap();
        let out = transcript.output();
        assert_eq!(out.lines().filter(|l| l.starts_with("-----")).count(), 2);
        assert!(out.contains("[0-1] Select item   [n] Next page   [q] Quit"));
    }

    #[test]
    fn test_read_failure_propagates() {
        let (mut console, _transcript) = console("zz");
        let err = prompt_and_get_response(&mut console, &nav(), 0, OptionFlags::NONE).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
