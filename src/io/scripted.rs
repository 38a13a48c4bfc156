//! Scripted adapter: replays a fixed key sequence and records everything
//! written. Running out of keys surfaces as `UnexpectedEof`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::ConsoleIo;

#[derive(Debug, Default)]
struct Recording {
    output: String,
    keys_read: usize,
}

pub struct ScriptedIo {
    keys: VecDeque<char>,
    recording: Rc<RefCell<Recording>>,
}

/// Read side of a [`ScriptedIo`], kept by the caller after the adapter has
/// been handed to a console.
#[derive(Clone)]
pub struct Transcript {
    recording: Rc<RefCell<Recording>>,
}

impl ScriptedIo {
    pub fn new(keys: impl IntoIterator<Item = char>) -> (Self, Transcript) {
        let recording = Rc::new(RefCell::new(Recording::default()));
        let io = Self {
            keys: keys.into_iter().collect(),
            recording: Rc::clone(&recording),
        };
        (io, Transcript { recording })
    }

    /// Convenience for `ScriptedIo::new(keys.chars())`.
    pub fn from_keys(keys: &str) -> (Self, Transcript) {
        Self::new(keys.chars())
    }
}

impl ConsoleIo for ScriptedIo {
    fn read_key(&mut self) -> io::Result<char> {
        let key = self
            .keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))?;
        self.recording.borrow_mut().keys_read += 1;
        Ok(key)
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.recording.borrow_mut().output.push_str(s);
        Ok(())
    }
}

impl Transcript {
    pub fn output(&self) -> String {
        self.recording.borrow().output.clone()
    }

    /// Number of times `pattern` appears in the output so far.
    pub fn count(&self, pattern: &str) -> usize {
        self.recording.borrow().output.matches(pattern).count()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.recording.borrow().output.contains(pattern)
    }

    pub fn keys_read(&self) -> usize {
        self.recording.borrow().keys_read
    }

    pub fn clear(&self) {
        self.recording.borrow_mut().output.clear();
    }
}
