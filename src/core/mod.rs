//! # Core Menu Engine
//!
//! Everything that decides what the console shows and how a keypress moves
//! the session along. It knows nothing about terminals: all input and output
//! goes through a [`ConsoleIo`](crate::io::ConsoleIo).
//!
//! ```text
//!   traversal ──render──▶ console ──▶ format / pager
//!       ▲                    │
//!       │                 selection (reads one valid key)
//!       └──── transition ────┘
//! ```
//!
//! ## Modules
//!
//! - [`menu`]: menus, items and the arena that owns them
//! - [`pager`]: page count and page ranges
//! - [`format`]: headers, dividers, option rows, the rotating buffer pool
//! - [`console`]: level-gated printing and value prompts
//! - [`selection`]: the validated single-key prompt
//! - [`traversal`]: the navigation state machine
//! - [`config`]: settings file, env and CLI resolution

pub mod config;
pub mod console;
pub mod format;
pub mod menu;
pub mod pager;
pub mod selection;
pub mod traversal;
