//! Conmenu library exports for testing

pub mod core;
pub mod io;

#[cfg(test)]
pub mod test_support;

pub use crate::core::console::{Console, LoggingLevel};
pub use crate::core::menu::{
    ActionError, ActionResult, ItemTarget, Menu, MenuAction, MenuHandle, MenuId, MenuItem,
    MenuMode, MenuTree, MenuUpdater,
};
pub use crate::core::traversal::{ConsoleSettings, Navigator, Transition};
