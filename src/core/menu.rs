//! # Menu Tree
//!
//! The data model the traversal engine walks: menus, their items, and the
//! arena that owns them.
//!
//! ```text
//! MenuTree (arena)
//! ├── [0] Menu "Main"       parent: None
//! │     ├── Item "Tools"    → SubMenu(1)
//! │     └── Item "Reboot"   → Action(..)
//! ├── [1] Menu "Tools"      parent: Some(0)   (set on descent)
//! │     └── Item "Shared"   → SubMenu(2)
//! └── [2] Menu "Shared"     parent: last menu that entered it
//! ```
//!
//! Menus never own each other. Items point at sub-menus by `MenuHandle`, so a
//! sub-menu can be reached from several parents. Only the most recent entry
//! path is remembered in `parent`.

use std::fmt;
use std::io;

use crate::core::console::Console;

/// Maximum number of characters kept in a menu name or description.
pub const MAX_MENU_NAME_LENGTH: usize = crate::core::format::CONSOLE_WIDTH - 40;
pub const MAX_MENU_DESCRIPTION_LENGTH: usize = crate::core::format::CONSOLE_WIDTH - 40;

/// Arguments handed to item actions by the traversal engine.
pub const NO_ARGS: &[&str] = &[];

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by a leaf action. Never aborts traversal.
#[derive(Debug)]
pub enum ActionError {
    /// The action ran and could not complete.
    Failed(String),
    /// The action was handed arguments it cannot use.
    InvalidArgument(String),
    /// The action hit an I/O error of its own.
    Io(io::Error),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Failed(msg) => write!(f, "action failed: {msg}"),
            ActionError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ActionError::Io(e) => write!(f, "action I/O error: {e}"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<io::Error> for ActionError {
    fn from(e: io::Error) -> Self {
        ActionError::Io(e)
    }
}

pub type ActionResult = Result<(), ActionError>;

// ============================================================================
// Callbacks
// ============================================================================

/// A leaf callback. Runs synchronously when its item is selected.
///
/// Implemented for any `FnMut(&mut Console, &[&str]) -> ActionResult`, so
/// closures can be dropped straight into a `MenuItem`.
pub trait MenuAction {
    fn invoke(&mut self, console: &mut Console, args: &[&str]) -> ActionResult;
}

impl<F> MenuAction for F
where
    F: FnMut(&mut Console, &[&str]) -> ActionResult,
{
    fn invoke(&mut self, console: &mut Console, args: &[&str]) -> ActionResult {
        self(console, args)
    }
}

/// Regenerates the item list of a mutable menu. Called before every render.
pub trait MenuUpdater {
    fn update(&mut self, items: &mut Vec<MenuItem>);
}

impl<F> MenuUpdater for F
where
    F: FnMut(&mut Vec<MenuItem>),
{
    fn update(&mut self, items: &mut Vec<MenuItem>) {
        self(items)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Name and description shared by menus and items. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuId {
    name: String,
    description: String,
}

impl MenuId {
    /// Builds an id, clipping both fields to their bounded lengths.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: clip(name.into(), MAX_MENU_NAME_LENGTH),
            description: clip(description.into(), MAX_MENU_DESCRIPTION_LENGTH),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn clip(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

// ============================================================================
// Items and menus
// ============================================================================

/// Stable index of a menu inside its `MenuTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(usize);

impl MenuHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What selecting an item does.
pub enum ItemTarget {
    SubMenu(MenuHandle),
    Action(Box<dyn MenuAction>),
    /// Degenerate leaf: selecting it re-renders the same page.
    None,
}

impl fmt::Debug for ItemTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemTarget::SubMenu(h) => f.debug_tuple("SubMenu").field(h).finish(),
            ItemTarget::Action(_) => f.write_str("Action(..)"),
            ItemTarget::None => f.write_str("None"),
        }
    }
}

#[derive(Debug)]
pub struct MenuItem {
    pub id: MenuId,
    pub target: ItemTarget,
}

impl MenuItem {
    pub fn sub_menu(name: impl Into<String>, description: impl Into<String>, menu: MenuHandle) -> Self {
        Self {
            id: MenuId::new(name, description),
            target: ItemTarget::SubMenu(menu),
        }
    }

    pub fn action<A>(name: impl Into<String>, description: impl Into<String>, action: A) -> Self
    where
        A: MenuAction + 'static,
    {
        Self {
            id: MenuId::new(name, description),
            target: ItemTarget::Action(Box::new(action)),
        }
    }

    pub fn empty(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: MenuId::new(name, description),
            target: ItemTarget::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuMode {
    /// Item list fixed at construction.
    #[default]
    Default,
    /// Item list regenerated by the updater before each render.
    Mutable,
}

pub struct Menu {
    pub id: MenuId,
    pub items: Vec<MenuItem>,
    /// Menu that most recently navigated into this one.
    pub parent: Option<MenuHandle>,
    pub current_page: usize,
    pub mode: MenuMode,
    pub updater: Option<Box<dyn MenuUpdater>>,
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("items", &self.items)
            .field("parent", &self.parent)
            .field("current_page", &self.current_page)
            .field("mode", &self.mode)
            .field("updater", &self.updater.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Menu {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Runs the updater if this is a mutable menu. No-op otherwise.
    pub fn refresh(&mut self) {
        if self.mode != MenuMode::Mutable {
            return;
        }
        if let Some(updater) = self.updater.as_mut() {
            updater.update(&mut self.items);
        }
    }
}

/// Arena owning every menu for the lifetime of the session.
#[derive(Debug, Default)]
pub struct MenuTree {
    menus: Vec<Menu>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an immutable menu with no items yet.
    pub fn add_menu(&mut self, name: impl Into<String>, description: impl Into<String>) -> MenuHandle {
        self.push(Menu {
            id: MenuId::new(name, description),
            items: Vec::new(),
            parent: None,
            current_page: 0,
            mode: MenuMode::Default,
            updater: None,
        })
    }

    /// Adds a menu whose items come from `updater` on every render.
    pub fn add_mutable_menu<U>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        updater: U,
    ) -> MenuHandle
    where
        U: MenuUpdater + 'static,
    {
        self.push(Menu {
            id: MenuId::new(name, description),
            items: Vec::new(),
            parent: None,
            current_page: 0,
            mode: MenuMode::Mutable,
            updater: Some(Box::new(updater)),
        })
    }

    fn push(&mut self, menu: Menu) -> MenuHandle {
        self.menus.push(menu);
        MenuHandle(self.menus.len() - 1)
    }

    /// Appends items to a menu. Sub-menu handles must come from this tree.
    pub fn add_items(&mut self, menu: MenuHandle, items: impl IntoIterator<Item = MenuItem>) {
        self.menus[menu.0].items.extend(items);
    }

    pub fn menu(&self, handle: MenuHandle) -> &Menu {
        &self.menus[handle.0]
    }

    pub fn menu_mut(&mut self, handle: MenuHandle) -> &mut Menu {
        &mut self.menus[handle.0]
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// True if `handle` addresses a menu in this tree.
    pub fn contains(&self, handle: MenuHandle) -> bool {
        handle.0 < self.menus.len()
    }
}
