//! # Menu Traversal
//!
//! The state machine that drives an interactive session. Each step renders
//! the active menu, waits for one valid key, and applies one transition:
//!
//! ```text
//!            ┌──────────── PageChange ────────────┐
//!            ▼                                    │
//!      ┌─────────────┐  digit → sub-menu   ┌─────────────┐
//!      │ AtMenu(m)   │ ──── Descend ─────▶ │ AtMenu(sub) │
//!      │             │ ◀──── Ascend ────── │             │
//!      └─────────────┘                     └─────────────┘
//!        │   ▲   digit → action                  │
//!        │   └──── Invoke (same page) ───        │  Top
//!        │                                       ▼
//!        └──── Exit (quit key) ──▶ session ends  AtMenu(top)
//! ```
//!
//! Sub-menus learn their parent when entered, so the same menu can hang off
//! several parents. Pages are remembered per menu: ascending lands on the
//! page the parent was left at, descending always starts at page 0.

use std::io;
use std::ops::Range;

use log::{debug, info, warn};

use crate::core::console::{Console, LoggingLevel};
use crate::core::menu::{ItemTarget, MenuHandle, MenuTree, NO_ARGS};
use crate::core::pager::{self, PAGE_LENGTH};
use crate::core::selection::{self, OptionFlags, Selection};
use crate::io::ConsoleIo;

pub const KEY_NEXT_PAGE: char = 'n';
pub const KEY_PREVIOUS_PAGE: char = 'p';
pub const KEY_BACK: char = 'b';
pub const KEY_TOP: char = 't';
pub const KEY_QUIT: char = 'q';

/// Everything `initialize` needs. Read-only once the navigator exists.
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub splash_lines: Vec<String>,
    pub main_menu: MenuHandle,
    pub small_headers: bool,
    pub logging_level: LoggingLevel,
    /// Offer quit on every menu instead of only the top one.
    pub quit_from_any_menu: bool,
}

impl ConsoleSettings {
    pub fn new(main_menu: MenuHandle) -> Self {
        Self {
            splash_lines: Vec::new(),
            main_menu,
            small_headers: false,
            logging_level: LoggingLevel::default(),
            quit_from_any_menu: false,
        }
    }
}

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered the sub-menu.
    Descend(MenuHandle),
    /// Returned to the parent menu.
    Ascend(MenuHandle),
    /// Jumped to the top menu.
    Top,
    /// Ran the action of the item at this index; true if it succeeded.
    Invoke { index: usize, ok: bool },
    /// Moved to this page of the same menu.
    PageChange(usize),
    /// Selected an item with neither sub-menu nor action.
    Redisplay,
    Exit,
}

pub struct Navigator {
    tree: MenuTree,
    top: MenuHandle,
    current: MenuHandle,
    console: Console,
    settings: ConsoleSettings,
    splash_shown: bool,
}

impl Navigator {
    /// Builds a navigator positioned at page 0 of the main menu.
    ///
    /// Every sub-menu handle in `tree` and `settings.main_menu` must come from
    /// `tree`. A malformed tree is a caller bug and panics on first use.
    pub fn initialize(settings: ConsoleSettings, mut tree: MenuTree, io: Box<dyn ConsoleIo>) -> Self {
        let top = settings.main_menu;
        {
            let main = tree.menu_mut(top);
            main.parent = None;
            main.current_page = pager::FIRST_PAGE;
        }
        let console = Console::new(io, settings.logging_level, settings.small_headers);
        info!(
            "Console initialized: {} menus, logging level {:?}, small headers {}",
            tree.len(),
            settings.logging_level,
            settings.small_headers
        );
        Self {
            tree,
            top,
            current: top,
            console,
            settings,
            splash_shown: false,
        }
    }

    pub fn current(&self) -> MenuHandle {
        self.current
    }

    pub fn top(&self) -> MenuHandle {
        self.top
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MenuTree {
        &mut self.tree
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Runs the session until the quit key is pressed.
    ///
    /// Only a failing key read ends it early; that error is returned.
    pub fn run(&mut self) -> io::Result<()> {
        self.show_splash();
        loop {
            if self.step()? == Transition::Exit {
                info!("Console session ended");
                return Ok(());
            }
        }
    }

    fn show_splash(&mut self) {
        if self.splash_shown {
            return;
        }
        self.splash_shown = true;
        if self.settings.splash_lines.is_empty() {
            return;
        }
        for line in &self.settings.splash_lines {
            self.console.print(LoggingLevel::Level0, line);
        }
        self.console.print_new_line(LoggingLevel::Level0);
    }

    /// One visit of the current menu: refresh, render, read, transition.
    pub fn step(&mut self) -> io::Result<Transition> {
        let range = self.prepare_current();
        let selections = self.navigation_selections();

        self.console.print_menu(self.tree.menu(self.current));
        let key = selection::prompt_and_get_response(
            &mut self.console,
            &selections,
            range.len(),
            OptionFlags::NONE,
        )?;

        let transition = self.dispatch(key, range.start);
        debug!("Key {:?} at menu {:?}: {:?}", key, self.current, transition);
        Ok(transition)
    }

    /// Runs a mutable menu's updater and pulls the page back into range.
    /// Returns the item range of the page about to be shown.
    fn prepare_current(&mut self) -> Range<usize> {
        let menu = self.tree.menu_mut(self.current);
        menu.refresh();
        let count = menu.item_count();
        let pages = pager::total_pages(count, PAGE_LENGTH);
        let clamped = pager::clamp_page(menu.current_page, pages);
        if clamped != menu.current_page {
            debug!(
                "Menu '{}' shrank to {} items, page {} -> {}",
                menu.id.name(),
                count,
                menu.current_page,
                clamped
            );
            menu.current_page = clamped;
        }
        pager::page_range(count, menu.current_page, PAGE_LENGTH)
    }

    /// Navigation options that make sense for the current menu and page.
    pub fn navigation_selections(&self) -> Vec<Selection> {
        let menu = self.tree.menu(self.current);
        let pages = pager::total_pages(menu.item_count(), PAGE_LENGTH);
        let at_top = self.current == self.top;

        let mut selections = Vec::new();
        if pager::can_page_forward(menu.current_page, pages) {
            selections.push(Selection::new(KEY_NEXT_PAGE, "Next page"));
        }
        if pager::can_page_backward(menu.current_page) {
            selections.push(Selection::new(KEY_PREVIOUS_PAGE, "Previous page"));
        }
        if !at_top && menu.parent.is_some() {
            selections.push(Selection::new(KEY_BACK, "Back"));
        }
        if !at_top && menu.parent != Some(self.top) {
            selections.push(Selection::new(KEY_TOP, "Top menu"));
        }
        if at_top || self.settings.quit_from_any_menu {
            selections.push(Selection::new(KEY_QUIT, "Quit"));
        }
        selections
    }

    fn dispatch(&mut self, key: char, page_start: usize) -> Transition {
        let current = self.current;
        match key {
            KEY_NEXT_PAGE => self.change_page(1),
            KEY_PREVIOUS_PAGE => self.change_page(-1),
            KEY_BACK => match self.tree.menu(current).parent {
                Some(parent) => {
                    self.current = parent;
                    Transition::Ascend(parent)
                }
                None => Transition::Redisplay,
            },
            KEY_TOP => {
                self.current = self.top;
                Transition::Top
            }
            KEY_QUIT => Transition::Exit,
            _ => match selection::slot_for_key(key, PAGE_LENGTH) {
                Some(slot) => self.select_item(page_start + slot),
                None => Transition::Redisplay,
            },
        }
    }

    fn change_page(&mut self, delta: isize) -> Transition {
        let menu = self.tree.menu_mut(self.current);
        let pages = pager::total_pages(menu.item_count(), PAGE_LENGTH);
        let page = menu.current_page.saturating_add_signed(delta);
        menu.current_page = pager::clamp_page(page, pages);
        Transition::PageChange(menu.current_page)
    }

    fn select_item(&mut self, index: usize) -> Transition {
        let current = self.current;
        let Some(item) = self.tree.menu_mut(current).items.get_mut(index) else {
            return Transition::Redisplay;
        };

        match &mut item.target {
            ItemTarget::SubMenu(sub) => {
                let sub = *sub;
                let menu = self.tree.menu_mut(sub);
                menu.parent = Some(current);
                menu.current_page = pager::FIRST_PAGE;
                self.current = sub;
                Transition::Descend(sub)
            }
            ItemTarget::Action(action) => {
                let name = item.id.name().to_string();
                debug!("Invoking action '{}'", name);
                let ok = match action.invoke(&mut self.console, NO_ARGS) {
                    Ok(()) => {
                        self.console
                            .print_success(LoggingLevel::Level2, format_args!("'{name}' completed"));
                        true
                    }
                    Err(e) => {
                        warn!("Action '{}' failed: {}", name, e);
                        self.console
                            .print_error(LoggingLevel::Level0, format_args!("'{name}' failed: {e}"));
                        false
                    }
                };
                Transition::Invoke { index, ok }
            }
            ItemTarget::None => Transition::Redisplay,
        }
    }
}
