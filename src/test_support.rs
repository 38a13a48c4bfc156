//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::Cell;
use std::rc::Rc;

use crate::core::console::Console;
use crate::core::menu::{ActionError, ActionResult, MenuHandle, MenuItem, MenuTree};

/// Menus used by the traversal tests.
///
/// ```text
/// Main (11 items, 2 pages)
/// ├── [0] Status        (no-op)
/// ├── [1] Shared      → Shared
/// ├── [2..9] item2..9   (no-op)
/// └── [10] Tools      → Tools      (page 2, slot 0)
/// Tools
/// ├── [0] Info          (no-op)
/// └── [1] Shared      → Shared
/// Shared
/// └── [0] Leaf          (no-op)
/// ```
pub struct DemoTree {
    pub tree: MenuTree,
    pub main: MenuHandle,
    pub tools: MenuHandle,
    pub shared: MenuHandle,
}

pub fn demo_tree() -> DemoTree {
    let mut tree = MenuTree::new();
    let main = tree.add_menu("Main", "Top level");
    let tools = tree.add_menu("Tools", "Diagnostics");
    let shared = tree.add_menu("Shared", "Reachable from two parents");

    tree.add_items(main, [
        MenuItem::empty("Status", "Nothing to see"),
        MenuItem::sub_menu("Shared", "Shared settings", shared),
    ]);
    tree.add_items(main, numbered_items(10).into_iter().skip(2));
    tree.add_items(main, [MenuItem::sub_menu("Tools", "Diagnostics", tools)]);

    tree.add_items(tools, [
        MenuItem::empty("Info", ""),
        MenuItem::sub_menu("Shared", "Shared settings", shared),
    ]);
    tree.add_items(shared, [MenuItem::empty("Leaf", "")]);

    DemoTree { tree, main, tools, shared }
}

/// `n` no-op items named `item0`, `item1`, ...
pub fn numbered_items(n: usize) -> Vec<MenuItem> {
    (0..n).map(|i| MenuItem::empty(format!("item{i}"), "")).collect()
}

/// An action that counts its invocations.
pub fn counting_action() -> (impl FnMut(&mut Console, &[&str]) -> ActionResult, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let action = move |_console: &mut Console, _args: &[&str]| -> ActionResult {
        counter.set(counter.get() + 1);
        Ok(())
    };
    (action, calls)
}

/// An action that always fails with `message`.
pub fn failing_action(message: &'static str) -> impl FnMut(&mut Console, &[&str]) -> ActionResult {
    move |_console: &mut Console, _args: &[&str]| Err(ActionError::Failed(message.to_string()))
}
