//! Menu bar and toolbar model.
//!
//! Pure state: which menu is open and which items are enabled. A front-end
//! hit-tests its own geometry and calls [`MenuBar::toggle`] /
//! [`MenuBar::activate`]; the returned `Action` goes to the dispatcher.

use core_events::{KeyCode, KeyEvent};
use core_state::EditSession;
use tracing::trace;

use crate::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: Action,
    pub enabled: bool,
    pub shortcut: Option<KeyEvent>,
}

impl MenuItem {
    fn new(label: &'static str, action: Action, shortcut: Option<KeyEvent>) -> Self {
        Self {
            label,
            action,
            enabled: true,
            shortcut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBar {
    pub menus: Vec<Menu>,
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuBar {
    /// File / Edit / View.
    pub fn new() -> Self {
        let ctrl = |c| Some(KeyEvent::ctrl(c));
        let file = Menu {
            title: "File",
            open: false,
            items: vec![
                MenuItem::new("New", Action::NewFile, ctrl('n')),
                MenuItem::new("Open...", Action::OpenFile(None), ctrl('o')),
                MenuItem::new("Save", Action::Save, ctrl('s')),
                MenuItem::new("Save As...", Action::SaveAs(None), None),
                MenuItem::new("Exit", Action::Exit { force: false }, None),
            ],
        };
        let edit = Menu {
            title: "Edit",
            open: false,
            items: vec![
                MenuItem::new("Cut", Action::Cut, ctrl('x')),
                MenuItem::new("Copy", Action::Copy, ctrl('c')),
                MenuItem::new("Paste", Action::Paste, ctrl('v')),
                MenuItem::new("Select All", Action::SelectAll, ctrl('a')),
            ],
        };
        let view = Menu {
            title: "View",
            open: false,
            items: vec![MenuItem::new(
                "Fullscreen",
                Action::ToggleFullscreen,
                Some(KeyEvent::plain(KeyCode::F(11))),
            )],
        };
        Self {
            menus: vec![file, edit, view],
        }
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.menus.iter().position(|m| m.open)
    }

    /// Flip menu `idx`; every other menu closes.
    pub fn toggle(&mut self, idx: usize) {
        for (i, m) in self.menus.iter_mut().enumerate() {
            m.open = if i == idx { !m.open } else { false };
        }
        trace!(target: "actions.menu", idx, open = ?self.open_menu(), "menu_toggle");
    }

    pub fn close_all(&mut self) {
        for m in &mut self.menus {
            m.open = false;
        }
    }

    /// Activate `item` of the open menu `menu`. Disabled items and closed
    /// menus yield nothing and leave the menu open; success closes it.
    pub fn activate(&mut self, menu: usize, item: usize) -> Option<Action> {
        let m = self.menus.get_mut(menu)?;
        if !m.open {
            return None;
        }
        let entry = m.items.get(item)?;
        if !entry.enabled {
            return None;
        }
        let action = entry.action.clone();
        m.open = false;
        trace!(target: "actions.menu", menu = m.title, item = entry.label, "menu_activate");
        Some(action)
    }

    /// Locate an item by menu title and label, ignoring case and a
    /// trailing `...`.
    pub fn find(&self, title: &str, label: &str) -> Option<(usize, usize)> {
        let bare = |l: &str| l.trim_end_matches("...").to_ascii_lowercase();
        let label = bare(label);
        self.menus.iter().enumerate().find_map(|(mi, m)| {
            m.title
                .eq_ignore_ascii_case(title)
                .then(|| m.items.iter().position(|it| bare(it.label) == label))
                .flatten()
                .map(|ii| (mi, ii))
        })
    }

    /// Enable Cut / Copy only while a non-empty selection exists.
    pub fn sync_with(&mut self, session: &EditSession) {
        let has_selection = session
            .selected_range_or_none()
            .is_some_and(|r| !r.is_empty());
        for m in &mut self.menus {
            for it in &mut m.items {
                if matches!(it.action, Action::Cut | Action::Copy) {
                    it.enabled = has_selection;
                }
            }
        }
    }
}

/// Run / Debug buttons beside the menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub buttons: Vec<(&'static str, Action)>,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self {
            buttons: vec![("Run", Action::Run), ("Debug", Action::Debug)],
        }
    }
}

impl Toolbar {
    pub fn press(&self, idx: usize) -> Option<Action> {
        self.buttons.get(idx).map(|(_, a)| a.clone())
    }

    pub fn press_label(&self, label: &str) -> Option<Action> {
        let idx = self.buttons.iter().position(|(l, _)| *l == label)?;
        self.press(idx)
    }
}
