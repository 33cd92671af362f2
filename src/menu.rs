use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// One configured setup task, as supplied by a catalog file or the built-in list.
#[derive(Debug, Deserialize, Clone)]
pub struct MenuEntry {
    pub label: String,
    #[serde(default, alias = "description")]
    pub desc: Option<String>,
    /// Identifier of the script this entry runs, resolved against the scripts dir.
    pub script: String,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
    #[serde(default, alias = "items")]
    pub entries: Vec<MenuEntry>,
}

/// What a menu item does when selected. Opaque to the menu itself; the
/// resolver turns `Script`/`Executable` into a runnable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRef {
    /// Named script looked up in the scripts directory, then the root.
    Script(String),
    /// Direct path to a program.
    Executable(PathBuf),
    /// Synthetic "run everything" entry; expands to every concrete action.
    Aggregate,
    /// Leave the menu.
    Exit,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub desc: Option<String>,
    pub action: ActionRef,
    pub is_aggregate: bool,
}

/// Ordered, fixed list of selectable items for one screen.
#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu has no entries")]
    Empty,
    #[error("menu entry has a blank label")]
    BlankLabel,
}

impl Menu {
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Labels and actions of the concrete items, in declaration order.
    /// Aggregate and exit entries are skipped; this is what the aggregate
    /// item expands to.
    #[must_use]
    pub fn concrete_tasks(&self) -> Vec<(String, ActionRef)> {
        self.items
            .iter()
            .filter(|it| {
                matches!(it.action, ActionRef::Script(_) | ActionRef::Executable(_))
            })
            .map(|it| (it.label.clone(), it.action.clone()))
            .collect()
    }
}

/// Build a menu from caller-supplied entries. With `include_all` an
/// aggregate "run everything" item is prepended at index 0.
///
/// # Errors
/// Returns `MenuError::Empty` when `entries` is empty, and
/// `MenuError::BlankLabel` when any entry would render as a blank row.
pub fn build_menu(entries: &[MenuEntry], include_all: bool) -> Result<Menu, MenuError> {
    if entries.is_empty() {
        return Err(MenuError::Empty);
    }
    if entries.iter().any(|e| e.label.trim().is_empty()) {
        return Err(MenuError::BlankLabel);
    }
    let mut items = Vec::with_capacity(entries.len() + 1);
    if include_all {
        items.push(MenuItem {
            label: "Run everything".to_string(),
            desc: Some("Run every task below, in order".to_string()),
            action: ActionRef::Aggregate,
            is_aggregate: true,
        });
    }
    for e in entries {
        items.push(MenuItem {
            label: e.label.clone(),
            desc: e.desc.clone(),
            action: ActionRef::Script(e.script.clone()),
            is_aggregate: false,
        });
    }
    Ok(Menu { items })
}

pub fn append_exit_item(menu: &mut Menu) {
    menu.items.push(MenuItem {
        label: "Exit".to_string(),
        desc: Some("Quit the setup menu".to_string()),
        action: ActionRef::Exit,
        is_aggregate: false,
    });
}

/// Loads a task catalog from TOML, YAML or JSON depending on extension.
///
/// # Errors
/// Returns error if the file cannot be read, the format is unsupported, or
/// parsing fails.
pub fn load_catalog(path: &Path) -> Result<Vec<MenuEntry>> {
    let contents = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    let catalog: Catalog = match ext.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        Some("toml") => toml::from_str(&contents)?,
        _ => anyhow::bail!("unsupported catalog format: {}", path.display()),
    };
    Ok(catalog.entries)
}
