//! Role menus: the navigation entries each role exposes, merged with the same
//! fold-and-deduplicate approach as privileges.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Menu identifier as issued by the backend (numeric or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: MenuId,
    pub route: String,
    pub caption: String,
}

/// One element of the role-menu payload: `{"menu": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleMenu {
    pub menu: MenuEntry,
}

/// Merge per-role menus, keeping one entry per id, ordered by id.
///
/// When two roles disagree on an id's route or caption the smallest
/// `(route, caption)` wins, so the result does not depend on fold order.
pub fn merge_menus<I>(per_role: I) -> Vec<MenuEntry>
where
    I: IntoIterator<Item = Vec<MenuEntry>>,
{
    let mut merged: BTreeMap<MenuId, MenuEntry> = BTreeMap::new();
    for entries in per_role {
        for entry in entries {
            match merged.entry(entry.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(mut slot) => {
                    if sort_key(&entry) < sort_key(slot.get()) {
                        slot.insert(entry);
                    }
                }
            }
        }
    }
    merged.into_values().collect()
}

fn sort_key(entry: &MenuEntry) -> (&str, &str) {
    (&entry.route, &entry.caption)
}
