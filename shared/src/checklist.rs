//! Read-only trip checklist: gear grouping and per-view completion marks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{BASE_GEAR, SUBPACKS};

pub const BASE_GEAR_TITLE: &str = "Base Gear";
pub const CUSTOM_GEAR_TITLE: &str = "Custom/Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearGroup {
    pub title: String,
    pub items: Vec<String>,
}

/// Partitions a trip's gear for display.
///
/// "Base Gear" is always present and lists selected base items in built-in
/// order. Each subpack gets a group with its selected items in pack order,
/// omitted when empty; an item shared by several packs shows in each.
/// Anything else lands in "Custom/Other" in the trip's own order,
/// also omitted when empty.
#[must_use]
pub fn group_gear(gear: &[String]) -> Vec<GearGroup> {
    let selected = |item: &&str| gear.iter().any(|g| g == item);
    let mut groups = Vec::with_capacity(SUBPACKS.len() + 2);

    groups.push(GearGroup {
        title: BASE_GEAR_TITLE.to_string(),
        items: BASE_GEAR.iter().copied().filter(selected).map(String::from).collect(),
    });

    for pack in SUBPACKS {
        let items: Vec<String> = pack
            .items
            .iter()
            .copied()
            .filter(selected)
            .map(String::from)
            .collect();
        if !items.is_empty() {
            groups.push(GearGroup {
                title: pack.name.to_string(),
                items,
            });
        }
    }

    let custom: Vec<String> = gear
        .iter()
        .filter(|item| {
            !BASE_GEAR.contains(&item.as_str())
                && !SUBPACKS.iter().any(|pack| pack.items.contains(&item.as_str()))
        })
        .cloned()
        .collect();
    if !custom.is_empty() {
        groups.push(GearGroup {
            title: CUSTOM_GEAR_TITLE.to_string(),
            items: custom,
        });
    }

    groups
}

/// Packed gear and finished chores for the trip on screen. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMarks {
    packed_gear: HashSet<String>,
    done_chores: HashSet<String>,
}

fn toggle(set: &mut HashSet<String>, item: &str) -> bool {
    if set.remove(item) {
        false
    } else {
        set.insert(item.to_string());
        true
    }
}

impl CompletionMarks {
    /// Returns the new state.
    pub fn toggle_packed(&mut self, item: &str) -> bool {
        toggle(&mut self.packed_gear, item)
    }

    /// Returns the new state.
    pub fn toggle_done(&mut self, item: &str) -> bool {
        toggle(&mut self.done_chores, item)
    }

    #[must_use]
    pub fn is_packed(&self, item: &str) -> bool {
        self.packed_gear.contains(item)
    }

    #[must_use]
    pub fn is_done(&self, item: &str) -> bool {
        self.done_chores.contains(item)
    }
}
