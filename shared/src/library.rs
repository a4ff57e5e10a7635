use serde::{Deserialize, Serialize};

use crate::catalog::ChecklistCategory;

/// Trims `item` and appends it unless it is empty or already present.
/// Returns `true` when the list changed.
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    let item = item.trim();
    if item.is_empty() || list.iter().any(|existing| existing == item) {
        return false;
    }
    list.push(item.to_owned());
    true
}

/// User-added catalog entries, one ordered set per category.
///
/// Built-ins are never stored here; [`ChecklistLibrary::catalog`] merges them
/// in at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistLibrary {
    gear: Vec<String>,
    chores: Vec<String>,
    downloads: Vec<String>,
}

impl ChecklistLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user_items(&self, category: ChecklistCategory) -> &[String] {
        match category {
            ChecklistCategory::Gear => &self.gear,
            ChecklistCategory::Chore => &self.chores,
            ChecklistCategory::Download => &self.downloads,
        }
    }

    fn user_items_mut(&mut self, category: ChecklistCategory) -> &mut Vec<String> {
        match category {
            ChecklistCategory::Gear => &mut self.gear,
            ChecklistCategory::Chore => &mut self.chores,
            ChecklistCategory::Download => &mut self.downloads,
        }
    }

    /// Effective selectable entries: built-ins (plus subpack items for gear),
    /// then user entries, first occurrence wins.
    #[must_use]
    pub fn catalog(&self, category: ChecklistCategory) -> Vec<String> {
        let mut merged = Vec::new();
        for item in category.builtins() {
            push_unique(&mut merged, item);
        }
        for item in self.user_items(category) {
            push_unique(&mut merged, item);
        }
        merged
    }

    /// Adds a trimmed entry to the user catalog. Returns `true` if it was new.
    pub fn remember(&mut self, category: ChecklistCategory, item: &str) -> bool {
        push_unique(self.user_items_mut(category), item)
    }

    /// Removes an entry from the user catalog only. Returns `true` if it was present.
    pub fn forget(&mut self, category: ChecklistCategory, item: &str) -> bool {
        let item = item.trim();
        let items = self.user_items_mut(category);
        let before = items.len();
        items.retain(|existing| existing != item);
        items.len() != before
    }

    /// Replaces a category with entries read from storage, dropping blanks and
    /// duplicates.
    pub fn restore(&mut self, category: ChecklistCategory, stored: Vec<String>) {
        let items = self.user_items_mut(category);
        items.clear();
        for item in &stored {
            push_unique(items, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_unique_trims_and_dedups() {
        let mut list = vec!["Tent".to_string()];
        assert!(!push_unique(&mut list, "  Tent "));
        assert!(!push_unique(&mut list, "   "));
        assert!(push_unique(&mut list, " Stove "));
        assert_eq!(list, vec!["Tent", "Stove"]);
    }

    #[test]
    fn test_catalog_orders_builtins_then_user_items() {
        let mut library = ChecklistLibrary::new();
        library.remember(ChecklistCategory::Download, "Podcast");
        library.remember(ChecklistCategory::Download, "Book");

        assert_eq!(
            library.catalog(ChecklistCategory::Download),
            vec!["Offline Map", "Book", "Movie", "Music", "Podcast"]
        );
    }

    #[test]
    fn test_gear_catalog_collapses_shared_subpack_items() {
        let catalog = ChecklistLibrary::new().catalog(ChecklistCategory::Gear);
        assert_eq!(catalog.iter().filter(|item| *item == "Sunglasses").count(), 1);
        assert_eq!(catalog.iter().filter(|item| *item == "Gloves").count(), 1);
        assert_eq!(catalog.first().map(String::as_str), Some("Tent"));
    }

    #[test]
    fn test_remember_twice_adds_once() {
        let mut library = ChecklistLibrary::new();
        assert!(library.remember(ChecklistCategory::Gear, "Camp stove"));
        assert!(!library.remember(ChecklistCategory::Gear, " Camp stove "));

        let catalog = library.catalog(ChecklistCategory::Gear);
        assert_eq!(catalog.iter().filter(|item| *item == "Camp stove").count(), 1);
        assert_eq!(library.user_items(ChecklistCategory::Gear), ["Camp stove"]);
    }

    #[test]
    fn test_remember_ignores_blank_entries() {
        let mut library = ChecklistLibrary::new();
        assert!(!library.remember(ChecklistCategory::Chore, ""));
        assert!(!library.remember(ChecklistCategory::Chore, " \t "));
        assert!(library.user_items(ChecklistCategory::Chore).is_empty());
    }

    #[test]
    fn test_forget_builtin_leaves_catalog_unchanged() {
        let mut library = ChecklistLibrary::new();
        let before = library.catalog(ChecklistCategory::Chore);

        assert!(!library.forget(ChecklistCategory::Chore, "Dishes"));
        assert_eq!(library.catalog(ChecklistCategory::Chore), before);
    }

    #[test]
    fn test_forget_removes_user_item() {
        let mut library = ChecklistLibrary::new();
        library.remember(ChecklistCategory::Chore, "Water plants");

        assert!(library.forget(ChecklistCategory::Chore, "Water plants"));
        assert!(!library.forget(ChecklistCategory::Chore, "Water plants"));
        assert!(!library
            .catalog(ChecklistCategory::Chore)
            .contains(&"Water plants".to_string()));
    }

    #[test]
    fn test_restore_sanitizes_stored_entries() {
        let mut library = ChecklistLibrary::new();
        library.restore(
            ChecklistCategory::Gear,
            vec![" Kayak ".into(), String::new(), "Kayak".into(), "Paddle".into()],
        );
        assert_eq!(library.user_items(ChecklistCategory::Gear), ["Kayak", "Paddle"]);
    }

    fn category() -> impl Strategy<Value = ChecklistCategory> {
        prop_oneof![
            Just(ChecklistCategory::Gear),
            Just(ChecklistCategory::Chore),
            Just(ChecklistCategory::Download),
        ]
    }

    proptest! {
        #[test]
        fn prop_catalog_has_no_duplicates_and_keeps_builtins(
            category in category(),
            items in proptest::collection::vec("[ a-zA-Z]{0,12}", 0..16),
        ) {
            let mut library = ChecklistLibrary::new();
            for item in &items {
                library.remember(category, item);
            }
            let catalog = library.catalog(category);

            let mut seen = std::collections::HashSet::new();
            for entry in &catalog {
                prop_assert!(seen.insert(entry.clone()), "duplicate entry {entry:?}");
                prop_assert!(!entry.trim().is_empty());
                prop_assert_eq!(entry.trim(), entry.as_str());
            }
            for builtin in category.builtins() {
                prop_assert!(catalog.iter().any(|entry| entry == builtin));
            }
        }
    }
}
