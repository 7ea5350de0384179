//! Pass Selection
//!
//! What the buyer has picked in the pass picker: individual items, and bundles
//! whose included items they want. The selection only records identifiers;
//! pricing happens once it is resolved against a [`Catalog`](crate::catalog::Catalog).

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    bundles::Bundle,
    ids::{BundleId, ItemId},
};

/// A bundle toggled on in the selection, with the items it includes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedBundle {
    id: BundleId,
    includes: SmallVec<[ItemId; 8]>,
}

/// Buyer's current picks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<ItemId>,
    bundles: Vec<SelectedBundle>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the bundle's items, or deselect them if the bundle is already selected.
    pub fn toggle_bundle(&mut self, bundle: &Bundle<'_>) {
        if let Some(pos) = self.bundles.iter().position(|b| &b.id == bundle.id()) {
            self.bundles.remove(pos);
            return;
        }

        self.bundles.push(SelectedBundle {
            id: bundle.id().clone(),
            includes: bundle.coverage().iter().cloned().collect(),
        });
    }

    /// Select the item, or deselect it if it is already selected.
    pub fn toggle_item(&mut self, id: impl Into<ItemId>) {
        let id = id.into();

        if let Some(pos) = self.items.iter().position(|item| item == &id) {
            self.items.remove(pos);
        } else {
            self.items.push(id);
        }
    }

    /// Select the item unless it is already selected.
    pub fn add_item(&mut self, id: impl Into<ItemId>) {
        let id = id.into();

        if !self.items.contains(&id) {
            self.items.push(id);
        }
    }

    /// Deselect the item if it is selected.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.as_str() != id);
    }

    /// Clear every pick.
    pub fn reset(&mut self) {
        self.items.clear();
        self.bundles.clear();
    }

    /// Whether the item was picked directly.
    pub fn has_item(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.as_str() == id)
    }

    /// Whether the bundle is toggled on.
    pub fn has_bundle(&self, id: &str) -> bool {
        self.bundles.iter().any(|bundle| bundle.id.as_str() == id)
    }

    /// Check if nothing is picked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.bundles.is_empty()
    }

    /// Items the buyer wants: direct picks in order, then each selected bundle's
    /// included items. Each item appears once, at its first position.
    pub fn requested_item_ids(&self) -> Vec<ItemId> {
        let mut seen = FxHashSet::default();

        self.items
            .iter()
            .chain(self.bundles.iter().flat_map(|bundle| bundle.includes.iter()))
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};

    use super::*;

    fn weekend<'a>() -> Bundle<'a> {
        Bundle::new(
            "weekend",
            "Weekend Pass",
            Money::from_minor(4500, GBP),
            ["fri-party", "sat-party", "sun-party"],
        )
    }

    fn ids(values: &[&str]) -> Vec<ItemId> {
        values.iter().map(|id| ItemId::from(*id)).collect()
    }

    #[test]
    fn toggle_bundle_adds_then_removes() {
        let mut selection = Selection::new();
        let bundle = weekend();

        selection.toggle_bundle(&bundle);
        assert!(selection.has_bundle("weekend"));
        assert_eq!(
            selection.requested_item_ids(),
            ids(&["fri-party", "sat-party", "sun-party"])
        );

        selection.toggle_bundle(&bundle);
        assert!(!selection.has_bundle("weekend"));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_item_adds_then_removes() {
        let mut selection = Selection::new();

        selection.toggle_item("sat-class");
        assert!(selection.has_item("sat-class"));

        selection.toggle_item("sat-class");
        assert!(!selection.has_item("sat-class"));
    }

    #[test]
    fn add_item_is_idempotent() {
        let mut selection = Selection::new();

        selection.add_item("sat-class");
        selection.add_item("sat-class");

        assert_eq!(selection.requested_item_ids(), ids(&["sat-class"]));
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let mut selection = Selection::new();
        selection.add_item("sat-class");

        selection.remove_item("sun-class");
        assert_eq!(selection.requested_item_ids(), ids(&["sat-class"]));

        selection.remove_item("sat-class");
        assert!(selection.is_empty());
    }

    #[test]
    fn requested_ids_put_direct_picks_first_without_duplicates() {
        let mut selection = Selection::new();

        selection.add_item("sat-class");
        selection.add_item("sat-party");
        selection.toggle_bundle(&weekend());

        assert_eq!(
            selection.requested_item_ids(),
            ids(&["sat-class", "sat-party", "fri-party", "sun-party"])
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut selection = Selection::new();

        selection.add_item("sat-class");
        selection.toggle_bundle(&weekend());
        selection.reset();

        assert!(selection.is_empty());
        assert!(selection.requested_item_ids().is_empty());
    }
}
