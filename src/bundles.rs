//! Bundles

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::ids::{BundleId, ItemId};

/// A priced package covering a fixed set of items.
///
/// Coverage may name items that are not part of a given request; those entries
/// are ignored when solving but never reduce the bundle price.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle<'a> {
    id: BundleId,
    name: String,
    price: Money<'a, Currency>,
    coverage: SmallVec<[ItemId; 8]>,
}

impl<'a> Bundle<'a> {
    /// Creates a new bundle.
    pub fn new<I, C>(
        id: impl Into<BundleId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        coverage: C,
    ) -> Self
    where
        C: IntoIterator<Item = I>,
        I: Into<ItemId>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            coverage: coverage.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the identifier of the bundle
    pub fn id(&self) -> &BundleId {
        &self.id
    }

    /// Returns the display name of the bundle
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of the bundle
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the identifiers of every item the bundle includes.
    pub fn coverage(&self) -> &[ItemId] {
        &self.coverage
    }

    /// Whether the bundle includes the given item.
    pub fn covers(&self, item: &str) -> bool {
        self.coverage.iter().any(|id| id.as_str() == item)
    }
}
