//! Cover Requests

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    bundles::Bundle,
    ids::{BundleId, ItemId},
    items::RequestedItem,
};

/// Errors related to request construction.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    /// An item's currency differs from the request currency (index, item currency, request currency).
    #[error("Item {0} has currency {1}, but request has currency {2}")]
    ItemCurrencyMismatch(usize, &'static str, &'static str),

    /// A bundle's currency differs from the request currency (index, bundle currency, request currency).
    #[error("Bundle {0} has currency {1}, but request has currency {2}")]
    BundleCurrencyMismatch(usize, &'static str, &'static str),

    /// An item has a negative price.
    #[error("Item {0} has a negative price")]
    NegativeItemPrice(ItemId),

    /// A bundle has a negative price.
    #[error("Bundle {0} has a negative price")]
    NegativeBundlePrice(BundleId),

    /// The same item was requested more than once.
    #[error("Item {0} requested more than once")]
    DuplicateItem(ItemId),
}

/// Validated solver input: the requested items, the bundles on offer and the currency.
///
/// Item order is significant: it fixes the bit position of every item and
/// therefore which of several equal-cost covers the solvers report.
#[derive(Debug, Clone)]
pub struct CoverRequest<'a> {
    items: SmallVec<[RequestedItem<'a>; 10]>,
    bundles: Vec<Bundle<'a>>,
    currency: &'static Currency,
}

impl<'a> CoverRequest<'a> {
    /// Create a new request.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if an item or bundle is priced in another
    /// currency or below zero, or if an item is requested twice.
    pub fn new(
        items: impl IntoIterator<Item = RequestedItem<'a>>,
        bundles: impl IntoIterator<Item = Bundle<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, RequestError> {
        let items: SmallVec<[RequestedItem<'a>; 10]> = items.into_iter().collect();
        let bundles: Vec<Bundle<'a>> = bundles.into_iter().collect();

        validate_items(&items, currency)?;

        for (i, bundle) in bundles.iter().enumerate() {
            let bundle_currency = bundle.price().currency();

            if bundle_currency != currency {
                return Err(RequestError::BundleCurrencyMismatch(
                    i,
                    bundle_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if bundle.price().to_minor_units() < 0 {
                return Err(RequestError::NegativeBundlePrice(bundle.id().clone()));
            }
        }

        Ok(Self {
            items,
            bundles,
            currency,
        })
    }

    /// Requested items, in request order.
    pub fn items(&self) -> &[RequestedItem<'a>] {
        &self.items
    }

    /// Bundles on offer, in catalog order.
    pub fn bundles(&self) -> &[Bundle<'a>] {
        &self.bundles
    }

    /// Get a requested item by its index.
    pub fn item(&self, idx: usize) -> Option<&RequestedItem<'a>> {
        self.items.get(idx)
    }

    /// Get a bundle by its index.
    pub fn bundle(&self, idx: usize) -> Option<&Bundle<'a>> {
        self.bundles.get(idx)
    }

    /// Get the currency of the request.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the number of requested items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Price of buying every requested item on its own. Zero for an empty request.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the sum cannot be formed.
    pub fn individual_total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                acc.add(*item.price())
            })
    }
}

fn validate_items(
    items: &[RequestedItem<'_>],
    currency: &'static Currency,
) -> Result<(), RequestError> {
    let mut seen = FxHashSet::default();

    for (i, item) in items.iter().enumerate() {
        let item_currency = item.price().currency();

        if item_currency != currency {
            return Err(RequestError::ItemCurrencyMismatch(
                i,
                item_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if item.price().to_minor_units() < 0 {
            return Err(RequestError::NegativeItemPrice(item.id().clone()));
        }

        if !seen.insert(item.id().as_str()) {
            return Err(RequestError::DuplicateItem(item.id().clone()));
        }
    }

    Ok(())
}
