//! Event Catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    bundles::Bundle,
    ids::{BundleId, ItemId},
    items::RequestedItem,
    request::{CoverRequest, RequestError},
    selection::Selection,
};

/// Errors related to catalog construction and lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// An item with the same identifier is already in the catalog.
    #[error("Item {0} is already in the catalog")]
    DuplicateItem(ItemId),

    /// A bundle with the same identifier is already in the catalog.
    #[error("Bundle {0} is already in the catalog")]
    DuplicateBundle(BundleId),

    /// An item was not found in the catalog.
    #[error("Item {0} not found")]
    UnknownItem(String),

    /// A bundle was not found in the catalog.
    #[error("Bundle {0} not found")]
    UnknownBundle(String),

    /// Wrapped request validation error.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Everything an event sells: its items and its bundles, in one currency.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    name: String,
    currency: &'static Currency,
    items: Vec<RequestedItem<'a>>,
    bundles: Vec<Bundle<'a>>,
    item_keys: FxHashMap<ItemId, usize>,
    bundle_keys: FxHashMap<BundleId, usize>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new(name: impl Into<String>, currency: &'static Currency) -> Self {
        Self {
            name: name.into(),
            currency,
            items: Vec::new(),
            bundles: Vec::new(),
            item_keys: FxHashMap::default(),
            bundle_keys: FxHashMap::default(),
        }
    }

    /// Add an item.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the identifier is taken, or the price is
    /// negative or in another currency.
    pub fn add_item(&mut self, item: RequestedItem<'a>) -> Result<&mut Self, CatalogError> {
        if self.item_keys.contains_key(item.id()) {
            return Err(CatalogError::DuplicateItem(item.id().clone()));
        }

        let currency = item.price().currency();

        if currency != self.currency {
            return Err(RequestError::ItemCurrencyMismatch(
                self.items.len(),
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            )
            .into());
        }

        if item.price().to_minor_units() < 0 {
            return Err(RequestError::NegativeItemPrice(item.id().clone()).into());
        }

        self.item_keys.insert(item.id().clone(), self.items.len());
        self.items.push(item);

        Ok(self)
    }

    /// Add a bundle. Its coverage may name items the catalog does not sell.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the identifier is taken, or the price is
    /// negative or in another currency.
    pub fn add_bundle(&mut self, bundle: Bundle<'a>) -> Result<&mut Self, CatalogError> {
        if self.bundle_keys.contains_key(bundle.id()) {
            return Err(CatalogError::DuplicateBundle(bundle.id().clone()));
        }

        let currency = bundle.price().currency();

        if currency != self.currency {
            return Err(RequestError::BundleCurrencyMismatch(
                self.bundles.len(),
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            )
            .into());
        }

        if bundle.price().to_minor_units() < 0 {
            return Err(RequestError::NegativeBundlePrice(bundle.id().clone()).into());
        }

        self.bundle_keys
            .insert(bundle.id().clone(), self.bundles.len());
        self.bundles.push(bundle);

        Ok(self)
    }

    /// Catalog name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog currency
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Every item, in the order it was added
    pub fn items(&self) -> &[RequestedItem<'a>] {
        &self.items
    }

    /// Every bundle, in the order it was added
    pub fn bundles(&self) -> &[Bundle<'a>] {
        &self.bundles
    }

    /// Get an item by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the item is not found.
    pub fn item(&self, id: &str) -> Result<&RequestedItem<'a>, CatalogError> {
        self.item_keys
            .get(id)
            .and_then(|idx| self.items.get(*idx))
            .ok_or_else(|| CatalogError::UnknownItem(id.to_string()))
    }

    /// Get a bundle by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBundle`] if the bundle is not found.
    pub fn bundle(&self, id: &str) -> Result<&Bundle<'a>, CatalogError> {
        self.bundle_keys
            .get(id)
            .and_then(|idx| self.bundles.get(*idx))
            .ok_or_else(|| CatalogError::UnknownBundle(id.to_string()))
    }

    /// The catalog items a bundle includes, in bundle order. Identifiers the
    /// catalog does not sell are skipped.
    pub fn bundle_items<'c>(
        &'c self,
        bundle: &'c Bundle<'a>,
    ) -> impl Iterator<Item = &'c RequestedItem<'a>> + 'c {
        bundle
            .coverage()
            .iter()
            .filter_map(|id| self.item(id.as_str()).ok())
    }

    /// Build a solver request for the given item identifiers, offering every
    /// catalog bundle.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an item is unknown or requested twice.
    pub fn request_items<I, S>(&self, ids: I) -> Result<CoverRequest<'a>, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = ids
            .into_iter()
            .map(|id| self.item(id.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CoverRequest::new(
            items,
            self.bundles.iter().cloned(),
            self.currency,
        )?)
    }

    /// Build a solver request for everything the selection asks for.
    ///
    /// Items reached only through a selected bundle are skipped when the
    /// catalog does not sell them, as in [`Catalog::bundle_items`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a directly picked item is unknown.
    pub fn request(&self, selection: &Selection) -> Result<CoverRequest<'a>, CatalogError> {
        let mut items = Vec::new();

        for id in selection.requested_item_ids() {
            match self.item(id.as_str()) {
                Ok(item) => items.push(item.clone()),
                Err(err) if selection.has_item(id.as_str()) => return Err(err),
                Err(_) => debug!(item = %id, "bundle item not in catalog; skipping"),
            }
        }

        Ok(CoverRequest::new(
            items,
            self.bundles.iter().cloned(),
            self.currency,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn catalog<'a>() -> Result<Catalog<'a>, CatalogError> {
        let mut catalog = Catalog::new("Weekender", GBP);

        catalog
            .add_item(RequestedItem::with_name(
                "fri",
                "Friday Party",
                Money::from_minor(1500, GBP),
            ))?
            .add_item(RequestedItem::with_name(
                "sat",
                "Saturday Party",
                Money::from_minor(2000, GBP),
            ))?
            .add_bundle(Bundle::new(
                "parties",
                "Party Pass",
                Money::from_minor(3000, GBP),
                ["fri", "sat", "retired-item"],
            ))?;

        Ok(catalog)
    }

    #[test]
    fn lookups_by_identifier() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(catalog.item("sat")?.name(), "Saturday Party");
        assert_eq!(catalog.bundle("parties")?.name(), "Party Pass");
        assert_eq!(
            catalog.item("sun").err(),
            Some(CatalogError::UnknownItem("sun".to_string()))
        );
        assert_eq!(
            catalog.bundle("vip").err(),
            Some(CatalogError::UnknownBundle("vip".to_string()))
        );

        Ok(())
    }

    #[test]
    fn duplicate_identifiers_are_rejected() -> TestResult {
        let mut catalog = catalog()?;

        let item = catalog.add_item(RequestedItem::new("fri", Money::from_minor(1, GBP)));
        assert!(matches!(item, Err(CatalogError::DuplicateItem(_))));

        let bundle = catalog.add_bundle(Bundle::new(
            "parties",
            "Again",
            Money::from_minor(1, GBP),
            ["fri"],
        ));
        assert!(matches!(bundle, Err(CatalogError::DuplicateBundle(_))));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let mut catalog = Catalog::new("Weekender", GBP);

        let result = catalog.add_item(RequestedItem::new("fri", Money::from_minor(1500, USD)));

        assert!(matches!(
            result,
            Err(CatalogError::Request(RequestError::ItemCurrencyMismatch(
                0, _, _
            )))
        ));
    }

    #[test]
    fn bundle_items_skip_unknown_identifiers() -> TestResult {
        let catalog = catalog()?;
        let bundle = catalog.bundle("parties")?;

        let names: Vec<&str> = catalog
            .bundle_items(bundle)
            .map(RequestedItem::name)
            .collect();

        assert_eq!(names, vec!["Friday Party", "Saturday Party"]);

        Ok(())
    }

    #[test]
    fn request_resolves_selection() -> TestResult {
        let catalog = catalog()?;
        let mut selection = Selection::new();
        selection.add_item("sat");

        let request = catalog.request(&selection)?;

        assert_eq!(request.len(), 1);
        assert_eq!(request.bundles().len(), 1);
        assert_eq!(request.currency(), GBP);

        Ok(())
    }

    #[test]
    fn request_skips_bundle_items_not_in_catalog() -> TestResult {
        let catalog = catalog()?;
        let mut selection = Selection::new();
        selection.toggle_bundle(catalog.bundle("parties")?);

        let request = catalog.request(&selection)?;

        let ids: Vec<&str> = request.items().iter().map(|item| item.id().as_str()).collect();

        assert_eq!(ids, vec!["fri", "sat"]);

        Ok(())
    }

    #[test]
    fn request_with_unknown_picked_item_errors() -> TestResult {
        let catalog = catalog()?;
        let mut selection = Selection::new();
        selection.add_item("retired-item");
        selection.toggle_bundle(catalog.bundle("parties")?);

        assert_eq!(
            catalog.request(&selection).err(),
            Some(CatalogError::UnknownItem("retired-item".to_string()))
        );

        Ok(())
    }

    #[test]
    fn request_with_unknown_item_errors() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(
            catalog.request_items(["fri", "sun"]).err(),
            Some(CatalogError::UnknownItem("sun".to_string()))
        );

        Ok(())
    }
}
