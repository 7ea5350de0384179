//! Fixtures

use std::{fs, path::PathBuf};

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    bundles::Bundle,
    catalog::{Catalog, CatalogError},
    ids::{BundleId, ItemId},
    items::RequestedItem,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Catalog validation error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Catalog file layout
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Event name
    pub name: String,

    /// ISO 4217 currency code shared by every price
    pub currency: String,

    /// Items on sale
    #[serde(default)]
    pub items: Vec<ItemFixture>,

    /// Bundles on sale
    #[serde(default)]
    pub bundles: Vec<BundleFixture>,
}

/// Item entry
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Item identifier
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Price in minor units
    pub price: i64,
}

/// Bundle entry
#[derive(Debug, Deserialize)]
pub struct BundleFixture {
    /// Bundle identifier
    pub id: BundleId,

    /// Display name
    pub name: String,

    /// Price in minor units
    pub price: i64,

    /// Identifiers of the items the bundle includes
    #[serde(default)]
    pub includes: Vec<ItemId>,
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a new fixture loader with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new fixture loader with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load an event catalog from `catalogs/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the currency is
    /// unknown, or the catalog is invalid.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        fixture.try_into()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<CatalogFixture> for Catalog<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;

        let mut catalog = Catalog::new(fixture.name, currency);

        for item in fixture.items {
            catalog.add_item(RequestedItem::with_name(
                item.id,
                item.name,
                Money::from_minor(item.price, currency),
            ))?;
        }

        for bundle in fixture.bundles {
            catalog.add_bundle(Bundle::new(
                bundle.id,
                bundle.name,
                Money::from_minor(bundle.price, currency),
                bundle.includes,
            ))?;
        }

        Ok(catalog)
    }
}

/// Resolve an ISO 4217 code to one of the supported currencies
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::iso::GBP;
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_catalog(dir: &Path, name: &str, contents: &str) -> TestResult {
        let catalogs = dir.join("catalogs");

        fs::create_dir_all(&catalogs)?;
        fs::write(catalogs.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn loads_catalog_from_yaml() -> TestResult {
        let dir = TempDir::new()?;

        write_catalog(
            dir.path(),
            "dance",
            r"
name: Dance Weekend
currency: GBP
items:
  - id: sat-class
    name: Saturday Class
    price: 1000
  - id: sat-party
    name: Saturday Party
    price: 1500
bundles:
  - id: saturday
    name: Saturday Pass
    price: 2000
    includes: [sat-class, sat-party]
",
        )?;

        let catalog = Fixture::with_base_path(dir.path()).load_catalog("dance")?;

        assert_eq!(catalog.name(), "Dance Weekend");
        assert_eq!(catalog.currency(), GBP);
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(
            catalog.item("sat-party")?.price(),
            &Money::from_minor(1500, GBP)
        );
        assert_eq!(catalog.bundle("saturday")?.coverage().len(), 2);

        Ok(())
    }

    #[test]
    fn unknown_currency_errors() -> TestResult {
        let dir = TempDir::new()?;

        write_catalog(dir.path(), "odd", "name: Odd\ncurrency: XYZ\n")?;

        let result = Fixture::with_base_path(dir.path()).load_catalog("odd");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"));

        Ok(())
    }

    #[test]
    fn duplicate_items_error() -> TestResult {
        let dir = TempDir::new()?;

        write_catalog(
            dir.path(),
            "dupes",
            r"
name: Dupes
currency: GBP
items:
  - { id: a, name: A, price: 100 }
  - { id: a, name: A again, price: 200 }
",
        )?;

        let result = Fixture::with_base_path(dir.path()).load_catalog("dupes");

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::DuplicateItem(_)))
        ));

        Ok(())
    }

    #[test]
    fn missing_file_errors() -> TestResult {
        let dir = TempDir::new()?;

        let result = Fixture::with_base_path(dir.path()).load_catalog("missing");

        assert!(matches!(result, Err(FixtureError::Io(_))));

        Ok(())
    }

    #[test]
    fn malformed_yaml_errors() -> TestResult {
        let dir = TempDir::new()?;

        write_catalog(dir.path(), "broken", "name: [unterminated\n")?;

        let result = Fixture::with_base_path(dir.path()).load_catalog("broken");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));

        Ok(())
    }

    #[test]
    fn bundled_weekender_fixture_loads() -> TestResult {
        let catalog = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
            .load_catalog("weekender")?;

        assert_eq!(catalog.currency(), GBP);
        assert!(!catalog.bundles().is_empty());

        Ok(())
    }
}
