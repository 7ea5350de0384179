//! Command-line Arguments

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{
    catalog::{Catalog, CatalogError},
    selection::Selection,
    solvers::{DEFAULT_EXACT_LIMIT, SolverConfig, SolverError},
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COVERSET_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "COVERSET_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Price the cheapest way to buy a selection of event passes
#[derive(Debug, Clone, Parser)]
#[command(name = "coverset", about, long_about = None)]
pub struct CoverArgs {
    /// Catalog fixture to load, from `<fixtures>/catalogs/<name>.yml`
    #[arg(short, long, env = "COVERSET_FIXTURE", default_value = "weekender")]
    pub fixture: String,

    /// Directory holding the fixture files
    #[arg(long, env = "COVERSET_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Item to select (repeatable)
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// Bundle whose items to select (repeatable)
    #[arg(short, long = "bundle")]
    pub bundles: Vec<String>,

    /// Select the first `n` catalog items when nothing else is selected
    #[arg(short)]
    pub n: Option<usize>,

    /// Largest request, in items, solved exactly
    #[arg(long, env = "COVERSET_EXACT_LIMIT", default_value_t = DEFAULT_EXACT_LIMIT)]
    pub exact_limit: usize,

    /// Print the exact solver's cost table
    #[arg(long, env = "COVERSET_TRACE")]
    pub trace: bool,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl CoverArgs {
    /// Solver settings from the arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ExactLimitTooLarge`] if the exact limit is out of range.
    pub fn solver_config(&self) -> Result<SolverConfig, SolverError> {
        Ok(SolverConfig::new()
            .with_exact_limit(self.exact_limit)?
            .with_trace(self.trace))
    }

    /// Whether any item or bundle was picked explicitly.
    pub fn has_selection(&self) -> bool {
        !self.items.is_empty() || !self.bundles.is_empty()
    }

    /// Build the selection: the picked items and bundles, or the first `n`
    /// catalog items (every item without `n`) when nothing was picked.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a picked item or bundle is not in the catalog.
    pub fn selection(&self, catalog: &Catalog<'_>) -> Result<Selection, CatalogError> {
        let mut selection = Selection::new();

        if !self.has_selection() {
            let count = self.n.unwrap_or(catalog.items().len());

            for item in catalog.items().iter().take(count) {
                selection.add_item(item.id().clone());
            }

            return Ok(selection);
        }

        for id in &self.items {
            selection.add_item(catalog.item(id)?.id().clone());
        }

        for id in &self.bundles {
            let bundle = catalog.bundle(id)?;

            if !selection.has_bundle(id) {
                selection.toggle_bundle(bundle);
            }
        }

        Ok(selection)
    }
}
