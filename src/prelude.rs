//! Coverset prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundles::Bundle,
    catalog::{Catalog, CatalogError},
    fixtures::{Fixture, FixtureError},
    ids::{BundleId, ItemId},
    items::RequestedItem,
    receipt::{Receipt, ReceiptError},
    request::{CoverRequest, RequestError},
    selection::Selection,
    solvers::{
        CheapestCoverSolver, ExactSolver, GreedySolver, Solution, Solver, SolverConfig,
        SolverError, SolverPath,
    },
};
