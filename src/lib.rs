//! Coverset
//!
//! Coverset finds the cheapest way to buy a set of event items when the
//! storefront also sells bundles covering several of them. Small selections
//! are solved exactly; large ones fall back to a greedy heuristic.

pub mod bundles;
pub mod catalog;
pub mod cli;
pub mod fixtures;
pub mod ids;
pub mod items;
pub mod logging;
pub mod receipt;
pub mod request;
pub mod selection;
pub mod solvers;

pub mod prelude;
