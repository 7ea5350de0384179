//! Candidate Sets

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    request::CoverRequest,
    solvers::{SolverError, coverage::Coverage},
};

/// Where a buyable set comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Index into the request's bundles
    Bundle(usize),

    /// Index into the request's items
    Item(usize),
}

/// A bundle (intersected with the request) or a single item, with the
/// requested items it covers and what it costs.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyableSet {
    origin: Origin,
    coverage: Coverage,
    cost: i64,
}

impl BuyableSet {
    /// Where the set comes from
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Requested items the set covers
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Advertised price in minor units
    pub fn cost(&self) -> i64 {
        self.cost
    }
}

/// Every set a solver may choose from for one request.
///
/// Bundle sets come first, in catalog order, followed by one singleton set per
/// requested item, in request order. Both solvers rely on this ordering to
/// break ties the same way.
#[derive(Debug, Clone)]
pub struct Candidates {
    sets: Vec<BuyableSet>,
    target: Coverage,
}

impl Candidates {
    /// Build the candidate sets for a request.
    pub fn build(request: &CoverRequest<'_>) -> Self {
        let len = request.len();

        let positions: FxHashMap<&str, usize> = request
            .items()
            .iter()
            .enumerate()
            .map(|(bit, item)| (item.id().as_str(), bit))
            .collect();

        let mut sets = Vec::with_capacity(request.bundles().len() + len);

        for (idx, bundle) in request.bundles().iter().enumerate() {
            let mut coverage = Coverage::empty(len);

            for id in bundle.coverage() {
                if let Some(&bit) = positions.get(id.as_str()) {
                    coverage.insert(bit);
                }
            }

            if coverage.is_empty() {
                trace!(bundle = %bundle.id(), "bundle covers no requested item");
                continue;
            }

            sets.push(BuyableSet {
                origin: Origin::Bundle(idx),
                coverage,
                cost: bundle.price().to_minor_units(),
            });
        }

        for (idx, item) in request.items().iter().enumerate() {
            sets.push(BuyableSet {
                origin: Origin::Item(idx),
                coverage: Coverage::single(len, idx),
                cost: item.price().to_minor_units(),
            });
        }

        Self {
            sets,
            target: Coverage::full(len),
        }
    }

    /// Number of requested items.
    pub fn item_count(&self) -> usize {
        self.target.len()
    }

    /// Every requested item.
    pub fn target(&self) -> &Coverage {
        &self.target
    }

    /// Iterate over all candidate sets, bundles first.
    pub fn iter(&self) -> impl Iterator<Item = &BuyableSet> {
        self.sets.iter()
    }

    /// Get a candidate set by its index.
    pub fn get(&self, idx: usize) -> Option<&BuyableSet> {
        self.sets.get(idx)
    }

    /// Get the number of candidate sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if there are no candidate sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Sum of every candidate's cost.
    ///
    /// No cover can cost more, so one above this is safe to use as an
    /// "unreachable" marker.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::CostOverflow`] if the sum does not fit in an `i64`.
    pub fn cost_bound(&self) -> Result<i64, SolverError> {
        self.sets
            .iter()
            .try_fold(0_i64, |acc, set| acc.checked_add(set.cost))
            .ok_or(SolverError::CostOverflow)
    }
}
