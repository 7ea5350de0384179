//! Solutions

use std::fmt;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    bundles::Bundle,
    items::RequestedItem,
    request::CoverRequest,
    solvers::{
        SolverError,
        candidates::{Candidates, Origin},
        coverage::Coverage,
    },
};

/// Which solver produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPath {
    /// Nothing was requested; no solver ran.
    Skipped,

    /// Bitmask dynamic program; the cover is optimal.
    Exact,

    /// Greedy cost-per-item heuristic; the cover is valid but may not be optimal.
    Greedy,
}

impl fmt::Display for SolverPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverPath::Skipped => f.write_str("skipped"),
            SolverPath::Exact => f.write_str("exact"),
            SolverPath::Greedy => f.write_str("greedy"),
        }
    }
}

/// Tables left behind by the exact solver, kept for debugging.
///
/// Every table is indexed by coverage mask.
#[derive(Clone)]
pub struct ExactTrace {
    pub(crate) unreachable: i64,
    pub(crate) costs: Vec<i64>,
    pub(crate) predecessors: Vec<u32>,
    pub(crate) choices: Vec<u32>,
    pub(crate) origins: Vec<Origin>,
}

impl fmt::Debug for ExactTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactTrace")
            .field("states", &format!("[{} states]", self.costs.len()))
            .field("origins", &self.origins)
            .finish_non_exhaustive()
    }
}

impl ExactTrace {
    /// Number of states (`2^N`)
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Check if the trace holds no states.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Minimum cost found to reach `mask`, if it was reachable.
    pub fn cost(&self, mask: usize) -> Option<i64> {
        self.costs
            .get(mask)
            .copied()
            .filter(|cost| *cost != self.unreachable)
    }

    /// Mask the minimum cost to `mask` was reached from.
    pub fn predecessor(&self, mask: usize) -> Option<usize> {
        self.choice_index(mask)?;

        self.predecessors
            .get(mask)
            .and_then(|prev| usize::try_from(*prev).ok())
    }

    /// Set that was bought to reach `mask`.
    pub fn choice(&self, mask: usize) -> Option<Origin> {
        self.choice_index(mask)
            .and_then(|idx| self.origins.get(idx).copied())
    }

    fn choice_index(&self, mask: usize) -> Option<usize> {
        self.choices
            .get(mask)
            .filter(|choice| **choice != NO_CHOICE)
            .and_then(|choice| usize::try_from(*choice).ok())
    }
}

/// Marker for "no set recorded" in the choice table.
pub(crate) const NO_CHOICE: u32 = u32::MAX;

/// A cover as produced by one of the solvers, before it is priced in money.
#[derive(Debug, Clone)]
pub(crate) struct Cover {
    /// Chosen sets, in the order they were bought
    pub(crate) selections: SmallVec<[Origin; 10]>,

    /// Sum of the chosen sets' costs in minor units
    pub(crate) cost: i64,

    /// Solver that found the cover
    pub(crate) path: SolverPath,

    /// Exact solver tables, when requested
    pub(crate) trace: Option<ExactTrace>,
}

/// Cheapest way found to buy every requested item.
///
/// Chosen bundles and items are indexes into the [`CoverRequest`] that was
/// solved, in the order they were selected. Both solver paths report the same
/// shape. The exact path lists its picks forward, from the empty set to the
/// full cover, rather than in the order its backtrack walks them.
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    total: Money<'a, Currency>,
    bundles: SmallVec<[usize; 4]>,
    items: SmallVec<[usize; 10]>,
    path: SolverPath,
    trace: Option<ExactTrace>,
}

impl<'a> Solution<'a> {
    /// Solution for an empty request.
    pub(crate) fn empty(currency: &'static Currency) -> Self {
        Self {
            total: Money::from_minor(0, currency),
            bundles: SmallVec::new(),
            items: SmallVec::new(),
            path: SolverPath::Skipped,
            trace: None,
        }
    }

    /// Turn a solver cover into a solution for `request`.
    pub(crate) fn assemble(request: &CoverRequest<'a>, cover: Cover) -> Result<Self, SolverError> {
        let mut bundles = SmallVec::new();
        let mut items = SmallVec::new();

        for origin in cover.selections {
            match origin {
                Origin::Bundle(idx) if idx < request.bundles().len() => bundles.push(idx),
                Origin::Item(idx) if idx < request.len() => items.push(idx),
                _ => {
                    return Err(SolverError::InvariantViolation {
                        message: "cover selects a set outside the request",
                    });
                }
            }
        }

        Ok(Self {
            total: Money::from_minor(cover.cost, request.currency()),
            bundles,
            items,
            path: cover.path,
            trace: cover.trace,
        })
    }

    /// Total price of every chosen bundle and item
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Indexes of the chosen bundles in the request
    pub fn bundle_indexes(&self) -> &[usize] {
        &self.bundles
    }

    /// Indexes of the items bought individually in the request
    pub fn item_indexes(&self) -> &[usize] {
        &self.items
    }

    /// Iterate over the chosen bundles.
    pub fn bundles<'r>(
        &'r self,
        request: &'r CoverRequest<'a>,
    ) -> impl Iterator<Item = &'r Bundle<'a>> + 'r {
        self.bundles.iter().filter_map(|idx| request.bundle(*idx))
    }

    /// Iterate over the items bought individually.
    pub fn items<'r>(
        &'r self,
        request: &'r CoverRequest<'a>,
    ) -> impl Iterator<Item = &'r RequestedItem<'a>> + 'r {
        self.items.iter().filter_map(|idx| request.item(*idx))
    }

    /// Solver that produced the solution
    pub fn path(&self) -> SolverPath {
        self.path
    }

    /// Exact solver tables, if tracing was enabled and the exact path ran
    pub fn trace(&self) -> Option<&ExactTrace> {
        self.trace.as_ref()
    }

    /// Requested items covered by the chosen bundles and items.
    pub fn coverage(&self, request: &CoverRequest<'a>) -> Coverage {
        let candidates = Candidates::build(request);
        let mut covered = Coverage::empty(request.len());

        for set in candidates.iter() {
            let chosen = match set.origin() {
                Origin::Bundle(idx) => self.bundles.contains(&idx),
                Origin::Item(idx) => self.items.contains(&idx),
            };

            if chosen {
                covered.union_with(set.coverage());
            }
        }

        covered
    }

    /// Whether every requested item is covered.
    pub fn covers_request(&self, request: &CoverRequest<'a>) -> bool {
        self.coverage(request).len() == request.len()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn request<'a>() -> Result<CoverRequest<'a>, crate::request::RequestError> {
        CoverRequest::new(
            [
                RequestedItem::new("a", Money::from_minor(1000, GBP)),
                RequestedItem::new("b", Money::from_minor(1000, GBP)),
            ],
            [Bundle::new("ab", "AB", Money::from_minor(1500, GBP), ["a", "b"])],
            GBP,
        )
    }

    #[test]
    fn assemble_splits_bundles_and_items() -> TestResult {
        let request = request()?;
        let cover = Cover {
            selections: smallvec![Origin::Item(1), Origin::Bundle(0)],
            cost: 2500,
            path: SolverPath::Exact,
            trace: None,
        };

        let solution = Solution::assemble(&request, cover)?;

        assert_eq!(solution.total(), Money::from_minor(2500, GBP));
        assert_eq!(solution.bundle_indexes(), &[0]);
        assert_eq!(solution.item_indexes(), &[1]);
        assert_eq!(solution.path(), SolverPath::Exact);
        assert!(solution.covers_request(&request));

        let names: Vec<&str> = solution.items(&request).map(RequestedItem::name).collect();
        assert_eq!(names, vec!["b"]);

        Ok(())
    }

    #[test]
    fn assemble_rejects_out_of_range_selection() -> TestResult {
        let request = request()?;
        let cover = Cover {
            selections: smallvec![Origin::Bundle(7)],
            cost: 0,
            path: SolverPath::Greedy,
            trace: None,
        };

        assert!(matches!(
            Solution::assemble(&request, cover),
            Err(SolverError::InvariantViolation { .. })
        ));

        Ok(())
    }

    #[test]
    fn partial_selection_does_not_cover_request() -> TestResult {
        let request = request()?;
        let cover = Cover {
            selections: smallvec![Origin::Item(0)],
            cost: 1000,
            path: SolverPath::Greedy,
            trace: None,
        };

        let solution = Solution::assemble(&request, cover)?;

        assert!(!solution.covers_request(&request));
        assert_eq!(solution.coverage(&request).as_mask(), Some(0b01));

        Ok(())
    }

    #[test]
    fn empty_solution_is_zero() {
        let solution = Solution::empty(GBP);

        assert_eq!(solution.total(), Money::from_minor(0, GBP));
        assert!(solution.bundle_indexes().is_empty());
        assert!(solution.item_indexes().is_empty());
        assert_eq!(solution.path(), SolverPath::Skipped);
        assert!(solution.trace().is_none());
    }

    #[test]
    fn trace_lookups_hide_unreachable_states() {
        let trace = ExactTrace {
            unreachable: 99,
            costs: vec![0, 10, 99, 10],
            predecessors: vec![0, 0, 0, 0],
            choices: vec![NO_CHOICE, 1, NO_CHOICE, 0],
            origins: vec![Origin::Bundle(0), Origin::Item(0)],
        };

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.cost(2), None);
        assert_eq!(trace.cost(3), Some(10));
        assert_eq!(trace.choice(3), Some(Origin::Bundle(0)));
        assert_eq!(trace.choice(0), None);
        assert_eq!(trace.predecessor(1), Some(0));
        assert_eq!(trace.predecessor(2), None);
    }
}
