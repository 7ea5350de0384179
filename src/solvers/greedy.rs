//! Greedy Solver

use smallvec::SmallVec;
use tracing::{debug, error};

use crate::{
    request::CoverRequest,
    solvers::{
        Solver, SolverError,
        candidates::{BuyableSet, Candidates, Origin},
        coverage::Coverage,
        solution::{Cover, Solution, SolverPath},
    },
};

/// Heuristic solver for requests too large to enumerate.
///
/// Each round buys whichever is cheaper per newly covered item: the best
/// bundle, or the cheapest item still uncovered. The result always covers the
/// request but is not guaranteed to be the cheapest cover.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    pub(crate) fn cover(candidates: &Candidates) -> Result<Cover, SolverError> {
        let mut uncovered = candidates.target().clone();
        let mut selections: SmallVec<[Origin; 10]> = SmallVec::new();
        let mut cost: i64 = 0;

        while !uncovered.is_empty() {
            let bundle = best_bundle(candidates, &uncovered);
            let item = cheapest_uncovered_item(candidates, &uncovered);

            let chosen = match (bundle, item) {
                (Some((bundle, newly)), Some(item)) => {
                    // Bundle score `price / newly` against the item's price, without division.
                    if i128::from(bundle.cost()) <= i128::from(item.cost()) * to_i128(newly) {
                        bundle
                    } else {
                        item
                    }
                }
                (Some((bundle, _)), None) => bundle,
                (None, Some(item)) => item,
                (None, None) => {
                    error!(
                        uncovered = uncovered.len(),
                        "greedy cover found nothing left to buy"
                    );

                    return Err(SolverError::InvariantViolation {
                        message: "greedy cover left items uncovered",
                    });
                }
            };

            uncovered.difference_with(chosen.coverage());
            cost = cost
                .checked_add(chosen.cost())
                .ok_or(SolverError::CostOverflow)?;

            selections.push(chosen.origin());
        }

        debug!(
            items = candidates.item_count(),
            selections = selections.len(),
            cost,
            "greedy cover found"
        );

        Ok(Cover {
            selections,
            cost,
            path: SolverPath::Greedy,
            trace: None,
        })
    }
}

impl Solver for GreedySolver {
    fn solve<'a>(&self, request: &CoverRequest<'a>) -> Result<Solution<'a>, SolverError> {
        if request.is_empty() {
            return Ok(Solution::empty(request.currency()));
        }

        let candidates = Candidates::build(request);
        let cover = Self::cover(&candidates)?;

        Solution::assemble(request, cover)
    }
}

/// Bundle with the lowest price per newly covered item, and how many items it
/// newly covers. Ties keep the earliest bundle.
fn best_bundle<'c>(
    candidates: &'c Candidates,
    uncovered: &Coverage,
) -> Option<(&'c BuyableSet, usize)> {
    let mut best: Option<(&BuyableSet, usize)> = None;

    for set in candidates.iter() {
        if !matches!(set.origin(), Origin::Bundle(_)) {
            continue;
        }

        let newly = set.coverage().intersection_len(uncovered);

        if newly == 0 {
            continue;
        }

        let better = best.is_none_or(|(current, current_newly)| {
            // a / b < c / d  <=>  a * d < c * b for positive b, d
            i128::from(set.cost()) * to_i128(current_newly)
                < i128::from(current.cost()) * to_i128(newly)
        });

        if better {
            best = Some((set, newly));
        }
    }

    best
}

/// Cheapest single item not yet covered. Ties keep the earliest item.
fn cheapest_uncovered_item<'c>(
    candidates: &'c Candidates,
    uncovered: &Coverage,
) -> Option<&'c BuyableSet> {
    candidates
        .iter()
        .filter(|set| match set.origin() {
            Origin::Item(idx) => uncovered.contains(idx),
            Origin::Bundle(_) => false,
        })
        .min_by_key(|set| set.cost())
}

fn to_i128(count: usize) -> i128 {
    i128::try_from(count).unwrap_or(i128::MAX)
}
