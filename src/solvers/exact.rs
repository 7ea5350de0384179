//! Exact Solver
//!
//! Bitmask dynamic program over every subset of the requested items. `dp[mask]`
//! holds the cheapest known way to cover at least the items in `mask`; masks are
//! visited in ascending order and relaxed through every candidate set, so each
//! state is final by the time it is visited.

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    request::CoverRequest,
    solvers::{
        DEFAULT_EXACT_LIMIT, MAX_EXACT_LIMIT, Solver, SolverError,
        candidates::{BuyableSet, Candidates, Origin},
        solution::{Cover, ExactTrace, NO_CHOICE, Solution, SolverPath},
    },
};

/// Provably optimal solver for requests of up to `limit` items.
///
/// Time is `O(2^N * sets)` and memory `O(2^N)`, which is what bounds `N`.
#[derive(Debug, Clone, Copy)]
pub struct ExactSolver {
    limit: usize,
    trace: bool,
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self {
            limit: DEFAULT_EXACT_LIMIT,
            trace: false,
        }
    }
}

impl ExactSolver {
    /// Create an exact solver that accepts up to `limit` requested items.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ExactLimitTooLarge`] if `limit` is above [`MAX_EXACT_LIMIT`].
    pub fn new(limit: usize) -> Result<Self, SolverError> {
        if limit > MAX_EXACT_LIMIT {
            return Err(SolverError::ExactLimitTooLarge {
                limit,
                max: MAX_EXACT_LIMIT,
            });
        }

        Ok(Self {
            limit,
            trace: false,
        })
    }

    /// Keep the dynamic program's tables on the solution.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Maximum number of requested items accepted
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) fn cover(&self, candidates: &Candidates) -> Result<Cover, SolverError> {
        let items = candidates.item_count();

        if items > self.limit {
            return Err(SolverError::ExactLimitExceeded {
                items,
                limit: self.limit,
            });
        }

        let target = candidates.target().as_mask().ok_or(SolverError::InvariantViolation {
            message: "target does not fit in a single mask",
        })?;

        let sets = masked_sets(candidates)?;
        let unreachable = candidates
            .cost_bound()?
            .checked_add(1)
            .ok_or(SolverError::CostOverflow)?;

        let mut table = Table::allocate(target, unreachable)?;

        table.fill(&sets)?;

        let cost = table.cost(target).ok_or(SolverError::InvariantViolation {
            message: "no finite exact cover",
        })?;

        let selections = table
            .walk_back(target)?
            .into_iter()
            .rev()
            .map(|set| {
                candidates
                    .get(set)
                    .map(BuyableSet::origin)
                    .ok_or(SolverError::InvariantViolation {
                        message: "recorded choice is not a candidate",
                    })
            })
            .collect::<Result<SmallVec<[Origin; 10]>, _>>()?;

        debug!(
            items,
            sets = candidates.len(),
            states = table.costs.len(),
            cost,
            "exact cover found"
        );

        let trace = self.trace.then(|| ExactTrace {
            unreachable,
            costs: table.costs,
            predecessors: table.predecessors,
            choices: table.choices,
            origins: candidates.iter().map(BuyableSet::origin).collect(),
        });

        Ok(Cover {
            selections,
            cost,
            path: SolverPath::Exact,
            trace,
        })
    }
}

impl Solver for ExactSolver {
    fn solve<'a>(&self, request: &CoverRequest<'a>) -> Result<Solution<'a>, SolverError> {
        if request.is_empty() {
            return Ok(Solution::empty(request.currency()));
        }

        let candidates = Candidates::build(request);
        let cover = self.cover(&candidates)?;

        Solution::assemble(request, cover)
    }
}

/// Candidate set as (mask, cost, index into the candidates).
type MaskedSet = (usize, i64, u32);

fn masked_sets(candidates: &Candidates) -> Result<SmallVec<[MaskedSet; 32]>, SolverError> {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, set)| {
            let mask = set.coverage().as_mask().ok_or(SolverError::InvariantViolation {
                message: "candidate does not fit in a single mask",
            })?;

            let idx = u32::try_from(idx).map_err(|_err| SolverError::InvariantViolation {
                message: "too many candidate sets",
            })?;

            Ok((mask, set.cost(), idx))
        })
        .collect()
}

/// Cost, predecessor and choice tables indexed by mask.
struct Table {
    unreachable: i64,
    costs: Vec<i64>,
    predecessors: Vec<u32>,
    choices: Vec<u32>,
}

impl Table {
    fn allocate(target: usize, unreachable: i64) -> Result<Self, SolverError> {
        let states = target
            .checked_add(1)
            .ok_or(SolverError::StateSpaceTooLarge { states: usize::MAX })?;

        let mut costs = Vec::new();
        let mut predecessors = Vec::new();
        let mut choices = Vec::new();

        costs
            .try_reserve_exact(states)
            .map_err(|_err| SolverError::StateSpaceTooLarge { states })?;

        predecessors
            .try_reserve_exact(states)
            .map_err(|_err| SolverError::StateSpaceTooLarge { states })?;

        choices
            .try_reserve_exact(states)
            .map_err(|_err| SolverError::StateSpaceTooLarge { states })?;

        costs.resize(states, unreachable);
        predecessors.resize(states, 0);
        choices.resize(states, NO_CHOICE);

        if let Some(empty) = costs.first_mut() {
            *empty = 0;
        }

        Ok(Self {
            unreachable,
            costs,
            predecessors,
            choices,
        })
    }

    fn fill(&mut self, sets: &[MaskedSet]) -> Result<(), SolverError> {
        for mask in 0..self.costs.len() {
            let base = match self.costs.get(mask) {
                Some(&cost) if cost != self.unreachable => cost,
                _ => continue,
            };

            let from = u32::try_from(mask).map_err(|_err| SolverError::InvariantViolation {
                message: "mask does not fit the predecessor table",
            })?;

            for &(set_mask, cost, set) in sets {
                let next = mask | set_mask;

                // Sets adding nothing new can never strictly improve a state.
                if next == mask {
                    continue;
                }

                // Bounded by the sum of all candidate costs, which is known to fit.
                let candidate = base + cost;

                if let Some(slot) = self.costs.get_mut(next)
                    && candidate < *slot
                {
                    *slot = candidate;

                    if let Some(prev) = self.predecessors.get_mut(next) {
                        *prev = from;
                    }

                    if let Some(choice) = self.choices.get_mut(next) {
                        *choice = set;
                    }
                }
            }
        }

        Ok(())
    }

    fn cost(&self, mask: usize) -> Option<i64> {
        self.costs
            .get(mask)
            .copied()
            .filter(|cost| *cost != self.unreachable)
    }

    /// Candidate indexes from `target` back to the empty mask.
    fn walk_back(&self, target: usize) -> Result<SmallVec<[usize; 10]>, SolverError> {
        let mut chosen = SmallVec::new();
        let mut cursor = target;

        while cursor != 0 {
            let choice = self
                .choices
                .get(cursor)
                .copied()
                .filter(|choice| *choice != NO_CHOICE)
                .ok_or(SolverError::InvariantViolation {
                    message: "reachable mask has no recorded choice",
                })?;

            let prev = self
                .predecessors
                .get(cursor)
                .and_then(|prev| usize::try_from(*prev).ok())
                .filter(|prev| *prev < cursor)
                .ok_or(SolverError::InvariantViolation {
                    message: "reachable mask has no valid predecessor",
                })?;

            let choice = usize::try_from(choice).map_err(|_err| SolverError::InvariantViolation {
                message: "choice does not fit in usize",
            })?;

            chosen.push(choice);
            cursor = prev;
        }

        Ok(chosen)
    }
}
