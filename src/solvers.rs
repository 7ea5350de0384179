//! Solvers for cheapest coverage
//!
//! Every solver turns a [`CoverRequest`] into a [`Solution`]: the cheapest
//! combination it can find of bundles and individually bought items that covers
//! every requested item. Redundant coverage is allowed and paid in full.

use rusty_money::MoneyError;
use thiserror::Error;
use tracing::{debug, warn};

use crate::request::CoverRequest;

pub mod candidates;
pub mod config;
pub mod coverage;
pub mod exact;
pub mod greedy;
pub mod solution;

pub use candidates::{BuyableSet, Candidates, Origin};
pub use config::SolverConfig;
pub use coverage::Coverage;
pub use exact::ExactSolver;
pub use greedy::GreedySolver;
pub use solution::{ExactTrace, Solution, SolverPath};

/// Default largest request, in items, solved exactly.
pub const DEFAULT_EXACT_LIMIT: usize = 26;

/// Hard ceiling on the exact limit; the tables for `2^N` states stop fitting well before this.
pub const MAX_EXACT_LIMIT: usize = 32;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// The request has more items than the exact solver accepts.
    #[error("{items} items exceeds the exact solver limit of {limit}")]
    ExactLimitExceeded {
        /// Number of requested items
        items: usize,
        /// Configured limit
        limit: usize,
    },

    /// The configured exact limit is above [`MAX_EXACT_LIMIT`].
    #[error("exact limit {limit} is above the maximum of {max}")]
    ExactLimitTooLarge {
        /// Requested limit
        limit: usize,
        /// Largest supported limit
        max: usize,
    },

    /// The exact solver's tables could not be allocated.
    #[error("cannot allocate exact solver tables for {states} states")]
    StateSpaceTooLarge {
        /// Number of states that were needed
        states: usize,
    },

    /// Summing prices overflowed.
    #[error("sum of prices overflows")]
    CostOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

impl SolverError {
    /// Whether the dispatcher retries with the greedy solver after the exact
    /// solver fails with this error. Overflow and money errors would fail there too.
    pub fn falls_back_to_greedy(&self) -> bool {
        matches!(
            self,
            Self::ExactLimitExceeded { .. }
                | Self::StateSpaceTooLarge { .. }
                | Self::InvariantViolation { .. }
        )
    }
}

/// Trait for covering a request at the lowest cost a solver can find
pub trait Solver {
    /// Solve the given request.
    ///
    /// An empty request is solved without running the solver, at zero cost.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve<'a>(&self, request: &CoverRequest<'a>) -> Result<Solution<'a>, SolverError>;
}

/// Solver used by the storefront: exact when the request is small enough,
/// greedy otherwise, and greedy again if the exact solver cannot finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestCoverSolver {
    config: SolverConfig,
}

impl CheapestCoverSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver's configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Solver for CheapestCoverSolver {
    #[tracing::instrument(
        name = "solver.solve",
        skip_all,
        fields(items = request.len(), bundles = request.bundles().len())
    )]
    fn solve<'a>(&self, request: &CoverRequest<'a>) -> Result<Solution<'a>, SolverError> {
        if request.is_empty() {
            debug!("empty request; skipping solver");

            return Ok(Solution::empty(request.currency()));
        }

        let candidates = Candidates::build(request);

        debug!(
            candidates = candidates.len(),
            exact_limit = self.config.exact_limit(),
            "built candidate sets"
        );

        let cover = if request.len() <= self.config.exact_limit() {
            let exact =
                ExactSolver::new(self.config.exact_limit())?.with_trace(self.config.trace());

            match exact.cover(&candidates) {
                Ok(cover) => cover,
                Err(err) if err.falls_back_to_greedy() => {
                    warn!(error = %err, "exact solver failed; falling back to greedy");

                    GreedySolver::cover(&candidates)?
                }
                Err(err) => return Err(err),
            }
        } else {
            debug!("request above exact limit; using greedy solver");

            GreedySolver::cover(&candidates)?
        };

        Solution::assemble(request, cover)
    }
}
