//! Solver Configuration

use crate::solvers::{DEFAULT_EXACT_LIMIT, MAX_EXACT_LIMIT, SolverError};

/// Settings for [`CheapestCoverSolver`](crate::solvers::CheapestCoverSolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Largest request, in items, solved exactly; larger requests use the greedy solver
    exact_limit: usize,

    /// Keep the exact solver's tables on the solution
    trace: bool,
}

impl SolverConfig {
    /// Default settings: exact up to [`DEFAULT_EXACT_LIMIT`] items, no trace.
    pub const fn new() -> Self {
        Self {
            exact_limit: DEFAULT_EXACT_LIMIT,
            trace: false,
        }
    }

    /// Set the largest request solved exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ExactLimitTooLarge`] if `limit` is above [`MAX_EXACT_LIMIT`].
    pub fn with_exact_limit(mut self, limit: usize) -> Result<Self, SolverError> {
        if limit > MAX_EXACT_LIMIT {
            return Err(SolverError::ExactLimitTooLarge {
                limit,
                max: MAX_EXACT_LIMIT,
            });
        }

        self.exact_limit = limit;

        Ok(self)
    }

    /// Keep (or drop) the exact solver's tables on the solution.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Largest request solved exactly
    pub const fn exact_limit(&self) -> usize {
        self.exact_limit
    }

    /// Whether exact solutions carry a trace
    pub const fn trace(&self) -> bool {
        self.trace
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
