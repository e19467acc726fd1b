use thiserror::Error;

use crate::solver::SolverFailure;

#[derive(Debug, Error)]
pub enum CashRateError {
    /// The single condition surfaced for every solver failure kind. The
    /// internal kind is retained for diagnostics; no kind ever produces a
    /// numeric answer.
    #[error("no rate could be determined for this cash flow ({entries} entries spanning {span_days} days): {failure}")]
    RateNotFound {
        entries: usize,
        span_days: i64,
        failure: SolverFailure,
    },

    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}
