pub mod daycount;
pub mod error;
pub mod rate;
pub mod solver;
pub mod types;
pub mod valuation;

pub use daycount::DayCountConvention;
pub use error::CashRateError;
pub use rate::{effective_rate, effective_rate_report, EffectiveRateOutput};
pub use solver::{NewtonSolution, SolverFailure};
pub use types::*;

/// Standard result type for all cashrate operations
pub type CashRateResult<T> = Result<T, CashRateError>;
