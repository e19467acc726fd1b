use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

/// Iteration ceiling before a solve is abandoned.
pub const MAX_ITERATIONS: u32 = 500;

/// Fractional digits kept by the Newton step division.
const INTERNAL_SCALE: u32 = 20;

/// Convergence tolerance on |f(x)|.
const EPSILON: Decimal = dec!(0.00000001);

/// Trial values past this bound are treated as divergence.
const MAX_RANGE: Decimal = dec!(100000000000000000000);

/// Reason a solve gave up. The three kinds surface identically to callers;
/// the distinction exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolverFailure {
    #[error("the derivative vanished at a trial value")]
    ZeroDerivative,
    #[error("no convergence within the iteration ceiling")]
    IterationLimit,
    #[error("the trial value left the search range")]
    Diverged,
}

/// A converged Newton solve.
#[derive(Debug, Clone)]
pub struct NewtonSolution {
    /// Value where the function is within tolerance of zero.
    pub root: Decimal,
    /// Iterations consumed.
    pub iterations: u32,
    /// Trial values visited, in order. Diagnostic state owned by this solve,
    /// discarded with it.
    pub history: Vec<Decimal>,
}

/// Newton's method: drive `x` toward a zero of `function` using its analytic
/// `derivative`, starting from zero.
///
/// The search is confined to non-negative trial values. Per iteration the
/// derivative is sampled at the unclamped trial value first, then a negative
/// trial value is clamped to zero before the function is evaluated; the slope
/// at the transient value still steers the step. This ordering affects which
/// of several roots the search lands on and must stay as is. The iteration
/// ceiling and range bound guarantee termination.
pub fn find_root<F, D>(function: F, derivative: D) -> Result<NewtonSolution, SolverFailure>
where
    F: Fn(Decimal) -> Decimal,
    D: Fn(Decimal) -> Decimal,
{
    let mut x = Decimal::ZERO;
    let mut iterations: u32 = 0;
    let mut history: Vec<Decimal> = Vec::new();

    loop {
        history.push(x);

        let slope = derivative(x);
        if slope.is_zero() {
            return Err(SolverFailure::ZeroDerivative);
        }
        if x < Decimal::ZERO {
            x = Decimal::ZERO;
        }
        if iterations > MAX_ITERATIONS {
            return Err(SolverFailure::IterationLimit);
        }
        if x > MAX_RANGE {
            return Err(SolverFailure::Diverged);
        }
        iterations += 1;

        // x <- x - f(x)/f'(x), division at scale 20 half-up. A step the
        // decimal range cannot hold is divergence, not a panic.
        let step = function(x)
            .checked_div(slope)
            .map(|q| q.round_dp_with_strategy(INTERNAL_SCALE, RoundingStrategy::MidpointAwayFromZero))
            .ok_or(SolverFailure::Diverged)?;
        x = x.checked_sub(step).ok_or(SolverFailure::Diverged)?;

        if function(x).abs() < EPSILON {
            return Ok(NewtonSolution {
                root: x,
                iterations,
                history,
            });
        }
    }
}
