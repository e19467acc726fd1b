use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::daycount::DayCountConvention;
use crate::error::CashRateError;
use crate::solver::{self, NewtonSolution};
use crate::types::{with_metadata, CashFlow, ComputationOutput, Money, Rate};
use crate::valuation::{present_value, present_value_derivative};
use crate::CashRateResult;

/// Significant digits kept in the reported percentage.
const REPORTED_DIGITS: u32 = 6;

/// Detailed result of an effective-rate solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRateOutput {
    /// Effective rate as a percentage, 6 significant digits.
    pub rate_percent: Rate,
    /// Newton iterations consumed.
    pub iterations: u32,
    /// Number of cash-flow entries.
    pub entries: usize,
    /// Minimum date of the flow, the discounting anchor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Calendar days between the first and last entry.
    pub span_days: i64,
    /// Present value at the converged, unrounded root.
    pub residual: Money,
}

/// Effective periodic rate (APR/IRR/YTM) of a cash flow, as a percentage.
///
/// The rate is the value that zeroes the flow's present value under the
/// given day-count convention, found by Newton's method and reported at 6
/// significant digits. An empty cash flow means "nothing to compute" and
/// returns zero; any other flow either converges or fails with
/// [`CashRateError::RateNotFound`].
pub fn effective_rate(
    cash_flow: &CashFlow,
    convention: DayCountConvention,
) -> CashRateResult<Rate> {
    if cash_flow.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let solution = solve(cash_flow, convention)?;
    Ok(round_significant(
        solution.root * dec!(100),
        REPORTED_DIGITS,
    ))
}

/// [`effective_rate`] wrapped in the computation envelope, with solve
/// diagnostics: iteration count, cash-flow shape, and the residual present
/// value at the root.
pub fn effective_rate_report(
    cash_flow: &CashFlow,
    convention: DayCountConvention,
) -> CashRateResult<ComputationOutput<EffectiveRateOutput>> {
    let clock = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = if cash_flow.is_empty() {
        warnings.push("cash flow is empty; the zero rate is returned by definition".into());
        EffectiveRateOutput {
            rate_percent: Decimal::ZERO,
            iterations: 0,
            entries: 0,
            start_date: None,
            span_days: 0,
            residual: Decimal::ZERO,
        }
    } else {
        let solution = solve(cash_flow, convention)?;
        EffectiveRateOutput {
            rate_percent: round_significant(solution.root * dec!(100), REPORTED_DIGITS),
            iterations: solution.iterations,
            entries: cash_flow.len(),
            start_date: cash_flow.keys().next().copied(),
            span_days: span_days(cash_flow),
            residual: present_value(cash_flow, solution.root, convention),
        }
    };

    let elapsed = clock.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "method": "Newton-Raphson",
        "day_count": convention,
        "max_iterations": solver::MAX_ITERATIONS,
        "convergence_eps": "1e-8",
        "reported_significant_digits": REPORTED_DIGITS,
    });

    Ok(with_metadata(
        "Effective rate (APR/IRR/YTM) from dated cash flow",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn solve(cash_flow: &CashFlow, convention: DayCountConvention) -> CashRateResult<NewtonSolution> {
    solver::find_root(
        |rate| present_value(cash_flow, rate, convention),
        |rate| present_value_derivative(cash_flow, rate, convention),
    )
    .map_err(|failure| CashRateError::RateNotFound {
        entries: cash_flow.len(),
        span_days: span_days(cash_flow),
        failure,
    })
}

fn span_days(cash_flow: &CashFlow) -> i64 {
    match (cash_flow.keys().next(), cash_flow.keys().next_back()) {
        (Some(first), Some(last)) => last.signed_duration_since(*first).num_days(),
        _ => 0,
    }
}

/// Round to `digits` significant digits, half-up.
fn round_significant(value: Decimal, digits: u32) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }

    // Decimal exponent of the leading significant digit
    let mut abs = value.abs();
    let mut exponent: i32 = 0;
    while abs >= dec!(10) {
        abs /= dec!(10);
        exponent += 1;
    }
    while abs < Decimal::ONE {
        abs *= dec!(10);
        exponent -= 1;
    }

    let dp = digits as i32 - 1 - exponent;
    if dp >= 0 {
        value.round_dp_with_strategy(dp as u32, RoundingStrategy::MidpointAwayFromZero)
    } else {
        let shift = Decimal::from_i128_with_scale(10i128.pow(dp.unsigned_abs()), 0);
        (value / shift).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolverFailure;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_cash_flow_is_the_zero_rate() {
        let rate = effective_rate(&CashFlow::new(), DayCountConvention::Act365).unwrap();
        assert_eq!(rate, Decimal::ZERO);
    }

    #[test]
    fn single_entry_cash_flow_has_no_rate() {
        // Only the start date is present, so every time fraction is zero and
        // the derivative vanishes
        let mut flow = CashFlow::new();
        flow.insert(date(2021, 1, 1), dec!(-1000));

        match effective_rate(&flow, DayCountConvention::Act365) {
            Err(CashRateError::RateNotFound {
                entries, failure, ..
            }) => {
                assert_eq!(entries, 1);
                assert_eq!(failure, SolverFailure::ZeroDerivative);
            }
            other => panic!("expected RateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn report_carries_the_flow_shape() {
        let mut flow = CashFlow::new();
        flow.insert(date(2021, 9, 15), dec!(-100000));
        flow.insert(date(2022, 9, 15), dec!(120000));

        let report = effective_rate_report(&flow, DayCountConvention::Act365).unwrap();
        let out = &report.result;

        assert_eq!(out.rate_percent, dec!(20));
        assert_eq!(out.entries, 2);
        assert_eq!(out.span_days, 365);
        assert_eq!(out.start_date, Some(date(2021, 9, 15)));
        assert!(out.iterations > 0);
        assert!(out.residual.abs() < dec!(0.00000001));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_report_warns_instead_of_failing() {
        let report = effective_rate_report(&CashFlow::new(), DayCountConvention::Act365).unwrap();
        assert_eq!(report.result.rate_percent, Decimal::ZERO);
        assert_eq!(report.result.iterations, 0);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn round_significant_caps_decimal_places() {
        assert_eq!(round_significant(dec!(21.191301234), 6), dec!(21.1913));
    }

    #[test]
    fn round_significant_skips_leading_zeros() {
        assert_eq!(round_significant(dec!(0.00123456789), 6), dec!(0.00123457));
    }

    #[test]
    fn round_significant_rounds_wide_integers_off() {
        assert_eq!(round_significant(dec!(1234567.89), 6), dec!(1234570));
    }

    #[test]
    fn round_significant_is_half_up() {
        assert_eq!(round_significant(dec!(21.191250), 6), dec!(21.1913));
        assert_eq!(round_significant(dec!(-21.191250), 6), dec!(-21.1913));
    }

    #[test]
    fn round_significant_keeps_zero() {
        assert_eq!(round_significant(Decimal::ZERO, 6), Decimal::ZERO);
    }
}
