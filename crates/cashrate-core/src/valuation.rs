use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::daycount::DayCountConvention;
use crate::types::{CashFlow, Money, Rate, Years};

/// Present value of a cash flow at the given trial rate.
///
/// Every entry is discounted to the minimum date present in the map, which is
/// re-derived on each call so the valuation always matches the data passed
/// in. An empty cash flow values to zero.
pub fn present_value(cash_flow: &CashFlow, rate: Rate, convention: DayCountConvention) -> Money {
    let Some(start) = cash_flow.keys().next().copied() else {
        return Decimal::ZERO;
    };
    cash_flow
        .iter()
        .map(|(date, amount)| discounted_amount(start, *date, *amount, rate, convention))
        .sum()
}

/// First derivative of [`present_value`] with respect to the rate.
///
/// Analytic term-by-term derivative: `amount * (1+rate)^(-t-1) * (-t)`, with
/// the same time fractions as the value itself.
pub fn present_value_derivative(
    cash_flow: &CashFlow,
    rate: Rate,
    convention: DayCountConvention,
) -> Money {
    let Some(start) = cash_flow.keys().next().copied() else {
        return Decimal::ZERO;
    };
    cash_flow
        .iter()
        .map(|(date, amount)| {
            let t = convention.year_fraction(start, *date);
            *amount * raise(Decimal::ONE + rate, -t - Decimal::ONE) * -t
        })
        .sum()
}

/// Discounted value of a single payment at `date`, seen from `start`.
pub fn discounted_amount(
    start: NaiveDate,
    date: NaiveDate,
    amount: Money,
    rate: Rate,
    convention: DayCountConvention,
) -> Money {
    amount * raise(Decimal::ONE + rate, -convention.year_fraction(start, date))
}

/// `base^exponent` through f64, the single floating-point operation in the
/// pipeline. A result no Decimal can hold (NaN from a negative base with a
/// fractional exponent, or an overflowed magnitude) collapses to zero.
fn raise(base: Decimal, exponent: Years) -> Decimal {
    let value = base
        .to_f64()
        .unwrap_or(0.0)
        .powf(exponent.to_f64().unwrap_or(0.0));
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flow(entries: &[(NaiveDate, Decimal)]) -> CashFlow {
        entries.iter().copied().collect()
    }

    #[test]
    fn empty_flow_values_to_zero() {
        let empty = CashFlow::new();
        assert_eq!(
            present_value(&empty, dec!(0.1), DayCountConvention::Act365),
            Decimal::ZERO
        );
        assert_eq!(
            present_value_derivative(&empty, dec!(0.1), DayCountConvention::Act365),
            Decimal::ZERO
        );
    }

    #[test]
    fn zero_rate_is_the_plain_sum() {
        let cf = flow(&[
            (date(2021, 1, 1), dec!(-1000)),
            (date(2021, 7, 1), dec!(400)),
            (date(2022, 1, 1), dec!(700)),
        ]);
        assert_eq!(
            present_value(&cf, Decimal::ZERO, DayCountConvention::Act365),
            dec!(100)
        );
    }

    #[test]
    fn same_day_entry_discounts_to_face_value() {
        let cf = flow(&[(date(2021, 6, 1), dec!(12345.67))]);
        assert_eq!(
            present_value(&cf, dec!(0.35), DayCountConvention::Act365),
            dec!(12345.67)
        );
    }

    #[test]
    fn known_two_entry_value_is_near_zero_at_its_rate() {
        // -1000 today, +1100 in exactly 365 days, valued at 10%
        let cf = flow(&[
            (date(2021, 1, 1), dec!(-1000)),
            (date(2022, 1, 1), dec!(1100)),
        ]);
        let pv = present_value(&cf, dec!(0.1), DayCountConvention::Act365);
        assert!(pv.abs() < dec!(0.000001), "expected ~0, got {pv}");
    }

    #[test]
    fn derivative_is_negative_for_future_inflows() {
        let cf = flow(&[
            (date(2021, 1, 1), dec!(-1000)),
            (date(2022, 1, 1), dec!(1100)),
        ]);
        let slope = present_value_derivative(&cf, dec!(0.1), DayCountConvention::Act365);
        assert!(slope < Decimal::ZERO, "expected negative slope, got {slope}");
    }

    #[test]
    fn discounted_amount_matches_hand_calculation() {
        // 1000 due in 730 days at 20%: t = 2, factor = 1.2^-2
        let value = discounted_amount(
            date(2021, 1, 1),
            date(2023, 1, 1),
            dec!(1000),
            dec!(0.2),
            DayCountConvention::Act365,
        );
        assert!(
            (value - dec!(694.444444)).abs() < dec!(0.000001),
            "expected ~694.444444, got {value}"
        );
    }
}
