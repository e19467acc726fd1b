use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Years;

/// Fractional digits kept by day-count divisions.
const FRACTION_SCALE: u32 = 20;

/// Rule for converting a calendar-date gap into a fraction of a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    /// Actual calendar days over a fixed 365-day year, leap years ignored.
    #[default]
    Act365,
    /// Whole calendar months (day-of-month ignored) over a 12-month year.
    Thirty360,
}

impl DayCountConvention {
    /// Time fraction from `start` to `end` under this convention.
    ///
    /// Any two dates are valid: a zero gap yields a zero fraction and an
    /// inverted gap a negative one. Divisions round half-up at 20 fractional
    /// digits.
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> Years {
        match self {
            DayCountConvention::Act365 => {
                let days = end.signed_duration_since(start).num_days();
                half_up(Decimal::from(days) / dec!(365))
            }
            DayCountConvention::Thirty360 => {
                let months = i64::from(end.year() - start.year()) * 12
                    + i64::from(end.month() as i32 - start.month() as i32);
                half_up(Decimal::from(months) / dec!(12))
            }
        }
    }
}

fn half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FRACTION_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn act365_zero_gap_is_zero() {
        let frac = DayCountConvention::Act365.year_fraction(date(2021, 5, 4), date(2021, 5, 4));
        assert_eq!(frac, Decimal::ZERO);
    }

    #[test]
    fn act365_full_non_leap_year_is_one() {
        let frac = DayCountConvention::Act365.year_fraction(date(2021, 9, 15), date(2022, 9, 15));
        assert_eq!(frac, Decimal::ONE);
    }

    #[test]
    fn act365_leap_year_is_not_special_cased() {
        // 366 actual days over the fixed 365 basis
        let frac = DayCountConvention::Act365.year_fraction(date(2020, 1, 1), date(2021, 1, 1));
        assert_eq!(frac, dec!(1.00273972602739726027));
    }

    #[test]
    fn act365_inverted_gap_goes_negative() {
        let frac = DayCountConvention::Act365.year_fraction(date(2022, 9, 15), date(2021, 9, 15));
        assert_eq!(frac, dec!(-1));
    }

    #[test]
    fn thirty360_ignores_day_of_month() {
        let frac = DayCountConvention::Thirty360.year_fraction(date(2020, 1, 31), date(2020, 2, 1));
        assert_eq!(frac, dec!(0.08333333333333333333));
    }

    #[test]
    fn thirty360_same_month_is_zero() {
        let frac = DayCountConvention::Thirty360.year_fraction(date(2020, 3, 2), date(2020, 3, 30));
        assert_eq!(frac, Decimal::ZERO);
    }

    #[test]
    fn thirty360_twelve_months_is_one() {
        let frac =
            DayCountConvention::Thirty360.year_fraction(date(2021, 3, 10), date(2022, 3, 25));
        assert_eq!(frac, Decimal::ONE);
    }

    #[test]
    fn thirty360_counts_across_year_end() {
        let frac =
            DayCountConvention::Thirty360.year_fraction(date(2021, 11, 30), date(2022, 2, 1));
        assert_eq!(frac, dec!(0.25));
    }
}
