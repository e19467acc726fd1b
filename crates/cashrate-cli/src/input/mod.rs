pub mod file;
pub mod stdin;

use cashrate_core::error::CashRateError;
use cashrate_core::types::{CashFlow, Money};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Assemble a cash flow from, in order of precedence: an input file, piped
/// stdin JSON, or inline DATE=AMOUNT entries.
pub fn load_cash_flow(
    path: Option<&str>,
    entries: &[String],
) -> Result<CashFlow, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_cash_flow(path);
    }
    if let Some(flow) = stdin::read_stdin()? {
        return Ok(flow);
    }
    if entries.is_empty() {
        return Err(
            "a cash flow is required: --input FILE, piped stdin JSON, or --entry DATE=AMOUNT"
                .into(),
        );
    }

    let mut flow = CashFlow::new();
    for raw in entries {
        let (date, amount) = parse_entry(raw)?;
        add_entry(&mut flow, date, amount);
    }
    Ok(flow)
}

/// Insert an entry, summing into any amount already present for the date.
/// The core's mapping holds one amount per date; aggregation is the caller's
/// job and this is where it happens.
pub fn add_entry(flow: &mut CashFlow, date: NaiveDate, amount: Money) {
    *flow.entry(date).or_insert(Decimal::ZERO) += amount;
}

fn parse_entry(raw: &str) -> Result<(NaiveDate, Money), CashRateError> {
    let (date, amount) = raw.split_once('=').ok_or_else(|| CashRateError::InvalidInput {
        field: "entry".into(),
        reason: format!("expected DATE=AMOUNT, got '{raw}'"),
    })?;
    let parsed_date = date
        .trim()
        .parse::<NaiveDate>()
        .map_err(|e| CashRateError::InvalidInput {
            field: "entry".into(),
            reason: format!("bad date '{date}': {e}"),
        })?;
    let parsed_amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| CashRateError::InvalidInput {
            field: "entry".into(),
            reason: format!("bad amount '{amount}': {e}"),
        })?;
    Ok((parsed_date, parsed_amount))
}
