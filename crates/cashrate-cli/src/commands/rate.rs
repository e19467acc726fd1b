use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use cashrate_core::daycount::DayCountConvention;
use cashrate_core::rate;
use cashrate_core::valuation;

use crate::input;

/// Day-count convention flag shared by the subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConventionArg {
    /// Actual days over a fixed 365-day year
    Act365,
    /// Whole calendar months over a 12-month year
    Thirty360,
}

impl From<ConventionArg> for DayCountConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Act365 => DayCountConvention::Act365,
            ConventionArg::Thirty360 => DayCountConvention::Thirty360,
        }
    }
}

/// Arguments for the effective-rate solve
#[derive(Args)]
pub struct RateArgs {
    /// Path to a cash-flow file: CSV `date,amount` rows or a JSON
    /// date-to-amount object
    #[arg(long)]
    pub input: Option<String>,

    /// Inline entry as DATE=AMOUNT (repeatable; alternative to --input)
    #[arg(long = "entry", value_name = "DATE=AMOUNT", allow_hyphen_values = true)]
    pub entries: Vec<String>,

    /// Day-count convention
    #[arg(long, default_value = "act365")]
    pub convention: ConventionArg,
}

/// Arguments for the present-value query
#[derive(Args)]
pub struct PvArgs {
    /// Path to a cash-flow file: CSV `date,amount` rows or a JSON
    /// date-to-amount object
    #[arg(long)]
    pub input: Option<String>,

    /// Inline entry as DATE=AMOUNT (repeatable; alternative to --input)
    #[arg(long = "entry", value_name = "DATE=AMOUNT", allow_hyphen_values = true)]
    pub entries: Vec<String>,

    /// Discount rate as a decimal fraction (0.05 = 5%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Decimal,

    /// Day-count convention
    #[arg(long, default_value = "act365")]
    pub convention: ConventionArg,
}

pub fn run_rate(args: RateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cash_flow = input::load_cash_flow(args.input.as_deref(), &args.entries)?;
    let report = rate::effective_rate_report(&cash_flow, args.convention.into())?;
    Ok(serde_json::to_value(report)?)
}

pub fn run_pv(args: PvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cash_flow = input::load_cash_flow(args.input.as_deref(), &args.entries)?;
    let convention: DayCountConvention = args.convention.into();

    let value = valuation::present_value(&cash_flow, args.rate, convention);
    let derivative = valuation::present_value_derivative(&cash_flow, args.rate, convention);

    Ok(serde_json::json!({
        "result": {
            "present_value": value.to_string(),
            "derivative": derivative.to_string(),
            "rate": args.rate.to_string(),
            "entries": cash_flow.len(),
        }
    }))
}
