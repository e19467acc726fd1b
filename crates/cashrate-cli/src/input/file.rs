use std::fs;
use std::path::{Path, PathBuf};

use cashrate_core::types::CashFlow;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::add_entry;

/// Read a cash flow from a file. `.json` files hold a date-to-amount object;
/// everything else is parsed as CSV `date,amount` rows (a non-date first row
/// is treated as a header and skipped).
pub fn read_cash_flow(path: &str) -> Result<CashFlow, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    match canonical.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json(&canonical),
        _ => read_csv(&canonical),
    }
}

fn read_json(path: &Path) -> Result<CashFlow, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let flow: CashFlow = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(flow)
}

fn read_csv(path: &Path) -> Result<CashFlow, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let mut flow = CashFlow::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 2 {
            return Err(format!("row {}: expected `date,amount`", row + 1).into());
        }
        let date = match record[0].parse::<NaiveDate>() {
            Ok(date) => date,
            Err(_) if row == 0 => continue,
            Err(e) => {
                return Err(format!("row {}: bad date '{}': {}", row + 1, &record[0], e).into())
            }
        };
        let amount = record[1]
            .parse::<Decimal>()
            .map_err(|e| format!("row {}: bad amount '{}': {}", row + 1, &record[1], e))?;
        add_entry(&mut flow, date, amount);
    }
    Ok(flow)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
