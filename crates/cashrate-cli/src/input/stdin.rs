use std::io::{self, Read};

use cashrate_core::types::CashFlow;

/// Attempt to read a JSON cash flow from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_stdin() -> Result<Option<CashFlow>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let flow: CashFlow = serde_json::from_str(trimmed)?;
    Ok(Some(flow))
}
