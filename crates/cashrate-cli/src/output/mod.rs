use serde_json::Value;
use tabled::{builder::Builder, Table};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_table(value),
        OutputFormat::Minimal => print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Render the result fields as a two-column table, with warnings and
/// methodology as a footer.
fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{value}");
        return;
    };
    let result = map.get("result").unwrap_or(value);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    if let Value::Object(fields) = result {
        for (key, val) in fields {
            builder.push_record([key.as_str(), &flatten(val)]);
        }
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        for warning in warnings {
            if let Value::String(s) = warning {
                println!("warning: {s}");
            }
        }
    }
    if let Some(Value::String(methodology)) = map.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

/// Print just the headline number.
fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for key in ["rate_percent", "present_value"] {
        if let Some(v) = result.get(key) {
            println!("{}", flatten(v));
            return;
        }
    }
    println!("{result}");
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
