pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Locate the period rows inside an engine envelope: either the schedule's
/// own `periods`, or the real scenario's `periods` for a comparison.
pub(crate) fn schedule_periods(envelope: &Map<String, Value>) -> Option<&Vec<Value>> {
    let result = envelope.get("result")?.as_object()?;
    if let Some(Value::Array(periods)) = result.get("periods") {
        return Some(periods);
    }
    result.get("real")?.as_object()?.get("periods")?.as_array()
}
