use clap::Args;
use serde_json::Value;

use loan_amort_core::schedule::{compare_scenarios, format_duration};

use super::ScenarioArgs;

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (loan, prepay) = args.scenario.into_specs()?;
    let result = compare_scenarios(&loan, &prepay)?;

    // Augment the envelope with the human-readable durations the summary
    // view shows alongside the raw month counts.
    let mut value = serde_json::to_value(result)?;
    if let Some(cmp) = value.get_mut("result").and_then(Value::as_object_mut) {
        let base_len = cmp
            .get("base")
            .and_then(|b| b.get("periods"))
            .and_then(Value::as_array)
            .map(|p| p.len() as u32)
            .unwrap_or(0);
        let real_len = cmp
            .get("real")
            .and_then(|r| r.get("periods"))
            .and_then(Value::as_array)
            .map(|p| p.len() as u32)
            .unwrap_or(0);
        cmp.insert(
            "base_duration".into(),
            Value::String(format_duration(base_len)),
        );
        cmp.insert(
            "real_duration".into(),
            Value::String(format_duration(real_len)),
        );
    }
    Ok(value)
}
