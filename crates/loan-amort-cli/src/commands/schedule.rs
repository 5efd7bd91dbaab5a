use clap::Args;
use serde_json::Value;

use loan_amort_core::schedule::build_schedule;

use super::ScenarioArgs;

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (loan, prepay) = args.scenario.into_specs()?;
    let result = build_schedule(&loan, &prepay)?;
    Ok(serde_json::to_value(result)?)
}
