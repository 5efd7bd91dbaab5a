use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_amort_core::schedule::{minimum_payment, monthly_rate};

#[derive(Args)]
pub struct MinPaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual nominal interest rate in percent (e.g. 15.0)
    #[arg(long)]
    pub rate: Decimal,
}

pub fn run_min_payment(args: MinPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let floor = minimum_payment(args.principal, args.rate);
    Ok(serde_json::json!({
        "result": {
            "minimum_payment": floor,
            "monthly_rate": monthly_rate(args.rate),
            "note": "a fixed payment must strictly exceed the minimum",
        }
    }))
}
