pub mod compare;
pub mod min_payment;
pub mod schedule;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_amort_core::schedule::{minimum_payment, LoanSpec, PaymentPlan, PrepaymentSpec};

use crate::input;

/// Loan and prepayment flags shared by `schedule` and `compare`.
#[derive(Args)]
pub struct ScenarioArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual nominal interest rate in percent (e.g. 15.0)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Date of the first payment, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Target term in months
    #[arg(long, conflicts_with = "payment")]
    pub term_months: Option<u32>,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Recurring extra amount added to every period
    #[arg(long, default_value = "0")]
    pub monthly_extra: Decimal,

    /// One-off extra payment as PERIOD=AMOUNT (repeatable; amounts for the
    /// same period accumulate)
    #[arg(long = "one-off", value_parser = parse_one_off)]
    pub one_off: Vec<(u32, Decimal)>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// JSON input shape accepted via --input or stdin.
#[derive(Deserialize)]
pub struct ScenarioInput {
    pub loan: LoanSpec,
    #[serde(default)]
    pub prepayment: PrepaymentSpec,
}

impl ScenarioArgs {
    /// Assemble the engine inputs from a JSON file, piped JSON, or flags.
    pub fn into_specs(self) -> Result<(LoanSpec, PrepaymentSpec), Box<dyn std::error::Error>> {
        let scenario: ScenarioInput = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            self.from_flags()?
        };

        // Pre-validate fixed-payment feasibility so the user gets the
        // minimum in the error message; the engine re-checks regardless.
        if let PaymentPlan::ByPayment { amount } = scenario.loan.plan {
            let floor = minimum_payment(scenario.loan.principal, scenario.loan.annual_rate_pct);
            if amount <= floor {
                return Err(format!(
                    "payment {amount} does not cover the first period's interest; \
                     it must exceed {floor}"
                )
                .into());
            }
        }

        Ok((scenario.loan, scenario.prepayment))
    }

    fn from_flags(&self) -> Result<ScenarioInput, Box<dyn std::error::Error>> {
        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;

        let plan = match (self.term_months, self.payment) {
            (Some(months), None) => PaymentPlan::ByTerm { months },
            (None, Some(amount)) => PaymentPlan::ByPayment { amount },
            _ => {
                return Err(
                    "exactly one of --term-months or --payment is required (or provide --input)"
                        .into(),
                )
            }
        };

        let mut prepayment = PrepaymentSpec::none();
        prepayment.monthly_extra = self.monthly_extra;
        for &(period, amount) in &self.one_off {
            prepayment.add_one_off(period, amount);
        }

        Ok(ScenarioInput {
            loan: LoanSpec {
                principal,
                annual_rate_pct: rate,
                start_date: self
                    .start_date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
                plan,
            },
            prepayment,
        })
    }
}

fn parse_one_off(s: &str) -> Result<(u32, Decimal), String> {
    let (period, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PERIOD=AMOUNT, got '{s}'"))?;
    let period: u32 = period
        .trim()
        .parse()
        .map_err(|e| format!("invalid period '{period}': {e}"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((period, amount))
}
