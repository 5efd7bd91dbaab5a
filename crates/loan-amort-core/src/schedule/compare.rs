//! Base-plan vs. prepayment-scenario comparison.
//!
//! Every user interaction computes two schedules: the contractual plan with
//! no prepayment and the real scenario with the supplied extras. The
//! comparison metrics (interest saved, months saved) are derived from the
//! pair.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::engine::{compute, LoanSpec, PrepaymentSpec, Schedule};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::AmortResult;

/// Two schedules for the same loan and the savings between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Contractual payment: the base schedule's first period payment.
    pub base_payment: Money,
    pub total_interest_base: Money,
    pub total_interest_real: Money,
    /// Base total interest minus real total interest.
    pub interest_saved: Money,
    /// Base schedule length minus real schedule length.
    pub months_saved: u32,
    /// Date of the real schedule's final period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    /// The contractual plan with no prepayment.
    pub base: Schedule,
    /// The scenario with the supplied prepayments.
    pub real: Schedule,
}

/// Compare the contractual plan against the supplied prepayment scenario.
///
/// Both schedules carry their own `PayoffStatus`; with a fixed-payment plan
/// below the feasibility floor both come back empty and the savings are
/// zero.
pub fn compare_scenarios(
    loan: &LoanSpec,
    prepay: &PrepaymentSpec,
) -> AmortResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();

    let (base, mut warnings) = compute(loan, &PrepaymentSpec::none())?;
    let (real, real_warnings) = compute(loan, prepay)?;
    warnings.extend(real_warnings);

    let base_payment = base
        .periods
        .first()
        .map(|p| p.payment)
        .unwrap_or(base.base_payment);

    let comparison = ScenarioComparison {
        base_payment,
        total_interest_base: base.total_interest,
        total_interest_real: real.total_interest,
        interest_saved: base.total_interest - real.total_interest,
        months_saved: base.len().saturating_sub(real.len()),
        payoff_date: real.payoff_date(),
        base,
        real,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization Scenario Comparison",
        &serde_json::json!({
            "loan": loan,
            "prepayment": prepay,
        }),
        warnings,
        elapsed,
        comparison,
    ))
}

/// Render a month count as a compact duration: "5y 3m", "5y", "7m".
pub fn format_duration(months: u32) -> String {
    let years = months / 12;
    let rem = months % 12;
    match (years, rem) {
        (0, m) => format!("{m}m"),
        (y, 0) => format!("{y}y"),
        (y, m) => format!("{y}y {m}m"),
    }
}
