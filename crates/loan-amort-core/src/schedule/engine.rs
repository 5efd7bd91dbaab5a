//! Declining-balance amortization engine.
//!
//! Simulates a loan month by month: interest accrues on the balance before
//! the period's payment, the remainder of the payment reduces principal,
//! and prepayments (recurring or one-off) accelerate payoff. Supports two
//! planning modes: a fixed term (annuity payment derived up front) or a
//! fixed payment (term falls out of the simulation). All math in
//! `rust_decimal::Decimal`.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AmortResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum balance below which the loan is considered fully paid.
/// Absorbs the sub-cent residue that repeated subtraction can leave.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Hard ceiling on schedule length: 50 years of monthly periods. Bounds the
/// loop when a fixed payment barely clears the interest charge.
pub const MAX_PERIODS: u32 = 600;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Planning mode selector. Exactly one of the two targets is ever set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentPlan {
    /// Fixed term: derive the annuity payment that amortizes the principal
    /// over this many months.
    ByTerm { months: u32 },
    /// Fixed payment: the term falls out of the simulation.
    ByPayment { amount: Money },
}

/// A loan to be amortized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanSpec {
    /// Outstanding amount at the start of period 1.
    pub principal: Money,
    /// Nominal annual rate as a percentage (15.0 = 15%).
    pub annual_rate_pct: Rate,
    /// Date of the first period.
    pub start_date: NaiveDate,
    pub plan: PaymentPlan,
}

/// Extra amounts paid beyond the scheduled base payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrepaymentSpec {
    /// Recurring extra added to every period.
    #[serde(default)]
    pub monthly_extra: Money,
    /// One-off extras keyed by 1-based period index.
    #[serde(default)]
    pub one_off: BTreeMap<u32, Money>,
}

impl PrepaymentSpec {
    /// The base scenario: no prepayment at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.monthly_extra.is_zero() && self.one_off.is_empty()
    }

    /// Register a one-off extra. Amounts for the same period accumulate.
    pub fn add_one_off(&mut self, period: u32, amount: Money) {
        *self.one_off.entry(period).or_insert(Decimal::ZERO) += amount;
    }

    fn extra_for(&self, period: u32) -> Money {
        self.monthly_extra
            + self
                .one_off
                .get(&period)
                .copied()
                .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the amortization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period index.
    pub period: u32,
    /// Calendar date of the period (start date plus period-1 months).
    pub date: NaiveDate,
    /// Total paid this period. Always equals principal + interest.
    pub payment: Money,
    /// Principal portion.
    pub principal: Money,
    /// Interest portion, accrued on the balance before this payment.
    pub interest: Money,
    /// Extra amount actually applied this period.
    pub extra: Money,
    /// Remaining balance after the period.
    pub balance: Money,
}

/// How the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffStatus {
    /// Balance reached zero (within epsilon).
    PaidOff,
    /// The 600-period ceiling was hit with a nonzero balance outstanding.
    Truncated,
    /// Fixed payment does not exceed the first period's interest; no
    /// schedule was generated.
    Infeasible,
}

/// An ordered amortization schedule plus derived totals. Immutable once
/// returned; recomputed wholesale whenever any input changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub periods: Vec<PeriodRecord>,
    pub status: PayoffStatus,
    /// The derived (or supplied) scheduled payment.
    pub base_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Balance outstanding after the last period. Zero (within epsilon)
    /// for `PaidOff`; the full principal for `Infeasible`.
    pub final_balance: Money,
}

impl Schedule {
    pub fn len(&self) -> u32 {
        self.periods.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn is_paid_off(&self) -> bool {
        self.status == PayoffStatus::PaidOff
    }

    /// Date of the final period, if any periods exist.
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.periods.last().map(|p| p.date)
    }

    fn infeasible(base_payment: Money, principal: Money) -> Self {
        Schedule {
            periods: Vec::new(),
            status: PayoffStatus::Infeasible,
            base_payment,
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
            final_balance: principal,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly rate from a nominal annual percentage: `annual / 12 / 100`.
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / dec!(12) / dec!(100)
}

/// The feasibility floor for fixed-payment mode: the first period's
/// interest charge. A fixed payment must strictly exceed this.
pub fn minimum_payment(principal: Money, annual_rate_pct: Rate) -> Money {
    principal * monthly_rate(annual_rate_pct)
}

/// Standard annuity payment amortizing `principal` over `months` periods
/// at monthly rate `rate`. Falls back to straight division at zero rate.
/// Uses the reciprocal form `P * r / (1 - (1+r)^-n)` so intermediates stay
/// bounded for any rate and term.
pub fn annuity_payment(principal: Money, rate: Rate, months: u32) -> Money {
    if rate.is_zero() {
        return principal / Decimal::from(months);
    }
    let recip = (Decimal::ONE / (Decimal::ONE + rate)).powi(months as i64);
    principal * rate / (Decimal::ONE - recip)
}

/// Build the full amortization schedule for a loan and prepayment pair.
///
/// Validation failures are errors. An infeasible fixed payment is not: it
/// yields an empty schedule with `PayoffStatus::Infeasible`, and a run that
/// hits the 600-period ceiling yields a truncated schedule with
/// `PayoffStatus::Truncated` and a warning in the envelope. Callers must
/// not treat either the same as `PaidOff`.
pub fn build_schedule(
    loan: &LoanSpec,
    prepay: &PrepaymentSpec,
) -> AmortResult<ComputationOutput<Schedule>> {
    let start = Instant::now();

    let (schedule, warnings) = compute(loan, prepay)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Declining-Balance Amortization",
        &serde_json::json!({
            "loan": loan,
            "prepayment": prepay,
        }),
        warnings,
        elapsed,
        schedule,
    ))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub(crate) fn compute(
    loan: &LoanSpec,
    prepay: &PrepaymentSpec,
) -> AmortResult<(Schedule, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    validate(loan, prepay)?;

    let rate = monthly_rate(loan.annual_rate_pct);

    let base_payment = match loan.plan {
        PaymentPlan::ByPayment { amount } => {
            let floor = loan.principal * rate;
            if amount <= floor {
                warnings.push(format!(
                    "payment {} does not exceed the first period's interest {}; \
                     the balance would never decrease",
                    amount, floor
                ));
                return Ok((Schedule::infeasible(amount, loan.principal), warnings));
            }
            amount
        }
        PaymentPlan::ByTerm { months } => annuity_payment(loan.principal, rate, months),
    };

    let mut periods: Vec<PeriodRecord> = Vec::new();
    let mut balance = loan.principal;
    let mut date = loan.start_date;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for period in 1..=MAX_PERIODS {
        if balance <= BALANCE_EPSILON {
            break;
        }

        let interest = balance * rate;
        let extra = prepay.extra_for(period);
        let tentative = base_payment + extra;

        let record = if tentative >= balance + interest {
            // Final period: clamp so the loan is never overpaid. The
            // reported extra is the clamped payment's excess over the
            // scheduled base payment, floored at zero.
            let payment = balance + interest;
            let principal = balance;
            balance = Decimal::ZERO;
            PeriodRecord {
                period,
                date,
                payment,
                principal,
                interest,
                extra: (payment - base_payment).max(Decimal::ZERO),
                balance,
            }
        } else {
            let principal = tentative - interest;
            balance -= principal;
            PeriodRecord {
                period,
                date,
                payment: tentative,
                principal,
                interest,
                extra,
                balance,
            }
        };

        total_interest += record.interest;
        total_principal += record.principal;
        periods.push(record);

        date = date
            .checked_add_months(Months::new(1))
            .ok_or(AmortError::DateOverflow { date })?;
    }

    let status = if balance <= BALANCE_EPSILON {
        PayoffStatus::PaidOff
    } else {
        warnings.push(format!(
            "balance {} still outstanding after {} periods; schedule truncated",
            balance, MAX_PERIODS
        ));
        PayoffStatus::Truncated
    };

    Ok((
        Schedule {
            periods,
            status,
            base_payment,
            total_interest,
            total_principal,
            final_balance: balance,
        },
        warnings,
    ))
}

fn validate(loan: &LoanSpec, prepay: &PrepaymentSpec) -> AmortResult<()> {
    if loan.principal <= Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if loan.annual_rate_pct < Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    match loan.plan {
        PaymentPlan::ByTerm { months } => {
            if months == 0 {
                return Err(AmortError::InvalidInput {
                    field: "plan.months".into(),
                    reason: "Term must be at least 1 month".into(),
                });
            }
        }
        PaymentPlan::ByPayment { amount } => {
            if amount <= Decimal::ZERO {
                return Err(AmortError::InvalidInput {
                    field: "plan.amount".into(),
                    reason: "Fixed payment must be positive".into(),
                });
            }
        }
    }
    if prepay.monthly_extra < Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "monthly_extra".into(),
            reason: "Recurring extra cannot be negative".into(),
        });
    }
    for (&period, &amount) in &prepay.one_off {
        if period == 0 {
            return Err(AmortError::InvalidInput {
                field: "one_off".into(),
                reason: "Period indices are 1-based".into(),
            });
        }
        if amount < Decimal::ZERO {
            return Err(AmortError::InvalidInput {
                field: "one_off".into(),
                reason: format!("One-off amount for period {period} cannot be negative"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
