use chrono::NaiveDate;
use loan_amort_core::schedule::{
    build_schedule, minimum_payment, LoanSpec, PaymentPlan, PayoffStatus, PrepaymentSpec,
    Schedule, BALANCE_EPSILON, MAX_PERIODS,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Shared fixtures
// ===========================================================================

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn standard_loan() -> LoanSpec {
    // The reference scenario: 500k at 15% over 5 years.
    LoanSpec {
        principal: dec!(500_000),
        annual_rate_pct: dec!(15.0),
        start_date: start(),
        plan: PaymentPlan::ByTerm { months: 60 },
    }
}

fn run(loan: &LoanSpec, prepay: &PrepaymentSpec) -> Schedule {
    build_schedule(loan, prepay).unwrap().result
}

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

// ===========================================================================
// Fixed-term mode
// ===========================================================================

#[test]
fn test_term_mode_length_equals_term() {
    let schedule = run(&standard_loan(), &PrepaymentSpec::none());
    assert_eq!(schedule.len(), 60);
    assert_eq!(schedule.status, PayoffStatus::PaidOff);
    assert!(schedule.final_balance.abs() <= BALANCE_EPSILON);
}

#[test]
fn test_term_mode_reference_values() {
    let schedule = run(&standard_loan(), &PrepaymentSpec::none());

    // Annuity payment for 500k / 15% / 60m.
    assert_close(
        schedule.base_payment,
        dec!(11894.97),
        dec!(0.05),
        "base payment",
    );
    // First period interest: 500000 * 0.0125.
    assert_eq!(schedule.periods[0].interest, dec!(6250));
    assert_eq!(schedule.periods[0].payment, schedule.base_payment);
}

#[test]
fn test_term_mode_various_terms_pay_off_on_time() {
    for months in [1, 12, 36, 120, 360] {
        let loan = LoanSpec {
            plan: PaymentPlan::ByTerm { months },
            ..standard_loan()
        };
        let schedule = run(&loan, &PrepaymentSpec::none());
        assert_eq!(schedule.len(), months, "term of {months} months");
        assert_eq!(schedule.status, PayoffStatus::PaidOff);
        assert!(schedule.final_balance.abs() <= BALANCE_EPSILON);
    }
}

#[test]
fn test_term_beyond_ceiling_truncates() {
    let loan = LoanSpec {
        plan: PaymentPlan::ByTerm { months: 720 },
        ..standard_loan()
    };
    let out = build_schedule(&loan, &PrepaymentSpec::none()).unwrap();
    assert_eq!(out.result.len(), MAX_PERIODS);
    assert_eq!(out.result.status, PayoffStatus::Truncated);
    assert!(out.result.final_balance > BALANCE_EPSILON);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_zero_interest_loan() {
    let loan = LoanSpec {
        principal: dec!(120_000),
        annual_rate_pct: Decimal::ZERO,
        start_date: start(),
        plan: PaymentPlan::ByTerm { months: 12 },
    };
    let schedule = run(&loan, &PrepaymentSpec::none());

    assert_eq!(schedule.base_payment, dec!(10_000));
    assert_eq!(schedule.len(), 12);
    for p in &schedule.periods {
        assert_eq!(p.interest, Decimal::ZERO, "period {}", p.period);
        assert_eq!(p.principal, dec!(10_000), "period {}", p.period);
    }
    assert_eq!(schedule.final_balance, Decimal::ZERO);
    assert_eq!(schedule.total_interest, Decimal::ZERO);
}

// ===========================================================================
// Fixed-payment mode
// ===========================================================================

#[test]
fn test_payment_mode_principal_reconstructed() {
    let loan = LoanSpec {
        plan: PaymentPlan::ByPayment {
            amount: dec!(15_000),
        },
        ..standard_loan()
    };
    let schedule = run(&loan, &PrepaymentSpec::none());

    assert_eq!(schedule.status, PayoffStatus::PaidOff);
    assert_close(
        schedule.total_principal,
        dec!(500_000),
        BALANCE_EPSILON,
        "sum of principal portions",
    );
}

#[test]
fn test_payment_at_threshold_is_infeasible() {
    let floor = minimum_payment(dec!(500_000), dec!(15.0));
    assert_eq!(floor, dec!(6250));

    let loan = LoanSpec {
        plan: PaymentPlan::ByPayment { amount: floor },
        ..standard_loan()
    };
    let out = build_schedule(&loan, &PrepaymentSpec::none()).unwrap();
    assert_eq!(out.result.status, PayoffStatus::Infeasible);
    assert!(out.result.is_empty());
    assert_eq!(out.result.final_balance, dec!(500_000));
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_payment_just_above_threshold_is_accepted() {
    // One currency unit above the floor: feasible but glacial. On this
    // loan payoff needs ~700 periods, so the run truncates at the ceiling
    // rather than being rejected.
    let loan = LoanSpec {
        plan: PaymentPlan::ByPayment { amount: dec!(6251) },
        ..standard_loan()
    };
    let schedule = run(&loan, &PrepaymentSpec::none());
    assert_eq!(schedule.status, PayoffStatus::Truncated);
    assert_eq!(schedule.len(), MAX_PERIODS);
    assert!(schedule.final_balance > BALANCE_EPSILON);
}

#[test]
fn test_payment_near_threshold_converges_within_ceiling() {
    // 10k at 12%: floor is 100. A payment of 101 pays off in roughly 460
    // periods, inside the ceiling.
    let loan = LoanSpec {
        principal: dec!(10_000),
        annual_rate_pct: dec!(12.0),
        start_date: start(),
        plan: PaymentPlan::ByPayment { amount: dec!(101) },
    };
    let schedule = run(&loan, &PrepaymentSpec::none());
    assert_eq!(schedule.status, PayoffStatus::PaidOff);
    assert!(schedule.len() > 400 && schedule.len() < MAX_PERIODS);
    assert!(schedule.final_balance.abs() <= BALANCE_EPSILON);
}

// ===========================================================================
// Record invariants
// ===========================================================================

#[test]
fn test_balance_strictly_decreasing() {
    let schedule = run(&standard_loan(), &PrepaymentSpec::none());

    let mut prev = dec!(500_000);
    for p in &schedule.periods {
        assert!(
            p.balance < prev,
            "period {}: balance {} should be below previous {}",
            p.period,
            p.balance,
            prev
        );
        assert!(p.balance >= Decimal::ZERO, "period {}", p.period);
        prev = p.balance;
    }
}

#[test]
fn test_payment_is_principal_plus_interest() {
    let mut prepay = PrepaymentSpec::none();
    prepay.monthly_extra = dec!(1_000);
    prepay.add_one_off(12, dec!(50_000));
    let schedule = run(&standard_loan(), &prepay);

    for p in &schedule.periods {
        assert_eq!(p.payment, p.principal + p.interest, "period {}", p.period);
    }
}

#[test]
fn test_periods_sequential_and_dated() {
    let schedule = run(&standard_loan(), &PrepaymentSpec::none());
    for (i, p) in schedule.periods.iter().enumerate() {
        assert_eq!(p.period, i as u32 + 1);
    }
    assert_eq!(schedule.periods[0].date, start());
    assert_eq!(
        schedule.periods[59].date,
        NaiveDate::from_ymd_opt(2030, 12, 1).unwrap()
    );
}

// ===========================================================================
// Prepayment behavior
// ===========================================================================

#[test]
fn test_one_off_prepayment_shortens_and_saves() {
    let base = run(&standard_loan(), &PrepaymentSpec::none());

    let mut prepay = PrepaymentSpec::none();
    prepay.add_one_off(12, dec!(50_000));
    let real = run(&standard_loan(), &prepay);

    assert!(real.len() < 60);
    assert!(real.total_interest < base.total_interest);
    assert_eq!(real.status, PayoffStatus::PaidOff);
}

#[test]
fn test_recurring_extra_never_lengthens_or_costs_more() {
    let base = run(&standard_loan(), &PrepaymentSpec::none());

    for extra in [dec!(0), dec!(100), dec!(1_000), dec!(10_000)] {
        let mut prepay = PrepaymentSpec::none();
        prepay.monthly_extra = extra;
        let real = run(&standard_loan(), &prepay);

        assert!(real.len() <= base.len(), "extra {extra}");
        assert!(
            real.total_interest <= base.total_interest,
            "extra {extra}: interest {} vs base {}",
            real.total_interest,
            base.total_interest
        );
    }
}

#[test]
fn test_extra_recorded_per_period() {
    let mut prepay = PrepaymentSpec::none();
    prepay.monthly_extra = dec!(1_000);
    prepay.add_one_off(6, dec!(20_000));
    let schedule = run(&standard_loan(), &prepay);

    assert_eq!(schedule.periods[0].extra, dec!(1_000));
    assert_eq!(schedule.periods[5].extra, dec!(21_000));
    assert_eq!(schedule.periods[6].extra, dec!(1_000));
}

#[test]
fn test_one_off_past_payoff_is_ignored() {
    let mut prepay = PrepaymentSpec::none();
    prepay.add_one_off(599, dec!(50_000));
    let schedule = run(&standard_loan(), &prepay);
    // Loan is paid off at period 60; the period-599 entry never applies.
    assert_eq!(schedule.len(), 60);
    let base = run(&standard_loan(), &PrepaymentSpec::none());
    assert_eq!(schedule.total_interest, base.total_interest);
}

// ===========================================================================
// Purity and envelope
// ===========================================================================

#[test]
fn test_identical_inputs_identical_schedules() {
    let mut prepay = PrepaymentSpec::none();
    prepay.monthly_extra = dec!(750);
    prepay.add_one_off(24, dec!(40_000));

    let first = run(&standard_loan(), &prepay);
    let second = run(&standard_loan(), &prepay);
    assert_eq!(first, second);
}

#[test]
fn test_envelope_populated() {
    let out = build_schedule(&standard_loan(), &PrepaymentSpec::none()).unwrap();
    assert_eq!(out.methodology, "Declining-Balance Amortization");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(out.warnings.is_empty());
}
