pub mod cache;
pub mod compare;
pub mod engine;

pub use cache::ScheduleCache;
pub use compare::{compare_scenarios, format_duration, ScenarioComparison};
pub use engine::{
    annuity_payment, build_schedule, minimum_payment, monthly_rate, LoanSpec, PaymentPlan,
    PayoffStatus, PeriodRecord, PrepaymentSpec, Schedule, BALANCE_EPSILON, MAX_PERIODS,
};
