pub mod error;
pub mod schedule;
pub mod types;

pub use error::AmortError;
pub use types::*;

/// Standard result type for all loan-amort operations
pub type AmortResult<T> = Result<T, AmortError>;
