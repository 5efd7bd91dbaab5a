//! Optional caller-managed memoization for schedule computation.
//!
//! The engine is a pure function of its inputs, so a cache keyed by the
//! full `(LoanSpec, PrepaymentSpec)` tuple is always safe. The engine
//! itself stays stateless; owning one of these is the caller's choice.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::schedule::engine::{compute, LoanSpec, PrepaymentSpec, Schedule};
use crate::AmortResult;

#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<(LoanSpec, PrepaymentSpec), Schedule>,
    hits: u64,
    misses: u64,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schedule for this input pair, computing and
    /// storing it on first sight. Envelope warnings are not retained;
    /// callers that need them should use `build_schedule` directly.
    pub fn get_or_compute(
        &mut self,
        loan: &LoanSpec,
        prepay: &PrepaymentSpec,
    ) -> AmortResult<&Schedule> {
        match self.entries.entry((loan.clone(), prepay.clone())) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                let (schedule, _warnings) = compute(loan, prepay)?;
                Ok(entry.insert(schedule))
            }
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
