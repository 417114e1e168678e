pub mod accrual;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::{Amount, BasisPoints};

pub use accrual::{mul_div_floor, AccrualEngine};

/// breakdown of an amount-due computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestCalculation {
    pub principal: Amount,
    pub interest: Amount,
    pub rate: BasisPoints,
    pub elapsed_secs: u64,
    pub as_of: DateTime<Utc>,
}

impl InterestCalculation {
    pub fn total_due(&self) -> Amount {
        self.principal
            .checked_add(self.interest)
            .unwrap_or(Amount::MAX)
    }
}

/// compute the interest breakdown for a running loan
pub fn calculate(
    engine: &AccrualEngine,
    principal: Amount,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> InterestCalculation {
    let elapsed_secs = engine.elapsed_seconds(start, now);
    InterestCalculation {
        principal,
        interest: engine.interest_for(principal, elapsed_secs),
        rate: engine.rate,
        elapsed_secs,
        as_of: now,
    }
}
