use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::{Amount, BasisPoints};
use crate::types::{LoanId, PartyId};

/// lifecycle events emitted by a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    LoanRequested {
        loan_id: LoanId,
        borrower: PartyId,
        loan_amount: Amount,
        collateral_amount: Amount,
        duration: u64,
        interest_rate: BasisPoints,
    },
    CollateralProvided {
        loan_id: LoanId,
        borrower: PartyId,
        amount: Amount,
    },
    LoanDisbursed {
        loan_id: LoanId,
        borrower: PartyId,
        lender: PartyId,
        amount: Amount,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    RepaymentMade {
        loan_id: LoanId,
        borrower: PartyId,
        amount_paid: Amount,
        remaining_due: Amount,
    },
    CollateralReleased {
        loan_id: LoanId,
        borrower: PartyId,
        collateral_amount: Amount,
    },
    CollateralLiquidated {
        loan_id: LoanId,
        lender: PartyId,
        collateral_amount: Amount,
    },
    ResidualSwept {
        loan_id: LoanId,
        recipient: PartyId,
        amount: Amount,
    },
}

impl Event {
    pub fn loan_id(&self) -> LoanId {
        match self {
            Event::LoanRequested { loan_id, .. }
            | Event::CollateralProvided { loan_id, .. }
            | Event::LoanDisbursed { loan_id, .. }
            | Event::RepaymentMade { loan_id, .. }
            | Event::CollateralReleased { loan_id, .. }
            | Event::CollateralLiquidated { loan_id, .. }
            | Event::ResidualSwept { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }
}
