use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::amount::Amount;
use crate::ledger::LedgerError;
use crate::types::{LoanStatus, PartyId};

/// why an operation is not valid in the current lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStateReason {
    CollateralAlreadyProvided,
    CollateralNotProvided,
    AlreadyDisbursed,
    NotDisbursed,
    AlreadyRepaid,
    AlreadyLiquidated,
}

impl std::fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InvalidStateReason::CollateralAlreadyProvided => "collateral already provided",
            InvalidStateReason::CollateralNotProvided => "collateral not yet provided",
            InvalidStateReason::AlreadyDisbursed => "loan already disbursed",
            InvalidStateReason::NotDisbursed => "loan not disbursed",
            InvalidStateReason::AlreadyRepaid => "loan already repaid",
            InvalidStateReason::AlreadyLiquidated => "loan already liquidated",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid parameters: {message}")]
    InvalidParameters {
        message: String,
    },

    #[error("unauthorized caller {caller}: expected {expected}")]
    Unauthorized {
        caller: PartyId,
        expected: PartyId,
    },

    #[error("invalid state {current}: {reason}")]
    InvalidState {
        current: LoanStatus,
        reason: InvalidStateReason,
    },

    #[error("insufficient value: required {required}, provided {provided}")]
    InsufficientValue {
        required: Amount,
        provided: Amount,
    },

    #[error("loan not yet due: due at {due_at}, current time {now}")]
    NotYetDue {
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("transfer failed: {0}")]
    Transfer(#[from] LedgerError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid_parameters(message: impl Into<String>) -> Self {
        LoanError::InvalidParameters {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
