use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan agreement
pub type LoanId = Uuid;

/// ledger party identifier (lender, borrower, administrator, custody account)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(Uuid);

impl PartyId {
    /// the null identity, never a valid party
    pub const NULL: PartyId = PartyId(Uuid::nil());

    /// fresh random party
    pub fn new() -> Self {
        PartyId(Uuid::new_v4())
    }

    /// custody account holding value on behalf of a loan
    pub const fn custody(loan_id: LoanId) -> Self {
        PartyId(loan_id)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// opaque asset identifier (not used to route transfers)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(id: impl Into<String>) -> Self {
        AssetRef(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// terms agreed, nothing deposited
    Created,
    /// borrower's collateral held in custody
    CollateralProvided,
    /// principal released, clock running
    Disbursed,
    /// debt paid, collateral returned
    Repaid,
    /// collateral seized by the lender
    Liquidated,
}

impl LoanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Repaid | LoanStatus::Liquidated)
    }

    /// collateral currently held in custody
    pub fn holds_collateral(&self) -> bool {
        matches!(self, LoanStatus::CollateralProvided | LoanStatus::Disbursed)
    }

    /// true for the statuses where start/end timestamps are set
    pub fn has_started(&self) -> bool {
        matches!(
            self,
            LoanStatus::Disbursed | LoanStatus::Repaid | LoanStatus::Liquidated
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
