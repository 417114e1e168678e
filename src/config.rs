use serde::{Deserialize, Serialize};

use crate::amount::{Amount, BasisPoints};
use crate::errors::{LoanError, Result};
use crate::interest::AccrualEngine;
use crate::types::{AssetRef, PartyId};

/// immutable loan parameters fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub lender: PartyId,
    pub borrower: PartyId,
    pub loan_amount: Amount,
    pub collateral_amount: Amount,
    pub interest_rate: BasisPoints,
    /// term length in seconds
    pub loan_duration: u64,
    pub loan_asset: AssetRef,
    pub collateral_asset: AssetRef,
}

impl LoanTerms {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lender: PartyId,
        borrower: PartyId,
        loan_amount: Amount,
        collateral_amount: Amount,
        interest_rate: BasisPoints,
        loan_duration: u64,
        loan_asset: AssetRef,
        collateral_asset: AssetRef,
    ) -> Self {
        Self {
            lender,
            borrower,
            loan_amount,
            collateral_amount,
            interest_rate,
            loan_duration,
            loan_asset,
            collateral_asset,
        }
    }

    /// check every construction invariant
    pub fn validate(&self) -> Result<()> {
        if self.lender.is_null() {
            return Err(LoanError::invalid_parameters("lender must not be null"));
        }
        if self.borrower.is_null() {
            return Err(LoanError::invalid_parameters("borrower must not be null"));
        }
        if self.lender == self.borrower {
            return Err(LoanError::invalid_parameters(
                "lender and borrower must be distinct",
            ));
        }
        if self.loan_amount.is_zero() {
            return Err(LoanError::invalid_parameters("loan amount must be positive"));
        }
        if self.collateral_amount.is_zero() {
            return Err(LoanError::invalid_parameters(
                "collateral amount must be positive",
            ));
        }
        if !self.interest_rate.is_valid() {
            return Err(LoanError::invalid_parameters(format!(
                "interest rate {} bps exceeds {}",
                self.interest_rate.as_bps(),
                BasisPoints::MAX.as_bps()
            )));
        }
        if self.loan_duration == 0 {
            return Err(LoanError::invalid_parameters("loan duration must be positive"));
        }
        // the largest amount ever due must stay representable
        let max_interest = self.accrual_engine().full_term_interest(self.loan_amount);
        if self.loan_amount.checked_add(max_interest).is_none() {
            return Err(LoanError::invalid_parameters(
                "full-term amount due overflows",
            ));
        }
        Ok(())
    }

    pub fn accrual_engine(&self) -> AccrualEngine {
        AccrualEngine::new(self.interest_rate, self.loan_duration)
    }

    /// loan amount plus interest for the whole term
    pub fn full_term_amount_due(&self) -> Amount {
        self.loan_amount
            .checked_add(self.accrual_engine().full_term_interest(self.loan_amount))
            .unwrap_or(Amount::MAX)
    }
}

/// who may sweep value left in a loan's custody account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepPolicy {
    /// anyone may sweep the entire custody balance, escrowed collateral included
    Unrestricted,
    /// only this party may sweep, and only value beyond escrowed collateral
    Administrator(PartyId),
}

/// full loan configuration: terms plus operational policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanConfig {
    pub terms: LoanTerms,
    #[serde(default)]
    pub sweep_policy: Option<SweepPolicy>,
}

impl LoanConfig {
    pub fn new(terms: LoanTerms) -> Self {
        Self {
            terms,
            sweep_policy: None,
        }
    }

    pub fn with_sweep_policy(mut self, policy: SweepPolicy) -> Self {
        self.sweep_policy = Some(policy);
        self
    }

    /// sweep policy in effect, defaulting to the lender as administrator
    pub fn effective_sweep_policy(&self) -> SweepPolicy {
        self.sweep_policy
            .unwrap_or(SweepPolicy::Administrator(self.terms.lender))
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.terms.validate()?;
        if let Some(SweepPolicy::Administrator(admin)) = self.sweep_policy {
            if admin.is_null() {
                return Err(LoanError::invalid_parameters(
                    "sweep administrator must not be null",
                ));
            }
        }
        Ok(())
    }
}
