use rust_decimal::Decimal;

use crate::amount::{Amount, BasisPoints};
use crate::config::{LoanConfig, LoanTerms, SweepPolicy};
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::{AssetRef, PartyId};

/// builder for creating loans
#[derive(Debug, Default)]
pub struct LoanBuilder {
    lender: Option<PartyId>,
    borrower: Option<PartyId>,
    loan_amount: Option<Amount>,
    collateral_amount: Option<Amount>,
    interest_rate: Option<BasisPoints>,
    duration_secs: Option<u64>,
    loan_asset: Option<AssetRef>,
    collateral_asset: Option<AssetRef>,
    sweep_policy: Option<SweepPolicy>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lender(mut self, lender: PartyId) -> Self {
        self.lender = Some(lender);
        self
    }

    pub fn borrower(mut self, borrower: PartyId) -> Self {
        self.borrower = Some(borrower);
        self
    }

    pub fn loan_amount(mut self, amount: Amount) -> Self {
        self.loan_amount = Some(amount);
        self
    }

    /// loan amount in whole or fractional tokens; negative values are ignored
    pub fn loan_amount_tokens(mut self, tokens: Decimal) -> Self {
        self.loan_amount = Amount::from_tokens(tokens);
        self
    }

    pub fn collateral_amount(mut self, amount: Amount) -> Self {
        self.collateral_amount = Some(amount);
        self
    }

    pub fn collateral_amount_tokens(mut self, tokens: Decimal) -> Self {
        self.collateral_amount = Amount::from_tokens(tokens);
        self
    }

    pub fn interest_rate(mut self, rate: BasisPoints) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn duration_days(mut self, days: u32) -> Self {
        self.duration_secs = Some(days as u64 * 86_400);
        self
    }

    pub fn loan_asset(mut self, asset: impl Into<String>) -> Self {
        self.loan_asset = Some(AssetRef::new(asset));
        self
    }

    pub fn collateral_asset(mut self, asset: impl Into<String>) -> Self {
        self.collateral_asset = Some(AssetRef::new(asset));
        self
    }

    pub fn sweep_policy(mut self, policy: SweepPolicy) -> Self {
        self.sweep_policy = Some(policy);
        self
    }

    /// assemble the configuration without creating a loan
    pub fn config(self) -> Result<LoanConfig> {
        let lender = self.lender.ok_or_else(|| required("lender"))?;
        let borrower = self.borrower.ok_or_else(|| required("borrower"))?;
        let loan_amount = self.loan_amount.ok_or_else(|| required("loan amount"))?;
        let collateral_amount = self
            .collateral_amount
            .ok_or_else(|| required("collateral amount"))?;
        let interest_rate = self.interest_rate.ok_or_else(|| required("interest rate"))?;
        let duration = self.duration_secs.ok_or_else(|| required("loan duration"))?;

        let terms = LoanTerms::new(
            lender,
            borrower,
            loan_amount,
            collateral_amount,
            interest_rate,
            duration,
            self.loan_asset.ok_or_else(|| required("loan asset"))?,
            self.collateral_asset
                .ok_or_else(|| required("collateral asset"))?,
        );

        Ok(LoanConfig {
            terms,
            sweep_policy: self.sweep_policy,
        })
    }

    pub fn build(self) -> Result<Loan> {
        Loan::create(self.config()?)
    }
}

fn required(field: &str) -> LoanError {
    LoanError::invalid_parameters(format!("{} required", field))
}
