/// serialization support for loans
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{Amount, BasisPoints};
use crate::config::SweepPolicy;
use crate::loan::Loan;
use crate::types::{AssetRef, LoanId, LoanStatus, PartyId};

/// serializable view of a loan at a point in time
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub status: LoanStatus,
    pub parties: PartiesView,
    pub terms: TermsView,
    pub schedule: ScheduleView,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartiesView {
    pub lender: PartyId,
    pub borrower: PartyId,
    pub custody: PartyId,
    pub sweep_policy: SweepPolicy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub loan_amount: Amount,
    pub collateral_amount: Amount,
    pub loan_asset: AssetRef,
    pub collateral_asset: AssetRef,
    pub interest_rate: BasisPoints,
    /// rate charged over the full term, as a percentage
    pub interest_rate_percent: Decimal,
    pub loan_duration_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub loan_start_time: Option<DateTime<Utc>>,
    pub loan_end_time: Option<DateTime<Utc>>,
    pub elapsed_secs: Option<u64>,
    pub accrued_interest: Amount,
    pub amount_due: Amount,
    pub liquidatable: bool,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>) -> Self {
        let terms = loan.terms();
        let breakdown = loan.interest_breakdown(now);
        let liquidatable = loan.status() == LoanStatus::Disbursed
            && loan.loan_end_time().map(|end| now > end).unwrap_or(false);

        LoanView {
            id: loan.id(),
            status: loan.status(),
            parties: PartiesView {
                lender: terms.lender,
                borrower: terms.borrower,
                custody: loan.custody(),
                sweep_policy: loan.sweep_policy(),
            },
            terms: TermsView {
                loan_amount: terms.loan_amount,
                collateral_amount: terms.collateral_amount,
                loan_asset: terms.loan_asset.clone(),
                collateral_asset: terms.collateral_asset.clone(),
                interest_rate: terms.interest_rate,
                interest_rate_percent: terms.interest_rate.as_percentage(),
                loan_duration_secs: terms.loan_duration,
            },
            schedule: ScheduleView {
                loan_start_time: loan.loan_start_time(),
                loan_end_time: loan.loan_end_time(),
                elapsed_secs: breakdown.map(|b| b.elapsed_secs),
                accrued_interest: breakdown.map(|b| b.interest).unwrap_or(Amount::ZERO),
                amount_due: loan.calculate_amount_due(now),
                liquidatable,
            },
            as_of: now,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Loan {
    /// pretty json snapshot of the loan as of `now`
    pub fn json(&self, now: DateTime<Utc>) -> String {
        LoanView::from_loan(self, now)
            .to_json_pretty()
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
