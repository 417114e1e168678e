use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::errors::{InvalidStateReason, LoanError, Result};
use crate::types::LoanStatus;

/// mutable part of a loan: lifecycle status and the term window
///
/// Only the loan operations move it forward; outside the crate it is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanState {
    status: LoanStatus,
    loan_start_time: Option<DateTime<Utc>>,
    loan_end_time: Option<DateTime<Utc>>,
}

impl Default for LoanState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanState {
    pub fn new() -> Self {
        Self {
            status: LoanStatus::Created,
            loan_start_time: None,
            loan_end_time: None,
        }
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// set once the principal is released
    pub fn loan_start_time(&self) -> Option<DateTime<Utc>> {
        self.loan_start_time
    }

    pub fn loan_end_time(&self) -> Option<DateTime<Utc>> {
        self.loan_end_time
    }

    /// fail unless the loan is waiting for collateral
    pub fn require_created(&self) -> Result<()> {
        match self.status {
            LoanStatus::Created => Ok(()),
            LoanStatus::CollateralProvided | LoanStatus::Disbursed => {
                Err(self.invalid(InvalidStateReason::CollateralAlreadyProvided))
            }
            LoanStatus::Repaid => Err(self.invalid(InvalidStateReason::AlreadyRepaid)),
            LoanStatus::Liquidated => Err(self.invalid(InvalidStateReason::AlreadyLiquidated)),
        }
    }

    /// fail unless collateral is in and principal not yet released
    pub fn require_collateral_provided(&self) -> Result<()> {
        match self.status {
            LoanStatus::CollateralProvided => Ok(()),
            LoanStatus::Created => Err(self.invalid(InvalidStateReason::CollateralNotProvided)),
            LoanStatus::Disbursed => Err(self.invalid(InvalidStateReason::AlreadyDisbursed)),
            LoanStatus::Repaid => Err(self.invalid(InvalidStateReason::AlreadyRepaid)),
            LoanStatus::Liquidated => Err(self.invalid(InvalidStateReason::AlreadyLiquidated)),
        }
    }

    /// fail unless the loan is running
    pub fn require_disbursed(&self) -> Result<()> {
        match self.status {
            LoanStatus::Disbursed => Ok(()),
            LoanStatus::Created | LoanStatus::CollateralProvided => {
                Err(self.invalid(InvalidStateReason::NotDisbursed))
            }
            LoanStatus::Repaid => Err(self.invalid(InvalidStateReason::AlreadyRepaid)),
            LoanStatus::Liquidated => Err(self.invalid(InvalidStateReason::AlreadyLiquidated)),
        }
    }

    pub(crate) fn mark_collateral_provided(&mut self) {
        debug_assert_eq!(self.status, LoanStatus::Created);
        self.status = LoanStatus::CollateralProvided;
    }

    /// end of the term window, failing if it falls outside the calendar
    pub fn end_time(start: DateTime<Utc>, duration_secs: u64) -> Result<DateTime<Utc>> {
        i64::try_from(duration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(|| LoanError::invalid_parameters("loan end time out of range"))
    }

    /// start the clock; end must come from `end_time`
    pub(crate) fn mark_disbursed(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        debug_assert_eq!(self.status, LoanStatus::CollateralProvided);
        self.loan_start_time = Some(start);
        self.loan_end_time = Some(end);
        self.status = LoanStatus::Disbursed;
    }

    pub(crate) fn mark_repaid(&mut self) {
        debug_assert_eq!(self.status, LoanStatus::Disbursed);
        self.status = LoanStatus::Repaid;
    }

    pub(crate) fn mark_liquidated(&mut self) {
        debug_assert_eq!(self.status, LoanStatus::Disbursed);
        self.status = LoanStatus::Liquidated;
    }

    fn invalid(&self, reason: InvalidStateReason) -> LoanError {
        LoanError::InvalidState {
            current: self.status,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_state_has_no_timestamps() {
        let state = LoanState::new();
        assert_eq!(state.status, LoanStatus::Created);
        assert!(state.loan_start_time.is_none());
        assert!(state.loan_end_time.is_none());
    }

    #[test]
    fn test_disbursement_sets_window() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = LoanState::new();
        state.mark_collateral_provided();

        let end = LoanState::end_time(start, 2_592_000).unwrap();
        state.mark_disbursed(start, end);

        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
        assert_eq!(state.loan_start_time, Some(start));
        assert_eq!(state.loan_end_time, Some(end));
        assert_eq!(state.status, LoanStatus::Disbursed);
    }

    #[test]
    fn test_unrepresentable_end_time() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            LoanState::end_time(start, u64::MAX),
            Err(LoanError::InvalidParameters { .. })
        ));
    }

    fn disbursed() -> LoanState {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = LoanState::new();
        state.mark_collateral_provided();
        state.mark_disbursed(start, LoanState::end_time(start, 60).unwrap());
        state
    }

    #[test]
    fn test_reason_codes() {
        let mut state = LoanState::new();
        assert!(matches!(
            state.require_collateral_provided(),
            Err(LoanError::InvalidState { reason: InvalidStateReason::CollateralNotProvided, .. })
        ));
        assert!(matches!(
            state.require_disbursed(),
            Err(LoanError::InvalidState { reason: InvalidStateReason::NotDisbursed, .. })
        ));

        state.mark_collateral_provided();
        assert!(matches!(
            state.require_created(),
            Err(LoanError::InvalidState { reason: InvalidStateReason::CollateralAlreadyProvided, .. })
        ));

        let mut repaid = disbursed();
        repaid.mark_repaid();
        assert!(matches!(
            repaid.require_disbursed(),
            Err(LoanError::InvalidState { reason: InvalidStateReason::AlreadyRepaid, .. })
        ));

        let mut liquidated = disbursed();
        liquidated.mark_liquidated();
        assert!(matches!(
            liquidated.require_created(),
            Err(LoanError::InvalidState { reason: InvalidStateReason::AlreadyLiquidated, .. })
        ));
    }

    #[test]
    fn test_timestamps_follow_status() {
        let mut repaid = disbursed();
        repaid.mark_repaid();
        let mut liquidated = disbursed();
        liquidated.mark_liquidated();
        let mut provided = LoanState::new();
        provided.mark_collateral_provided();

        for state in [LoanState::new(), provided, disbursed(), repaid, liquidated] {
            let started = state.status().has_started();
            assert_eq!(state.loan_start_time().is_some(), started);
            assert_eq!(state.loan_end_time().is_some(), started);
        }
    }
}
