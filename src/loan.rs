use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::amount::Amount;
use crate::config::{LoanConfig, LoanTerms, SweepPolicy};
use crate::errors::{InvalidStateReason, LoanError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{self, InterestCalculation};
use crate::ledger::{Ledger, TransferBatch};
use crate::state::LoanState;
use crate::types::{LoanId, LoanStatus, PartyId};

/// bilateral collateralized loan
///
/// Every mutating operation reads the ledger clock once, checks all of its
/// preconditions, commits one transfer batch, and only then changes state and
/// emits events. A failed commit leaves the loan exactly as it was.
///
/// Terms and state are read-only from outside:
///
/// ```compile_fail
/// use collateral_loan_rs::{Loan, PartyId};
///
/// fn reassign(loan: &mut Loan, thief: PartyId) {
///     loan.config.terms.borrower = thief;
/// }
/// ```
///
/// ```compile_fail
/// use collateral_loan_rs::Loan;
///
/// fn force_repaid(loan: &mut Loan) {
///     loan.state.mark_repaid();
/// }
/// ```
pub struct Loan {
    id: LoanId,
    config: LoanConfig,
    state: LoanState,
    events: EventStore,
}

impl Loan {
    /// create a loan from validated configuration
    pub fn create(config: LoanConfig) -> Result<Self> {
        config.validate()?;

        let mut loan = Self {
            id: Uuid::new_v4(),
            config,
            state: LoanState::new(),
            events: EventStore::new(),
        };

        let terms = &loan.config.terms;
        loan.events.emit(Event::LoanRequested {
            loan_id: loan.id,
            borrower: terms.borrower,
            loan_amount: terms.loan_amount,
            collateral_amount: terms.collateral_amount,
            duration: terms.loan_duration,
            interest_rate: terms.interest_rate,
        });

        tracing::info!(
            loan_id = %loan.id,
            lender = %terms.lender,
            borrower = %terms.borrower,
            loan_amount = %terms.loan_amount,
            collateral_amount = %terms.collateral_amount,
            "loan requested"
        );

        Ok(loan)
    }

    /// create a loan with the default sweep policy
    pub fn from_terms(terms: LoanTerms) -> Result<Self> {
        Self::create(LoanConfig::new(terms))
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.config.terms
    }

    pub fn sweep_policy(&self) -> SweepPolicy {
        self.sweep_policy()
    }

    pub fn status(&self) -> LoanStatus {
        self.state.status()
    }

    pub fn loan_start_time(&self) -> Option<DateTime<Utc>> {
        self.state.loan_start_time()
    }

    pub fn loan_end_time(&self) -> Option<DateTime<Utc>> {
        self.state.loan_end_time()
    }

    /// events emitted since the last `take_events`
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// ledger account holding value on behalf of this loan
    pub fn custody(&self) -> PartyId {
        PartyId::custody(self.id)
    }

    /// borrower deposits collateral into custody
    pub fn provide_collateral<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<()> {
        let result = self.try_provide_collateral(caller, value, ledger);
        self.log_rejection("provide_collateral", caller, result)
    }

    fn try_provide_collateral<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<()> {
        self.state.require_created()?;
        let borrower = self.terms().borrower;
        self.require_caller(caller, borrower)?;
        self.require_value(value, self.terms().collateral_amount)?;

        ledger.commit(TransferBatch::new().with(caller, self.custody(), value))?;

        self.state.mark_collateral_provided();
        self.events.emit(Event::CollateralProvided {
            loan_id: self.id,
            borrower,
            amount: value,
        });

        tracing::info!(loan_id = %self.id, amount = %value, "collateral provided");
        Ok(())
    }

    /// lender funds the loan; principal goes straight to the borrower
    pub fn disburse<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<()> {
        let result = self.try_disburse(caller, value, ledger);
        self.log_rejection("disburse", caller, result)
    }

    fn try_disburse<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<()> {
        self.state.require_collateral_provided()?;
        let terms = self.terms().clone();
        self.require_caller(caller, terms.lender)?;
        self.require_value(value, terms.loan_amount)?;

        let now = ledger.now();
        let end = LoanState::end_time(now, terms.loan_duration)?;

        let custody = self.custody();
        let batch = TransferBatch::new()
            .with(caller, custody, value)
            .with(custody, terms.borrower, terms.loan_amount);
        ledger.commit(batch)?;

        self.state.mark_disbursed(now, end);
        self.events.emit(Event::LoanDisbursed {
            loan_id: self.id,
            borrower: terms.borrower,
            lender: terms.lender,
            amount: terms.loan_amount,
            start_time: now,
            end_time: end,
        });

        tracing::info!(
            loan_id = %self.id,
            amount = %terms.loan_amount,
            start = %now,
            end = %end,
            "loan disbursed"
        );
        Ok(())
    }

    /// amount the borrower owes at `now`
    ///
    /// Outside the disbursed state this is the bare loan amount.
    pub fn calculate_amount_due(&self, now: DateTime<Utc>) -> Amount {
        match self.interest_breakdown(now) {
            Some(calc) => calc.total_due(),
            None => self.terms().loan_amount,
        }
    }

    /// amount due at the ledger's current time
    pub fn amount_due<L: Ledger>(&self, ledger: &L) -> Amount {
        self.calculate_amount_due(ledger.now())
    }

    /// principal/interest split while the loan is running
    pub fn interest_breakdown(&self, now: DateTime<Utc>) -> Option<InterestCalculation> {
        if self.status() != LoanStatus::Disbursed {
            return None;
        }
        let start = self.state.loan_start_time()?;
        let engine = self.terms().accrual_engine();
        let calc = interest::calculate(&engine, self.terms().loan_amount, start, now);

        tracing::debug!(
            loan_id = %self.id,
            elapsed_secs = calc.elapsed_secs,
            interest = %calc.interest,
            "amount due computed"
        );
        Some(calc)
    }

    /// borrower pays the amount due and gets the collateral back
    ///
    /// Returns the amount paid to the lender.
    pub fn repay<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<Amount> {
        let result = self.try_repay(caller, value, ledger);
        self.log_rejection("repay", caller, result)
    }

    fn try_repay<L: Ledger>(
        &mut self,
        caller: PartyId,
        value: Amount,
        ledger: &mut L,
    ) -> Result<Amount> {
        self.state.require_disbursed()?;
        let terms = self.terms().clone();
        self.require_caller(caller, terms.borrower)?;

        let due = self.calculate_amount_due(ledger.now());
        self.require_value(value, due)?;

        let custody = self.custody();
        let batch = TransferBatch::new()
            .with(caller, custody, value)
            .with(custody, terms.lender, due)
            .with(custody, terms.borrower, terms.collateral_amount);
        ledger.commit(batch)?;

        self.state.mark_repaid();
        self.events.emit(Event::RepaymentMade {
            loan_id: self.id,
            borrower: terms.borrower,
            amount_paid: due,
            remaining_due: Amount::ZERO,
        });
        self.events.emit(Event::CollateralReleased {
            loan_id: self.id,
            borrower: terms.borrower,
            collateral_amount: terms.collateral_amount,
        });

        tracing::info!(loan_id = %self.id, amount_paid = %due, "loan repaid, collateral released");
        Ok(due)
    }

    /// lender seizes the collateral once the term is strictly over
    ///
    /// Returns the collateral amount transferred.
    pub fn liquidate<L: Ledger>(&mut self, caller: PartyId, ledger: &mut L) -> Result<Amount> {
        let result = self.try_liquidate(caller, ledger);
        self.log_rejection("liquidate", caller, result)
    }

    fn try_liquidate<L: Ledger>(&mut self, caller: PartyId, ledger: &mut L) -> Result<Amount> {
        self.state.require_disbursed()?;
        let terms = self.terms().clone();
        self.require_caller(caller, terms.lender)?;

        let due_at = self.state.loan_end_time().ok_or(LoanError::InvalidState {
            current: self.status(),
            reason: InvalidStateReason::NotDisbursed,
        })?;
        let now = ledger.now();
        if now <= due_at {
            return Err(LoanError::NotYetDue { due_at, now });
        }

        ledger.commit(TransferBatch::new().with(
            self.custody(),
            terms.lender,
            terms.collateral_amount,
        ))?;

        self.state.mark_liquidated();
        self.events.emit(Event::CollateralLiquidated {
            loan_id: self.id,
            lender: terms.lender,
            collateral_amount: terms.collateral_amount,
        });

        tracing::info!(
            loan_id = %self.id,
            collateral_amount = %terms.collateral_amount,
            overdue_secs = (now - due_at).num_seconds(),
            "collateral liquidated"
        );
        Ok(terms.collateral_amount)
    }

    /// move value left over in custody to the caller
    ///
    /// Returns the amount swept; zero sweeps touch nothing and emit nothing.
    pub fn sweep_residual<L: Ledger>(&mut self, caller: PartyId, ledger: &mut L) -> Result<Amount> {
        let result = self.try_sweep_residual(caller, ledger);
        self.log_rejection("sweep_residual", caller, result)
    }

    fn try_sweep_residual<L: Ledger>(&mut self, caller: PartyId, ledger: &mut L) -> Result<Amount> {
        let custody = self.custody();
        let balance = ledger.balance(&custody);

        let amount = match self.sweep_policy() {
            SweepPolicy::Unrestricted => {
                if self.status().holds_collateral() {
                    tracing::warn!(
                        loan_id = %self.id,
                        caller = %caller,
                        "unrestricted sweep while collateral is in escrow"
                    );
                }
                balance
            }
            SweepPolicy::Administrator(admin) => {
                self.require_caller(caller, admin)?;
                balance.saturating_sub(self.escrowed_collateral())
            }
        };

        if amount.is_zero() {
            return Ok(Amount::ZERO);
        }

        ledger.commit(TransferBatch::new().with(custody, caller, amount))?;

        self.events.emit(Event::ResidualSwept {
            loan_id: self.id,
            recipient: caller,
            amount,
        });

        tracing::info!(loan_id = %self.id, recipient = %caller, amount = %amount, "residual swept");
        Ok(amount)
    }

    /// collateral that custody must keep for the borrower or lender
    pub fn escrowed_collateral(&self) -> Amount {
        if self.status().holds_collateral() {
            self.terms().collateral_amount
        } else {
            Amount::ZERO
        }
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn require_caller(&self, caller: PartyId, expected: PartyId) -> Result<()> {
        if caller != expected {
            return Err(LoanError::Unauthorized { caller, expected });
        }
        Ok(())
    }

    fn require_value(&self, provided: Amount, required: Amount) -> Result<()> {
        if provided < required {
            return Err(LoanError::InsufficientValue { required, provided });
        }
        Ok(())
    }

    fn log_rejection<T>(&self, operation: &'static str, caller: PartyId, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            tracing::warn!(
                loan_id = %self.id,
                operation,
                caller = %caller,
                status = %self.status(),
                error = %err,
                "operation rejected"
            );
        }
        result
    }
}
