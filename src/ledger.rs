use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;
use crate::types::PartyId;

/// errors raised by the ledger when a batch cannot be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance on {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        account: PartyId,
        available: Amount,
        requested: Amount,
    },

    #[error("balance overflow on {account}")]
    BalanceOverflow {
        account: PartyId,
    },

    #[error("transfer rejected: {reason}")]
    Rejected {
        reason: String,
    },
}

/// single value movement between two parties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: PartyId,
    pub to: PartyId,
    pub amount: Amount,
}

/// ordered set of transfers applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferBatch {
    transfers: Vec<Transfer>,
}

impl TransferBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, from: PartyId, to: PartyId, amount: Amount) -> Self {
        self.push(from, to, amount);
        self
    }

    pub fn push(&mut self, from: PartyId, to: PartyId, amount: Amount) {
        self.transfers.push(Transfer { from, to, amount });
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// external value-transfer and clock collaborator
///
/// `commit` must apply every transfer of the batch or none of them.
/// `now` must never go backwards between calls.
pub trait Ledger {
    fn now(&self) -> DateTime<Utc>;

    fn balance(&self, account: &PartyId) -> Amount;

    fn commit(&mut self, batch: TransferBatch) -> Result<(), LedgerError>;
}

/// in-memory ledger with a controllable clock
pub struct InMemoryLedger<'a> {
    clock: &'a SafeTimeProvider,
    balances: HashMap<PartyId, Amount>,
    journal: Vec<Transfer>,
}

impl<'a> InMemoryLedger<'a> {
    pub fn new(clock: &'a SafeTimeProvider) -> Self {
        Self {
            clock,
            balances: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// credit value from outside the system (e.g. an initial wallet balance)
    pub fn deposit(&mut self, account: PartyId, amount: Amount) -> Result<Amount, LedgerError> {
        let current = self.balance(&account);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account })?;
        self.balances.insert(account, updated);
        Ok(updated)
    }

    /// every transfer committed so far, in order
    pub fn journal(&self) -> &[Transfer] {
        &self.journal
    }

    pub fn clock(&self) -> &SafeTimeProvider {
        self.clock
    }
}

impl Ledger for InMemoryLedger<'_> {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn balance(&self, account: &PartyId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn commit(&mut self, batch: TransferBatch) -> Result<(), LedgerError> {
        if batch.is_empty() {
            return Ok(());
        }

        // stage every balance change first so a failure leaves nothing applied
        let mut staged: HashMap<PartyId, Amount> = HashMap::new();

        for transfer in batch.transfers() {
            let from_balance = staged
                .get(&transfer.from)
                .copied()
                .unwrap_or_else(|| self.balance(&transfer.from));
            let debited = from_balance.checked_sub(transfer.amount).ok_or(
                LedgerError::InsufficientBalance {
                    account: transfer.from,
                    available: from_balance,
                    requested: transfer.amount,
                },
            )?;
            staged.insert(transfer.from, debited);

            let to_balance = staged
                .get(&transfer.to)
                .copied()
                .unwrap_or_else(|| self.balance(&transfer.to));
            let credited = to_balance
                .checked_add(transfer.amount)
                .ok_or(LedgerError::BalanceOverflow { account: transfer.to })?;
            staged.insert(transfer.to, credited);
        }

        tracing::debug!(transfers = batch.len(), "ledger batch committed");

        self.balances.extend(staged);
        self.journal.extend_from_slice(batch.transfers());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;

    fn test_clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ))
    }

    #[test]
    fn test_batch_applies_in_order() {
        let time = test_clock();
        let mut ledger = InMemoryLedger::new(&time);
        let (a, b, c) = (PartyId::new(), PartyId::new(), PartyId::new());
        ledger.deposit(a, Amount::from_units(10)).unwrap();

        // b only has funds once the first transfer lands
        let batch = TransferBatch::new()
            .with(a, b, Amount::from_units(10))
            .with(b, c, Amount::from_units(4));
        ledger.commit(batch).unwrap();

        assert_eq!(ledger.balance(&a), Amount::ZERO);
        assert_eq!(ledger.balance(&b), Amount::from_units(6));
        assert_eq!(ledger.balance(&c), Amount::from_units(4));
        assert_eq!(ledger.journal().len(), 2);
    }

    #[test]
    fn test_failed_batch_changes_nothing() {
        let time = test_clock();
        let mut ledger = InMemoryLedger::new(&time);
        let (a, b, c) = (PartyId::new(), PartyId::new(), PartyId::new());
        ledger.deposit(a, Amount::from_units(10)).unwrap();

        let batch = TransferBatch::new()
            .with(a, b, Amount::from_units(5))
            .with(b, c, Amount::from_units(6));
        let err = ledger.commit(batch).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: b,
                available: Amount::from_units(5),
                requested: Amount::from_units(6),
            }
        );
        assert_eq!(ledger.balance(&a), Amount::from_units(10));
        assert_eq!(ledger.balance(&b), Amount::ZERO);
        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let time = test_clock();
        let mut ledger = InMemoryLedger::new(&time);
        let batch = TransferBatch::new();
        assert!(batch.is_empty());

        ledger.commit(batch).unwrap();
        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn test_overflow_rejected() {
        let time = test_clock();
        let mut ledger = InMemoryLedger::new(&time);
        let (a, b) = (PartyId::new(), PartyId::new());
        ledger.deposit(a, Amount::from_raw(1)).unwrap();
        ledger.deposit(b, Amount::MAX).unwrap();

        let err = ledger
            .commit(TransferBatch::new().with(a, b, Amount::from_raw(1)))
            .unwrap_err();
        assert_eq!(err, LedgerError::BalanceOverflow { account: b });
        assert_eq!(ledger.balance(&a), Amount::from_raw(1));
    }

    #[test]
    fn test_clock_follows_time_provider() {
        let time = test_clock();
        let control = time.test_control().unwrap();
        let ledger = InMemoryLedger::new(&time);
        let before = ledger.now();

        control.advance(chrono::Duration::seconds(90));

        assert_eq!(ledger.now() - before, chrono::Duration::seconds(90));
    }
}
