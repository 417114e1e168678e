pub mod amount;
pub mod builder;
pub mod config;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod loan;
pub mod serialization;
pub mod state;
pub mod types;

// re-export key types
pub use amount::{Amount, BasisPoints};
pub use builder::LoanBuilder;
pub use config::{LoanConfig, LoanTerms, SweepPolicy};
pub use errors::{InvalidStateReason, LoanError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, InterestCalculation};
pub use ledger::{InMemoryLedger, Ledger, LedgerError, Transfer, TransferBatch};
pub use loan::Loan;
pub use serialization::LoanView;
pub use state::LoanState;
pub use types::{AssetRef, LoanId, LoanStatus, PartyId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
