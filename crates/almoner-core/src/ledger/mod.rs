pub mod budget;
pub mod month;
pub mod store;
pub mod types;

pub use budget::{BudgetStore, MemoryBudgets, MonthlyBudget};
pub use month::MonthKey;
pub use store::{BatchAppendOutcome, LedgerStore, MemoryLedger, SnapshotListener};
pub use types::{DateRange, NewTransaction, Transaction, TransactionPatch, TransactionType};
