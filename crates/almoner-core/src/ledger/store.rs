use ulid::Ulid;

use crate::ledger::types::{NewTransaction, Transaction, TransactionPatch};
use crate::{CoreError, CoreResult};

/// Listener invoked with the full, read-only ledger after every change.
pub type SnapshotListener = Box<dyn FnMut(&[Transaction])>;

/// Ledger collaborator the engines read from. Implementations own identity
/// assignment and snapshot consistency.
pub trait LedgerStore {
    fn append(&mut self, transaction: NewTransaction) -> CoreResult<Transaction>;

    fn update(&mut self, id: &str, patch: &TransactionPatch) -> CoreResult<Transaction>;

    fn delete(&mut self, id: &str) -> CoreResult<()>;

    fn snapshot(&self) -> Vec<Transaction>;

    fn subscribe(&mut self, listener: SnapshotListener);

    /// Appends an ingestion batch as independent operations. A rejected row
    /// does not undo the rows appended before it.
    fn append_batch(&mut self, batch: Vec<NewTransaction>) -> BatchAppendOutcome {
        let mut outcome = BatchAppendOutcome::default();
        for transaction in batch {
            match self.append(transaction) {
                Ok(stored) => outcome.appended.push(stored),
                Err(error) => {
                    tracing::warn!(code = %error.code, "ledger rejected batch row: {}", error.message);
                    outcome.rejected += 1;
                }
            }
        }
        outcome
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchAppendOutcome {
    pub appended: Vec<Transaction>,
    pub rejected: usize,
}

/// In-memory reference ledger, insertion ordered.
#[derive(Default)]
pub struct MemoryLedger {
    transactions: Vec<Transaction>,
    listeners: Vec<SnapshotListener>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            listeners: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.transactions);
        }
    }
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("transactions", &self.transactions.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LedgerStore for MemoryLedger {
    fn append(&mut self, transaction: NewTransaction) -> CoreResult<Transaction> {
        validate_fields(&transaction.description, transaction.amount)?;
        let stored = transaction.with_id(format!("txn_{}", Ulid::new()));
        tracing::info!(id = %stored.id, date = %stored.date, "appended transaction");
        self.transactions.push(stored.clone());
        self.notify();
        Ok(stored)
    }

    fn update(&mut self, id: &str, patch: &TransactionPatch) -> CoreResult<Transaction> {
        let Some(position) = self.transactions.iter().position(|row| row.id == id) else {
            return Err(CoreError::transaction_not_found(id));
        };

        let mut candidate = self.transactions[position].clone();
        patch.apply(&mut candidate);
        validate_fields(&candidate.description, candidate.amount)?;

        self.transactions[position] = candidate.clone();
        tracing::info!(id, "updated transaction");
        self.notify();
        Ok(candidate)
    }

    fn delete(&mut self, id: &str) -> CoreResult<()> {
        let before = self.transactions.len();
        self.transactions.retain(|row| row.id != id);
        if self.transactions.len() == before {
            return Err(CoreError::transaction_not_found(id));
        }
        tracing::info!(id, "deleted transaction");
        self.notify();
        Ok(())
    }

    fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    fn subscribe(&mut self, listener: SnapshotListener) {
        self.listeners.push(listener);
    }
}

fn validate_fields(description: &str, amount: f64) -> CoreResult<()> {
    if description.trim().is_empty() {
        return Err(CoreError::invalid_transaction(
            "Transaction description must be non-empty.",
        ));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::invalid_transaction(&format!(
            "Transaction amount must be a positive number; got {amount}."
        )));
    }
    Ok(())
}
