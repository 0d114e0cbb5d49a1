use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::month::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A ledger entry as handed to the engines. `amount` is always positive; the
/// direction of money lives in `transaction_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_contact: Option<String>,
}

impl Transaction {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// A transaction that has not been given an identity by the ledger store yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_contact: Option<String>,
}

impl NewTransaction {
    pub fn with_id(self, id: String) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            category: self.category,
            amount: self.amount,
            transaction_type: self.transaction_type,
            donor_name: self.donor_name,
            donor_contact: self.donor_contact,
        }
    }
}

/// Partial update applied by `LedgerStore::update`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub donor_name: Option<Option<String>>,
    pub donor_contact: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn apply(&self, target: &mut Transaction) {
        if let Some(date) = self.date {
            target.date = date;
        }
        if let Some(description) = &self.description {
            target.description = description.clone();
        }
        if let Some(category) = &self.category {
            target.category = category.clone();
        }
        if let Some(amount) = self.amount {
            target.amount = amount;
        }
        if let Some(transaction_type) = self.transaction_type {
            target.transaction_type = transaction_type;
        }
        if let Some(donor_name) = &self.donor_name {
            target.donor_name = donor_name.clone();
        }
        if let Some(donor_contact) = &self.donor_contact {
            target.donor_contact = donor_contact.clone();
        }
    }
}

/// Inclusive date window applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
