use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{BudgetVarianceReport, DonorReport, LedgerSummary};
use crate::identity::{DuplicateGroup, MatchSuggestion};
use crate::ingest::mapping::ColumnMapping;
use crate::ledger::{NewTransaction, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub ledger: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub summary: LedgerSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetData {
    pub ledger: String,
    pub budgets: String,
    #[serde(flatten)]
    pub report: BudgetVarianceReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorsData {
    pub ledger: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<String>,
    #[serde(flatten)]
    pub report: DonorReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestData {
    pub source_kind: String,
    pub source: String,
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    pub rows_read: usize,
    pub accepted_count: usize,
    pub failed_count: usize,
    pub accepted: Vec<NewTransaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appended: Option<IngestAppendSummary>,
}

/// What happened when accepted rows were handed to a ledger snapshot file.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAppendSummary {
    pub ledger: String,
    pub appended: Vec<Transaction>,
    pub rejected: usize,
    pub ledger_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityDuplicatesData {
    pub members: String,
    pub member_count: usize,
    pub groups: Vec<DuplicateGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityCheckData {
    pub members: String,
    pub email: String,
    pub normalized_email: Option<String>,
    pub exclude_id: Option<String>,
    pub taken: bool,
    pub matched_member_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentitySuggestData {
    pub members: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub suggestions: Vec<MatchSuggestion>,
}
