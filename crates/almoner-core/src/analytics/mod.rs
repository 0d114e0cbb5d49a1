//! Pure recompute-from-snapshot passes over the ledger.

pub mod budget;
pub mod date;
pub mod donors;
mod math;
pub mod policy;
pub mod summary;

pub use budget::{BudgetVarianceLine, BudgetVarianceReport, compare_budget};
pub use donors::{
    DonorAnalytics, DonorIdentity, DonorProfile, DonorProfileBuilder, DonorReport, DonorRetention,
    GivingTrend,
};
pub use summary::{CategoryShare, GrowthRate, LedgerSummary, MonthlyBucket, compute_summary};
