pub mod analytics;
pub mod clock;
pub mod commands;
pub mod contracts;
pub mod error;
pub mod identity;
pub mod ingest;
mod input;
pub mod ledger;
pub mod settings;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{CoreError, CoreResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
