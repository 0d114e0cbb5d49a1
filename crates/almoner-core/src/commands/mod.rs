pub mod budget;
pub(crate) mod common;
pub mod donors;
pub mod identity;
pub mod ingest;
pub mod summary;
