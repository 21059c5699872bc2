//! Shared identifiers and error types for the log ingestion workspace.

mod error;
mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AppId, RecordId, ServerId, Tenant};
