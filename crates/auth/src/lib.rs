//! Issues and validates API keys; resolves key → `(app_id, server_id)`
//! (spec §4.3). The sole gate in front of the ingestion pipeline.

mod authenticator;

pub use authenticator::{AuthError, Authenticator};
