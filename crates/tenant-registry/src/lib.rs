//! Read-only lookup of application, server, and API-key rows in the
//! relational store (spec §4.2). The [`Authenticator`](../logauth) is the
//! only consumer.

mod in_memory;
mod postgres;
pub mod provisioning;
mod trait_;

pub use in_memory::InMemoryTenantRegistry;
pub use postgres::PostgresTenantRegistry;
pub use trait_::{RegistryError, TenantRegistry};
