//! The durable columnar analytical store for logs (spec §4.5). Accepts
//! heterogeneous row batches (union-of-keys, missing columns → `NULL`) and
//! supports id-filtered/full scans.

#[cfg(feature = "clickhouse-backend")]
mod clickhouse_backend;
mod in_memory;
pub mod provisioning;
mod row;
mod sql_literal;
mod trait_;

#[cfg(feature = "clickhouse-backend")]
pub use clickhouse_backend::ClickHouseColdStore;
pub use in_memory::InMemoryColdStore;
pub use row::{ColdRow, ColumnValue};
pub use sql_literal::to_sql_literal;
pub use trait_::{ColdStore, ColdStoreError};
