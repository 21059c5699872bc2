//! The wire shape of an ingested event and the normalization applied to it
//! before it is staged or committed.

mod normalize;
mod record;
mod stamp;

pub use normalize::to_object;
pub use record::{LogRecord, MessageInfo, RequestInfo, ServerInfo, SourceInfo};
pub use stamp::{extract_tenant, stamp_tenant};
