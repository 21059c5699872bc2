//! Dataframe-free export post-processing: flattening stored rows and
//! rendering them as CSV, for the reporting collaborator's fetch/export
//! surface (spec §1 "out of scope", kept here as a thin, spec-grounded
//! adapter rather than re-implemented ad hoc in the HTTP layer).

mod csv_export;
mod flatten;

pub use csv_export::{to_csv, ExportError};
pub use flatten::{flatten_row, FlatRow};
