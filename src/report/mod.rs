//! Persistent CSV report.
//!
//! One row per validated document. The number of supplemental column pairs
//! grows with the widest document seen so far; growing is done by
//! [`ReportSchema::grow`], a pure function from old rows to new rows, and the
//! file is then rewritten as a whole.

mod schema;
mod store;

pub use schema::{ReportSchema, BASE_COLUMNS, TRAILING_COLUMNS};
pub use store::{default_report_path, write_state_file, ReportStore, STATE_FILE};
