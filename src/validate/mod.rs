//! Turning per-page decode results into a document verdict.
//!
//! [`PageClassifier`] splits a document's pages into the main section and
//! supplemental groups, [`consensus`] picks the group and document
//! identifiers, and [`ValidationReport`] assembles the verdict. [`Validator`]
//! runs the whole thing for one file.

pub mod consensus;

mod classify;
mod options;
mod report;
mod validator;

pub use classify::{Classification, PageClassifier, SupplementalGroup};
pub use consensus::{GroupConsensus, GroupIssue, MainCheck};
pub use options::{ValidationConfig, DEFAULT_DPI, DEFAULT_MAIN_PAGE_COUNT, DEFAULT_SUPPL_SET_SIZE};
pub use report::{Status, SupplementalSummary, ValidationReport, CANNOT_OPEN};
pub use validator::Validator;
