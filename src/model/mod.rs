//! Document model types shared by the decode and validation stages.
//!
//! A [`Document`] describes one input file, and a [`PageResult`] carries the
//! outcome of decoding one of its pages. Everything here is plain data; the
//! behaviour lives in `decode` and `validate`.

mod document;
mod page;

pub use document::{expected_identifier_for, Document};
pub use page::{normalize_identifier, PageResult, PLACEHOLDER};
