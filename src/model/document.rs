//! Document-level types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One input file under validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name including extension, as recorded in the report
    pub filename: String,

    /// Identifier every main-section page must carry
    pub expected_identifier: String,

    /// Total number of pages (0 when the file could not be opened)
    pub page_count: u32,

    /// Hex MD5 of the file contents (empty when the file could not be opened)
    pub content_digest: String,
}

impl Document {
    /// Describe a document from its path, before it has been opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            expected_identifier: expected_identifier_for(&filename),
            filename,
            page_count: 0,
            content_digest: String::new(),
        }
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    /// Set the content digest.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.content_digest = digest.into();
        self
    }
}

/// Derive the expected identifier from a file name: the stem, uppercased.
pub fn expected_identifier_for(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
