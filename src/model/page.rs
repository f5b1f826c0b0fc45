//! Page-level types.

use serde::{Deserialize, Serialize};

/// Placeholder written wherever a report cell has no value.
pub const PLACEHOLDER: &str = "-";

/// Decode outcome for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub page_index: u32,

    /// Normalized identifier, if any decode attempt succeeded
    pub decoded: Option<String>,
}

impl PageResult {
    /// Create a page result, normalizing the identifier.
    pub fn new(page_index: u32, decoded: Option<String>) -> Self {
        Self {
            page_index,
            decoded: decoded.as_deref().and_then(normalize_identifier),
        }
    }

    /// A page where nothing could be decoded.
    pub fn missing(page_index: u32) -> Self {
        Self {
            page_index,
            decoded: None,
        }
    }

    /// Get the decoded identifier as a string slice.
    pub fn identifier(&self) -> Option<&str> {
        self.decoded.as_deref()
    }

    /// Check whether the page produced an identifier.
    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }
}

/// Trim and uppercase a raw decoder payload.
///
/// Returns `None` for payloads that are empty once trimmed.
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  doc007\n"), Some("DOC007".to_string()));
        assert_eq!(normalize_identifier("A123"), Some("A123".to_string()));
        assert_eq!(normalize_identifier("   "), None);
        assert_eq!(normalize_identifier(""), None);
    }

    #[test]
    fn test_page_result_normalizes() {
        let page = PageResult::new(4, Some(" b999 ".into()));
        assert_eq!(page.identifier(), Some("B999"));
        assert!(page.is_decoded());

        let blank = PageResult::new(5, Some("\t".into()));
        assert!(!blank.is_decoded());
        assert_eq!(blank, PageResult::missing(5));
    }
}
