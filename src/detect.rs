//! Cheap PDF sniffing used before handing a file to the rasterizer.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extension matched when scanning folders, compared case-insensitively.
pub const PDF_EXTENSION: &str = "pdf";

/// Check whether a byte buffer starts with the PDF header.
///
/// Only the magic prefix and a `major.minor` version are checked; anything
/// deeper is the rasterizer's business.
pub fn has_pdf_header(data: &[u8]) -> bool {
    if data.len() < PDF_MAGIC.len() + 3 || !data.starts_with(PDF_MAGIC) {
        return false;
    }
    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + 3];
    version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit()
}

/// Read the first bytes of a file and fail with [`Error::CannotOpen`] unless
/// it carries a PDF header.
pub fn ensure_pdf<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut header = [0u8; 16];
    let read = File::open(path)
        .and_then(|mut file| file.read(&mut header))
        .map_err(|e| Error::CannotOpen(format!("{}: {}", path.display(), e)))?;

    if has_pdf_header(&header[..read]) {
        Ok(())
    } else {
        Err(Error::CannotOpen(format!(
            "{}: missing PDF header",
            path.display()
        )))
    }
}

/// Check whether a path has a `.pdf` extension (any case).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_header() {
        assert!(has_pdf_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
        assert!(has_pdf_header(b"%PDF-2.0"));
        assert!(!has_pdf_header(b"%PDF-"));
        assert!(!has_pdf_header(b"%PDF-x.y"));
        assert!(!has_pdf_header(b"<!DOCTYPE html>"));
        assert!(!has_pdf_header(b""));
    }

    #[test]
    fn test_pdf_extension() {
        assert!(has_pdf_extension("scan.pdf"));
        assert!(has_pdf_extension("SCAN.PDF"));
        assert!(has_pdf_extension("dir/Doc007.Pdf"));
        assert!(!has_pdf_extension("scan.pdf.bak"));
        assert!(!has_pdf_extension("README"));
    }

    #[test]
    fn test_ensure_pdf_missing_file() {
        let result = ensure_pdf("/nonexistent/scan.pdf");
        assert!(matches!(result, Err(Error::CannotOpen(_))));
    }

    #[test]
    fn test_ensure_pdf_rejects_other_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(ensure_pdf(&path), Err(Error::CannotOpen(_))));

        std::fs::write(&path, b"%PDF-1.4\n%%EOF").unwrap();
        assert!(ensure_pdf(&path).is_ok());
    }
}
