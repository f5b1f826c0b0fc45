//! Folder-level driver.
//!
//! Validates each document in turn and appends its verdict to a
//! [`ReportStore`]. Documents already present in the report are skipped, so
//! an interrupted run can simply be started again.

use std::fs;
use std::path::{Path, PathBuf};

use crate::decode::BarcodeDecoder;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::rasterize::PageRasterizer;
use crate::report::ReportStore;
use crate::validate::{ValidationReport, Validator};

/// List the PDF files directly inside `folder`, sorted by path.
pub fn find_documents<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(Error::Other(format!(
            "Not a directory: {}",
            folder.display()
        )));
    }

    let mut documents = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Progress notification emitted by [`run_batch`].
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Document already in the report
    Skipped { filename: &'a str },
    /// Validation is about to start
    Started { filename: &'a str },
    /// Verdict appended to the report under `serial`
    Completed {
        serial: u64,
        report: &'a ValidationReport,
    },
    /// Validation or the report write failed
    Failed { filename: &'a str, error: &'a Error },
}

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents handed to the run
    pub total: usize,
    /// Documents validated and written
    pub processed: usize,
    /// Documents already in the report
    pub skipped: usize,
    /// Written verdicts with status `match`
    pub matched: usize,
    /// Written verdicts with status `mismatch`
    pub mismatched: usize,
    /// Documents that could not be validated or written
    pub failed: usize,
}

/// Validate `documents` in order, appending each verdict to `store`.
///
/// A failure on one document is logged, reported through `on_event`, and
/// counted; the run continues with the next document.
pub fn run_batch<R, D, F>(
    validator: &Validator<R, D>,
    store: &mut ReportStore,
    documents: &[PathBuf],
    mut on_event: F,
) -> BatchSummary
where
    R: PageRasterizer,
    D: BarcodeDecoder,
    F: FnMut(BatchEvent<'_>),
{
    let mut summary = BatchSummary {
        total: documents.len(),
        ..Default::default()
    };

    for path in documents {
        let filename = Document::from_path(path).filename;

        if store.contains(&filename) {
            log::info!("Skipping {} (already in report)", filename);
            summary.skipped += 1;
            on_event(BatchEvent::Skipped {
                filename: &filename,
            });
            continue;
        }

        on_event(BatchEvent::Started {
            filename: &filename,
        });

        let outcome = validator
            .validate_file(path)
            .and_then(|report| store.append(&report).map(|serial| (serial, report)));

        match outcome {
            Ok((Some(serial), report)) => {
                summary.processed += 1;
                if report.is_match() {
                    summary.matched += 1;
                } else {
                    summary.mismatched += 1;
                }
                on_event(BatchEvent::Completed {
                    serial,
                    report: &report,
                });
            }
            Ok((None, _)) => {
                summary.skipped += 1;
                on_event(BatchEvent::Skipped {
                    filename: &filename,
                });
            }
            Err(error) => {
                log::error!("{}: {}", filename, error);
                summary.failed += 1;
                on_event(BatchEvent::Failed {
                    filename: &filename,
                    error: &error,
                });
            }
        }
    }

    log::info!(
        "Batch done: {} processed, {} skipped, {} failed",
        summary.processed,
        summary.skipped,
        summary.failed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_documents_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = find_documents(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_find_documents_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_documents(dir.path().join("absent")).is_err());
    }
}
