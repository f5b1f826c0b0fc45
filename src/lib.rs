//! # scancheck
//!
//! Barcode identifier validation for scanned multi-page PDF documents.
//!
//! Every page of a scanned document is expected to carry a machine-readable
//! identifier. The main section must match the identifier derived from the
//! file name; supplemental pages that follow are checked in fixed-size
//! groups. Each document produces one verdict row in a CSV report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scancheck::Scancheck;
//!
//! fn main() -> scancheck::Result<()> {
//!     let report = Scancheck::new()
//!         .with_dpi(600.0)
//!         .check("scans/DOC007.pdf")?;
//!     println!("{}: {} ({})", report.filename, report.status, report.issue_detail);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Decode fallback chain**: region crops, image enhancement, rotations
//! - **Consensus**: per-group and per-document identifier votes
//! - **Resumable reports**: documents already in the CSV are skipped
//! - **Parallel decoding**: pages are decoded on the Rayon pool in bounded batches
//!
//! The pdfium rasterizer, the multi-format decoder and the QR-only decoder are
//! behind the `pdfium`, `multiformat` and `qr` features (all on by default).
//! Any other backend can be plugged in through [`PageRasterizer`] and
//! [`BarcodeDecoder`].

pub mod batch;
pub mod decode;
pub mod detect;
pub mod digest;
pub mod error;
pub mod model;
pub mod rasterize;
pub mod report;
pub mod validate;

// Re-export commonly used types
pub use batch::{find_documents, run_batch, BatchEvent, BatchSummary};
pub use decode::{BarcodeDecoder, Decode, DecodeStrategy};
pub use detect::{has_pdf_extension, has_pdf_header};
pub use digest::{content_digest, file_digest};
pub use error::{Error, Result};
pub use model::{Document, PageResult};
pub use rasterize::{PageRasterizer, RasterDocument};
pub use report::{default_report_path, ReportSchema, ReportStore};
pub use validate::{
    GroupIssue, PageClassifier, Status, SupplementalSummary, ValidationConfig, ValidationReport,
    Validator,
};

#[cfg(all(feature = "pdfium", feature = "multiformat"))]
pub use builder::Scancheck;

#[cfg(all(feature = "pdfium", feature = "multiformat"))]
mod builder {
    use std::fmt;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use crate::batch::{find_documents, run_batch, BatchEvent, BatchSummary};
    use crate::decode::{BarcodeDecoder, MultiFormatDecoder};
    use crate::error::Result;
    use crate::rasterize::PdfiumRasterizer;
    use crate::report::ReportStore;
    use crate::validate::{ValidationConfig, ValidationReport, Validator};

    /// Builder wiring the pdfium rasterizer and a barcode decoder together.
    ///
    /// Decodes with [`MultiFormatDecoder`] unless another decoder is set.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scancheck::Scancheck;
    ///
    /// let summary = Scancheck::new()
    ///     .with_workers(4)
    ///     .run("scans/", "scans.csv")?;
    /// println!("{} processed, {} skipped", summary.processed, summary.skipped);
    /// # Ok::<(), scancheck::Error>(())
    /// ```
    #[derive(Clone)]
    pub struct Scancheck {
        config: ValidationConfig,
        decoder: Arc<dyn BarcodeDecoder>,
    }

    impl Default for Scancheck {
        fn default() -> Self {
            Self {
                config: ValidationConfig::default(),
                decoder: Arc::new(MultiFormatDecoder::new()),
            }
        }
    }

    impl fmt::Debug for Scancheck {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Scancheck")
                .field("config", &self.config)
                .field("decoder", &self.decoder.name())
                .finish()
        }
    }

    impl Scancheck {
        /// Create a builder with default options.
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a complete configuration.
        pub fn with_config(mut self, config: ValidationConfig) -> Self {
            self.config = config;
            self
        }

        /// Decode with `decoder` instead of the multi-format default.
        pub fn with_decoder<D: BarcodeDecoder + 'static>(mut self, decoder: D) -> Self {
            self.decoder = Arc::new(decoder);
            self
        }

        /// Set the rendering resolution.
        pub fn with_dpi(mut self, dpi: f32) -> Self {
            self.config = self.config.with_dpi(dpi);
            self
        }

        /// Set the number of pages decoded concurrently.
        pub fn with_workers(mut self, workers: usize) -> Self {
            self.config = self.config.with_workers(workers);
            self
        }

        /// Disable parallel decoding.
        pub fn sequential(mut self) -> Self {
            self.config = self.config.sequential();
            self
        }

        /// Get the validation options.
        pub fn config(&self) -> &ValidationConfig {
            &self.config
        }

        /// Name of the configured decoder.
        pub fn decoder_name(&self) -> &str {
            self.decoder.name()
        }

        fn validator(&self) -> Result<Validator<PdfiumRasterizer, Arc<dyn BarcodeDecoder>>> {
            Validator::new(
                PdfiumRasterizer::new()?,
                Arc::clone(&self.decoder),
                self.config.clone(),
            )
        }

        /// Validate a single file without touching any report.
        pub fn check<P: AsRef<Path>>(&self, path: P) -> Result<ValidationReport> {
            self.validator()?.validate_file(path)
        }

        /// Validate every PDF in `folder`, appending to the report at `report`.
        pub fn run<P: AsRef<Path>, Q: Into<PathBuf>>(
            &self,
            folder: P,
            report: Q,
        ) -> Result<BatchSummary> {
            self.run_with(folder, report, |_: BatchEvent<'_>| {})
        }

        /// Like [`run`](Self::run), with a progress callback.
        pub fn run_with<P, Q, F>(&self, folder: P, report: Q, on_event: F) -> Result<BatchSummary>
        where
            P: AsRef<Path>,
            Q: Into<PathBuf>,
            F: FnMut(BatchEvent<'_>),
        {
            let documents = find_documents(folder)?;
            let mut store = ReportStore::open(report.into())?;
            let validator = self.validator()?;
            Ok(run_batch(&validator, &mut store, &documents, on_event))
        }
    }
}
