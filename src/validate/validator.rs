//! End-to-end validation of one document.

use image::DynamicImage;
use rayon::prelude::*;
use std::path::Path;

use crate::decode::{BarcodeDecoder, DecodeStrategy};
use crate::digest::file_digest;
use crate::error::Result;
use crate::model::{Document, PageResult};
use crate::rasterize::{PageRasterizer, RasterDocument};

use super::classify::PageClassifier;
use super::consensus::{check_main, document_identifier, group_consensus};
use super::options::ValidationConfig;
use super::report::ValidationReport;

/// Validates documents: rasterize, decode every page, classify, vote.
///
/// # Example
///
/// ```no_run
/// use scancheck::decode::QrDecoder;
/// use scancheck::rasterize::PdfiumRasterizer;
/// use scancheck::{ValidationConfig, Validator};
///
/// let validator = Validator::new(
///     PdfiumRasterizer::new()?,
///     QrDecoder::new(),
///     ValidationConfig::default(),
/// )?;
/// let report = validator.validate_file("DOC007.pdf")?;
/// println!("{}: {}", report.filename, report.status);
/// # Ok::<(), scancheck::Error>(())
/// ```
pub struct Validator<R, D> {
    rasterizer: R,
    strategy: DecodeStrategy<D>,
    classifier: PageClassifier,
    config: ValidationConfig,
}

impl<R: PageRasterizer, D: BarcodeDecoder> Validator<R, D> {
    /// Create a validator with the standard decode strategy.
    pub fn new(rasterizer: R, decoder: D, config: ValidationConfig) -> Result<Self> {
        Self::with_strategy(rasterizer, DecodeStrategy::new(decoder), config)
    }

    /// Create a validator with a custom decode strategy.
    pub fn with_strategy(
        rasterizer: R,
        strategy: DecodeStrategy<D>,
        config: ValidationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rasterizer,
            strategy,
            classifier: PageClassifier::from_config(&config),
            config,
        })
    }

    /// Get the validation options.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one file.
    ///
    /// A file that cannot be opened yields a `Cannot open PDF` verdict rather
    /// than an error. Errors are limited to reading the file for its digest.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidationReport> {
        let path = path.as_ref();
        let document = Document::from_path(path);

        let raster = match self.rasterizer.open(path) {
            Ok(raster) => raster,
            Err(e) => {
                log::warn!("{}: {}", document.filename, e);
                return Ok(ValidationReport::unopenable(&document));
            }
        };

        let page_count = raster.page_count();
        log::info!("{}: {} pages", document.filename, page_count);

        let results = self.decode_pages(raster.as_ref());
        drop(raster);

        let document = document
            .with_page_count(page_count)
            .with_digest(file_digest(path)?);
        let report = self.evaluate(&document, &results);

        log::info!(
            "{}: {} | {}",
            report.filename,
            report.status,
            report.issue_detail
        );
        Ok(report)
    }

    /// Derive the verdict from already-decoded page results.
    pub fn evaluate(&self, document: &Document, results: &[PageResult]) -> ValidationReport {
        let split = self.classifier.classify(document.page_count, results);
        let main = check_main(&split.main, &document.expected_identifier);
        let groups: Vec<_> = split.groups.iter().map(group_consensus).collect();
        ValidationReport::assemble(document, document_identifier(&split.main), main, &groups)
    }

    /// Decode every page of an opened document, in page order.
    ///
    /// Pages are rasterized in batches of [`ValidationConfig::batch_size`]
    /// on the calling thread, and each batch is decoded on the rayon pool
    /// before the next one is rendered.
    pub fn decode_pages(&self, raster: &dyn RasterDocument) -> Vec<PageResult> {
        let page_count = raster.page_count();
        let batch = self.config.batch_size() as u32;
        let strategy = &self.strategy;
        let mut results = Vec::with_capacity(page_count as usize);

        let mut start = 1;
        while start <= page_count {
            let end = page_count.min(start.saturating_add(batch - 1));
            let pages: Vec<(u32, Option<DynamicImage>)> = (start..=end)
                .map(|index| (index, self.render(raster, index)))
                .collect();

            if pages.len() > 1 {
                let decoded: Vec<PageResult> = pages
                    .into_par_iter()
                    .map(|(index, image)| decode_one(strategy, index, image))
                    .collect();
                results.extend(decoded);
            } else {
                results.extend(
                    pages
                        .into_iter()
                        .map(|(index, image)| decode_one(strategy, index, image)),
                );
            }

            start = end + 1;
        }

        results
    }

    fn render(&self, raster: &dyn RasterDocument, index: u32) -> Option<DynamicImage> {
        match raster.render(index, self.config.dpi) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Failed to render page {}: {}", index, e);
                None
            }
        }
    }
}

fn decode_one<D: BarcodeDecoder>(
    strategy: &DecodeStrategy<D>,
    index: u32,
    image: Option<DynamicImage>,
) -> PageResult {
    match image {
        Some(image) => {
            let decoded = strategy.decode_page(&image);
            log::debug!("Page {}: {:?}", index, decoded);
            PageResult::new(index, decoded)
        }
        None => PageResult::missing(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decode;
    use crate::error::Error;
    use crate::validate::Status;
    use image::GenericImageView;
    use std::collections::HashMap;

    /// Every page is a blank image whose width encodes the page number.
    struct WidthCoded {
        pages: u32,
    }

    impl RasterDocument for WidthCoded {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn render(&self, page_index: u32, _dpi: f32) -> Result<DynamicImage> {
            if page_index == 0 || page_index > self.pages {
                return Err(Error::Rasterize {
                    page: page_index,
                    message: "out of range".into(),
                });
            }
            Ok(DynamicImage::new_luma8(1000 + page_index, 100))
        }
    }

    struct Fixture {
        pages: u32,
    }

    impl PageRasterizer for Fixture {
        fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
            if path.ends_with("broken.pdf") {
                return Err(Error::CannotOpen("broken.pdf".into()));
            }
            Ok(Box::new(WidthCoded { pages: self.pages }))
        }
    }

    /// Looks the identifier up by image width (full-width crops keep it).
    struct ByWidth(HashMap<u32, String>);

    impl BarcodeDecoder for ByWidth {
        fn name(&self) -> &str {
            "by-width"
        }

        fn decode(&self, image: &DynamicImage) -> Decode {
            self.0.get(&image.width()).cloned().into()
        }
    }

    fn codes(pairs: &[(u32, &str)]) -> ByWidth {
        ByWidth(
            pairs
                .iter()
                .map(|(page, code)| (1000 + page, code.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_decode_pages_keeps_page_order() {
        let pairs: Vec<(u32, String)> = (1..=9).map(|p| (p, format!("P{}", p))).collect();
        let borrowed: Vec<(u32, &str)> = pairs.iter().map(|(p, c)| (*p, c.as_str())).collect();
        let config = ValidationConfig::new().with_workers(4);
        let validator = Validator::new(Fixture { pages: 9 }, codes(&borrowed), config).unwrap();

        let results = validator.decode_pages(&WidthCoded { pages: 9 });
        let indices: Vec<u32> = results.iter().map(|r| r.page_index).collect();
        assert_eq!(indices, (1..=9).collect::<Vec<_>>());
        assert_eq!(results[6].identifier(), Some("P7"));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let decoder = codes(&[(1, "a"), (3, "b")]);
        let parallel = Validator::new(Fixture { pages: 5 }, &decoder, ValidationConfig::new().with_workers(3))
            .unwrap()
            .decode_pages(&WidthCoded { pages: 5 });
        let sequential = Validator::new(Fixture { pages: 5 }, &decoder, ValidationConfig::new().sequential())
            .unwrap()
            .decode_pages(&WidthCoded { pages: 5 });
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[2].identifier(), Some("B"));
        assert!(!parallel[1].is_decoded());
    }

    #[test]
    fn test_evaluate_reference_example() {
        let config = ValidationConfig::default();
        let validator = Validator::new(Fixture { pages: 0 }, codes(&[]), config).unwrap();
        let document = Document::from_path("DOC007.pdf").with_page_count(34);
        let results: Vec<PageResult> = (1..=34)
            .map(|p| match p {
                10 => PageResult::new(p, Some("DOC0O7".into())),
                20 => PageResult::missing(p),
                _ => PageResult::new(p, Some("DOC007".into())),
            })
            .collect();

        let report = validator.evaluate(&document, &results);
        assert_eq!(report.status, Status::Mismatch);
        assert_eq!(report.main_mismatches, vec![10]);
        assert_eq!(report.main_missing, vec![20]);
        assert_eq!(report.decoded_identifier, "DOC007");
        assert_eq!(
            report.issue_detail,
            "Main mismatches: [10]; Main missing: [20]"
        );
        assert_eq!(report.supplemental.len(), 1);
        assert_eq!(report.supplemental[0].expected, "-");
    }

    #[test]
    fn test_unopenable_document() {
        let validator =
            Validator::new(Fixture { pages: 3 }, codes(&[]), ValidationConfig::default()).unwrap();
        let report = validator.validate_file("/scans/broken.pdf").unwrap();
        assert_eq!(report.total_pages, 0);
        assert_eq!(report.status, Status::Mismatch);
        assert_eq!(report.issue_detail, "Cannot open PDF");
        assert_eq!(report.expected_identifier, "BROKEN");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ValidationConfig::new().with_suppl_set_size(0);
        assert!(Validator::new(Fixture { pages: 1 }, codes(&[]), config).is_err());
    }

    #[test]
    fn test_page_width_encoding() {
        let image = WidthCoded { pages: 2 }.render(2, 300.0).unwrap();
        assert_eq!(image.dimensions(), (1002, 100));
    }
}
