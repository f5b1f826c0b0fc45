//! The per-page decode fallback chain.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

use super::barcode::{decode_isolated, BarcodeDecoder};
use super::enhance::ImageEnhancer;
use super::region::{Region, RegionCropper};

/// Image transform applied before a decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    /// Raw crop
    None,
    /// Enhanced crop
    Enhanced,
    /// Enhanced crop rotated 90 degrees counter-clockwise
    EnhancedRotated90,
    /// Enhanced crop rotated 180 degrees
    EnhancedRotated180,
    /// Enhanced crop rotated 270 degrees counter-clockwise
    EnhancedRotated270,
}

impl Transform {
    /// Apply the rotation part of the transform.
    ///
    /// Angles are counter-clockwise; `None` and `Enhanced` return a copy.
    pub fn rotate(self, image: &DynamicImage) -> DynamicImage {
        // image's rotate90/rotate270 turn clockwise
        match self {
            Transform::EnhancedRotated90 => image.rotate270(),
            Transform::EnhancedRotated180 => image.rotate180(),
            Transform::EnhancedRotated270 => image.rotate90(),
            Transform::None | Transform::Enhanced => image.clone(),
        }
    }
}

/// Step of the fallback chain that produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecodeStage {
    /// Raw candidate regions
    Direct,
    /// Enhanced candidate regions
    Enhanced,
    /// Rotations of the first enhanced region
    Rotated,
    /// Raw wide top-band crop
    Fallback,
}

/// One decode call made while processing a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeAttempt {
    /// Crop the attempt was made on
    pub region: Region,
    /// Transform applied to the crop
    pub transform: Transform,
    /// Normalized identifier, if found
    pub result: Option<String>,
}

/// Everything the chain tried on one page, and what it settled on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeTrace {
    /// Attempts in the order they were made
    pub attempts: Vec<DecodeAttempt>,
    /// Stage that produced the identifier
    pub stage: Option<DecodeStage>,
    /// Final identifier
    pub identifier: Option<String>,
}

impl DecodeTrace {
    /// Number of decode calls made.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    fn record(&mut self, region: Region, transform: Transform, result: Option<String>) -> bool {
        let found = result.is_some();
        if found {
            self.identifier = result.clone();
        }
        self.attempts.push(DecodeAttempt {
            region,
            transform,
            result,
        });
        found
    }

    fn finish(mut self, stage: DecodeStage) -> Self {
        self.stage = Some(stage);
        self
    }
}

const ROTATIONS: [Transform; 3] = [
    Transform::EnhancedRotated90,
    Transform::EnhancedRotated180,
    Transform::EnhancedRotated270,
];

/// Extracts one identifier from a page image.
///
/// Steps run in order and stop at the first identifier:
///
/// 1. each candidate region, raw;
/// 2. each candidate region, enhanced;
/// 3. the first enhanced region rotated by 90, 180 and 270 degrees
///    counter-clockwise;
/// 4. the wide fallback band, raw.
///
/// # Example
///
/// ```no_run
/// use scancheck::decode::{DecodeStrategy, QrDecoder};
///
/// let strategy = DecodeStrategy::new(QrDecoder::new());
/// let page = image::open("page-001.png").unwrap();
/// println!("{:?}", strategy.decode_page(&page));
/// ```
#[derive(Debug, Clone)]
pub struct DecodeStrategy<D> {
    decoder: D,
    cropper: RegionCropper,
    enhancer: ImageEnhancer,
}

impl<D: BarcodeDecoder> DecodeStrategy<D> {
    /// Create a strategy with the standard regions and enhancer.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            cropper: RegionCropper::new(),
            enhancer: ImageEnhancer::new(),
        }
    }

    /// Use a custom region cropper.
    pub fn with_cropper(mut self, cropper: RegionCropper) -> Self {
        self.cropper = cropper;
        self
    }

    /// Use a custom enhancer.
    pub fn with_enhancer(mut self, enhancer: ImageEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    /// Get the underlying decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decode a page, returning the normalized identifier if any step finds one.
    pub fn decode_page(&self, image: &DynamicImage) -> Option<String> {
        self.decode_page_traced(image).identifier
    }

    /// Decode a page and keep the list of attempts made.
    pub fn decode_page_traced(&self, image: &DynamicImage) -> DecodeTrace {
        let (w, h) = image.dimensions();
        let regions = self.cropper.regions(w, h);
        let crops: Vec<DynamicImage> = regions.iter().map(|r| r.crop(image)).collect();
        let mut trace = DecodeTrace::default();

        for (region, crop) in regions.iter().zip(&crops) {
            if self.attempt(&mut trace, *region, Transform::None, crop) {
                return self.done(trace, DecodeStage::Direct);
            }
        }

        let mut first_enhanced = None;
        for (region, crop) in regions.iter().zip(&crops) {
            let enhanced = DynamicImage::ImageLuma8(self.enhancer.enhance(crop));
            if self.attempt(&mut trace, *region, Transform::Enhanced, &enhanced) {
                return self.done(trace, DecodeStage::Enhanced);
            }
            if first_enhanced.is_none() {
                first_enhanced = Some((*region, enhanced));
            }
        }

        if let Some((region, enhanced)) = first_enhanced {
            for transform in ROTATIONS {
                if self.attempt(&mut trace, region, transform, &transform.rotate(&enhanced)) {
                    return self.done(trace, DecodeStage::Rotated);
                }
            }
        }

        let fallback = self.cropper.fallback(w, h);
        if self.attempt(&mut trace, fallback, Transform::None, &fallback.crop(image)) {
            return self.done(trace, DecodeStage::Fallback);
        }

        log::debug!(
            "No identifier after {} attempts on {}x{} page",
            trace.attempt_count(),
            w,
            h
        );
        trace
    }

    fn attempt(
        &self,
        trace: &mut DecodeTrace,
        region: Region,
        transform: Transform,
        image: &DynamicImage,
    ) -> bool {
        let result = decode_isolated(&self.decoder, image).into_identifier();
        trace.record(region, transform, result)
    }

    fn done(&self, trace: DecodeTrace, stage: DecodeStage) -> DecodeTrace {
        log::debug!(
            "Decoded {:?} at {:?} stage after {} attempts",
            trace.identifier,
            stage,
            trace.attempt_count()
        );
        trace.finish(stage)
    }
}
