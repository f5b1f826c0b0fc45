//! Candidate regions where the identifier is printed.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// A rectangle expressed as fractions of the page width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Left edge (0.0 - 1.0)
    pub left: f64,
    /// Top edge (0.0 - 1.0)
    pub top: f64,
    /// Right edge (0.0 - 1.0)
    pub right: f64,
    /// Bottom edge (0.0 - 1.0)
    pub bottom: f64,
}

impl Band {
    /// Create a band from fractional edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Resolve the band to pixel coordinates on a `width` x `height` page.
    pub fn to_region(&self, width: u32, height: u32) -> Region {
        let x0 = scale(width, self.left);
        let y0 = scale(height, self.top);
        let x1 = scale(width, self.right).max(x0);
        let y1 = scale(height, self.bottom).max(y0);
        Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

fn scale(extent: u32, fraction: f64) -> u32 {
    ((extent as f64) * fraction.clamp(0.0, 1.0)) as u32
}

/// A pixel rectangle on a rasterized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Check whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy this region out of an image.
    pub fn crop(&self, image: &DynamicImage) -> DynamicImage {
        let (w, h) = image.dimensions();
        let x = self.x.min(w);
        let y = self.y.min(h);
        let width = self.width.min(w - x);
        let height = self.height.min(h - y);
        image.crop_imm(x, y, width, height)
    }
}

/// Full-width band across the top 12% of the page.
const TOP_BAND: Band = Band::new(0.0, 0.0, 1.0, 0.12);

/// Right-leaning bands, growing towards the page centre.
const RIGHT_BANDS: [Band; 3] = [
    Band::new(0.60, 0.0, 1.0, 0.20),
    Band::new(0.50, 0.0, 1.0, 0.30),
    Band::new(0.45, 0.0, 1.0, 0.40),
];

/// Last-resort band tried on the raw page after everything else failed.
const FALLBACK_BAND: Band = Band::new(0.0, 0.0, 1.0, 0.15);

/// Produces the ordered crop candidates for a page.
#[derive(Debug, Clone)]
pub struct RegionCropper {
    bands: Vec<Band>,
    fallback: Band,
}

impl RegionCropper {
    /// Create a cropper with the standard band layout.
    pub fn new() -> Self {
        let mut bands = Vec::with_capacity(1 + RIGHT_BANDS.len());
        bands.push(TOP_BAND);
        bands.extend_from_slice(&RIGHT_BANDS);
        Self {
            bands,
            fallback: FALLBACK_BAND,
        }
    }

    /// Replace the candidate bands.
    pub fn with_bands(mut self, bands: Vec<Band>) -> Self {
        self.bands = bands;
        self
    }

    /// Replace the fallback band.
    pub fn with_fallback(mut self, fallback: Band) -> Self {
        self.fallback = fallback;
        self
    }

    /// Candidate regions for a page, most specific first.
    pub fn regions(&self, width: u32, height: u32) -> Vec<Region> {
        self.bands
            .iter()
            .map(|band| band.to_region(width, height))
            .collect()
    }

    /// The wide fallback region for a page.
    pub fn fallback(&self, width: u32, height: u32) -> Region {
        self.fallback.to_region(width, height)
    }
}

impl Default for RegionCropper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: u32, y: u32, width: u32, height: u32) -> Region {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_standard_regions() {
        let regions = RegionCropper::new().regions(1000, 2000);
        assert_eq!(
            regions,
            vec![
                region(0, 0, 1000, 240),
                region(600, 0, 400, 400),
                region(500, 0, 500, 600),
                region(450, 0, 550, 800),
            ]
        );
    }

    #[test]
    fn test_fallback_region() {
        let fallback = RegionCropper::new().fallback(1000, 2000);
        assert_eq!(fallback, region(0, 0, 1000, 300));
    }

    #[test]
    fn test_fractions_truncate() {
        // 0.12 * 99 = 11.88 -> 11
        let region = TOP_BAND.to_region(7, 99);
        assert_eq!(region.height, 11);
        assert_eq!(region.width, 7);
    }

    #[test]
    fn test_degenerate_page() {
        let regions = RegionCropper::new().regions(0, 0);
        assert!(regions.iter().all(Region::is_empty));
    }

    #[test]
    fn test_crop_is_clamped() {
        let image = DynamicImage::new_luma8(10, 10);
        let cropped = region(8, 8, 5, 5).crop(&image);
        assert_eq!(cropped.dimensions(), (2, 2));
    }
}
