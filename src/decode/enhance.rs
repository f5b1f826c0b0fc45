//! Image enhancement for faint or low-contrast barcodes.
//!
//! The pipeline is applied unconditionally and in order:
//!
//! 1. CLAHE (tile-local histogram equalization with a clip limit)
//! 2. Bilateral filter (smooths paper noise, keeps bar edges)
//! 3. Adaptive mean threshold (binarizes against the local mean minus an offset)
//! 4. Morphological closing (reconnects broken bars)
//!
//! The output is always a binary [`GrayImage`] with the input's dimensions.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::{bilateral_filter, box_filter};
use imageproc::morphology;

/// Tuning parameters for [`ImageEnhancer`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceParams {
    /// CLAHE clip limit, relative to a flat histogram
    pub clip_limit: f32,

    /// CLAHE tiles along each axis
    pub tiles: u32,

    /// Bilateral filter window width in pixels
    pub bilateral_window: u32,

    /// Bilateral filter range sigma, in grey levels
    pub sigma_color: f32,

    /// Bilateral filter spatial sigma, in pixels
    pub sigma_spatial: f32,

    /// Adaptive threshold block size (odd)
    pub block_size: u32,

    /// Subtracted from the local mean before thresholding
    pub offset: i16,

    /// Closing radius (1 = 3x3 square kernel)
    pub close_radius: u8,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            clip_limit: 3.0,
            tiles: 8,
            bilateral_window: 9,
            sigma_color: 75.0,
            sigma_spatial: 75.0,
            block_size: 35,
            offset: 10,
            close_radius: 1,
        }
    }
}

/// Produces a binarized, contrast-boosted copy of an image.
#[derive(Debug, Clone, Default)]
pub struct ImageEnhancer {
    params: EnhanceParams,
}

impl ImageEnhancer {
    /// Create an enhancer with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an enhancer with custom parameters.
    pub fn with_params(params: EnhanceParams) -> Self {
        Self { params }
    }

    /// Get the enhancement parameters.
    pub fn params(&self) -> &EnhanceParams {
        &self.params
    }

    /// Run the full enhancement pipeline.
    ///
    /// Never fails: an empty image comes back as an empty image.
    pub fn enhance(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        if gray.width() == 0 || gray.height() == 0 {
            return gray;
        }

        let p = &self.params;
        let equalized = clahe(&gray, p.tiles, p.clip_limit);
        let denoised =
            bilateral_filter(&equalized, p.bilateral_window, p.sigma_color, p.sigma_spatial);
        let binary = adaptive_mean_threshold(&denoised, p.block_size, p.offset);
        morphology::close(&binary, Norm::LInf, p.close_radius)
    }
}

/// Contrast-limited adaptive histogram equalization.
///
/// Each tile gets a clipped-histogram CDF lookup table; pixels are mapped by
/// bilinear interpolation between the four nearest tile tables.
fn clahe(gray: &GrayImage, tiles: u32, clip_limit: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    let tiles_x = tiles.min(w).max(1);
    let tiles_y = tiles.min(h).max(1);
    let tile_w = w / tiles_x;
    let tile_h = h / tiles_y;
    if tile_w == 0 || tile_h == 0 {
        return gray.clone();
    }

    let mut luts = vec![[0u8; 256]; (tiles_x * tiles_y) as usize];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = if tx == tiles_x - 1 { w } else { x0 + tile_w };
            let y1 = if ty == tiles_y - 1 { h } else { y0 + tile_h };

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let area = (x1 - x0) * (y1 - y0);
            clip_histogram(&mut hist, ((clip_limit * area as f32 / 256.0) as u32).max(1));
            luts[(ty * tiles_x + tx) as usize] = cdf_lut(&hist, area);
        }
    }

    let tw = tile_w as f32;
    let th = tile_h as f32;
    let last_x = tiles_x as i64 - 1;
    let last_y = tiles_y as i64 - 1;

    GrayImage::from_fn(w, h, |x, y| {
        let v = gray.get_pixel(x, y)[0] as usize;
        let fx = (x as f32 + 0.5) / tw - 0.5;
        let fy = (y as f32 + 0.5) / th - 0.5;
        let gx = fx.floor() as i64;
        let gy = fy.floor() as i64;
        let tx0 = gx.clamp(0, last_x) as u32;
        let tx1 = (gx + 1).clamp(0, last_x) as u32;
        let ty0 = gy.clamp(0, last_y) as u32;
        let ty1 = (gy + 1).clamp(0, last_y) as u32;
        let ax = fx - fx.floor();
        let ay = fy - fy.floor();

        let at = |tx: u32, ty: u32| luts[(ty * tiles_x + tx) as usize][v] as f32;
        let top = at(tx0, ty0) * (1.0 - ax) + at(tx1, ty0) * ax;
        let bottom = at(tx0, ty1) * (1.0 - ax) + at(tx1, ty1) * ax;
        let value = top * (1.0 - ay) + bottom * ay;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Clip bins at `limit` and spread the excess evenly over all bins.
fn clip_histogram(hist: &mut [u32; 256], limit: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let per_bin = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin;
        if i < remainder {
            *bin += 1;
        }
    }
}

/// Tile lookup table: `lut[i] = cdf(i) * 255 / area`.
///
/// The scale is fixed by the tile area, not the tile's own range, so a tile
/// whose darkest level is not 0 is not pulled down to black.
fn cdf_lut(hist: &[u32; 256], area: u32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if area == 0 {
        return lut;
    }

    let scale = 255.0 / area as f32;
    let mut running = 0u32;
    for (slot, count) in lut.iter_mut().zip(hist.iter()) {
        running += count;
        *slot = (running as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// Binary threshold against the local box mean minus `offset`.
///
/// Pixels strictly brighter than `mean - offset` become white, the rest black.
fn adaptive_mean_threshold(gray: &GrayImage, block_size: u32, offset: i16) -> GrayImage {
    let radius = block_size / 2;
    let mean = box_filter(gray, radius, radius);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let local = mean.get_pixel(x, y)[0] as i16 - offset;
        if gray.get_pixel(x, y)[0] as i16 > local {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}
