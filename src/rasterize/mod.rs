//! Page rasterization seam.
//!
//! The validator only needs two things from a document: how many pages it
//! has, and an RGB raster of a given page at a given resolution. Backends
//! implement [`PageRasterizer`]; the pdfium backend is behind the `pdfium`
//! feature.

#[cfg(feature = "pdfium")]
mod pdfium;

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;

use image::DynamicImage;
use std::path::Path;

use crate::error::Result;

/// An opened document that can render its pages.
pub trait RasterDocument {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Render a page (1-indexed) at the given resolution.
    fn render(&self, page_index: u32, dpi: f32) -> Result<DynamicImage>;
}

/// Opens documents for rendering.
pub trait PageRasterizer {
    /// Open a document.
    ///
    /// Fails with [`crate::Error::CannotOpen`] when the file cannot be
    /// opened at all; that is the only failure that aborts a document.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
        (**self).open(path)
    }
}
