//! Rasterizer backed by the pdfium library.

use std::path::Path;

use image::DynamicImage;
use pdfium_render::prelude::*;

use super::{PageRasterizer, RasterDocument};
use crate::detect::ensure_pdf;
use crate::error::{Error, Result};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Renders PDF pages through pdfium.
///
/// The library is looked up next to the executable's working directory
/// first, then on the system library path.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind pdfium and create a rasterizer.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Error::Other(format!("Failed to bind pdfium library: {}", e)))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>> {
        ensure_pdf(path)?;
        let doc = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::CannotOpen(format!("{}: {}", path.display(), e)))?;
        Ok(Box::new(PdfiumDocument { doc }))
    }
}

struct PdfiumDocument<'a> {
    doc: PdfDocument<'a>,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.doc.pages().len() as u32
    }

    fn render(&self, page_index: u32, dpi: f32) -> Result<DynamicImage> {
        let page_count = self.page_count();
        let page = page_index
            .checked_sub(1)
            .and_then(|i| self.doc.pages().iter().nth(i as usize))
            .ok_or_else(|| Error::Rasterize {
                page: page_index,
                message: format!("out of range (document has {} pages)", page_count),
            })?;

        let scale = dpi / POINTS_PER_INCH;
        let width = (page.width().value * scale) as i32;
        let height = (page.height().value * scale) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| Error::Rasterize {
                page: page_index,
                message: e.to_string(),
            })?;

        Ok(DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8()))
    }
}
