//! Validation options and configuration.

use crate::error::{Error, Result};

/// Pages in the main section of the reference deployment.
pub const DEFAULT_MAIN_PAGE_COUNT: u32 = 34;

/// Pages per supplemental group in the reference deployment.
pub const DEFAULT_SUPPL_SET_SIZE: u32 = 4;

/// Rasterization resolution used for decoding.
pub const DEFAULT_DPI: f32 = 900.0;

/// Options for validating documents.
///
/// Built once and threaded through the validator; nothing here changes while
/// a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Number of leading pages that must carry the document's own identifier
    pub main_page_count: u32,

    /// Pages per supplemental group
    pub suppl_set_size: u32,

    /// Rasterization resolution in dots per inch
    pub dpi: f32,

    /// Whether to decode pages in parallel
    pub parallel: bool,

    /// Pages rasterized and decoded at once when parallel
    pub workers: usize,
}

impl ValidationConfig {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main section length.
    pub fn with_main_page_count(mut self, pages: u32) -> Self {
        self.main_page_count = pages;
        self
    }

    /// Set the supplemental group size.
    pub fn with_suppl_set_size(mut self, pages: u32) -> Self {
        self.suppl_set_size = pages;
        self
    }

    /// Set the rasterization resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the number of pages decoded concurrently.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable or disable parallel page decoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode one page at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Pages handled per rasterize-then-decode batch.
    pub fn batch_size(&self) -> usize {
        if self.parallel {
            self.workers.max(1)
        } else {
            1
        }
    }

    /// Check that the values can drive a validation run.
    pub fn validate(&self) -> Result<()> {
        if self.suppl_set_size == 0 {
            return Err(Error::InvalidConfig(
                "supplemental set size must be at least 1".into(),
            ));
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            main_page_count: DEFAULT_MAIN_PAGE_COUNT,
            suppl_set_size: DEFAULT_SUPPL_SET_SIZE,
            dpi: DEFAULT_DPI,
            parallel: true,
            workers: rayon::current_num_threads().max(1),
        }
    }
}
