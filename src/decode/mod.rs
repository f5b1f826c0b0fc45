//! Single-page identifier extraction.
//!
//! A page image goes through a fixed fallback chain: direct decode of a set
//! of candidate regions, decode of enhanced versions of those regions,
//! rotations of the first enhanced region, and finally a wide top-band crop.
//! The first non-empty identifier wins.

mod barcode;
mod enhance;
mod region;
mod strategy;

pub use barcode::{BarcodeDecoder, Decode};
#[cfg(feature = "multiformat")]
pub use barcode::MultiFormatDecoder;
#[cfg(feature = "qr")]
pub use barcode::QrDecoder;
pub use enhance::{EnhanceParams, ImageEnhancer};
pub use region::{Band, Region, RegionCropper};
pub use strategy::{DecodeAttempt, DecodeStage, DecodeStrategy, DecodeTrace, Transform};
