//! Barcode decoding seam.

use image::DynamicImage;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::model::normalize_identifier;

/// Outcome of a single decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decode {
    /// A symbol was found; the payload is the raw text
    Decoded(String),
    /// No symbol found, or the backend failed
    NotFound,
}

impl Decode {
    /// Normalized identifier, treating blank payloads as not found.
    pub fn into_identifier(self) -> Option<String> {
        match self {
            Decode::Decoded(text) => normalize_identifier(&text),
            Decode::NotFound => None,
        }
    }
}

impl From<Option<String>> for Decode {
    fn from(value: Option<String>) -> Self {
        value.map(Decode::Decoded).unwrap_or(Decode::NotFound)
    }
}

/// Locates and decodes a barcode symbol in an image.
///
/// Implementations report every failure as [`Decode::NotFound`].
pub trait BarcodeDecoder: Send + Sync {
    /// Get the name of this decoder.
    fn name(&self) -> &str;

    /// Try to decode a symbol anywhere in the image.
    fn decode(&self, image: &DynamicImage) -> Decode;
}

impl<D: BarcodeDecoder + ?Sized> BarcodeDecoder for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, image: &DynamicImage) -> Decode {
        (**self).decode(image)
    }
}

impl<D: BarcodeDecoder + ?Sized> BarcodeDecoder for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, image: &DynamicImage) -> Decode {
        (**self).decode(image)
    }
}

impl<D: BarcodeDecoder + ?Sized> BarcodeDecoder for Arc<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, image: &DynamicImage) -> Decode {
        (**self).decode(image)
    }
}

/// Run one decode call, turning a panicking backend into `NotFound`.
pub(crate) fn decode_isolated<D: BarcodeDecoder + ?Sized>(decoder: &D, image: &DynamicImage) -> Decode {
    match panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(image))) {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Decoder '{}' panicked; treating as not found", decoder.name());
            Decode::NotFound
        }
    }
}

/// Decoder for every format rxing reads: 1-D symbologies (Code 128,
/// Code 39, EAN, ...) as well as QR, Data Matrix, Aztec and PDF417.
#[cfg(feature = "multiformat")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiFormatDecoder {
    _private: (),
}

#[cfg(feature = "multiformat")]
impl MultiFormatDecoder {
    /// Create a new multi-format decoder.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "multiformat")]
impl BarcodeDecoder for MultiFormatDecoder {
    fn name(&self) -> &str {
        "multi-format"
    }

    fn decode(&self, image: &DynamicImage) -> Decode {
        let gray = image.to_luma8();
        let (w, h) = gray.dimensions();
        if w == 0 || h == 0 {
            return Decode::NotFound;
        }

        match rxing::helpers::detect_in_luma(gray.into_raw(), w, h, None) {
            Ok(result) => Decode::Decoded(result.getText().to_string()),
            Err(_) => Decode::NotFound,
        }
    }
}

/// QR code decoder backed by rqrr.
#[cfg(feature = "qr")]
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder {
    _private: (),
}

#[cfg(feature = "qr")]
impl QrDecoder {
    /// Create a new QR decoder.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "qr")]
impl BarcodeDecoder for QrDecoder {
    fn name(&self) -> &str {
        "qr"
    }

    fn decode(&self, image: &DynamicImage) -> Decode {
        let gray = image.to_luma8();
        let (w, h) = gray.dimensions();
        if w == 0 || h == 0 {
            return Decode::NotFound;
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0]
        });
        prepared
            .detect_grids()
            .iter()
            .find_map(|grid| grid.decode().ok())
            .map(|(_, content)| content)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panicking;

    impl BarcodeDecoder for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn decode(&self, _image: &DynamicImage) -> Decode {
            panic!("backend exploded")
        }
    }

    #[test]
    fn test_into_identifier() {
        assert_eq!(
            Decode::Decoded(" doc7 ".into()).into_identifier(),
            Some("DOC7".to_string())
        );
        assert_eq!(Decode::Decoded("  ".into()).into_identifier(), None);
        assert_eq!(Decode::NotFound.into_identifier(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Decode::from(Some("x".to_string())), Decode::Decoded("x".into()));
        assert_eq!(Decode::from(None), Decode::NotFound);
    }

    #[test]
    fn test_panicking_decoder_is_contained() {
        let image = DynamicImage::new_luma8(4, 4);
        assert_eq!(decode_isolated(&Panicking, &image), Decode::NotFound);
    }

    #[test]
    fn test_shared_decoder() {
        let shared: Arc<dyn BarcodeDecoder> = Arc::new(Panicking);
        assert_eq!(shared.name(), "panicking");
        assert_eq!(
            decode_isolated(&shared, &DynamicImage::new_luma8(2, 2)),
            Decode::NotFound
        );
    }

    #[cfg(feature = "multiformat")]
    #[test]
    fn test_multi_format_decoder_blank_image() {
        let decoder = MultiFormatDecoder::new();
        assert_eq!(decoder.decode(&DynamicImage::new_luma8(64, 64)), Decode::NotFound);
        assert_eq!(decoder.decode(&DynamicImage::new_luma8(0, 0)), Decode::NotFound);
        assert_eq!(decoder.name(), "multi-format");
    }

    #[cfg(feature = "qr")]
    #[test]
    fn test_qr_decoder_blank_image() {
        let decoder = QrDecoder::new();
        assert_eq!(decoder.decode(&DynamicImage::new_luma8(64, 64)), Decode::NotFound);
        assert_eq!(decoder.decode(&DynamicImage::new_luma8(0, 0)), Decode::NotFound);
        assert_eq!(decoder.name(), "qr");
    }
}
