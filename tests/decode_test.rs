//! Integration tests for the multi-format decoding backend.

#![cfg(feature = "multiformat")]

use image::{DynamicImage, GrayImage, Luma};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};
use scancheck::decode::{DecodeStage, DecodeStrategy, MultiFormatDecoder};
use scancheck::{BarcodeDecoder, Decode};

const MODULE: u32 = 4;
const BAR_HEIGHT: u32 = 120;

/// White A4-ish page with a Code 128 symbol printed near the top left.
fn page_with_code128(text: &str, left: u32, top: u32) -> DynamicImage {
    // A 1x1 request gets the symbol's natural width and a single row
    let matrix = MultiFormatWriter::default()
        .encode(text, &BarcodeFormat::CODE_128, 1, 1)
        .unwrap();

    let mut page = GrayImage::from_pixel(2000, 3000, Luma([255]));
    for module in 0..matrix.width() {
        if !matrix.get(module, 0) {
            continue;
        }
        for dx in 0..MODULE {
            for y in top..top + BAR_HEIGHT {
                page.put_pixel(left + module * MODULE + dx, y, Luma([0]));
            }
        }
    }
    DynamicImage::ImageLuma8(page)
}

#[test]
fn test_code128_decodes_directly() {
    let page = page_with_code128("DOC007", 100, 100);
    let decoder = MultiFormatDecoder::new();

    let top_left = page.crop_imm(0, 0, 1000, 360);
    assert_eq!(decoder.decode(&top_left), Decode::Decoded("DOC007".into()));

    let trace = DecodeStrategy::new(decoder).decode_page_traced(&page);
    assert_eq!(trace.identifier.as_deref(), Some("DOC007"));
    assert_eq!(trace.stage, Some(DecodeStage::Direct));
    assert_eq!(trace.attempt_count(), 1);
}

#[test]
fn test_blank_page_finds_nothing() {
    let page = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 1200, Luma([255])));
    let trace = DecodeStrategy::new(MultiFormatDecoder::new()).decode_page_traced(&page);
    assert_eq!(trace.identifier, None);
}
