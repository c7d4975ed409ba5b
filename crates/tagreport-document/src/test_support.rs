// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory image fixtures shared by the unit tests.

use std::io::Cursor;

use ::image::codecs::jpeg::JpegEncoder;
use ::image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

/// Baseline RGB JPEG with a simple gradient.
pub fn rgb_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, 80))
        .unwrap();
    buffer
}

/// Single-channel JPEG.
pub fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_pixel(width, height, Luma([90u8]));
    let mut buffer = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, 80))
        .unwrap();
    buffer
}

/// Opaque RGB PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Fully transparent (black, alpha 0) RGBA PNG.
pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

/// 8x8 baseline JPEG with four (CMYK) components, every sample mid-grey.
///
/// Built segment by segment because the JPEG encoder only writes grey and RGB
/// data. All blocks carry a zero DC difference and an immediate end-of-block,
/// so one-code Huffman tables are enough.
pub fn cmyk_jpeg() -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];

    // APP14 "Adobe", transform 0: components are CMYK, not YCCK.
    jpeg.extend_from_slice(&[0xFF, 0xEE, 0x00, 0x0E]);
    jpeg.extend_from_slice(b"Adobe");
    jpeg.extend_from_slice(&[0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00]);

    // DQT: table 0, all ones.
    jpeg.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    jpeg.extend_from_slice(&[1u8; 64]);

    // SOF0: 8-bit, 8x8, four components sampled 1x1 on table 0.
    jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x08, 0x00, 0x08, 0x04]);
    for component in 1..=4u8 {
        jpeg.extend_from_slice(&[component, 0x11, 0x00]);
    }

    // DHT: DC table 0 and AC table 0, each a single 1-bit code for symbol 0.
    jpeg.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x26]);
    for class in [0x00u8, 0x10] {
        jpeg.push(class);
        jpeg.push(1);
        jpeg.extend_from_slice(&[0u8; 15]);
        jpeg.push(0);
    }

    // SOS over all four components, then one MCU of four empty blocks.
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x0E, 0x04]);
    for component in 1..=4u8 {
        jpeg.extend_from_slice(&[component, 0x00]);
    }
    jpeg.extend_from_slice(&[0x00, 0x3F, 0x00]);
    jpeg.push(0x00);

    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
