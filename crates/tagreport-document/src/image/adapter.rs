// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image adapter — turns an optional raw image payload into a JPEG resource a
// PDF can embed with the DCTDecode filter. JPEGs in a PDF-native colour model
// are passed through untouched; everything else is decoded and re-encoded
// using the `image` crate.

use std::io::Cursor;

use ::image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use ::image::{DynamicImage, ImageDecoder, Rgb, RgbImage};
use tagreport_core::error::{ReportError, Result};
use tracing::{debug, info, instrument, warn};

/// Leading bytes of every JPEG stream (SOI marker plus the next marker's 0xFF).
pub const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Colour spaces an embedded JPEG can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRgb,
    DeviceGray,
}

impl ColorSpace {
    /// The PDF name for this colour space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::DeviceRgb => "DeviceRGB",
            Self::DeviceGray => "DeviceGray",
        }
    }
}

/// How the embedded bytes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    /// The caller's JPEG, byte for byte.
    Passthrough,
    /// Decoded from another format (or colour model) and re-encoded.
    Transcoded,
}

/// A JPEG ready to embed, with its pixel dimensions.
///
/// Can only be constructed with non-zero dimensions and a non-empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: ColorSpace,
    origin: ImageOrigin,
}

impl ImageResource {
    /// Returns `None` unless `width`, `height` and `data` are all non-empty.
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        origin: ImageOrigin,
    ) -> Option<Self> {
        if width == 0 || height == 0 || data.is_empty() {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            color_space,
            origin,
        })
    }

    /// The compressed JPEG bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }
}

/// Normalises caller-supplied images into embeddable JPEG resources.
#[derive(Debug, Clone, Copy)]
pub struct ImageAdapter {
    /// JPEG quality (1-100) used when transcoding.
    quality: u8,
}

impl Default for ImageAdapter {
    fn default() -> Self {
        Self::new(85)
    }
}

impl ImageAdapter {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Produce an embeddable resource, or `None` when there is no image or it
    /// cannot be used. Failures are logged and never propagated: a report
    /// without its image is still a valid report.
    #[instrument(skip_all, fields(bytes_len = bytes.map_or(0, <[u8]>::len)))]
    pub fn normalize(&self, bytes: Option<&[u8]>) -> Option<ImageResource> {
        let bytes = bytes?;
        match self.try_normalize(bytes) {
            Ok(resource) => {
                info!(
                    width = resource.width(),
                    height = resource.height(),
                    origin = ?resource.origin(),
                    embedded_len = resource.data().len(),
                    "Image normalised"
                );
                Some(resource)
            }
            Err(err) => {
                warn!(%err, "Image dropped from report");
                None
            }
        }
    }

    /// Fallible form of [`ImageAdapter::normalize`].
    pub fn try_normalize(&self, bytes: &[u8]) -> Result<ImageResource> {
        if bytes.is_empty() {
            return Err(ReportError::Image("empty image payload".into()));
        }

        if is_jpeg(bytes) {
            if let Some((width, height, color_space)) = probe_jpeg(bytes)? {
                return ImageResource::new(
                    bytes.to_vec(),
                    width,
                    height,
                    color_space,
                    ImageOrigin::Passthrough,
                )
                .ok_or_else(|| {
                    ReportError::Image(format!("JPEG declares empty dimensions {width}x{height}"))
                });
            }
            debug!("JPEG colour model cannot be embedded as-is, transcoding");
        }

        self.transcode(bytes)
    }

    /// Decode any supported format and re-encode it as an RGB JPEG.
    fn transcode(&self, bytes: &[u8]) -> Result<ImageResource> {
        let decoded = ::image::load_from_memory(bytes).map_err(|err| {
            ReportError::Image(format!("failed to decode image for transcoding: {}", err))
        })?;
        let rgb = flatten_onto_white(decoded);
        let (width, height) = rgb.dimensions();

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| ReportError::Image(format!("JPEG encoding failed: {}", err)))?;

        debug!(width, height, encoded_len = buffer.len(), "Image transcoded to JPEG");

        ImageResource::new(
            buffer,
            width,
            height,
            ColorSpace::DeviceRgb,
            ImageOrigin::Transcoded,
        )
        .ok_or_else(|| ReportError::Image(format!("decoded image is empty ({width}x{height})")))
    }
}

/// Whether `bytes` starts with the JPEG signature.
pub fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&JPEG_SIGNATURE)
}

/// Read only the JPEG header. Returns `None` for colour models (CMYK, YCCK)
/// that need transcoding before a PDF can declare them.
///
/// The decoder reports CMYK input as RGB, so the colour model comes from the
/// component count in the frame header instead.
fn probe_jpeg(bytes: &[u8]) -> Result<Option<(u32, u32, ColorSpace)>> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))
        .map_err(|err| ReportError::Image(format!("unreadable JPEG header: {}", err)))?;
    let (width, height) = decoder.dimensions();
    let color_space = match frame_components(bytes) {
        Some(3) => ColorSpace::DeviceRgb,
        Some(1) => ColorSpace::DeviceGray,
        components => {
            debug!(?components, "JPEG frame is neither grey nor three-component");
            return Ok(None);
        }
    };
    Ok(Some((width, height, color_space)))
}

/// Component count from the first SOFn segment, walking markers from SOI.
fn frame_components(bytes: &[u8]) -> Option<u8> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // Fill byte before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            // Markers without a length field.
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            // EOI or SOS before any frame header.
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            // Length, precision, height and width precede the count.
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}

/// Drop the alpha channel, compositing translucent pixels over white.
fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |channel: u8| -> u8 {
            let alpha = u16::from(a);
            ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
