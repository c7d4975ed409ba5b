// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report object graph: catalog, page tree, page, content stream, font and
// the optional image, numbered 1 to 6 in that order.

use tagreport_core::StandardFont;
use tagreport_core::error::{ReportError, Result};
use tracing::{debug, warn};

use super::content::{CompiledContent, FONT_RESOURCE, IMAGE_RESOURCE, PAGE_HEIGHT, PAGE_WIDTH};
use super::object::{Dictionary, Document, DocumentBuilder, ObjectKind, PdfValue};
use crate::image::ImageResource;

/// Build the single-page document for `content`.
///
/// The image object (and the page's `/XObject` entry) exist only when the
/// content stream paints the image and a usable resource is supplied. An
/// image the stream never paints is left out; a stream that paints a missing
/// image is an internal error.
pub fn assemble(
    content: CompiledContent,
    image: Option<&ImageResource>,
    font: StandardFont,
) -> Result<Document> {
    let image = match (content.draws_image(), image) {
        (true, Some(image)) if image.width() > 0 && image.height() > 0 => Some(image),
        (true, _) => {
            return Err(ReportError::Invariant(
                "content stream paints an image but no usable image resource was supplied".into(),
            ));
        }
        (false, Some(_)) => {
            warn!("Image supplied without a placement; omitting it");
            None
        }
        (false, None) => None,
    };

    let mut builder = DocumentBuilder::new();
    let catalog_id = builder.reserve();
    let pages_id = builder.reserve();
    let page_id = builder.reserve();
    let contents_id = builder.reserve();
    let font_id = builder.reserve();
    let image_id = image.map(|_| builder.reserve());

    builder.insert(
        catalog_id,
        ObjectKind::Catalog,
        Dictionary::new()
            .with("Type", PdfValue::name("Catalog"))
            .with("Pages", PdfValue::Reference(pages_id)),
    )?;

    builder.insert(
        pages_id,
        ObjectKind::PageTree,
        Dictionary::new()
            .with("Type", PdfValue::name("Pages"))
            .with("Count", 1i64)
            .with("Kids", PdfValue::Array(vec![PdfValue::Reference(page_id)])),
    )?;

    let mut resources = Dictionary::new().with(
        "Font",
        Dictionary::new().with(FONT_RESOURCE, PdfValue::Reference(font_id)),
    );
    if let Some(id) = image_id {
        resources.set(
            "XObject",
            Dictionary::new().with(IMAGE_RESOURCE, PdfValue::Reference(id)),
        );
    }

    builder.insert(
        page_id,
        ObjectKind::Page,
        Dictionary::new()
            .with("Type", PdfValue::name("Page"))
            .with("Parent", PdfValue::Reference(pages_id))
            .with(
                "MediaBox",
                PdfValue::Array(vec![
                    0i64.into(),
                    0i64.into(),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ]),
            )
            .with("Resources", resources)
            .with("Contents", PdfValue::Reference(contents_id)),
    )?;

    builder.insert_stream(
        contents_id,
        ObjectKind::ContentStream,
        Dictionary::new(),
        content.into_bytes(),
    )?;

    builder.insert(
        font_id,
        ObjectKind::Font,
        Dictionary::new()
            .with("Type", PdfValue::name("Font"))
            .with("Subtype", PdfValue::name("Type1"))
            .with("BaseFont", PdfValue::name(font.base_font()))
            .with("Encoding", PdfValue::name("WinAnsiEncoding")),
    )?;

    if let (Some(id), Some(image)) = (image_id, image) {
        builder.insert_stream(
            id,
            ObjectKind::Image,
            Dictionary::new()
                .with("Type", PdfValue::name("XObject"))
                .with("Subtype", PdfValue::name("Image"))
                .with("Width", image.width())
                .with("Height", image.height())
                .with("ColorSpace", PdfValue::name(image.color_space().pdf_name()))
                .with("BitsPerComponent", 8i64)
                .with("Filter", PdfValue::name("DCTDecode")),
            image.data().to_vec(),
        )?;
    }

    let document = builder.finish(catalog_id)?;
    debug!(objects = document.len(), with_image = image.is_some(), "Document assembled");
    Ok(document)
}
