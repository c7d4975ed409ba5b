// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tagreport-document — single-page PDF synthesis for tag reports.
//
// Provides the image adapter (JPEG passthrough or transcoding), the content
// stream compiler, the PDF object model and writer, an inspector that re-reads
// produced files, and the `ReportBuilder` that ties them together.

pub mod image;
pub mod pdf;
pub mod report;

#[cfg(test)]
mod test_support;

// Re-export the primary structs so callers can use `tagreport_document::ReportBuilder` etc.
pub use self::image::{ImageAdapter, ImageResource};
pub use self::pdf::reader::ReportInspector;
pub use self::pdf::writer::PdfWriter;
pub use self::report::ReportBuilder;
