// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report builder — request in, PDF bytes out.
//
// image adapter -> content compiler -> object graph -> writer. Pure and
// synchronous; a single builder can serve concurrent callers.

use chrono::{DateTime, Utc};
use tagreport_core::error::Result;
use tagreport_core::{ArchiveLookup, RenderedReport, ReportConfig, ReportRequest};
use tracing::{info, instrument, warn};

use crate::image::{ImageAdapter, ImageResource};
use crate::pdf::assemble::assemble;
use crate::pdf::content::{ImagePlacement, ReportText, compile, layout_lines};
use crate::pdf::writer::{PdfWriter, SerializedOutput};

/// Builds single-page tag reports.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    config: ReportConfig,
    adapter: ImageAdapter,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Self {
        let adapter = ImageAdapter::new(config.jpeg_quality);
        Self { config, adapter }
    }

    /// Like [`ReportBuilder::new`], but rejects an invalid configuration.
    pub fn with_validated_config(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build a report named after the current time.
    pub fn build(&self, request: &ReportRequest) -> Result<RenderedReport> {
        self.build_at(request, Utc::now())
    }

    /// Build a report named after `created_at`.
    pub fn build_at(
        &self,
        request: &ReportRequest,
        created_at: DateTime<Utc>,
    ) -> Result<RenderedReport> {
        let bytes = self.render_pdf(request)?;
        Ok(RenderedReport::new(bytes, &self.config.file_prefix, created_at))
    }

    /// Build a report, resolving `selected_token` through `archive` when the
    /// request carries no image bytes. Lookup failures drop the image.
    pub fn build_with_archive(
        &self,
        request: &ReportRequest,
        archive: &dyn ArchiveLookup,
    ) -> Result<RenderedReport> {
        let resolved = resolve_image(request, archive);
        let bytes = self.render(request, resolved.as_deref())?.into_bytes();
        Ok(RenderedReport::new(bytes, &self.config.file_prefix, Utc::now()))
    }

    /// Only the PDF bytes for `request`.
    pub fn render_pdf(&self, request: &ReportRequest) -> Result<Vec<u8>> {
        self.render(request, request.selected_image_bytes.as_deref())
            .map(SerializedOutput::into_bytes)
    }

    /// Full pipeline, exposing the serialised output with its offsets.
    #[instrument(
        skip_all,
        fields(tags = request.tags.len(), image_len = image_bytes.map_or(0, <[u8]>::len))
    )]
    pub fn render(
        &self,
        request: &ReportRequest,
        image_bytes: Option<&[u8]>,
    ) -> Result<SerializedOutput> {
        let lines = layout_lines(&ReportText::from_request(request), &self.config);

        let image = self.adapter.normalize(image_bytes);
        let placed = image.as_ref().and_then(|resource| {
            ImagePlacement::fit(resource.width(), resource.height())
                .map(|placement| (resource, placement))
        });

        let content = compile(&lines, placed.as_ref().map(|(_, placement)| placement));
        let lines_dropped = content.lines_dropped();
        let embedded: Option<&ImageResource> = placed.map(|(resource, _)| resource);

        let document = assemble(content, embedded, self.config.font)?;
        let output = PdfWriter::serialize(&document);

        info!(
            objects = document.len(),
            lines = lines.len(),
            lines_dropped,
            with_image = embedded.is_some(),
            bytes = output.bytes().len(),
            "Report rendered"
        );
        Ok(output)
    }
}

/// Image bytes for `request`: its own bytes, else the archive item behind its
/// token. Every failure is logged and yields `None`.
fn resolve_image(request: &ReportRequest, archive: &dyn ArchiveLookup) -> Option<Vec<u8>> {
    if let Some(bytes) = &request.selected_image_bytes {
        return Some(bytes.clone());
    }
    let token = request
        .selected_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())?;
    match archive.fetch(token) {
        Ok(Some(bytes)) => Some(bytes),
        Ok(None) => {
            warn!("Archive item for selected token not found; building without image");
            None
        }
        Err(err) => {
            warn!(%err, "Archive lookup failed; building without image");
            None
        }
    }
}
