// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for report requests and rendered reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type of every rendered report.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Input to a report build.
///
/// Field names follow the camelCase JSON contract of the request boundary.
/// Tags are kept in insertion order and are not deduplicated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    /// Report title. Empty or whitespace-only titles fall back to the
    /// configured default.
    pub title: String,
    /// Tag lines, one rendered line each.
    pub tags: Vec<String>,
    /// Raw bytes of an image to embed (any format the `image` crate decodes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_image_bytes: Option<Vec<u8>>,
    /// Opaque archive token, resolved through an `ArchiveLookup` when no
    /// image bytes are supplied directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_token: Option<String>,
    /// Display name of the selected archive item.
    #[serde(skip_serializing_if = "Option::is_none", alias = "selectedFileName")]
    pub selected_item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl ReportRequest {
    /// Start a request with the given title and no tags.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.selected_image_bytes = Some(bytes.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.selected_token = Some(token.into());
        self
    }

    pub fn with_selected_item(mut self, name: impl Into<String>) -> Self {
        self.selected_item_name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

/// A finished report: the PDF bytes plus delivery metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

impl RenderedReport {
    /// Wrap `bytes`, naming the file `<prefix>_<yyyyMMdd_HHmmss>.pdf` after
    /// the UTC instant `created_at`.
    pub fn new(bytes: Vec<u8>, prefix: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            bytes,
            content_type: PDF_CONTENT_TYPE,
            file_name: report_file_name(prefix, created_at),
        }
    }
}

/// Suggested download name for a report created at `created_at`.
pub fn report_file_name(prefix: &str, created_at: DateTime<Utc>) -> String {
    format!("{}_{}.pdf", prefix, created_at.format("%Y%m%d_%H%M%S"))
}
