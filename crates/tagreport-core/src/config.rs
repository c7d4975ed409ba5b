// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report configuration: default texts, labels, font and output naming.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// One of the standard Type 1 fonts every PDF reader ships with.
///
/// Only fonts with a Latin text encoding are offered; Symbol and ZapfDingbats
/// would render the report text as pictograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    TimesRoman,
    Courier,
}

impl StandardFont {
    /// The `/BaseFont` name for this font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::TimesRoman => "Times-Roman",
            Self::Courier => "Courier",
        }
    }
}

/// Settings applied to every report built by a `ReportBuilder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title used when the request title is empty or whitespace.
    pub default_title: String,
    /// Single line rendered when the request carries no tags.
    pub no_tags_label: String,
    /// Label preceding the selected item name.
    pub selected_item_label: String,
    /// Label preceding the category.
    pub category_label: String,
    /// Label preceding the folder.
    pub folder_label: String,
    /// Built-in font used for every text line.
    pub font: StandardFont,
    /// JPEG quality (1-100) used when an image has to be transcoded.
    pub jpeg_quality: u8,
    /// Prefix of the suggested file name (`<prefix>_<timestamp>.pdf`).
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_title: "Pattern Report".into(),
            no_tags_label: "No tags".into(),
            selected_item_label: "Selected image".into(),
            category_label: "Category".into(),
            folder_label: "Folder".into(),
            font: StandardFont::Helvetica,
            jpeg_quality: 85,
            file_prefix: "report".into(),
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an unusable document or file name.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ReportError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.default_title.trim().is_empty() {
            return Err(ReportError::Config("default_title must not be empty".into()));
        }
        if self.file_prefix.is_empty()
            || self
                .file_prefix
                .chars()
                .any(|c| matches!(c, '/' | '\\' | ':' | '\0'))
        {
            return Err(ReportError::Config(format!(
                "file_prefix {:?} is not a usable file name prefix",
                self.file_prefix
            )));
        }
        Ok(())
    }
}
