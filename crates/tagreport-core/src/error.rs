// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the tag report synthesizer.

use thiserror::Error;

/// Top-level error type for all report operations.
///
/// Attachment problems (unreadable or untranscodable images, failed archive
/// lookups) are reported through this type internally but never abort a
/// report build; they degrade to a text-only document.
#[derive(Debug, Error)]
pub enum ReportError {
    // -- Document errors --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("document invariant violated: {0}")]
    Invariant(String),

    // -- Collaborators --
    #[error("archive lookup failed: {0}")]
    Archive(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(err: &ReportError) -> &'static str {
        match err {
            ReportError::Image(_) => "image",
            ReportError::Pdf(_) => "pdf",
            ReportError::Invariant(_) => "invariant",
            ReportError::Archive(_) => "archive",
            ReportError::Config(_) => "config",
            ReportError::Serialization(_) => "serialization",
        }
    }

    #[test]
    fn messages_name_the_failing_stage() {
        let err = ReportError::Archive("storage offline".into());
        assert_eq!(stage(&err), "archive");
        assert_eq!(err.to_string(), "archive lookup failed: storage offline");

        let err: ReportError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(stage(&err), "serialization");
        assert!(err.to_string().starts_with("serialization error: "));
    }
}
