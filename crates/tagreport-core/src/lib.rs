// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tag report — core types, configuration, collaborator traits and error
// definitions shared across all crates.

pub mod archive;
pub mod config;
pub mod error;
pub mod types;

pub use archive::{ArchiveLookup, MemoryArchive};
pub use config::{ReportConfig, StandardFont};
pub use error::ReportError;
pub use types::*;
