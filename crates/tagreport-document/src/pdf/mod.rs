// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — content streams, the object model, serialisation and
// inspection of produced files.

pub mod assemble;
pub mod content;
pub mod object;
pub mod reader;
pub mod writer;

pub use object::{Dictionary, Document, DocumentBuilder, ObjectKind, PdfValue};
pub use reader::{ReportInspector, verify_structure};
pub use writer::{PdfWriter, SerializedOutput};
