// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — classification and JPEG normalisation of report images.

pub mod adapter;

pub use adapter::{ColorSpace, ImageAdapter, ImageOrigin, ImageResource};
