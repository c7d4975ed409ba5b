// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive lookup — the collaborator that turns an opaque token into image
// bytes. The synthesizer never decodes tokens or touches storage itself.

use std::collections::HashMap;

use crate::error::Result;

/// Resolve an opaque archive token to the raw bytes of the item it names.
pub trait ArchiveLookup: Send + Sync {
    /// Fetch the bytes behind `token`.
    /// Returns Ok(None) if the archive has no such item.
    fn fetch(&self, token: &str) -> Result<Option<Vec<u8>>>;
}

/// In-memory archive keyed by token.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    items: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `token`, replacing any previous item.
    pub fn insert(&mut self, token: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.items.insert(token.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ArchiveLookup for MemoryArchive {
    fn fetch(&self, token: &str) -> Result<Option<Vec<u8>>> {
        let found = self.items.get(token).cloned();
        if found.is_none() {
            tracing::debug!(token, "archive item not found");
        }
        Ok(found)
    }
}
