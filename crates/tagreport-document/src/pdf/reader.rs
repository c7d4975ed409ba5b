// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report inspector — re-reads a produced PDF with the independent `lopdf`
// parser, and re-scans the raw bytes to check the cross-reference table.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tagreport_core::error::{ReportError, Result};
use tracing::{debug, instrument};

use super::writer::{EOF_MARKER, PDF_HEADER};

/// Read-only view of a produced report.
pub struct ReportInspector {
    /// The underlying lopdf document.
    document: Document,
}

impl ReportInspector {
    /// Parse PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ReportError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(
            pages = document.get_pages().len(),
            objects = document.objects.len(),
            "PDF loaded from bytes"
        );

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Number of indirect objects (excluding the free entry 0).
    pub fn object_count(&self) -> usize {
        self.document.objects.len()
    }

    /// Whether the first page's resources name an image XObject.
    pub fn has_image(&self) -> bool {
        self.first_page_resources()
            .is_ok_and(|resources| resources.has(b"XObject"))
    }

    /// Declared `/Width` and `/Height` of the first image XObject, if any.
    pub fn image_dimensions(&self) -> Option<(i64, i64)> {
        self.document.objects.values().find_map(|object| {
            let Object::Stream(stream) = object else {
                return None;
            };
            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok()?;
            if subtype != b"Image" {
                return None;
            }
            let width = stream.dict.get(b"Width").and_then(Object::as_i64).ok()?;
            let height = stream.dict.get(b"Height").and_then(Object::as_i64).ok()?;
            Some((width, height))
        })
    }

    /// Operands of every `Tj` on the first page, decoded as Latin-1.
    pub fn shown_text(&self) -> Result<Vec<String>> {
        let page_id = self.first_page()?;
        let raw = self.document.get_page_content(page_id).map_err(|err| {
            ReportError::Pdf(format!("cannot read page content: {}", err))
        })?;
        let content = Content::decode(&raw)
            .map_err(|err| ReportError::Pdf(format!("cannot decode page content: {}", err)))?;

        Ok(content
            .operations
            .iter()
            .filter(|operation| operation.operator == "Tj")
            .filter_map(|operation| match operation.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
                _ => None,
            })
            .collect())
    }

    /// Whether the page's content stream declares exactly as many bytes as it
    /// holds.
    pub fn content_length_consistent(&self) -> Result<bool> {
        let page_id = self.first_page()?;
        let contents = self
            .document
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Contents"))
            .and_then(Object::as_reference)
            .map_err(|err| ReportError::Pdf(format!("page has no /Contents reference: {}", err)))?;
        let stream = self
            .document
            .get_object(contents)
            .and_then(Object::as_stream)
            .map_err(|err| ReportError::Pdf(format!("/Contents is not a stream: {}", err)))?;
        let declared = stream
            .dict
            .get(b"Length")
            .and_then(Object::as_i64)
            .map_err(|err| ReportError::Pdf(format!("content stream has no /Length: {}", err)))?;
        Ok(usize::try_from(declared).is_ok_and(|declared| declared == stream.content.len()))
    }

    // -- Helpers --------------------------------------------------------------

    fn first_page(&self) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&1)
            .copied()
            .ok_or_else(|| ReportError::Pdf("document has no pages".into()))
    }

    fn first_page_resources(&self) -> Result<&lopdf::Dictionary> {
        let page_id = self.first_page()?;
        self.document
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Resources"))
            .and_then(Object::as_dict)
            .map_err(|err| ReportError::Pdf(format!("page has no inline /Resources: {}", err)))
    }
}

/// What [`verify_structure`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureReport {
    /// Entries in the xref table, including the free entry.
    pub xref_entries: usize,
    pub xref_offset: usize,
    /// Offset of object `n` at index `n - 1`.
    pub offsets: Vec<usize>,
}

/// Check a produced file without a PDF parser: header and EOF markers, the
/// `startxref` pointer, every xref offset naming its own object, and every
/// stream's `/Length` landing exactly on `endstream`.
pub fn verify_structure(bytes: &[u8]) -> Result<StructureReport> {
    if !bytes.starts_with(PDF_HEADER) {
        return Err(structure_error("missing %PDF header"));
    }
    let trimmed = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    if !trimmed.ends_with(EOF_MARKER) {
        return Err(structure_error("missing %%EOF marker"));
    }

    let startxref = rfind(bytes, b"startxref\n")
        .ok_or_else(|| structure_error("missing startxref"))?;
    let xref_offset = parse_number(&bytes[startxref + b"startxref\n".len()..])
        .ok_or_else(|| structure_error("unreadable startxref value"))?;
    let mut cursor = bytes
        .get(xref_offset..)
        .filter(|rest| rest.starts_with(b"xref\n0 "))
        .map(|_| xref_offset + b"xref\n0 ".len())
        .ok_or_else(|| structure_error("startxref does not point at an xref table"))?;

    let xref_entries = parse_number(&bytes[cursor..])
        .ok_or_else(|| structure_error("unreadable xref entry count"))?;
    cursor += line_len(&bytes[cursor..]);
    if xref_entries == 0 || xref_entries > (bytes.len() - cursor) / 20 {
        return Err(structure_error("xref entry count does not fit the file"));
    }

    let mut offsets = Vec::with_capacity(xref_entries - 1);
    for index in 0..xref_entries {
        let entry = bytes
            .get(cursor..cursor + 20)
            .ok_or_else(|| structure_error("truncated xref table"))?;
        cursor += 20;
        if index == 0 {
            if entry != b"0000000000 65535 f \n" {
                return Err(structure_error("first xref entry is not the free-list head"));
            }
            continue;
        }
        if !entry.ends_with(b" 00000 n \n") {
            return Err(structure_error(&format!("malformed xref entry {index}")));
        }
        let offset = parse_number(entry)
            .ok_or_else(|| structure_error(&format!("unreadable offset in entry {index}")))?;
        let header = format!("{index} 0 obj\n");
        if !bytes[offset.min(bytes.len())..].starts_with(header.as_bytes()) {
            return Err(structure_error(&format!(
                "xref offset {offset} does not start object {index}"
            )));
        }
        check_stream_length(bytes, offset, index)?;
        offsets.push(offset);
    }

    if !bytes[cursor..].starts_with(format!("trailer\n<< /Size {xref_entries} ").as_bytes()) {
        return Err(structure_error("trailer /Size does not match the xref table"));
    }

    Ok(StructureReport {
        xref_entries,
        xref_offset,
        offsets,
    })
}

/// For a stream object at `offset`, the declared `/Length` must end the
/// payload exactly where `endstream` begins.
fn check_stream_length(bytes: &[u8], offset: usize, index: usize) -> Result<()> {
    let object = &bytes[offset..];
    let Some(dict_end) = find(object, b">>\nstream\n") else {
        return Ok(());
    };
    if find(&object[..dict_end], b"\nendobj").is_some() {
        // The match belongs to a later object.
        return Ok(());
    }
    let length_key = find(&object[..dict_end], b"/Length ")
        .ok_or_else(|| structure_error(&format!("stream object {index} has no /Length")))?;
    let length = parse_number(&object[length_key + b"/Length ".len()..])
        .ok_or_else(|| structure_error(&format!("unreadable /Length in object {index}")))?;
    let payload_start = dict_end + b">>\nstream\n".len();
    let after = object
        .get(payload_start + length..)
        .ok_or_else(|| structure_error(&format!("/Length of object {index} runs past EOF")))?;
    if !after.starts_with(b"\nendstream\nendobj\n") {
        return Err(structure_error(&format!(
            "/Length {length} of object {index} does not end at endstream"
        )));
    }
    Ok(())
}

fn structure_error(message: &str) -> ReportError {
    ReportError::Pdf(format!("structure check failed: {message}"))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

/// Leading ASCII digits of `bytes` as a number.
fn parse_number(bytes: &[u8]) -> Option<usize> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    std::str::from_utf8(&bytes[..digits]).ok()?.parse().ok()
}

fn line_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |newline| newline + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &[u8] = b"%PDF-1.4\n\
1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
2 0 obj\n<< /Type /Pages /Count 0 /Kids [] >>\nendobj\n\
xref\n0 3\n\
0000000000 65535 f \n\
0000000009 00000 n \n\
0000000058 00000 n \n\
trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n110\n%%EOF\n";

    #[test]
    fn hand_written_file_passes() {
        let report = verify_structure(MINIMAL).unwrap();
        assert_eq!(report.xref_entries, 3);
        assert_eq!(report.offsets, vec![9, 58]);
        assert_eq!(report.xref_offset, 110);
    }

    #[test]
    fn shifted_offset_is_detected() {
        let broken = String::from_utf8_lossy(MINIMAL).replace("0000000058", "0000000059");
        assert!(verify_structure(broken.as_bytes()).is_err());
    }

    #[test]
    fn missing_eof_is_detected() {
        let broken = &MINIMAL[..MINIMAL.len() - 6];
        assert!(verify_structure(broken).is_err());
    }

    #[test]
    fn oversized_xref_count_is_rejected() {
        let forged = b"%PDF-1.4\nxref\n0 1000000000000000\ntrailer\nstartxref\n9\n%%EOF\n";
        assert!(verify_structure(forged).is_err());
    }

    #[test]
    fn empty_xref_table_is_rejected() {
        let forged = b"%PDF-1.4\nxref\n0 0\ntrailer\n<< /Size 0 >>\nstartxref\n9\n%%EOF\n";
        assert!(verify_structure(forged).is_err());
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        assert!(ReportInspector::from_bytes(b"not a pdf").is_err());
        assert!(verify_structure(b"not a pdf").is_err());
    }
}
