// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialises a validated `Document` into bytes and appends the
// cross-reference table and trailer.
//
// Each object's offset is the buffer length recorded immediately before the
// object is appended, so the xref table is correct whatever bytes the
// payloads contain.

use tracing::{debug, instrument};

use super::object::{Document, DocumentObject};

/// File header.
pub const PDF_HEADER: &[u8] = b"%PDF-1.4\n";
/// Comment with high-bit bytes so transfer tools treat the file as binary.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";
/// Final marker of every file.
pub const EOF_MARKER: &[u8] = b"%%EOF";

/// Serialised document bytes plus the offsets used to build its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedOutput {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
    xref_offset: usize,
}

impl SerializedOutput {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte offset of object `n` at index `n - 1`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Byte offset of the `xref` keyword.
    pub fn xref_offset(&self) -> usize {
        self.xref_offset
    }
}

/// Writes documents in classic (uncompressed xref table) PDF syntax.
///
/// Only constructed inside [`PdfWriter::serialize`]; the buffer and offsets
/// live for a single document.
#[derive(Debug)]
pub struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    /// Serialise `document`: header, objects in number order, xref, trailer.
    #[instrument(skip_all, fields(objects = document.len()))]
    pub fn serialize(document: &Document) -> SerializedOutput {
        let payload_len: usize = document
            .objects()
            .iter()
            .filter_map(DocumentObject::payload)
            .map(<[u8]>::len)
            .sum();
        let mut writer = Self {
            buffer: Vec::with_capacity(payload_len + 1024),
            offsets: Vec::with_capacity(document.len()),
        };

        writer.buffer.extend_from_slice(PDF_HEADER);
        writer.buffer.extend_from_slice(BINARY_MARKER);

        for object in document.objects() {
            writer.write_object(object);
        }

        let xref_offset = writer.write_xref_and_trailer(document.root());
        debug!(
            bytes = writer.buffer.len(),
            xref_offset, "Document serialised"
        );

        SerializedOutput {
            bytes: writer.buffer,
            offsets: writer.offsets,
            xref_offset,
        }
    }

    fn write_object(&mut self, object: &DocumentObject) {
        self.offsets.push(self.buffer.len());

        self.buffer
            .extend_from_slice(format!("{} 0 obj\n", object.id()).as_bytes());
        object.dict().write_to(&mut self.buffer);
        if let Some(payload) = object.payload() {
            self.buffer.extend_from_slice(b"\nstream\n");
            self.buffer.extend_from_slice(payload);
            self.buffer.extend_from_slice(b"\nendstream");
        }
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    /// Append the xref table and trailer; returns the xref offset.
    fn write_xref_and_trailer(&mut self, root: u32) -> usize {
        let xref_offset = self.buffer.len();
        let size = self.offsets.len() + 1;

        self.buffer
            .extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        self.buffer.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buffer
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        self.buffer.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n",
                size, root, xref_offset
            )
            .as_bytes(),
        );
        self.buffer.extend_from_slice(EOF_MARKER);
        self.buffer.push(b'\n');

        xref_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::object::{Dictionary, DocumentBuilder, ObjectKind, PdfValue};

    /// A two-object document whose stream payload imitates object headers.
    fn tricky_document() -> Document {
        let mut builder = DocumentBuilder::new();
        let catalog = builder.reserve();
        let stream = builder.reserve();
        builder
            .insert(
                catalog,
                ObjectKind::Catalog,
                Dictionary::new().with("Type", PdfValue::name("Catalog")),
            )
            .unwrap();
        builder
            .insert_stream(
                stream,
                ObjectKind::Image,
                Dictionary::new(),
                b"\n7 0 obj << >> endobj\n2 0 obj\n\xFF\xD8".to_vec(),
            )
            .unwrap();
        builder.finish(catalog).unwrap()
    }

    fn starts_at(bytes: &[u8], offset: usize, prefix: &[u8]) -> bool {
        bytes.get(offset..).is_some_and(|rest| rest.starts_with(prefix))
    }

    #[test]
    fn header_and_eof_markers() {
        let output = PdfWriter::serialize(&tricky_document());
        assert!(output.bytes().starts_with(b"%PDF-1.4\n"));
        assert!(output.bytes().ends_with(b"%%EOF\n"));
    }

    #[test]
    fn offsets_point_at_object_headers_despite_lookalike_payload() {
        let output = PdfWriter::serialize(&tricky_document());
        assert_eq!(output.offsets().len(), 2);
        assert!(starts_at(output.bytes(), output.offsets()[0], b"1 0 obj\n"));
        assert!(starts_at(output.bytes(), output.offsets()[1], b"2 0 obj\n"));
    }

    #[test]
    fn xref_table_lists_every_object() {
        let output = PdfWriter::serialize(&tricky_document());
        let bytes = output.bytes();
        assert!(starts_at(bytes, output.xref_offset(), b"xref\n0 3\n0000000000 65535 f \n"));

        let entries = &bytes[output.xref_offset() + b"xref\n0 3\n".len()..];
        for (index, offset) in output.offsets().iter().enumerate() {
            let entry = format!("{:010} 00000 n \n", offset);
            let start = (index + 1) * 20;
            assert_eq!(&entries[start..start + 20], entry.as_bytes());
        }

        let tail = String::from_utf8_lossy(&bytes[output.xref_offset()..]).into_owned();
        assert!(tail.contains("trailer\n<< /Size 3 /Root 1 0 R >>"));
        assert!(tail.ends_with(&format!("startxref\n{}\n%%EOF\n", output.xref_offset())));
    }

    #[test]
    fn stream_payload_is_written_verbatim() {
        let output = PdfWriter::serialize(&tricky_document());
        let bytes = output.bytes();
        let start = output.offsets()[1];
        let object = &bytes[start..output.xref_offset()];
        let expected_head = b"2 0 obj\n<< /Length 32 >>\nstream\n";
        assert!(object.starts_with(expected_head));
        let payload = &object[expected_head.len()..expected_head.len() + 32];
        assert_eq!(payload, b"\n7 0 obj << >> endobj\n2 0 obj\n\xFF\xD8".as_slice());
        assert!(object[expected_head.len() + 32..].starts_with(b"\nendstream\nendobj\n"));
    }

    #[test]
    fn each_serialisation_starts_from_a_fresh_buffer() {
        let document = tricky_document();
        let first = PdfWriter::serialize(&document);
        let second = PdfWriter::serialize(&document);
        assert_eq!(first.bytes(), second.bytes());
        assert_eq!(first.offsets(), second.offsets());
        assert_eq!(first.offsets()[0], PDF_HEADER.len() + BINARY_MARKER.len());
    }
}
