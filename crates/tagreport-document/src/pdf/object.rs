// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF object model — typed values, numbered objects, and a builder that hands
// out object numbers from an explicit counter and validates cross-references
// before a document can be serialised.

use std::collections::HashSet;

use tagreport_core::error::{ReportError, Result};

/// Object number. Generation is always 0 in documents built here.
pub type ObjectId = u32;

/// A value inside an object dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfValue {
    Integer(i64),
    /// A name, stored without the leading slash.
    Name(String),
    Array(Vec<PdfValue>),
    Dictionary(Dictionary),
    Reference(ObjectId),
}

impl PdfValue {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Append the PDF syntax for this value to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Integer(value) => out.extend_from_slice(value.to_string().as_bytes()),
            Self::Name(name) => write_name(name, out),
            Self::Array(items) => {
                out.push(b'[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            Self::Dictionary(dict) => dict.write_to(out),
            Self::Reference(id) => out.extend_from_slice(format!("{} 0 R", id).as_bytes()),
        }
    }

    fn collect_references(&self, found: &mut Vec<ObjectId>) {
        match self {
            Self::Reference(id) => found.push(*id),
            Self::Array(items) => items.iter().for_each(|item| item.collect_references(found)),
            Self::Dictionary(dict) => dict.collect_references(found),
            Self::Integer(_) | Self::Name(_) => {}
        }
    }
}

impl From<i64> for PdfValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for PdfValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Dictionary> for PdfValue {
    fn from(dict: Dictionary) -> Self {
        Self::Dictionary(dict)
    }
}

/// An ordered key → value map. Keys are written in insertion order so output
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(String, PdfValue)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Dictionary::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PdfValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PdfValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PdfValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (key, value) in &self.entries {
            out.push(b' ');
            write_name(key, out);
            out.push(b' ');
            value.write_to(out);
        }
        out.extend_from_slice(b" >>");
    }

    /// Every object number referenced anywhere inside this dictionary.
    pub fn references(&self) -> Vec<ObjectId> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references(&self, found: &mut Vec<ObjectId>) {
        for (_, value) in &self.entries {
            value.collect_references(found);
        }
    }
}

/// Role of an object in the report's object graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Catalog,
    PageTree,
    Page,
    ContentStream,
    Font,
    Image,
}

impl ObjectKind {
    /// Only content streams and images carry a payload.
    pub fn carries_payload(&self) -> bool {
        matches!(self, Self::ContentStream | Self::Image)
    }
}

/// One numbered object: a dictionary and, for streams, its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentObject {
    id: ObjectId,
    kind: ObjectKind,
    dict: Dictionary,
    payload: Option<Vec<u8>>,
}

impl DocumentObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

/// A validated object graph: ids run `1..=n` in order, and every reference
/// names an object in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    objects: Vec<DocumentObject>,
    root: ObjectId,
}

impl Document {
    pub fn objects(&self) -> &[DocumentObject] {
        &self.objects
    }

    /// Object number of the catalog.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn get(&self, id: ObjectId) -> Option<&DocumentObject> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find(&self, kind: ObjectKind) -> Option<&DocumentObject> {
        self.objects.iter().find(|object| object.kind == kind)
    }
}

/// Assembles a [`Document`].
///
/// Object numbers come from [`DocumentBuilder::reserve`], which increments the
/// builder's own counter, so forward references (a page naming its content
/// stream before the stream exists) are taken from reserved numbers.
#[derive(Debug)]
pub struct DocumentBuilder {
    next_id: ObjectId,
    slots: Vec<Option<DocumentObject>>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            slots: Vec::new(),
        }
    }

    /// Claim the next object number.
    pub fn reserve(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(None);
        id
    }

    /// Reserve a number and fill it with a plain dictionary object.
    pub fn add(&mut self, kind: ObjectKind, dict: Dictionary) -> Result<ObjectId> {
        let id = self.reserve();
        self.insert(id, kind, dict)?;
        Ok(id)
    }

    /// Fill a reserved number with a plain dictionary object.
    pub fn insert(&mut self, id: ObjectId, kind: ObjectKind, dict: Dictionary) -> Result<()> {
        if kind.carries_payload() {
            return Err(ReportError::Invariant(format!(
                "{kind:?} object {id} needs a payload"
            )));
        }
        self.fill(DocumentObject {
            id,
            kind,
            dict,
            payload: None,
        })
    }

    /// Fill a reserved number with a stream object. `/Length` is set from the
    /// payload so the declared length always equals the bytes written.
    pub fn insert_stream(
        &mut self,
        id: ObjectId,
        kind: ObjectKind,
        mut dict: Dictionary,
        payload: Vec<u8>,
    ) -> Result<()> {
        if !kind.carries_payload() {
            return Err(ReportError::Invariant(format!(
                "{kind:?} object {id} cannot carry a payload"
            )));
        }
        let length = i64::try_from(payload.len())
            .map_err(|_| ReportError::Invariant(format!("payload of object {id} is too large")))?;
        dict.set("Length", length);
        self.fill(DocumentObject {
            id,
            kind,
            dict,
            payload: Some(payload),
        })
    }

    fn fill(&mut self, object: DocumentObject) -> Result<()> {
        let id = object.id;
        let slot = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.slots.get_mut(index))
            .ok_or_else(|| ReportError::Invariant(format!("object {id} was never reserved")))?;
        if slot.is_some() {
            return Err(ReportError::Invariant(format!("object {id} filled twice")));
        }
        *slot = Some(object);
        Ok(())
    }

    /// Check the graph and freeze it. `root` must be a catalog.
    pub fn finish(self, root: ObjectId) -> Result<Document> {
        let mut objects = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(object) => objects.push(object),
                None => {
                    return Err(ReportError::Invariant(format!(
                        "object {} reserved but never filled",
                        index + 1
                    )));
                }
            }
        }

        let known: HashSet<ObjectId> = objects.iter().map(|object| object.id).collect();
        for object in &objects {
            if let Some(missing) = object
                .dict
                .references()
                .into_iter()
                .find(|target| !known.contains(target))
            {
                return Err(ReportError::Invariant(format!(
                    "object {} references missing object {}",
                    object.id, missing
                )));
            }
        }

        let document = Document { objects, root };
        match document.get(root) {
            Some(object) if object.kind == ObjectKind::Catalog => Ok(document),
            _ => Err(ReportError::Invariant(format!(
                "root {root} is not a catalog object"
            ))),
        }
    }
}

/// Write `/name`, escaping bytes outside the regular-character set as `#xx`.
fn write_name(name: &str, out: &mut Vec<u8>) {
    out.push(b'/');
    for &byte in name.as_bytes() {
        let regular = (0x21..=0x7E).contains(&byte)
            && !matches!(
                byte,
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
            );
        if regular {
            out.push(byte);
        } else {
            out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: &PdfValue) -> String {
        let mut out = Vec::new();
        value.write_to(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn values_render_as_pdf_syntax() {
        let dict = Dictionary::new()
            .with("Type", PdfValue::name("Page"))
            .with(
                "MediaBox",
                PdfValue::Array(vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()]),
            )
            .with("Parent", PdfValue::Reference(2));
        assert_eq!(
            render(&dict.into()),
            "<< /Type /Page /MediaBox [0 0 612 792] /Parent 2 0 R >>"
        );
    }

    #[test]
    fn names_escape_delimiters() {
        assert_eq!(render(&PdfValue::name("A B#")), "/A#20B#23");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut dict = Dictionary::new().with("A", 1i64).with("B", 2i64);
        dict.set("A", 3i64);
        let keys: Vec<&str> = dict.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(dict.get("A"), Some(&PdfValue::Integer(3)));
    }

    #[test]
    fn reserve_counts_from_one() {
        let mut builder = DocumentBuilder::new();
        assert_eq!(builder.reserve(), 1);
        assert_eq!(builder.reserve(), 2);
        assert_eq!(builder.reserve(), 3);
    }

    #[test]
    fn stream_length_comes_from_payload() {
        let mut builder = DocumentBuilder::new();
        let catalog = builder.reserve();
        let stream = builder.reserve();
        builder
            .insert(catalog, ObjectKind::Catalog, Dictionary::new())
            .unwrap();
        builder
            .insert_stream(
                stream,
                ObjectKind::ContentStream,
                Dictionary::new().with("Length", 999i64),
                b"BT ET".to_vec(),
            )
            .unwrap();
        let document = builder.finish(catalog).unwrap();
        let object = document.get(stream).unwrap();
        assert_eq!(object.dict().get("Length"), Some(&PdfValue::Integer(5)));
        assert_eq!(object.payload(), Some(&b"BT ET"[..]));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut builder = DocumentBuilder::new();
        let catalog = builder
            .add(
                ObjectKind::Catalog,
                Dictionary::new().with("Pages", PdfValue::Reference(7)),
            )
            .unwrap();
        let err = builder.finish(catalog).unwrap_err();
        assert!(matches!(err, ReportError::Invariant(_)));
    }

    #[test]
    fn unfilled_reservation_is_rejected() {
        let mut builder = DocumentBuilder::new();
        let catalog = builder.add(ObjectKind::Catalog, Dictionary::new()).unwrap();
        builder.reserve();
        assert!(builder.finish(catalog).is_err());
    }

    #[test]
    fn double_fill_and_unreserved_fill_are_rejected() {
        let mut builder = DocumentBuilder::new();
        let id = builder.add(ObjectKind::Font, Dictionary::new()).unwrap();
        assert!(builder.insert(id, ObjectKind::Font, Dictionary::new()).is_err());
        assert!(builder.insert(9, ObjectKind::Font, Dictionary::new()).is_err());
    }

    #[test]
    fn payload_rules_follow_kind() {
        let mut builder = DocumentBuilder::new();
        let id = builder.reserve();
        assert!(builder.insert(id, ObjectKind::Image, Dictionary::new()).is_err());
        assert!(
            builder
                .insert_stream(id, ObjectKind::Page, Dictionary::new(), vec![1])
                .is_err()
        );
    }

    #[test]
    fn root_must_be_catalog() {
        let mut builder = DocumentBuilder::new();
        let font = builder.add(ObjectKind::Font, Dictionary::new()).unwrap();
        assert!(builder.finish(font).is_err());
    }
}
