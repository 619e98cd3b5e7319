// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Architecture document parsing and element extraction
//!
//! LikeC4 exports place element definitions either directly under
//! `elements` or under `specification.elements`. The location is resolved
//! once into a [`DocumentShape`]; extraction then walks that mapping in
//! insertion order.

use crate::types::{Element, Link, Warning};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A parsed architecture document
#[derive(Debug, Clone, PartialEq)]
pub struct ArchitectureDocument {
    root: Value,
}

impl ArchitectureDocument {
    /// Wrap an already-parsed JSON value
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a JSON byte buffer
    ///
    /// # Errors
    ///
    /// Returns the parser error when the buffer is not valid JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self::from_value)
    }

    /// The underlying JSON value
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve where the element definitions live
    #[must_use]
    pub fn shape(&self) -> DocumentShape<'_> {
        DocumentShape::resolve(&self.root)
    }
}

/// Location of the element mapping inside a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentShape<'a> {
    /// `{"elements": {...}}`
    ElementsAtRoot(&'a Map<String, Value>),
    /// `{"specification": {"elements": {...}}}`
    ElementsUnderSpecification(&'a Map<String, Value>),
    /// Neither location holds a mapping
    Unrecognized,
}

impl<'a> DocumentShape<'a> {
    fn resolve(root: &'a Value) -> Self {
        if let Some(elements) = root.get("elements").and_then(Value::as_object) {
            return Self::ElementsAtRoot(elements);
        }
        match root
            .get("specification")
            .and_then(|spec| spec.get("elements"))
            .and_then(Value::as_object)
        {
            Some(elements) => Self::ElementsUnderSpecification(elements),
            None => Self::Unrecognized,
        }
    }

    /// The element mapping, if recognized
    #[must_use]
    pub fn elements(&self) -> Option<&'a Map<String, Value>> {
        match self {
            Self::ElementsAtRoot(map) | Self::ElementsUnderSpecification(map) => Some(map),
            Self::Unrecognized => None,
        }
    }

    /// Dotted path of the element mapping
    #[must_use]
    pub fn location(&self) -> &'static str {
        match self {
            Self::ElementsAtRoot(_) => "elements",
            Self::ElementsUnderSpecification(_) => "specification.elements",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Extract the elements whose `kind` is one of `target_kinds`.
///
/// Unrecognized documents yield an empty vector. Output order follows the
/// document's element mapping.
pub fn extract<K: AsRef<str>>(doc: &ArchitectureDocument, target_kinds: &[K]) -> Vec<Element> {
    let Some(entries) = doc.shape().elements() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(id, value)| {
            let entry = value.as_object()?;
            let kind = entry.get("kind")?.as_str()?;
            if !target_kinds.iter().any(|target| target.as_ref() == kind) {
                return None;
            }
            Some(element_from(id, kind, entry))
        })
        .collect()
}

/// [`extract`], plus the warning a caller should surface when nothing came out
pub fn extract_with_warning<K: AsRef<str>>(
    doc: &ArchitectureDocument,
    target_kinds: &[K],
) -> (Vec<Element>, Option<Warning>) {
    let elements = extract(doc, target_kinds);
    let warning = match doc.shape() {
        DocumentShape::Unrecognized => Some(Warning::UnrecognizedDocument),
        _ if elements.is_empty() => Some(Warning::NoTargetElements),
        _ => None,
    };
    (elements, warning)
}

fn element_from(id: &str, kind: &str, entry: &Map<String, Value>) -> Element {
    let text = |field: &str| {
        entry
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let links = entry
        .get("links")
        .and_then(Value::as_array)
        .map(|links| links.iter().filter_map(link_from).collect())
        .unwrap_or_default();

    Element {
        id: id.to_string(),
        kind: kind.to_string(),
        title: text("title"),
        technology: text("technology"),
        description: text("description"),
        links,
    }
}

fn link_from(value: &Value) -> Option<Link> {
    let link = value.as_object()?;
    let title = link.get("title")?.as_str()?;
    Some(Link {
        title: title.to_string(),
        url: link.get("url").and_then(Value::as_str).map(String::from),
    })
}

/// Structural summary of a document, for diagnosing empty extractions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInspection {
    /// Keys of the top-level object
    pub top_level_keys: Vec<String>,
    /// Resolved element location
    pub location: &'static str,
    /// Number of entries at that location
    pub entry_count: usize,
    /// Entries per `kind` value (entries without a string kind are skipped)
    pub kind_counts: BTreeMap<String, usize>,
}

/// Describe the structure of a document
#[must_use]
pub fn inspect(doc: &ArchitectureDocument) -> DocumentInspection {
    let shape = doc.shape();
    let top_level_keys = doc
        .root()
        .as_object()
        .map(|root| root.keys().cloned().collect())
        .unwrap_or_default();

    let mut kind_counts = BTreeMap::new();
    let entries = shape.elements();
    for entry in entries.into_iter().flat_map(|map| map.values()) {
        if let Some(kind) = entry.get("kind").and_then(Value::as_str) {
            *kind_counts.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    DocumentInspection {
        top_level_keys,
        location: shape.location(),
        entry_count: entries.map_or(0, Map::len),
        kind_counts,
    }
}
