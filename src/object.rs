//! PDF object types.
//!
//! The in-memory form of everything the writer emits: dictionaries,
//! streams, and indirect references. Serialization lives in
//! [`crate::writer::ObjectSerializer`].

use indexmap::IndexMap;

/// Insertion-ordered dictionary. Keys are written in the order they were inserted.
pub type Dict = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (written with a leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dict),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
///
/// Generation is always 0 for freshly written documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number (1-based)
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create a String object from a Rust string.
    pub fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec())
    }

    /// Create a Dictionary object from key/value pairs, keeping their order.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Create a Reference object with generation 0.
    pub fn reference(r: ObjectRef) -> Object {
        Object::Reference(r)
    }

    /// Create a Real object from a page-space coordinate.
    ///
    /// Rounded to 4 decimals so f32 noise (595.28 → 595.2800293) stays out of the file.
    pub fn real(v: f32) -> Object {
        Object::Real(round_coord(v))
    }

    /// Create a rectangle array `[llx lly urx ury]` from its corners.
    pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Object {
        Object::Array(vec![Object::real(x0), Object::real(y0), Object::real(x1), Object::real(y1)])
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Collect every indirect reference reachable inside this object.
    pub fn references(&self) -> Vec<ObjectRef> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<ObjectRef>) {
        match self {
            Object::Reference(r) => out.push(*r),
            Object::Array(items) => items.iter().for_each(|o| o.collect_references(out)),
            Object::Dictionary(dict) | Object::Stream { dict, .. } => {
                dict.values().for_each(|o| o.collect_references(out))
            },
            _ => {},
        }
    }
}

/// Widen a page-space value to f64, rounded to 4 decimals.
pub(crate) fn round_coord(v: f32) -> f64 {
    (v as f64 * 10_000.0).round() / 10_000.0
}
