//! Link annotations for PDF generation.
//!
//! Annotations are written per ISO 32000-1 Section 12.5. The only kind this
//! writer produces is a URI link over a rectangle of the page.

use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};

/// A link annotation opening a URI.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Bounding rectangle (in page coordinates)
    pub rect: Rect,
    /// Target URI
    pub uri: String,
}

impl LinkAnnotation {
    /// Create a new link annotation with a URI action.
    pub fn uri(rect: Rect, uri: impl Into<String>) -> Self {
        Self {
            rect,
            uri: uri.into(),
        }
    }

    /// Build the annotation dictionary.
    ///
    /// `page` is the page the annotation belongs to, written as `/P`.
    pub fn build(&self, page: ObjectRef) -> Object {
        let (x0, y0, x1, y1) = self.rect.corners();
        Object::dict(vec![
            ("Type", Object::name("Annot")),
            ("Subtype", Object::name("Link")),
            ("Rect", Object::rect(x0, y0, x1, y1)),
            ("P", Object::Reference(page)),
            // No visible border
            (
                "Border",
                Object::Array(vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)]),
            ),
            (
                "A",
                Object::dict(vec![("S", Object::name("URI")), ("URI", Object::string(&self.uri))]),
            ),
        ])
    }
}
