//! Structured layout diagnostics.
//!
//! Elements that leave the padded area of their page are still drawn
//! exactly where the caller put them. The writer records an
//! [`OverflowWarning`] for each such element and returns the collected
//! list from [`crate::Document::finish`].

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Kind of drawing element a warning refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    /// A text run, identified by its full text
    Text {
        /// Text as passed to `add_text`
        text: String,
    },
    /// An image placement, identified by its resource name
    Image {
        /// Image resource name, e.g. `Im1`
        name: String,
    },
}

/// An element whose bounding box crosses the page padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverflowWarning {
    /// Zero-based index of the page in document order
    pub page_index: usize,
    /// Offending element
    pub element: ElementKind,
    /// Estimated bounding box of the element
    pub bbox: Rect,
}

impl std::fmt::Display for OverflowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match &self.element {
            ElementKind::Text { text } => format!("text '{}'", text),
            ElementKind::Image { name } => format!("image '{}'", name),
        };
        write!(
            f,
            "page {}: {} at ({:.1}, {:.1}) size {:.1}x{:.1} may be cut off",
            self.page_index + 1,
            what,
            self.bbox.x,
            self.bbox.y,
            self.bbox.width,
            self.bbox.height
        )
    }
}
