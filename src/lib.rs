// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Paper
//!
//! Build PDF documents from an in-memory model of pages, text, and images.
//!
//! ## Core Features
//!
//! - **Object model**: sequentially numbered indirect objects with forward references
//! - **Text**: greedy word wrap, alignment, backgrounds, underline, strike-through, links
//! - **Images**: raw or JPEG-compressed image XObjects, scaling, captions, links
//! - **Page numbers**: optional "Page N of M" footers added at save time
//! - **Diagnostics**: structured overflow warnings instead of console output
//! - **Serialization**: exact cross-reference offsets for any `io::Write` sink
//!
//! ## Quick Start
//!
//! ```
//! use pdf_paper::{Document, DocumentConfig, PageSpec, SaveOptions, TextAlign, TextStyle};
//!
//! # fn main() -> pdf_paper::Result<()> {
//! let mut doc = Document::with_config(DocumentConfig::new().with_title("Hello"));
//!
//! let page = doc.add_page(PageSpec::named("A4"))?;
//! page.add_text("Hello, World!", 297.64, 760.0, &TextStyle::new().align(TextAlign::Center))?;
//! page.add_text(
//!     "Long paragraphs wrap at the given width.",
//!     72.0,
//!     700.0,
//!     &TextStyle::new().size(12.0).max_width(200.0).color("navy"),
//! )?;
//!
//! let saved = doc.finish(SaveOptions::with_page_numbers())?;
//! assert!(saved.bytes.starts_with(b"%PDF-1.4"));
//! assert!(saved.warnings.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade (page creation, image embedding,
//! save phases at `debug`, overflow at `warn`). Install any logger to see them.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Core object model
pub mod geometry;
pub mod object;

// Styling and settings
pub mod color;
pub mod config;

// Layout diagnostics
pub mod diagnostics;

// PDF generation
pub mod writer;

pub use color::{Color, Rgb};
pub use config::DocumentConfig;
pub use diagnostics::{ElementKind, OverflowWarning};
pub use error::{Error, Result};
pub use geometry::Rect;
pub use object::{Object, ObjectRef};
pub use writer::{
    Document, FontVariant, ImageCodec, ImageHandle, Page, PageId, PageSpec, Placement, SaveOptions,
    SavedDocument, TextAlign, TextStyle,
};
