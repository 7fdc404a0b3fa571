//! PDF writing module.
//!
//! This module turns pages of text runs and image placements into a
//! complete PDF file.
//!
//! ## Architecture
//!
//! ```text
//! Page::add_text / Page::add_image
//!     ↓
//! [Page] (ordered draw operations)
//!     ↓  Document::finish / write_to / save
//! [TextLayout] + [ContentStreamBuilder] (draw ops → content stream bytes)
//!     ↓
//! [ObjectTable] (fonts, resources, pages, annotations, catalog)
//!     ↓
//! [ObjectSerializer] (objects → bytes, offsets → xref + trailer)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pdf_paper::writer::{Document, PageSpec, Placement, SaveOptions, TextStyle};
//!
//! # fn main() -> pdf_paper::Result<()> {
//! let mut doc = Document::new();
//! let logo = doc.embed_image("logo.png", true)?;
//!
//! let page = doc.add_page(PageSpec::named("Letter"))?;
//! page.add_text("Quarterly report", 72.0, 720.0, &TextStyle::new().bold())?;
//! page.add_image(&logo, Placement::at(72.0, 500.0).scale(0.5).caption("Figure 1"))?;
//!
//! let warnings = doc.save("report.pdf", SaveOptions::with_page_numbers())?;
//! for warning in &warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok(())
//! # }
//! ```

mod annotation_builder;
mod content_stream;
mod document;
mod font_manager;
mod image_handler;
mod object_serializer;
mod object_table;
mod page;
mod text_layout;

pub use annotation_builder::LinkAnnotation;
pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use document::{Document, Orientation, PageSize, PageSpec, SaveOptions, SavedDocument};
pub use font_manager::{resolve_font, FontRegistry, FontVariant};
pub use image_handler::{
    ColorSpace, DecodedImage, EmbeddedImage, ImageCodec, ImageCrateCodec, ImageData, ImageFormat,
    ImageHandle, ImageManager,
};
pub use object_serializer::ObjectSerializer;
pub use object_table::ObjectTable;
pub use page::{CompiledPage, Page, PageId, Placement, TextStyle};
pub use text_layout::{estimated_width, wrap, LaidOutLine, TextAlign, TextLayout};
