//! Document assembly and serialization.
//!
//! A [`Document`] collects pages and images, then serializes everything in
//! one consuming pass: page numbers are appended, pages are compiled, the
//! remaining objects are allocated, and the file is written with its
//! cross-reference table and trailer.

use super::font_manager::FontRegistry;
use super::image_handler::{ImageCodec, ImageCrateCodec, ImageData, ImageHandle, ImageManager};
use super::object_serializer::ObjectSerializer;
use super::object_table::ObjectTable;
use super::page::{Page, PageId};
use crate::config::DocumentConfig;
use crate::diagnostics::OverflowWarning;
use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};
use std::io::Write;
use std::path::Path;

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Standard page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// ISO A3 (297 × 420 mm)
    A3,
    /// ISO A4 (210 × 297 mm)
    A4,
    /// US Letter (8.5 × 11 in)
    Letter,
    /// US Legal (8.5 × 14 in)
    Legal,
}

impl PageSize {
    /// Look up a size by name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "A3" => Ok(PageSize::A3),
            "A4" => Ok(PageSize::A4),
            "LETTER" => Ok(PageSize::Letter),
            "LEGAL" => Ok(PageSize::Legal),
            _ => Err(Error::Configuration(format!("unknown page size '{}'", name))),
        }
    }

    /// Portrait dimensions in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Height ≥ width (default)
    #[default]
    Portrait,
    /// Width and height swapped
    Landscape,
}

impl Orientation {
    /// Parse `"portrait"` or `"landscape"`, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(Error::Configuration(format!("unknown orientation '{}'", name))),
        }
    }
}

/// Geometry of a page to add.
///
/// Explicit dimensions win over the named size and orientation.
///
/// ```
/// use pdf_paper::PageSpec;
///
/// let spec = PageSpec::named("letter").landscape().padding(36.0, 36.0);
/// let custom = PageSpec::new().size(200.0, 200.0);
/// # let _ = (spec, custom);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    name: String,
    orientation: String,
    dimensions: Option<(f32, f32)>,
    padding: Option<(f32, f32)>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            name: "A4".to_string(),
            orientation: "portrait".to_string(),
            dimensions: None,
            padding: None,
        }
    }
}

impl PageSpec {
    /// A4 portrait with the document's default padding.
    pub fn new() -> Self {
        Self::default()
    }

    /// A named size: A3, A4, Letter, or Legal.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the orientation by name: `"portrait"` or `"landscape"`.
    pub fn orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = orientation.into();
        self
    }

    /// Landscape orientation.
    pub fn landscape(self) -> Self {
        self.orientation("landscape")
    }

    /// Explicit width and height in points.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Horizontal and vertical padding in points.
    pub fn padding(mut self, horizontal: f32, vertical: f32) -> Self {
        self.padding = Some((horizontal, vertical));
        self
    }

    fn resolve_dimensions(&self) -> Result<(f32, f32)> {
        let (width, height) = match self.dimensions {
            Some(dims) => dims,
            None => {
                let (w, h) = PageSize::from_name(&self.name)?.dimensions();
                match Orientation::from_name(&self.orientation)? {
                    Orientation::Portrait => (w, h),
                    Orientation::Landscape => (h, w),
                }
            },
        };
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::Configuration(format!("invalid page size {}x{}", width, height)));
        }
        Ok((width, height))
    }
}

/// Options for the final save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Append a centered "Page N of M" footer to every page
    pub show_page_numbers: bool,
}

impl SaveOptions {
    /// Save with page numbers.
    pub fn with_page_numbers() -> Self {
        Self {
            show_page_numbers: true,
        }
    }
}

/// Serialized document plus the layout warnings produced while compiling it.
#[derive(Debug, Clone)]
pub struct SavedDocument {
    /// Complete file contents
    pub bytes: Vec<u8>,
    /// Overflow warnings in page order
    pub warnings: Vec<OverflowWarning>,
}

/// A document under construction.
///
/// # Example
///
/// ```
/// use pdf_paper::{Document, PageSpec, SaveOptions, TextStyle};
///
/// let mut doc = Document::new();
/// let page = doc.add_page(PageSpec::named("A4"))?;
/// page.add_text("Hello, World!", 72.0, 720.0, &TextStyle::new().size(18.0))?;
/// let saved = doc.finish(SaveOptions::default())?;
/// assert!(saved.bytes.starts_with(b"%PDF-1.4"));
/// # Ok::<(), pdf_paper::Error>(())
/// ```
pub struct Document {
    config: DocumentConfig,
    codec: Box<dyn ImageCodec>,
    objects: ObjectTable,
    images: ImageManager,
    pages: Vec<Page>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("config", &self.config)
            .field("objects", &self.objects.len())
            .field("images", &self.images.len())
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create an empty document.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self::with_codec(config, Box::new(ImageCrateCodec::default()))
    }

    /// Create an empty document that decodes images with `codec`.
    pub fn with_codec(config: DocumentConfig, codec: Box<dyn ImageCodec>) -> Self {
        Self {
            config,
            codec,
            objects: ObjectTable::new(),
            images: ImageManager::new(),
            pages: Vec::new(),
        }
    }

    /// Document configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Append a raw object and return its reference.
    ///
    /// Numbers are assigned sequentially from 1. The body is not validated.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        self.objects.add(obj)
    }

    /// Number of objects allocated so far.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page at the end of the document.
    pub fn add_page(&mut self, spec: PageSpec) -> Result<&mut Page> {
        let (width, height) = spec.resolve_dimensions()?;
        let (padding_h, padding_v) = spec.padding.unwrap_or(self.config.default_padding);
        if !(padding_h.is_finite() && padding_v.is_finite() && padding_h >= 0.0 && padding_v >= 0.0) {
            return Err(Error::Configuration(format!(
                "padding must be finite and not negative, got ({}, {})",
                padding_h, padding_v
            )));
        }

        let id = PageId(self.pages.len());
        log::debug!("Adding page {} ({}x{} pt)", id.index() + 1, width, height);
        self.pages.push(Page::new(id, width, height, padding_h, padding_v));
        let index = self.pages.len() - 1;
        Ok(&mut self.pages[index])
    }

    /// Access a page added earlier.
    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(id.0)
    }

    /// Decode the image at `path` and write it as an image object.
    ///
    /// With `compress`, the codec's compressed encoding is stored with a
    /// DCTDecode filter; otherwise the raw samples are stored. A failed call
    /// leaves the object table untouched.
    pub fn embed_image(&mut self, path: impl AsRef<Path>, compress: bool) -> Result<ImageHandle> {
        let path = path.as_ref();
        let decoded = self.codec.decode(path)?;
        let data = ImageData::from_decoded(decoded, self.codec.as_ref(), compress)?;

        let object = self.objects.reserve();
        let handle = self.images.register(object, &data);
        self.objects.fill(object, data.into_xobject())?;

        log::debug!(
            "Embedded {} as {} ({}x{}, {}) in object {}",
            path.display(),
            handle.name(),
            handle.width(),
            handle.height(),
            if compress { "DCT" } else { "raw" },
            object.id
        );
        Ok(handle)
    }

    /// Serialize the document into memory.
    pub fn finish(self, options: SaveOptions) -> Result<SavedDocument> {
        let mut bytes = Vec::new();
        let warnings = self.write_to(&mut bytes, options)?;
        Ok(SavedDocument { bytes, warnings })
    }

    /// Serialize the document into `sink`.
    ///
    /// Nothing is written unless every page compiles and every object
    /// reference resolves.
    pub fn write_to<W: Write>(self, sink: W, options: SaveOptions) -> Result<Vec<OverflowWarning>> {
        let assembled = self.assemble(options)?;
        assembled.write(sink)?;
        Ok(assembled.warnings)
    }

    /// Serialize the document to a file at `path`.
    ///
    /// The file is only created once the document has been assembled.
    pub fn save(self, path: impl AsRef<Path>, options: SaveOptions) -> Result<Vec<OverflowWarning>> {
        let assembled = self.assemble(options)?;
        let file = std::fs::File::create(path.as_ref())?;
        assembled.write(std::io::BufWriter::new(file))?;
        log::debug!("Saved {}", path.as_ref().display());
        Ok(assembled.warnings)
    }

    /// Compile every page and allocate the remaining objects.
    fn assemble(mut self, options: SaveOptions) -> Result<Assembled> {
        self.config.validate()?;
        let total = self.pages.len();
        if options.show_page_numbers {
            for (i, page) in self.pages.iter_mut().enumerate() {
                page.add_footer(
                    format!("Page {} of {}", i + 1, total),
                    self.config.page_number_size,
                    self.config.page_number_baseline,
                );
            }
        }

        let compiled = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| page.compile(&self.images, &self.config, i))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Compiled {} pages", compiled.len());

        let mut objects = self.objects;
        let fonts = FontRegistry::register_all(&mut objects);
        let resources = objects.reserve();
        let page_tree = objects.reserve();

        let mut kids = Vec::with_capacity(total);
        let mut warnings = Vec::new();
        for (page, compiled) in self.pages.iter().zip(compiled) {
            let content = if self.config.compress_content {
                let mut dict = Dict::new();
                dict.insert("Filter".to_string(), Object::name("FlateDecode"));
                Object::Stream {
                    dict,
                    data: bytes::Bytes::from(compress_data(&compiled.content)?),
                }
            } else {
                Object::Stream {
                    dict: Dict::new(),
                    data: bytes::Bytes::from(compiled.content),
                }
            };
            let content_ref = objects.add(content);
            let page_ref = objects.reserve();

            let annots: Vec<Object> = compiled
                .annotations
                .iter()
                .map(|annot| Object::Reference(objects.add(annot.build(page_ref))))
                .collect();

            let mut page_dict = Dict::new();
            page_dict.insert("Type".to_string(), Object::name("Page"));
            page_dict.insert("Parent".to_string(), Object::Reference(page_tree));
            page_dict.insert(
                "MediaBox".to_string(),
                Object::rect(0.0, 0.0, page.width(), page.height()),
            );
            page_dict.insert("Resources".to_string(), Object::Reference(resources));
            page_dict.insert("Contents".to_string(), Object::Reference(content_ref));
            if !annots.is_empty() {
                page_dict.insert("Annots".to_string(), Object::Array(annots));
            }
            objects.fill(page_ref, Object::Dictionary(page_dict))?;

            kids.push(Object::Reference(page_ref));
            warnings.extend(compiled.warnings);
        }

        let mut resource_dict = Dict::new();
        resource_dict.insert("Font".to_string(), fonts.resources());
        if !self.images.is_empty() {
            resource_dict.insert("XObject".to_string(), self.images.resources());
        }
        objects.fill(resources, Object::Dictionary(resource_dict))?;

        objects.fill(
            page_tree,
            Object::dict(vec![
                ("Type", Object::name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(total as i64)),
            ]),
        )?;

        let catalog = objects.add(Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(page_tree)),
        ]));

        let info = self
            .config
            .has_metadata()
            .then(|| objects.add(info_dict(&self.config)));

        // Fail before any byte is written
        objects.entries()?;

        log::debug!(
            "Assembled {} objects ({} images, {} DCT), {} overflow warnings",
            objects.len(),
            self.images.len(),
            self.images.compressed_count(),
            warnings.len()
        );

        Ok(Assembled {
            version: self.config.version,
            objects,
            catalog,
            info,
            warnings,
        })
    }
}

fn info_dict(config: &DocumentConfig) -> Object {
    let mut entries = Vec::new();
    if let Some(title) = &config.title {
        entries.push(("Title", Object::string(title)));
    }
    if let Some(author) = &config.author {
        entries.push(("Author", Object::string(author)));
    }
    if let Some(subject) = &config.subject {
        entries.push(("Subject", Object::string(subject)));
    }
    if let Some(creator) = &config.creator {
        entries.push(("Creator", Object::string(creator)));
    }
    Object::dict(entries)
}

/// A fully allocated document, ready to be written.
struct Assembled {
    version: String,
    objects: ObjectTable,
    catalog: ObjectRef,
    info: Option<ObjectRef>,
    warnings: Vec<OverflowWarning>,
}

impl Assembled {
    fn write<W: Write>(&self, sink: W) -> Result<()> {
        let serializer = ObjectSerializer::new();
        let mut output = CountingWriter::new(sink);

        // PDF Header
        writeln!(output, "%PDF-{}", self.version)?;
        // Binary marker (recommended for binary content)
        output.write_all(b"%\xE2\xE3\xCF\xD3\n")?;

        let entries = self.objects.entries()?;
        let mut offsets = Vec::with_capacity(entries.len());
        for (r, obj) in entries {
            offsets.push(output.position());
            serializer.write_indirect(&mut output, r.id, r.gen, obj)?;
        }

        let xref_start = output.position();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", offsets.len() + 1)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let mut trailer = vec![
            ("Size", Object::Integer(offsets.len() as i64 + 1)),
            ("Root", Object::Reference(self.catalog)),
        ];
        if let Some(info) = self.info {
            trailer.push(("Info", Object::Reference(info)));
        }

        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &Object::dict(trailer))?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        writeln!(output, "%%EOF")?;
        output.flush()?;
        Ok(())
    }
}

/// Writer adapter that tracks how many bytes have passed through it.
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn position(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::image_handler::tests::FixedCodec;
    use crate::writer::page::{Placement, TextStyle};
    use std::io::Read;

    fn doc_with_fixed_codec(config: DocumentConfig) -> Document {
        Document::with_codec(config, Box::new(FixedCodec::rgb(8, 4)))
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_page_size_resolution() {
        assert_eq!(PageSpec::named("a4").resolve_dimensions().unwrap(), (595.28, 841.89));
        assert_eq!(
            PageSpec::named("Letter").landscape().resolve_dimensions().unwrap(),
            (792.0, 612.0)
        );
        assert_eq!(
            PageSpec::named("nonsense").size(100.0, 50.0).resolve_dimensions().unwrap(),
            (100.0, 50.0)
        );
        assert!(matches!(
            PageSpec::named("B7").resolve_dimensions(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            PageSpec::named("A4").orientation("sideways").resolve_dimensions(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_add_page_uses_default_padding() {
        let config = DocumentConfig::new().with_default_padding(20.0, 30.0).unwrap();
        let mut doc = Document::with_config(config);
        let page = doc.add_page(PageSpec::new()).unwrap();
        assert_eq!(page.padding(), (20.0, 30.0));
        let id = page.id();
        let page = doc.add_page(PageSpec::new().padding(5.0, 5.0)).unwrap();
        assert_eq!(page.padding(), (5.0, 5.0));
        assert_eq!(doc.page_mut(id).unwrap().padding(), (20.0, 30.0));
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_add_object_is_sequential() {
        let mut doc = Document::new();
        assert_eq!(doc.add_object(Object::Integer(1)).id, 1);
        assert_eq!(doc.add_object(Object::Integer(2)).id, 2);
        assert_eq!(doc.object_count(), 2);
    }

    #[test]
    fn test_embed_image_assigns_names_and_objects() {
        let mut doc = doc_with_fixed_codec(DocumentConfig::default());
        let raw = doc.embed_image("a.png", false).unwrap();
        let dct = doc.embed_image("a.png", true).unwrap();
        assert_eq!(raw.name(), "Im1");
        assert_eq!(dct.name(), "Im2");
        assert_ne!(raw.object_ref(), dct.object_ref());
        assert_eq!((raw.width(), raw.height()), (8, 4));
        assert_eq!(doc.object_count(), 2);
    }

    #[test]
    fn test_embed_missing_leaves_table_unchanged() {
        let mut doc = doc_with_fixed_codec(DocumentConfig::default());
        doc.add_object(Object::Null);
        let err = doc.embed_image("missing.png", false).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
        assert_eq!(doc.object_count(), 1);
    }

    #[test]
    fn test_empty_document_layout() {
        let saved = Document::new().finish(SaveOptions::default()).unwrap();
        let text = as_text(&saved.bytes);
        assert!(text.starts_with("%PDF-1.4\n%"));
        // fonts + resources + page tree + catalog
        assert!(text.contains("xref\n0 8\n0000000000 65535 f \n"));
        assert!(text.contains("trailer\n<< /Size 8 /Root 7 0 R >>\nstartxref\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(saved.warnings.is_empty());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = doc_with_fixed_codec(DocumentConfig::default());
        let image = doc.embed_image("logo.png", false).unwrap();
        let page = doc.add_page(PageSpec::named("Letter")).unwrap();
        page.add_text("Hello", 72.0, 700.0, &TextStyle::new().size(12.0)).unwrap();
        page.add_image(&image, Placement::at(72.0, 400.0)).unwrap();

        let bytes = doc.finish(SaveOptions::default()).unwrap().bytes;
        let xref = bytes.windows(6).rposition(|w| w == b"\nxref\n").unwrap() + 1;
        // everything after the xref keyword is ASCII
        let tail = as_text(&bytes[xref..]);
        let entries: Vec<u64> = tail
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();

        assert!(!entries.is_empty());
        for (i, offset) in entries.iter().enumerate() {
            let marker = format!("{} 0 obj\n", i + 1);
            assert!(bytes[*offset as usize..].starts_with(marker.as_bytes()));
        }

        let startxref: usize = tail.lines().rev().nth(1).unwrap().parse().unwrap();
        assert_eq!(startxref, xref);
    }

    #[test]
    fn test_page_dict_shape() {
        let mut doc = Document::new();
        doc.add_page(PageSpec::new().size(200.0, 100.0)).unwrap();
        let text = as_text(&doc.finish(SaveOptions::default()).unwrap().bytes);
        // fonts 1-4, resources 5, page tree 6, content 7, page 8, catalog 9
        assert!(text.contains(
            "8 0 obj\n<< /Type /Page /Parent 6 0 R /MediaBox [0 0 200 100] /Resources 5 0 R /Contents 7 0 R >>"
        ));
        assert!(text.contains("6 0 obj\n<< /Type /Pages /Kids [8 0 R] /Count 1 >>"));
        assert!(text.contains("9 0 obj\n<< /Type /Catalog /Pages 6 0 R >>"));
    }

    #[test]
    fn test_page_numbers() {
        let mut doc = Document::new();
        for _ in 0..3 {
            doc.add_page(PageSpec::new()).unwrap();
        }
        let text = as_text(&doc.finish(SaveOptions::with_page_numbers()).unwrap().bytes);
        assert!(text.contains("(Page 1 of 3) Tj"));
        assert!(text.contains("(Page 2 of 3) Tj"));
        assert!(text.contains("(Page 3 of 3) Tj"));
    }

    #[test]
    fn test_link_annotation_objects() {
        let mut doc = Document::new();
        let page = doc.add_page(PageSpec::new().size(400.0, 400.0).padding(10.0, 10.0)).unwrap();
        let style = TextStyle::new().size(10.0).link("https://example.com");
        page.add_text("click", 50.0, 200.0, &style).unwrap();
        let text = as_text(&doc.finish(SaveOptions::default()).unwrap().bytes);
        // content 7, page 8 (reserved), annotation 9
        assert!(text.contains("/Annots [9 0 R]"));
        assert!(text.contains("9 0 obj\n<< /Type /Annot /Subtype /Link /Rect [50 198 75 208] /P 8 0 R"));
    }

    #[test]
    fn test_metadata_writes_info() {
        let config = DocumentConfig::new().with_title("Report").with_author("Ops");
        let text = as_text(&Document::with_config(config).finish(SaveOptions::default()).unwrap().bytes);
        assert!(text.contains("<< /Title (Report) /Author (Ops) >>"));
        assert!(text.contains("/Info 8 0 R"));
    }

    #[test]
    fn test_compressed_content_stream() {
        let config = DocumentConfig::new().with_compress_content(true);
        let mut doc = Document::with_config(config);
        doc.add_page(PageSpec::new())
            .unwrap()
            .add_text("squeezed", 72.0, 700.0, &TextStyle::new())
            .unwrap();
        let bytes = doc.finish(SaveOptions::default()).unwrap().bytes;

        let marker = b"<< /Filter /FlateDecode /Length ";
        let at = bytes.windows(marker.len()).position(|w| w == marker).unwrap() + marker.len();
        let digits = bytes[at..].iter().take_while(|b| b.is_ascii_digit()).count();
        let length: usize = as_text(&bytes[at..at + digits]).parse().unwrap();
        assert!(bytes[at + digits..].starts_with(b" >>\nstream\n"));

        let start = at + digits + b" >>\nstream\n".len();
        let data = &bytes[start..start + length];
        assert!(bytes[start + length..].starts_with(b"\nendstream"));

        let mut decoded = String::new();
        flate2::read::ZlibDecoder::new(data)
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "0 0 0 rg\nBT\n/Helvetica 24 Tf\n72 700 Td\n(squeezed) Tj\nET");
    }

    #[test]
    fn test_invalid_config_fails_before_writing() {
        let mut config = DocumentConfig::new();
        config.caption_size = 0.0;
        let mut sink = Vec::new();
        let err = Document::with_config(config).write_to(&mut sink, SaveOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_dangling_reference_writes_nothing() {
        let mut source = doc_with_fixed_codec(DocumentConfig::default());
        let handle = source.embed_image("a.png", false).unwrap();

        let mut doc = Document::new();
        doc.add_page(PageSpec::new())
            .unwrap()
            .add_image(&handle, Placement::at(100.0, 100.0))
            .unwrap();

        let mut sink = Vec::new();
        let err = doc.write_to(&mut sink, SaveOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DanglingReference(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_raw_object_with_bad_reference() {
        let mut doc = Document::new();
        doc.add_object(Object::Reference(ObjectRef::new(99, 0)));
        assert!(matches!(
            doc.finish(SaveOptions::default()),
            Err(Error::DanglingReference(_))
        ));
    }
}
