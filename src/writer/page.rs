//! Pages and the content-stream compiler.
//!
//! A [`Page`] only records draw operations. Nothing is laid out until the
//! owning document calls [`Page::compile`] during save, which turns the
//! operations into content-stream bytes, link annotations, and overflow
//! warnings.

use super::annotation_builder::LinkAnnotation;
use super::content_stream::ContentStreamBuilder;
use super::font_manager::{resolve_font, FontVariant};
use super::image_handler::{ImageHandle, ImageManager};
use super::text_layout::{TextAlign, TextLayout};
use crate::color::{Color, Rgb};
use crate::config::DocumentConfig;
use crate::diagnostics::{ElementKind, OverflowWarning};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::object::ObjectRef;

/// Stable handle to a page of a [`crate::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

impl PageId {
    /// Zero-based position of the page in the document.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Style of a text run.
///
/// ```
/// use pdf_paper::{TextAlign, TextStyle};
///
/// let style = TextStyle::new().size(14.0).bold().align(TextAlign::Center).color("#336699");
/// assert_eq!(style.size, 14.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Explicit font name; overrides `bold` and `italic`
    pub font: Option<String>,
    /// Use a bold face
    pub bold: bool,
    /// Use an oblique face
    pub italic: bool,
    /// Alignment relative to the anchor x
    pub align: TextAlign,
    /// Draw a bar under each line
    pub underline: bool,
    /// Draw a bar through each line
    pub strike: bool,
    /// Fill color behind each line
    pub background: Option<Color>,
    /// Wrap width; `None` keeps the text on one line
    pub max_width: Option<f32>,
    /// URI opened by clicking any line of the run
    pub link: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 24.0,
            color: Color::default(),
            font: None,
            bold: false,
            italic: false,
            align: TextAlign::Left,
            underline: false,
            strike: false,
            background: None,
            max_width: None,
            link: None,
        }
    }
}

impl TextStyle {
    /// Default style: 24pt black Helvetica, left aligned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font size.
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set the text color.
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Set an explicit font by name, e.g. `"Helvetica-Bold"`.
    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font = Some(name.into());
        self
    }

    /// Use a bold face.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Use an oblique face.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Underline every line.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Strike through every line.
    pub fn strike(mut self) -> Self {
        self.strike = true;
        self
    }

    /// Fill the area behind every line.
    pub fn background(mut self, color: impl Into<Color>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Wrap lines at `width` points.
    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Make every line a link to `uri`.
    pub fn link(mut self, uri: impl Into<String>) -> Self {
        self.link = Some(uri.into());
        self
    }
}

/// Where and how to draw an embedded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Target width; intrinsic width when `None`
    pub width: Option<f32>,
    /// Target height; intrinsic height when `None`
    pub height: Option<f32>,
    /// Multiplier applied to the target size
    pub scale: f32,
    /// Text centered below the image
    pub caption: Option<String>,
    /// URI opened by clicking the image
    pub link: Option<String>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            scale: 1.0,
            caption: None,
            link: None,
        }
    }
}

impl Placement {
    /// Place the image's bottom-left corner at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Set the target size.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the target width only.
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height only.
    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the scale factor.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Add a caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Make the image a link to `uri`.
    pub fn link(mut self, uri: impl Into<String>) -> Self {
        self.link = Some(uri.into());
        self
    }
}

#[derive(Debug, Clone)]
struct TextRun {
    text: String,
    x: f32,
    y: f32,
    size: f32,
    color: Rgb,
    variant: FontVariant,
    align: TextAlign,
    underline: bool,
    strike: bool,
    background: Option<Rgb>,
    max_width: Option<f32>,
    link: Option<String>,
}

#[derive(Debug, Clone)]
struct ImagePlacement {
    name: String,
    object: ObjectRef,
    placement: Placement,
}

#[derive(Debug, Clone)]
enum DrawOp {
    Text(TextRun),
    Image(ImagePlacement),
    /// Page-number footer; never checked against the padding
    Footer(TextRun),
}

/// Output of [`Page::compile`].
#[derive(Debug, Clone, Default)]
pub struct CompiledPage {
    /// Content-stream bytes
    pub content: Vec<u8>,
    /// Link annotations in draw order
    pub annotations: Vec<LinkAnnotation>,
    /// Elements that cross the page padding
    pub warnings: Vec<OverflowWarning>,
}

/// A page under construction.
#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    width: f32,
    height: f32,
    padding_h: f32,
    padding_v: f32,
    ops: Vec<DrawOp>,
}

impl Page {
    pub(crate) fn new(id: PageId, width: f32, height: f32, padding_h: f32, padding_v: f32) -> Self {
        Self {
            id,
            width,
            height,
            padding_h,
            padding_v,
            ops: Vec::new(),
        }
    }

    /// Handle for looking the page up again via [`crate::Document::page_mut`].
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Horizontal and vertical padding.
    pub fn padding(&self) -> (f32, f32) {
        (self.padding_h, self.padding_v)
    }

    /// The area inside the padding. Elements leaving it produce warnings.
    pub fn content_bounds(&self) -> Rect {
        Rect::new(
            self.padding_h,
            self.padding_v,
            self.width - 2.0 * self.padding_h,
            self.height - 2.0 * self.padding_v,
        )
    }

    /// Number of recorded draw operations.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Append a text run with its first baseline at `(x, y)`.
    ///
    /// Colors and the font are resolved here, so a bad style fails at this
    /// call rather than at save time.
    pub fn add_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        check_anchor(x, y)?;
        if !(style.size.is_finite() && style.size > 0.0) {
            return Err(Error::Configuration(format!("font size must be positive, got {}", style.size)));
        }
        if let Some(w) = style.max_width {
            if !(w.is_finite() && w > 0.0) {
                return Err(Error::Configuration(format!("max width must be positive, got {}", w)));
            }
        }

        let color = style.color.resolve()?;
        let background = style.background.as_ref().map(Color::resolve).transpose()?;
        let variant = resolve_font(style.font.as_deref(), style.bold, style.italic)?;

        self.ops.push(DrawOp::Text(TextRun {
            text: text.to_string(),
            x,
            y,
            size: style.size,
            color,
            variant,
            align: style.align,
            underline: style.underline,
            strike: style.strike,
            background,
            max_width: style.max_width,
            link: style.link.clone(),
        }));
        Ok(())
    }

    /// Append an image placement.
    ///
    /// The handle is checked against the document's images at save time.
    pub fn add_image(&mut self, image: &ImageHandle, placement: Placement) -> Result<()> {
        check_anchor(placement.x, placement.y)?;
        if !(placement.scale.is_finite() && placement.scale > 0.0) {
            return Err(Error::Configuration(format!("image scale must be positive, got {}", placement.scale)));
        }
        for dim in [placement.width, placement.height].into_iter().flatten() {
            if !(dim.is_finite() && dim > 0.0) {
                return Err(Error::Configuration(format!("image size must be positive, got {}", dim)));
            }
        }

        self.ops.push(DrawOp::Image(ImagePlacement {
            name: image.name().to_string(),
            object: image.object_ref(),
            placement,
        }));
        Ok(())
    }

    /// Append a centered page-number footer.
    pub(crate) fn add_footer(&mut self, text: String, size: f32, baseline: f32) {
        self.ops.push(DrawOp::Footer(TextRun {
            text,
            x: self.width / 2.0,
            y: baseline,
            size,
            color: Rgb::BLACK,
            variant: FontVariant::Regular,
            align: TextAlign::Center,
            underline: false,
            strike: false,
            background: None,
            max_width: None,
            link: None,
        }));
    }

    /// Compile the draw operations into a content stream.
    ///
    /// `page_index` is only used to label warnings. Fails with
    /// [`Error::DanglingReference`] when a placement names an image that is
    /// not in `images`.
    pub fn compile(&self, images: &ImageManager, config: &DocumentConfig, page_index: usize) -> Result<CompiledPage> {
        let layout = TextLayout::new(config.line_spacing);
        let bounds = self.content_bounds();
        let mut cs = ContentStreamBuilder::new();
        let mut out = CompiledPage::default();

        for op in &self.ops {
            let (bbox, element) = match op {
                DrawOp::Text(run) => {
                    let bbox = compile_text(&mut cs, &layout, run, &mut out.annotations);
                    (bbox, ElementKind::Text { text: run.text.clone() })
                },
                DrawOp::Footer(run) => {
                    compile_text(&mut cs, &layout, run, &mut out.annotations);
                    continue;
                },
                DrawOp::Image(image) => {
                    let bbox = self.compile_image(&mut cs, images, config, image, &mut out.annotations)?;
                    (bbox, ElementKind::Image { name: image.name.clone() })
                },
            };

            if !bbox.is_within(&bounds) {
                let warning = OverflowWarning {
                    page_index,
                    element,
                    bbox,
                };
                log::warn!("{}", warning);
                out.warnings.push(warning);
            }
        }

        out.content = cs.build()?;
        Ok(out)
    }

    fn compile_image(
        &self,
        cs: &mut ContentStreamBuilder,
        images: &ImageManager,
        config: &DocumentConfig,
        image: &ImagePlacement,
        annotations: &mut Vec<LinkAnnotation>,
    ) -> Result<Rect> {
        let embedded = images
            .get(&image.name)
            .filter(|embedded| embedded.object == image.object)
            .ok_or_else(|| {
                Error::DanglingReference(format!(
                    "image '{}' ({}) is not embedded in this document",
                    image.name, image.object
                ))
            })?;

        let p = &image.placement;
        let width = p.width.unwrap_or(embedded.width as f32) * p.scale;
        let height = p.height.unwrap_or(embedded.height as f32) * p.scale;
        cs.draw_image(&image.name, p.x, p.y, width, height);
        let rect = Rect::new(p.x, p.y, width, height);

        if let Some(caption) = &p.caption {
            let caption_width = FontVariant::Regular.text_width(caption, config.caption_size);
            cs.fill_color(Rgb::BLACK);
            cs.text_line(
                FontVariant::Regular.resource_name(),
                config.caption_size,
                p.x + width / 2.0 - caption_width / 2.0,
                p.y - config.caption_gap,
                caption,
            );
        }

        if let Some(uri) = &p.link {
            annotations.push(LinkAnnotation::uri(rect, uri.clone()));
        }

        Ok(rect)
    }
}

/// Emit one text run and return the union of its line boxes.
fn compile_text(
    cs: &mut ContentStreamBuilder,
    layout: &TextLayout,
    run: &TextRun,
    annotations: &mut Vec<LinkAnnotation>,
) -> Rect {
    let lines = layout.layout(&run.text, run.x, run.y, run.max_width, run.variant, run.size, run.align);
    let thickness = (run.size / 20.0).max(0.5);
    let mut union: Option<Rect> = None;

    for line in &lines {
        let bbox = line.bbox();

        // Background goes first so the glyphs paint over it
        if let Some(background) = run.background {
            cs.fill_color(background);
            cs.fill_rect(bbox.x, bbox.y, bbox.width, bbox.height);
        }

        cs.fill_color(run.color);
        cs.text_line(run.variant.resource_name(), run.size, line.x, line.y, &line.text);

        if run.underline {
            cs.fill_rect(line.x, line.y - 0.15 * run.size, line.width, thickness);
        }
        if run.strike {
            cs.fill_rect(line.x, line.y + 0.3 * run.size, line.width, thickness);
        }

        if let Some(uri) = &run.link {
            annotations.push(LinkAnnotation::uri(bbox, uri.clone()));
        }

        union = Some(match union {
            Some(u) => u.union(&bbox),
            None => bbox,
        });
    }

    // layout never returns an empty line list
    union.unwrap_or_else(|| Rect::new(run.x, run.y, 0.0, 0.0))
}

fn check_anchor(x: f32, y: f32) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(Error::Configuration(format!("position must be finite, got ({}, {})", x, y)))
    }
}
