//! PDF content stream builder.
//!
//! Builds PDF content streams containing graphics and text operators
//! according to PDF specification ISO 32000-1:2008 Section 8-9.

use super::object_serializer::{write_escaped, write_real};
use crate::color::Rgb;
use crate::error::Result;
use crate::object::round_coord;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Move text position (Td)
    MoveText(f32, f32),
    /// Show text (Tj), written WinAnsi encoded
    ShowText(String),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Fill (f)
    Fill,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
///
/// Creates the byte sequence for a PDF content stream from operations.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Show one line of text in its own text object.
    ///
    /// `font` is the resource name the page's font dictionary maps.
    pub fn text_line(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetFont(font.to_string(), size));
        self.op(ContentStreamOp::MoveText(x, y));
        self.op(ContentStreamOp::ShowText(text.to_string()));
        self.end_text()
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: Rgb) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    /// Fill a rectangle with the current fill color.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::Rectangle(x, y, width, height));
        self.op(ContentStreamOp::Fill)
    }

    /// Draw an image XObject at the specified position and size.
    ///
    /// The image's unit square is mapped onto `(x, y, width, height)`.
    pub fn draw_image(&mut self, resource_id: &str, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.end_text();

        self.op(ContentStreamOp::SaveState);
        self.op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y));
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.op(ContentStreamOp::RestoreState);
        self
    }

    /// Build the content stream bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                writeln!(buf)?;
            }
            self.write_op(&mut buf, op)?;
        }

        Ok(buf)
    }

    /// Write a single operation to the buffer.
    fn write_op<W: Write>(&self, w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
        match op {
            ContentStreamOp::SaveState => write!(w, "q"),
            ContentStreamOp::RestoreState => write!(w, "Q"),
            ContentStreamOp::Transform(a, b, c, d, e, f) => {
                write_numbers(w, &[*a, *b, *c, *d, *e, *f])?;
                write!(w, " cm")
            },
            ContentStreamOp::BeginText => write!(w, "BT"),
            ContentStreamOp::EndText => write!(w, "ET"),
            ContentStreamOp::SetFont(name, size) => {
                write!(w, "/{} ", name)?;
                write_numbers(w, &[*size])?;
                write!(w, " Tf")
            },
            ContentStreamOp::MoveText(tx, ty) => {
                write_numbers(w, &[*tx, *ty])?;
                write!(w, " Td")
            },
            ContentStreamOp::ShowText(text) => {
                write!(w, "(")?;
                write_escaped(w, &encode_winansi(text))?;
                write!(w, ") Tj")
            },
            ContentStreamOp::SetFillColorRGB(r, g, b) => {
                write_numbers(w, &[*r, *g, *b])?;
                write!(w, " rg")
            },
            ContentStreamOp::Rectangle(x, y, w_val, h) => {
                write_numbers(w, &[*x, *y, *w_val, *h])?;
                write!(w, " re")
            },
            ContentStreamOp::Fill => write!(w, "f"),
            ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
        }
    }
}

fn write_numbers<W: Write>(w: &mut W, values: &[f32]) -> std::io::Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(w, " ")?;
        }
        write_real(w, round_coord(*v))?;
    }
    Ok(())
}

/// Encode text in WinAnsiEncoding, the encoding declared by the font
/// dictionaries.
///
/// Characters with no code in WinAnsi become `?`. That includes the C1
/// controls U+0080..U+009F, whose byte positions WinAnsi uses for other
/// glyphs.
pub(crate) fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| unicode_to_winansi(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }
    match codepoint {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91), // curly quotes
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}
