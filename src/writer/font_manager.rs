//! Font registry for PDF generation.
//!
//! Text is set in the Helvetica family of the PDF Base-14 fonts, so no
//! font program is embedded. Widths are estimated from an average glyph
//! width ratio per variant rather than per-glyph metrics.

use super::object_table::ObjectTable;
use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};
use serde::{Deserialize, Serialize};

/// The closed set of font variants the writer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontVariant {
    /// Upright, normal weight
    #[default]
    Regular,
    /// Upright, bold
    Bold,
    /// Slanted, normal weight
    Oblique,
    /// Slanted, bold
    BoldOblique,
}

impl FontVariant {
    /// Every variant, in resource-dictionary order.
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Oblique,
        FontVariant::BoldOblique,
    ];

    /// Select a variant from style flags.
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Oblique,
            (true, true) => FontVariant::BoldOblique,
        }
    }

    /// Look up a variant by font name.
    ///
    /// Accepts base font names and resource names, with or without the
    /// hyphen and in any case: `Helvetica-Bold`, `HelveticaBold`, `helvetica-bold`.
    /// `Helvetica-Italic` is accepted as an alias of the oblique face.
    pub fn from_name(name: &str) -> Result<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != ' ')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "helvetica" => Ok(FontVariant::Regular),
            "helveticabold" => Ok(FontVariant::Bold),
            "helveticaoblique" | "helveticaitalic" => Ok(FontVariant::Oblique),
            "helveticaboldoblique" | "helveticabolditalic" => Ok(FontVariant::BoldOblique),
            _ => Err(Error::Configuration(format!("unknown font '{}'", name))),
        }
    }

    /// PostScript name of the Base-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "Helvetica-Bold",
            FontVariant::Oblique => "Helvetica-Oblique",
            FontVariant::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Resource name used in content streams (`/HelveticaBold 12 Tf`).
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "HelveticaBold",
            FontVariant::Oblique => "HelveticaOblique",
            FontVariant::BoldOblique => "HelveticaBoldOblique",
        }
    }

    /// Average glyph width as a fraction of the font size.
    pub fn width_ratio(&self) -> f32 {
        match self {
            FontVariant::Regular | FontVariant::Oblique => 0.5,
            FontVariant::Bold | FontVariant::BoldOblique => 0.55,
        }
    }

    /// Estimated width of `text` in points.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.width_ratio() * font_size
    }

    /// Build the font dictionary for this variant.
    pub fn font_dict(&self) -> Object {
        Object::dict(vec![
            ("Type", Object::name("Font")),
            ("Subtype", Object::name("Type1")),
            ("Name", Object::name(self.resource_name())),
            ("BaseFont", Object::name(self.base_font())),
            ("Encoding", Object::name("WinAnsiEncoding")),
        ])
    }
}

/// Resolve the font for a text run.
///
/// An explicit font name wins over the bold/italic flags.
pub fn resolve_font(font: Option<&str>, bold: bool, italic: bool) -> Result<FontVariant> {
    match font {
        Some(name) => FontVariant::from_name(name),
        None => Ok(FontVariant::from_flags(bold, italic)),
    }
}

/// Font objects written into a document, keyed by variant.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    fonts: Vec<(FontVariant, ObjectRef)>,
}

impl FontRegistry {
    /// Write one font object per variant.
    pub fn register_all(table: &mut ObjectTable) -> Self {
        let fonts = FontVariant::ALL
            .iter()
            .map(|variant| (*variant, table.add(variant.font_dict())))
            .collect();
        Self { fonts }
    }

    /// The `/Font` resource sub-dictionary.
    pub fn resources(&self) -> Object {
        let dict: Dict = self
            .fonts
            .iter()
            .map(|(variant, r)| (variant.resource_name().to_string(), Object::Reference(*r)))
            .collect();
        Object::Dictionary(dict)
    }
}
