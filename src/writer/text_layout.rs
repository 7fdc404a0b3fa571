//! Greedy word wrapping and line placement on estimated text widths.

use super::font_manager::FontVariant;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a text run relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// Text starts at x (default)
    #[default]
    Left,
    /// Text is centered on x
    Center,
    /// Text ends at x
    Right,
}

/// One positioned line of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    /// Line content
    pub text: String,
    /// Baseline start x after alignment
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// Estimated width
    pub width: f32,
    /// Font size the line is set at
    pub size: f32,
}

impl LaidOutLine {
    /// Estimated bounding box: from 0.2 em below the baseline, one em tall.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.y - 0.2 * self.size, self.width, self.size)
    }
}

/// Text layout helper for positioning wrapped lines.
#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    /// Line height as a multiple of the font size
    line_spacing: f32,
}

impl TextLayout {
    /// Create a layout with the given line spacing factor.
    pub fn new(line_spacing: f32) -> Self {
        Self { line_spacing }
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_spacing
    }

    /// Wrap `text` and position each line relative to the anchor `(x, y)`.
    ///
    /// The first baseline sits at `y`; each following line moves down one
    /// line height.
    pub fn layout(
        &self,
        text: &str,
        x: f32,
        y: f32,
        max_width: Option<f32>,
        variant: FontVariant,
        font_size: f32,
        align: TextAlign,
    ) -> Vec<LaidOutLine> {
        wrap(text, max_width, variant, font_size)
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let width = estimated_width(&line, variant, font_size);
                let line_x = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - width / 2.0,
                    TextAlign::Right => x - width,
                };
                LaidOutLine {
                    text: line,
                    x: line_x,
                    y: y - i as f32 * self.line_height(font_size),
                    width,
                    size: font_size,
                }
            })
            .collect()
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new(1.2)
    }
}

/// Estimated width of `text` set in `variant` at `font_size`.
pub fn estimated_width(text: &str, variant: FontVariant, font_size: f32) -> f32 {
    variant.text_width(text, font_size)
}

/// Split `text` into lines no wider than `max_width`.
///
/// Words are separated on whitespace and never broken: a word wider than
/// `max_width` gets a line of its own. Without a width limit the text is
/// returned unchanged as a single line. Whitespace-only input with a limit
/// yields one empty line, so the result is never empty.
pub fn wrap(text: &str, max_width: Option<f32>, variant: FontVariant, font_size: f32) -> Vec<String> {
    let Some(max_width) = max_width else {
        return vec![text.to_string()];
    };

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current_line, word);
        if estimated_width(&candidate, variant, font_size) <= max_width {
            current_line = candidate;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}
