//! Configuration for document generation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Document-wide settings.
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// PDF version written in the header (e.g., "1.4")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to Flate-compress page content streams
    pub compress_content: bool,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
    /// Horizontal and vertical padding for pages that don't set their own
    pub default_padding: (f32, f32),
    /// Font size of the page-number footer
    pub page_number_size: f32,
    /// Baseline of the page-number footer, measured from the page bottom
    pub page_number_baseline: f32,
    /// Font size of image captions
    pub caption_size: f32,
    /// Distance from an image's bottom edge to its caption baseline
    pub caption_gap: f32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.4".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: None,
            compress_content: false,
            line_spacing: 1.2,
            default_padding: (50.0, 50.0),
            page_number_size: 10.0,
            page_number_baseline: 15.0,
            caption_size: 10.0,
            caption_gap: 12.0,
        }
    }
}

impl DocumentConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// The parsed values go through [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the layout values.
    ///
    /// Sizes and line spacing must be finite and positive. Padding, the
    /// footer baseline and the caption gap must be finite and not negative.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("line_spacing", self.line_spacing),
            ("page_number_size", self.page_number_size),
            ("caption_size", self.caption_size),
        ] {
            positive(key, value)?;
        }
        for (key, value) in [
            ("default_padding", self.default_padding.0),
            ("default_padding", self.default_padding.1),
            ("page_number_baseline", self.page_number_baseline),
            ("caption_gap", self.caption_gap),
        ] {
            non_negative(key, value)?;
        }
        Ok(())
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Enable or disable content stream compression.
    ///
    /// Image objects are not affected; their encoding is chosen per
    /// `embed_image` call.
    pub fn with_compress_content(mut self, compress: bool) -> Self {
        self.compress_content = compress;
        self
    }

    /// Set the line spacing factor. Must be finite and positive.
    pub fn with_line_spacing(mut self, factor: f32) -> Result<Self> {
        positive("line_spacing", factor)?;
        self.line_spacing = factor;
        Ok(self)
    }

    /// Set the padding used by pages that don't specify one.
    pub fn with_default_padding(mut self, horizontal: f32, vertical: f32) -> Result<Self> {
        non_negative("default_padding", horizontal)?;
        non_negative("default_padding", vertical)?;
        self.default_padding = (horizontal, vertical);
        Ok(self)
    }

    /// Whether any Info dictionary entry is set.
    pub(crate) fn has_metadata(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.subject.is_some() || self.creator.is_some()
    }
}

fn positive(key: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Configuration(format!("{} must be positive, got {}", key, value)))
    }
}

fn non_negative(key: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Configuration(format!("{} must not be negative, got {}", key, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocumentConfig::default();
        assert_eq!(config.version, "1.4");
        assert_eq!(config.default_padding, (50.0, 50.0));
        assert!(!config.has_metadata());
    }

    #[test]
    fn test_builder() {
        let config = DocumentConfig::new()
            .with_title("Report")
            .with_compress_content(true)
            .with_default_padding(20.0, 30.0)
            .unwrap();
        assert_eq!(config.title.as_deref(), Some("Report"));
        assert!(config.compress_content);
        assert_eq!(config.default_padding, (20.0, 30.0));
        assert!(config.has_metadata());
    }

    #[test]
    fn test_from_json_partial() {
        let config = DocumentConfig::from_json(r#"{"version": "1.7", "caption_size": 8}"#).unwrap();
        assert_eq!(config.version, "1.7");
        assert_eq!(config.caption_size, 8.0);
        assert_eq!(config.line_spacing, 1.2);
    }

    #[test]
    fn test_from_json_rejects_bad_layout_values() {
        for json in [
            r#"{"line_spacing": -1}"#,
            r#"{"caption_size": 0}"#,
            r#"{"page_number_size": -10}"#,
            r#"{"caption_gap": -2}"#,
            r#"{"default_padding": [10, -1]}"#,
        ] {
            let err = DocumentConfig::from_json(json).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{} was accepted", json);
        }
        assert!(DocumentConfig::from_json(r#"{"caption_gap": 0, "default_padding": [0, 0]}"#).is_ok());
    }

    #[test]
    fn test_setters_reject_bad_layout_values() {
        assert!(DocumentConfig::new().with_line_spacing(0.0).is_err());
        assert!(DocumentConfig::new().with_line_spacing(f32::NAN).is_err());
        assert!(DocumentConfig::new().with_default_padding(-5.0, 5.0).is_err());
        assert!(DocumentConfig::new().with_default_padding(5.0, f32::INFINITY).is_err());
        assert_eq!(DocumentConfig::new().with_line_spacing(1.5).unwrap().line_spacing, 1.5);
        assert!(DocumentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = DocumentConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
