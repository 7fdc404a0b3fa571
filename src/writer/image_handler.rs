//! Image handling for PDF generation.
//!
//! Per ISO 32000-1 Section 8.9, images are represented as XObjects. Pixel
//! decoding and re-encoding is delegated to an [`ImageCodec`]; this module
//! only turns decoded samples into image objects.
//!
//! # Encodings
//!
//! - **Raw**: 8-bit samples written as-is, no filter
//! - **JPEG**: codec-compressed bytes with the DCTDecode filter

use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};
use indexmap::IndexMap;
use std::path::Path;

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
}

impl ColorSpace {
    /// Get the number of color components.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
        }
    }

    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

/// Pixel data as produced by an [`ImageCodec`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Channel layout of `pixels`
    pub color_space: ColorSpace,
    /// 8-bit samples, row-major, interleaved
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Sample count implied by the dimensions: `width * height * channels`.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.color_space.components() as usize
    }
}

/// Source of decoded pixels and compressed re-encodings.
///
/// [`crate::Document`] calls this when embedding images; implement it to
/// plug in a different decoder or to feed images from memory in tests.
pub trait ImageCodec {
    /// Decode the file at `path`.
    ///
    /// Fails with [`Error::ResourceNotFound`] when the file can't be read and
    /// [`Error::Decode`] when it isn't a supported image.
    fn decode(&self, path: &Path) -> Result<DecodedImage>;

    /// Re-encode pixels into a DCTDecode-compatible (JPEG) byte stream.
    fn encode_compressed(&self, image: &DecodedImage) -> Result<Vec<u8>>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateCodec {
    /// JPEG quality (1-100) for compressed embedding
    pub quality: u8,
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let img = image::io::Reader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|_| Error::ResourceNotFound(path.to_path_buf()))?
            .decode()
            .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))?;

        match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                let gray = img.to_luma8();
                let (width, height) = gray.dimensions();
                Ok(DecodedImage {
                    width,
                    height,
                    color_space: ColorSpace::DeviceGray,
                    pixels: gray.into_raw(),
                })
            },
            _ => {
                // Alpha is dropped; everything else goes to 8-bit RGB
                let rgb = img.to_rgb8();
                let (width, height) = rgb.dimensions();
                Ok(DecodedImage {
                    width,
                    height,
                    color_space: ColorSpace::DeviceRGB,
                    pixels: rgb.into_raw(),
                })
            },
        }
    }

    fn encode_compressed(&self, image: &DecodedImage) -> Result<Vec<u8>> {
        let color_type = match image.color_space {
            ColorSpace::DeviceGray => image::ColorType::L8,
            ColorSpace::DeviceRGB => image::ColorType::Rgb8,
        };
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode(&image.pixels, image.width, image.height, color_type)
            .map_err(|e| Error::Decode(format!("JPEG encoding failed: {}", e)))?;
        Ok(out)
    }
}

/// Image format for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (DCTDecode filter)
    Jpeg,
    /// Raw uncompressed image data
    Raw,
}

/// Image data ready to become an XObject.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per component (always 8)
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Image format
    pub format: ImageFormat,
    /// Raw or encoded image data
    pub data: Vec<u8>,
}

impl ImageData {
    /// Prepare decoded pixels for embedding.
    ///
    /// With `compress`, the codec re-encodes the pixels and the result
    /// carries the DCTDecode filter; otherwise the samples are embedded
    /// unfiltered.
    pub fn from_decoded(image: DecodedImage, codec: &dyn ImageCodec, compress: bool) -> Result<Self> {
        if image.pixels.len() != image.expected_len() {
            return Err(Error::Decode(format!(
                "codec returned {} samples for a {}x{} {} image, expected {}",
                image.pixels.len(),
                image.width,
                image.height,
                image.color_space.pdf_name(),
                image.expected_len()
            )));
        }

        let (format, data) = if compress {
            (ImageFormat::Jpeg, codec.encode_compressed(&image)?)
        } else {
            (ImageFormat::Raw, image.pixels)
        };

        Ok(Self {
            width: image.width,
            height: image.height,
            bits_per_component: 8,
            color_space: image.color_space,
            format,
            data,
        })
    }

    /// Build the PDF Image XObject dictionary.
    pub fn build_xobject_dict(&self) -> Dict {
        let mut dict = Dict::new();

        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::name(self.color_space.pdf_name()));
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );
        if self.format == ImageFormat::Jpeg {
            dict.insert("Filter".to_string(), Object::name("DCTDecode"));
        }
        dict.insert("Length".to_string(), Object::Integer(self.data.len() as i64));

        dict
    }

    /// Build the image stream object.
    pub fn into_xobject(self) -> Object {
        let dict = self.build_xobject_dict();
        Object::Stream {
            dict,
            data: bytes::Bytes::from(self.data),
        }
    }
}

/// Caller-visible handle to an embedded image.
///
/// Pages reference images through the handle's resource name, so callers
/// never deal with object numbers directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    name: String,
    object: ObjectRef,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Resource name, e.g. `Im1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object holding the image stream.
    pub fn object_ref(&self) -> ObjectRef {
        self.object
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// An image registered with a document.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    /// Object holding the image stream
    pub object: ObjectRef,
    /// Intrinsic width in pixels
    pub width: u32,
    /// Intrinsic height in pixels
    pub height: u32,
    /// Whether the stream is DCT-compressed
    pub compressed: bool,
}

/// Registry of embedded images, keyed by resource name.
#[derive(Debug, Default)]
pub struct ImageManager {
    images: IndexMap<String, EmbeddedImage>,
}

impl ImageManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an image written as `object` and hand out its handle.
    pub fn register(&mut self, object: ObjectRef, data: &ImageData) -> ImageHandle {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.insert(
            name.clone(),
            EmbeddedImage {
                object,
                width: data.width,
                height: data.height,
                compressed: data.format == ImageFormat::Jpeg,
            },
        );
        ImageHandle {
            name,
            object,
            width: data.width,
            height: data.height,
        }
    }

    /// Look up an image by resource name.
    pub fn get(&self, name: &str) -> Option<&EmbeddedImage> {
        self.images.get(name)
    }

    /// Number of embedded images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Number of images stored DCT-compressed.
    pub fn compressed_count(&self) -> usize {
        self.images.values().filter(|img| img.compressed).count()
    }

    /// Whether no image has been embedded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The `/XObject` resource sub-dictionary.
    pub fn resources(&self) -> Object {
        Object::Dictionary(
            self.images
                .iter()
                .map(|(name, img)| (name.clone(), Object::Reference(img.object)))
                .collect(),
        )
    }
}
