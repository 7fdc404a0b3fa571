//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Route library logs to the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Byte position of the last occurrence of `needle`.
pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Number of occurrences of `needle`.
pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Whether `needle` appears anywhere in `haystack`.
pub fn contains(haystack: &[u8], needle: &str) -> bool {
    count(haystack, needle.as_bytes()) > 0
}

/// Parsed cross-reference section of a finished file.
pub struct XrefInfo {
    /// Byte position of the `xref` keyword
    pub start: usize,
    /// Declared entry count, free head included
    pub declared: usize,
    /// Offsets of in-use entries, object 1 first
    pub offsets: Vec<usize>,
    /// Value after `startxref`
    pub startxref: usize,
}

pub fn parse_xref(bytes: &[u8]) -> XrefInfo {
    let start = rfind(bytes, b"\nxref\n").expect("xref keyword") + 1;
    let tail = String::from_utf8(bytes[start..].to_vec()).expect("ASCII tail");
    let mut lines = tail.lines();
    assert_eq!(lines.next(), Some("xref"));
    let declared = lines
        .next()
        .and_then(|l| l.strip_prefix("0 "))
        .and_then(|n| n.parse().ok())
        .expect("subsection header");
    assert_eq!(lines.next(), Some("0000000000 65535 f "));

    let offsets = lines
        .by_ref()
        .take_while(|l| l.ends_with(" 00000 n "))
        .map(|l| l[..10].parse().expect("offset"))
        .collect();

    let startxref = tail
        .lines()
        .rev()
        .nth(1)
        .and_then(|l| l.parse().ok())
        .expect("startxref value");

    XrefInfo {
        start,
        declared,
        offsets,
        startxref,
    }
}

/// Write a solid RGB PNG and return its path.
pub fn write_rgb_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([220, 40, 40]))
        .save(&path)
        .expect("write png fixture");
    path
}

/// Write a solid grayscale PNG and return its path.
pub fn write_gray_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::GrayImage::from_pixel(width, height, image::Luma([90]))
        .save(&path)
        .expect("write png fixture");
    path
}
