//! Property-based tests for color resolution, wrapping, and serialization.
//!
//! These tests use proptest to generate random inputs and verify invariants.

mod common;

use pdf_paper::writer::{estimated_width, wrap};
use pdf_paper::{Color, Document, FontVariant, PageSpec, SaveOptions, TextStyle};
use proptest::prelude::*;

fn variant() -> impl Strategy<Value = FontVariant> {
    prop_oneof![
        Just(FontVariant::Regular),
        Just(FontVariant::Bold),
        Just(FontVariant::Oblique),
        Just(FontVariant::BoldOblique),
    ]
}

// ============================================================================
// Color Resolver
// ============================================================================

/// Property: a hex string resolves to the same triple as its components
proptest! {
    #[test]
    fn prop_hex_matches_tuple(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), upper in any::<bool>()) {
        let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
        let hex = if upper { hex.to_uppercase() } else { hex };
        let from_hex = Color::hex(hex).resolve().unwrap();
        let from_tuple = Color::from((r, g, b)).resolve().unwrap();
        prop_assert_eq!(from_hex, from_tuple);
    }
}

/// Property: components outside 0-255 are rejected
proptest! {
    #[test]
    fn prop_out_of_range_components_rejected(bad in prop_oneof![-1000i64..0, 256i64..1000], slot in 0usize..3) {
        let mut components = [0i64, 128, 255];
        components[slot] = bad;
        let result = Color::from_components(components[0], components[1], components[2]);
        prop_assert!(matches!(result, Err(pdf_paper::Error::InvalidColor(_))));
    }
}

/// Property: hex strings of the wrong length never resolve
proptest! {
    #[test]
    fn prop_wrong_length_hex_rejected(digits in "[0-9a-fA-F]{0,12}") {
        prop_assume!(digits.len() != 6);
        let result = Color::hex(format!("#{}", digits)).resolve();
        prop_assert!(result.is_err());
    }
}

// ============================================================================
// Text Layout Engine
// ============================================================================

/// Property: wrapping never yields an empty sequence for non-empty text
proptest! {
    #[test]
    fn prop_wrap_non_empty(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,15}",
        max_width in 1.0f32..400.0,
        size in 4.0f32..48.0,
        v in variant(),
    ) {
        let lines = wrap(&text, Some(max_width), v, size);
        prop_assert!(!lines.is_empty());
        prop_assert!(lines.iter().all(|line| !line.is_empty()));
    }
}

/// Property: narrowing the width never reduces the line count
proptest! {
    #[test]
    fn prop_wrap_monotonic(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,15}",
        wide in 20.0f32..400.0,
        shrink in 0.05f32..1.0,
        size in 4.0f32..32.0,
        v in variant(),
    ) {
        let narrow = wide * shrink;
        let wide_lines = wrap(&text, Some(wide), v, size);
        let narrow_lines = wrap(&text, Some(narrow), v, size);
        prop_assert!(narrow_lines.len() >= wide_lines.len());
    }
}

/// Property: wrapping keeps every word, in order
proptest! {
    #[test]
    fn prop_wrap_preserves_words(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,15}",
        max_width in 1.0f32..400.0,
        v in variant(),
    ) {
        let lines = wrap(&text, Some(max_width), v, 12.0);
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        prop_assert_eq!(rejoined, original);
    }
}

/// Property: multi-word lines respect the width bound
proptest! {
    #[test]
    fn prop_wrap_respects_width(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,15}",
        max_width in 1.0f32..400.0,
        v in variant(),
    ) {
        for line in wrap(&text, Some(max_width), v, 12.0) {
            if line.contains(' ') {
                prop_assert!(estimated_width(&line, v, 12.0) <= max_width);
            }
        }
    }
}

/// Property: a single word is never split
proptest! {
    #[test]
    fn prop_single_word_one_line(word in "[a-zA-Z]{1,64}", max_width in 0.5f32..50.0, v in variant()) {
        prop_assert_eq!(wrap(&word, Some(max_width), v, 24.0), vec![word.clone()]);
    }
}

// ============================================================================
// Serializer
// ============================================================================

/// Property: every xref offset lands on its object marker
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_xref_offsets_exact(
        runs in prop::collection::vec(("[ -~]{0,40}", 0.0f32..600.0, 0.0f32..800.0), 0..6),
        pages in 1usize..4,
        numbered in any::<bool>(),
    ) {
        let mut doc = Document::new();
        for _ in 0..pages {
            let page = doc.add_page(PageSpec::named("A4")).unwrap();
            for (text, x, y) in &runs {
                page.add_text(text, *x, *y, &TextStyle::new().size(12.0)).unwrap();
            }
        }
        let options = SaveOptions { show_page_numbers: numbered };
        let bytes = doc.finish(options).unwrap().bytes;

        let xref = common::parse_xref(&bytes);
        // fonts + resources + page tree + catalog, plus content and page per page
        prop_assert_eq!(xref.offsets.len(), 7 + 2 * pages);
        for (i, offset) in xref.offsets.iter().enumerate() {
            let marker = format!("{} 0 obj\n", i + 1);
            prop_assert!(bytes[*offset..].starts_with(marker.as_bytes()));
        }
        prop_assert_eq!(xref.startxref, xref.start);
    }
}
