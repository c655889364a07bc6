//! Glyph widths and vertical extent from PDF font dictionaries.

use std::collections::HashMap;

use crate::lopdf_backend::{object_to_f64, resolve_object};

/// Width used when a font has no `/Widths` entry for a code (half an em).
const DEFAULT_WIDTH: f64 = 500.0;

const DEFAULT_ASCENT: f64 = 750.0;

const DEFAULT_DESCENT: f64 = -250.0;

/// Metrics of one simple (single-byte) font, in glyph space units
/// (1/1000 of text space).
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: Vec<f64>,
    first_char: u32,
    missing_width: f64,
    ascent: f64,
    descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            widths: Vec::new(),
            first_char: 0,
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }
}

impl FontMetrics {
    /// Read `/FirstChar`, `/Widths` and the descriptor's `/Ascent`,
    /// `/Descent` and `/MissingWidth`. Missing entries fall back to defaults.
    pub fn from_dict(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Self {
        let number = |dict: &lopdf::Dictionary, key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
        };

        let first_char = number(font, b"FirstChar").map_or(0, |v| v as u32);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| object_to_f64(resolve_object(doc, o)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();

        let descriptor = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_dict().ok());
        let from_descriptor = |key: &[u8], default: f64| {
            descriptor
                .and_then(|d| number(d, key))
                .filter(|v| *v != 0.0)
                .unwrap_or(default)
        };

        Self {
            widths,
            first_char,
            missing_width: from_descriptor(b"MissingWidth", DEFAULT_WIDTH),
            ascent: from_descriptor(b"Ascent", DEFAULT_ASCENT),
            descent: from_descriptor(b"Descent", DEFAULT_DESCENT),
        }
    }

    /// Width of `code` in glyph space units.
    pub fn width(&self, code: u8) -> f64 {
        u32::from(code)
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

/// Metrics of every font in a page's `/Resources /Font` dictionary, keyed by
/// resource name.
pub fn page_fonts(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
) -> HashMap<Vec<u8>, FontMetrics> {
    let Some(fonts) = resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_dict().ok())
    else {
        return HashMap::new();
    };

    fonts
        .iter()
        .filter_map(|(name, obj)| {
            let dict = resolve_object(doc, obj).as_dict().ok()?;
            Some((name.clone(), FontMetrics::from_dict(doc, dict)))
        })
        .collect()
}
