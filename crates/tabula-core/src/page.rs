//! Page model consumed by the extractors.
//!
//! A [`Page`] is produced by a [`Document`](crate::Document) and carries the
//! glyphs and ruling lines found on one PDF page, in page space with a
//! top-left origin. Restricting a page to an area yields another `Page` whose
//! contents are filtered but whose coordinates are unchanged.

use crate::geometry::{Orientation, Rectangle, Ruling};

/// A single positioned glyph (or short run of glyphs).
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub rect: Rectangle,
    pub text: String,
}

impl TextElement {
    pub fn new(rect: Rectangle, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }

    /// Whether the element is whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One page, or a restricted view of one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    number: usize,
    width: f64,
    height: f64,
    area: Rectangle,
    text: Vec<TextElement>,
    rulings: Vec<Ruling>,
}

impl Page {
    /// Create a full page. `number` is 1-based.
    pub fn new(
        number: usize,
        width: f64,
        height: f64,
        text: Vec<TextElement>,
        rulings: Vec<Ruling>,
    ) -> Self {
        Self {
            number,
            width,
            height,
            area: Rectangle::new(0.0, 0.0, width, height),
            text,
            rulings,
        }
    }

    /// 1-based page number in the source document.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Width of the underlying page. A restricted view keeps the page's width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height of the underlying page. A restricted view keeps the page's height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The region this view covers; the whole page unless restricted.
    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn text(&self) -> &[TextElement] {
        &self.text
    }

    pub fn rulings(&self) -> &[Ruling] {
        &self.rulings
    }

    pub fn horizontal_rulings(&self) -> impl Iterator<Item = &Ruling> {
        self.rulings
            .iter()
            .filter(|r| r.orientation() == Some(Orientation::Horizontal))
    }

    pub fn vertical_rulings(&self) -> impl Iterator<Item = &Ruling> {
        self.rulings
            .iter()
            .filter(|r| r.orientation() == Some(Orientation::Vertical))
    }

    pub fn add_ruling(&mut self, ruling: Ruling) {
        self.rulings.push(ruling);
    }

    /// A view holding only the text whose centre lies in `area` and the
    /// rulings clipped to it.
    pub fn restrict(&self, area: &Rectangle) -> Page {
        let text = self
            .text
            .iter()
            .filter(|t| {
                let (cx, cy) = t.rect.center();
                area.contains_point(cx, cy)
            })
            .cloned()
            .collect();
        let rulings = self.rulings.iter().filter_map(|r| r.clip(area)).collect();
        Page {
            number: self.number,
            width: self.width,
            height: self.height,
            area: *area,
            text,
            rulings,
        }
    }
}
