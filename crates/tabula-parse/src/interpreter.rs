//! Content stream interpreter.
//!
//! Walks the operations of a page's content stream and collects positioned
//! glyphs and axis-aligned ruling lines, converted to page space with a
//! top-left origin.

use std::collections::HashMap;

use lopdf::Object;
use lopdf::content::Operation;
use tabula_core::{Rectangle, Ruling, TextElement};

use crate::font_metrics::FontMetrics;
use crate::lopdf_backend::object_to_f64;

/// Segments closer than this to horizontal or vertical count as rulings.
const AXIS_TOLERANCE: f64 = 0.5;

/// Filled rectangles thinner than this become a single ruling.
const THIN_FILL: f64 = 2.0;

/// Affine transformation matrix `[a b c d e f]`, row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }
}

/// State saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scaling: f64,
    leading: f64,
    rise: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// What a page's content stream draws.
#[derive(Debug, Default)]
pub struct PageContent {
    pub text: Vec<TextElement>,
    pub rulings: Vec<Ruling>,
}

/// Interprets one page's content stream.
pub struct ContentInterpreter<'a> {
    fonts: &'a HashMap<Vec<u8>, FontMetrics>,
    default_font: FontMetrics,
    /// Left and top edges of the media box in user space.
    origin: (f64, f64),
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    /// Subpaths in default user space; closed ones repeat their first point.
    path: Vec<Vec<(f64, f64)>>,
    content: PageContent,
}

impl<'a> ContentInterpreter<'a> {
    /// `media_box` is `[x0, y0, x1, y1]` in user space.
    pub fn new(fonts: &'a HashMap<Vec<u8>, FontMetrics>, media_box: [f64; 4]) -> Self {
        Self {
            fonts,
            default_font: FontMetrics::default(),
            origin: (media_box[0].min(media_box[2]), media_box[1].max(media_box[3])),
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            path: Vec::new(),
            content: PageContent::default(),
        }
    }

    /// Run every operation and return what was drawn.
    pub fn run(mut self, operations: &[Operation]) -> PageContent {
        for op in operations {
            self.apply(op);
        }
        if !self.stack.is_empty() {
            log::debug!("content stream left {} unbalanced q", self.stack.len());
        }
        self.content
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        let n = numbers(operands);
        match (op.operator.as_str(), n.as_slice()) {
            ("q", _) => self.stack.push(self.state.clone()),
            ("Q", _) => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            ("cm", &[a, b, c, d, e, f]) => {
                self.state.ctm = Matrix::new(a, b, c, d, e, f).concat(&self.state.ctm);
            }
            // Line width does not change ruling geometry.
            ("w", _) => {}

            ("BT", _) => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            ("ET", _) => {}
            ("Tf", _) => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(|o| object_to_f64(o).ok()))
                {
                    self.state.font = Some(name.clone());
                    self.state.font_size = size;
                }
            }
            ("Tc", &[v]) => self.state.char_spacing = v,
            ("Tw", &[v]) => self.state.word_spacing = v,
            ("Tz", &[v]) => self.state.horizontal_scaling = v / 100.0,
            ("TL", &[v]) => self.state.leading = v,
            ("Ts", &[v]) => self.state.rise = v,
            ("Td", &[tx, ty]) => self.move_line(tx, ty),
            ("TD", &[tx, ty]) => {
                self.state.leading = -ty;
                self.move_line(tx, ty);
            }
            ("Tm", &[a, b, c, d, e, f]) => {
                self.text_matrix = Matrix::new(a, b, c, d, e, f);
                self.line_matrix = self.text_matrix;
            }
            ("T*", _) => self.next_line(),
            ("Tj", _) => {
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    self.show(bytes);
                }
            }
            ("TJ", _) => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            ("'", _) => {
                self.next_line();
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    self.show(bytes);
                }
            }
            ("\"", _) => {
                if let [aw, ac, text] = operands.as_slice() {
                    if let (Ok(aw), Ok(ac)) = (object_to_f64(aw), object_to_f64(ac)) {
                        self.state.word_spacing = aw;
                        self.state.char_spacing = ac;
                    }
                    self.next_line();
                    if let Some(bytes) = string_bytes(text) {
                        self.show(bytes);
                    }
                }
            }

            ("m", &[x, y]) => {
                let p = self.state.ctm.transform(x, y);
                self.path.push(vec![p]);
            }
            ("l", &[x, y]) => {
                let p = self.state.ctm.transform(x, y);
                match self.path.last_mut() {
                    Some(subpath) => subpath.push(p),
                    None => self.path.push(vec![p]),
                }
            }
            ("re", &[x, y, w, h]) => {
                let ctm = self.state.ctm;
                let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)];
                self.path
                    .push(corners.iter().map(|&(px, py)| ctm.transform(px, py)).collect());
            }
            ("h", _) => self.close_subpath(),
            ("S", _) => self.stroke(),
            ("s", _) => {
                self.close_subpath();
                self.stroke();
            }
            ("f" | "F" | "f*", _) => self.fill(),
            ("B" | "B*", _) => self.stroke(),
            ("b" | "b*", _) => {
                self.close_subpath();
                self.stroke();
            }
            ("n", _) => self.path.clear(),
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn font(&self) -> &FontMetrics {
        self.state
            .font
            .as_ref()
            .and_then(|name| self.fonts.get(name))
            .unwrap_or(&self.default_font)
    }

    fn show_array(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show(bytes),
                other => {
                    if let Ok(adjust) = object_to_f64(other) {
                        let tx = -adjust / 1000.0
                            * self.state.font_size
                            * self.state.horizontal_scaling;
                        self.advance(tx);
                    }
                }
            }
        }
    }

    /// Emit one glyph per byte, decoded as Latin-1.
    fn show(&mut self, bytes: &[u8]) {
        let state = &self.state;
        let size = state.font_size;
        let scale = state.horizontal_scaling;
        let font_to_user = Matrix::new(size * scale, 0.0, 0.0, size, 0.0, state.rise);

        for &code in bytes {
            let font = self.font();
            let width = font.width(code) / 1000.0;
            let (descent, ascent) = (font.descent() / 1000.0, font.ascent() / 1000.0);

            let render = font_to_user.concat(&self.text_matrix).concat(&self.state.ctm);
            let corners = [
                render.transform(0.0, descent),
                render.transform(width, descent),
                render.transform(0.0, ascent),
                render.transform(width, ascent),
            ];
            let rect = self.device_rect(&corners);
            self.content
                .text
                .push(TextElement::new(rect, char::from(code).to_string()));

            let word_spacing = if code == b' ' { self.state.word_spacing } else { 0.0 };
            let tx = (width * size + self.state.char_spacing + word_spacing) * scale;
            self.advance(tx);
        }
    }

    fn advance(&mut self, tx: f64) {
        self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);
    }

    /// Bounding box of user-space points, flipped to a top-left origin.
    fn device_rect(&self, points: &[(f64, f64)]) -> Rectangle {
        let (x0, y0) = self.origin;
        let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        Rectangle::from_edges(y0 - max_y, min_x - x0, y0 - min_y, max_x - x0)
    }

    fn to_page(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x - self.origin.0, self.origin.1 - y)
    }

    fn close_subpath(&mut self) {
        if let Some(subpath) = self.path.last_mut() {
            if let (Some(&first), Some(&last)) = (subpath.first(), subpath.last()) {
                if first != last {
                    subpath.push(first);
                }
            }
        }
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        for subpath in &path {
            for pair in subpath.windows(2) {
                let (a, b) = (self.to_page(pair[0]), self.to_page(pair[1]));
                if let Some(ruling) = segment_ruling(a, b) {
                    self.content.rulings.push(ruling);
                }
            }
        }
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        for subpath in &path {
            let points: Vec<(f64, f64)> = subpath.iter().map(|&p| self.to_page(p)).collect();
            let Some(rect) = axis_aligned_rect(&points) else {
                continue;
            };
            let (top, left, bottom, right) = (rect.top, rect.left, rect.bottom(), rect.right());
            if rect.height < THIN_FILL && rect.width >= rect.height {
                self.content
                    .rulings
                    .push(Ruling::horizontal((top + bottom) / 2.0, left, right));
            } else if rect.width < THIN_FILL {
                self.content
                    .rulings
                    .push(Ruling::vertical((left + right) / 2.0, top, bottom));
            } else {
                self.content.rulings.extend([
                    Ruling::horizontal(top, left, right),
                    Ruling::horizontal(bottom, left, right),
                    Ruling::vertical(left, top, bottom),
                    Ruling::vertical(right, top, bottom),
                ]);
            }
        }
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands
        .iter()
        .map(object_to_f64)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}

fn string_bytes(object: &Object) -> Option<&[u8]> {
    match object {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}

/// A ruling for a horizontal or vertical segment; `None` for diagonals and
/// points.
fn segment_ruling(a: (f64, f64), b: (f64, f64)) -> Option<Ruling> {
    let (dx, dy) = ((b.0 - a.0).abs(), (b.1 - a.1).abs());
    if dy <= AXIS_TOLERANCE && dx > AXIS_TOLERANCE {
        Some(Ruling::horizontal((a.1 + b.1) / 2.0, a.0, b.0))
    } else if dx <= AXIS_TOLERANCE && dy > AXIS_TOLERANCE {
        Some(Ruling::vertical((a.0 + b.0) / 2.0, a.1, b.1))
    } else {
        None
    }
}

/// The rectangle a closed four-corner subpath outlines, if it is axis-aligned.
fn axis_aligned_rect(points: &[(f64, f64)]) -> Option<Rectangle> {
    let mut corners: Vec<(f64, f64)> = points.to_vec();
    corners.dedup();
    if corners.len() > 1 && corners.first() == corners.last() {
        corners.pop();
    }
    if corners.len() != 4 {
        return None;
    }

    let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let near = |v: f64, a: f64, b: f64| (v - a).abs() <= AXIS_TOLERANCE || (v - b).abs() <= AXIS_TOLERANCE;
    corners
        .iter()
        .all(|&(x, y)| near(x, min_x, max_x) && near(y, min_y, max_y))
        .then(|| Rectangle::from_edges(min_y, min_x, max_y, max_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;

    fn run(content: &[u8]) -> PageContent {
        let fonts = HashMap::new();
        let operations = Content::decode(content).unwrap().operations;
        ContentInterpreter::new(&fonts, [0.0, 0.0, 612.0, 792.0]).run(&operations)
    }

    fn texts(content: &PageContent) -> String {
        content.text.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn matrix_concat_applies_left_first() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 5.0);
        assert_eq!(scale.concat(&shift).transform(1.0, 1.0), (12.0, 7.0));
        assert_eq!(shift.concat(&scale).transform(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn glyph_positions_flip_to_top_left() {
        let content = run(b"BT /F1 10 Tf 100 700 Td (AB) Tj ET");
        assert_eq!(texts(&content), "AB");
        let a = content.text[0].rect;
        assert!((a.left - 100.0).abs() < 1e-9);
        assert!((a.width - 5.0).abs() < 1e-9);
        assert!((a.top - (792.0 - 707.5)).abs() < 1e-9);
        assert!((a.bottom() - (792.0 - 697.5)).abs() < 1e-9);
        let b = content.text[1].rect;
        assert!((b.left - 105.0).abs() < 1e-9);
    }

    #[test]
    fn tj_kerning_and_next_line() {
        let content = run(b"BT /F1 10 Tf 14 TL 50 700 Td [(A) -1000 (B)] TJ T* (C) Tj ET");
        assert_eq!(texts(&content), "ABC");
        assert!((content.text[1].rect.left - 65.0).abs() < 1e-9);
        assert!((content.text[2].rect.left - 50.0).abs() < 1e-9);
        assert!((content.text[2].rect.top - content.text[0].rect.top - 14.0).abs() < 1e-9);
    }

    #[test]
    fn cm_and_q_restore() {
        let content = run(b"q 1 0 0 1 100 0 cm BT /F1 10 Tf 0 700 Td (x) Tj ET Q BT /F1 10 Tf 0 700 Td (y) Tj ET");
        assert!((content.text[0].rect.left - 100.0).abs() < 1e-9);
        assert!(content.text[1].rect.left.abs() < 1e-9);
    }

    #[test]
    fn stroked_lines_become_rulings() {
        let content = run(b"100 700 m 300 700 l S 100 700 m 100 660 l S 0 0 m 50 50 l S");
        assert_eq!(
            content.rulings,
            vec![
                Ruling::horizontal(92.0, 100.0, 300.0),
                Ruling::vertical(100.0, 92.0, 132.0),
            ]
        );
    }

    #[test]
    fn stroked_rectangle_gives_four_edges() {
        let content = run(b"10 10 100 50 re S");
        assert_eq!(content.rulings.len(), 4);
    }

    #[test]
    fn thin_filled_rectangles_become_single_rulings() {
        let content = run(b"100 700 200 1 re f 100 600 1 50 re f");
        assert_eq!(
            content.rulings,
            vec![
                Ruling::horizontal(91.5, 100.0, 300.0),
                Ruling::vertical(100.5, 142.0, 192.0),
            ]
        );
    }

    #[test]
    fn wide_filled_rectangle_gives_edges() {
        let content = run(b"10 10 100 50 re f");
        assert_eq!(content.rulings.len(), 4);
    }

    #[test]
    fn end_path_discards() {
        let content = run(b"100 700 m 300 700 l n S");
        assert!(content.rulings.is_empty());
    }

    #[test]
    fn closepath_stroke_adds_closing_edge() {
        let content = run(b"10 10 m 110 10 l 110 60 l 10 60 l s");
        assert_eq!(content.rulings.len(), 4);
    }
}
