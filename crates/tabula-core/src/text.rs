//! Grouping glyphs into lines and words.

use crate::geometry::Rectangle;
use crate::page::TextElement;

/// A gap wider than this fraction of the glyph height separates two words.
const WORD_GAP_RATIO: f64 = 0.25;

/// A run of glyphs on one line with no word gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub rect: Rectangle,
    pub text: String,
}

/// Group glyphs into lines, top to bottom, each sorted left to right.
///
/// A glyph joins the current line when its vertical centre lies within the
/// line's band. Blank glyphs are kept so callers can see explicit spaces.
pub fn group_lines<'a, I>(elements: I) -> Vec<Vec<&'a TextElement>>
where
    I: IntoIterator<Item = &'a TextElement>,
{
    let mut sorted: Vec<&TextElement> = elements.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.rect
            .center()
            .1
            .total_cmp(&b.rect.center().1)
            .then_with(|| a.rect.left.total_cmp(&b.rect.left))
    });

    let mut lines: Vec<Vec<&TextElement>> = Vec::new();
    let mut band = Rectangle::default();
    for element in sorted {
        let (_, cy) = element.rect.center();
        let joins = lines
            .last()
            .is_some_and(|_| cy >= band.top && cy <= band.bottom());
        if joins {
            band = band.union(&element.rect);
            if let Some(line) = lines.last_mut() {
                line.push(element);
            }
        } else {
            band = element.rect;
            lines.push(vec![element]);
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.rect.left.total_cmp(&b.rect.left));
    }
    lines
}

/// Split one line into words at blank glyphs and wide gaps.
pub fn line_words(line: &[&TextElement]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Option<Word> = None;

    for element in line {
        if element.is_blank() {
            words.extend(current.take());
            continue;
        }
        current = match current.take() {
            Some(mut word) if !is_word_gap(&word.rect, &element.rect) => {
                word.rect = word.rect.union(&element.rect);
                word.text.push_str(&element.text);
                Some(word)
            }
            previous => {
                words.extend(previous);
                Some(Word {
                    rect: element.rect,
                    text: element.text.clone(),
                })
            }
        };
    }
    words.extend(current);
    words
}

/// Text of a set of glyphs: words joined by spaces, lines by `line_separator`.
pub fn join_text(elements: &[&TextElement], line_separator: &str) -> String {
    group_lines(elements.iter().copied())
        .iter()
        .map(|line| {
            line_words(line)
                .into_iter()
                .map(|w| w.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(line_separator)
}

fn is_word_gap(previous: &Rectangle, next: &Rectangle) -> bool {
    let height = previous.height.abs().max(next.height.abs()).max(1.0);
    next.left - previous.right() > WORD_GAP_RATIO * height
}
