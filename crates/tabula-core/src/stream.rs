//! Text-flow table extraction.
//!
//! Every text line becomes a row. Column boundaries are either supplied by
//! the caller or inferred from the horizontal projection of text chunks:
//! where no chunk on any line covers an x position, a column gap exists.

use crate::error::ExtractError;
use crate::extract::{ExtractorOptions, FlowExtractor};
use crate::geometry::Rectangle;
use crate::page::Page;
use crate::table::{Cell, ExtractionKind, Table};
use crate::text::{Word, group_lines, line_words};

/// Baseline text-flow extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamExtractor {
    /// Words separated by less than this multiple of the text height are
    /// kept in one cell when columns are inferred.
    pub chunk_gap_ratio: f64,
}

impl Default for StreamExtractor {
    fn default() -> Self {
        Self {
            chunk_gap_ratio: 1.0,
        }
    }
}

impl FlowExtractor for StreamExtractor {
    fn extract(
        &self,
        page: &Page,
        columns: Option<&[f64]>,
        _options: &ExtractorOptions,
    ) -> Result<Vec<Table>, ExtractError> {
        let lines: Vec<Vec<Word>> = group_lines(page.text())
            .iter()
            .map(|line| line_words(line))
            .filter(|words| !words.is_empty())
            .collect();
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let (lines, boundaries) = match columns {
            Some(positions) => {
                let mut boundaries = positions.to_vec();
                boundaries.sort_by(f64::total_cmp);
                (lines, boundaries)
            }
            None => {
                let chunked: Vec<Vec<Word>> =
                    lines.into_iter().map(|l| self.chunk(l)).collect();
                let boundaries = inferred_boundaries(&chunked);
                (chunked, boundaries)
            }
        };

        Ok(build_table(page, &lines, &boundaries).into_iter().collect())
    }
}

impl StreamExtractor {
    /// Merge words that sit closer than the chunk gap.
    fn chunk(&self, words: Vec<Word>) -> Vec<Word> {
        let mut chunks: Vec<Word> = Vec::with_capacity(words.len());
        for word in words {
            if let Some(last) = chunks.last_mut() {
                let height = last.rect.height.abs().max(word.rect.height.abs());
                if word.rect.left - last.rect.right() <= self.chunk_gap_ratio * height {
                    last.rect = last.rect.union(&word.rect);
                    last.text.push(' ');
                    last.text.push_str(&word.text);
                    continue;
                }
            }
            chunks.push(word);
        }
        chunks
    }
}

/// Midpoints of the gaps in the horizontal projection of all chunks.
fn inferred_boundaries(lines: &[Vec<Word>]) -> Vec<f64> {
    let mut spans: Vec<(f64, f64)> = lines
        .iter()
        .flatten()
        .map(|w| (w.rect.left, w.rect.right()))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    merged
        .windows(2)
        .map(|pair| (pair[0].1 + pair[1].0) / 2.0)
        .collect()
}

/// Lay words out in `boundaries.len() + 1` column bands, drop bands that are
/// empty on every row at either edge, and build the table.
fn build_table(page: &Page, lines: &[Vec<Word>], boundaries: &[f64]) -> Option<Table> {
    let band_count = boundaries.len() + 1;
    let area = lines
        .iter()
        .flatten()
        .map(|w| w.rect)
        .reduce(|acc, r| acc.union(&r))?;

    let banded: Vec<Vec<Vec<&Word>>> = lines
        .iter()
        .map(|line| {
            let mut bands: Vec<Vec<&Word>> = vec![Vec::new(); band_count];
            for word in line {
                let (cx, _) = word.rect.center();
                bands[boundaries.partition_point(|&b| b < cx)].push(word);
            }
            bands
        })
        .collect();

    let occupied = |band: usize| banded.iter().any(|row| !row[band].is_empty());
    let first = (0..band_count).find(|&b| occupied(b))?;
    let last = (0..band_count).rev().find(|&b| occupied(b))?;

    let band_edges = |band: usize| {
        let left = if band == 0 { area.left } else { boundaries[band - 1] };
        let right = if band == boundaries.len() {
            area.right()
        } else {
            boundaries[band]
        };
        (left, right)
    };

    let rows = banded
        .iter()
        .map(|bands| {
            let line_rect = bands
                .iter()
                .flatten()
                .map(|w| w.rect)
                .reduce(|acc, r| acc.union(&r))
                .unwrap_or(area);
            (first..=last)
                .map(|band| {
                    let words = &bands[band];
                    match words.iter().map(|w| w.rect).reduce(|acc, r| acc.union(&r)) {
                        Some(rect) => Cell::new(
                            rect,
                            words
                                .iter()
                                .map(|w| w.text.as_str())
                                .collect::<Vec<_>>()
                                .join(" "),
                        ),
                        None => {
                            let (left, right) = band_edges(band);
                            Cell::empty(Rectangle::from_edges(
                                line_rect.top,
                                left,
                                line_rect.bottom(),
                                right,
                            ))
                        }
                    }
                })
                .collect()
        })
        .collect();

    Some(Table {
        kind: ExtractionKind::Stream,
        page_number: page.number(),
        area,
        rows,
    })
}
