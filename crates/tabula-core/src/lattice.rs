//! Ruling-based table extraction.
//!
//! Pipeline: snap nearly-aligned rulings together, merge collinear pieces,
//! find horizontal/vertical intersections, build cells from four-corner
//! intersections, group touching cells into tables, then assign glyphs to
//! cells by their centre point.

use crate::error::ExtractError;
use crate::extract::{ExtractorOptions, RulingExtractor};
use crate::geometry::{Rectangle, Ruling};
use crate::page::{Page, TextElement};
use crate::table::{Cell, ExtractionKind, Table};
use crate::text::join_text;

const EPSILON: f64 = 1e-6;

/// Baseline ruling-based extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeExtractor {
    /// Rulings closer than this are snapped to a common coordinate.
    pub snap_tolerance: f64,
    /// Slack allowed when testing whether two rulings cross.
    pub intersection_tolerance: f64,
    /// Rulings shorter than this are ignored.
    pub min_ruling_length: f64,
}

impl Default for LatticeExtractor {
    fn default() -> Self {
        Self {
            snap_tolerance: 3.0,
            intersection_tolerance: 3.0,
            min_ruling_length: 1.0,
        }
    }
}

impl LatticeExtractor {
    /// Cell grids found on `page`, one per table, each in reading order.
    pub fn cell_groups(&self, page: &Page) -> Vec<Vec<Rectangle>> {
        let (horizontals, verticals) = self.prepare_rulings(page);
        let points = intersections(&horizontals, &verticals, self.intersection_tolerance);
        let cells = cells_from_intersections(&points)
            .into_iter()
            .filter(|cell| {
                edges_ruled(cell, &horizontals, &verticals, self.intersection_tolerance)
            })
            .collect();
        group_cells(cells)
    }

    fn prepare_rulings(&self, page: &Page) -> (Vec<Ruling>, Vec<Ruling>) {
        let long_enough = |r: &&Ruling| r.length() >= self.min_ruling_length;
        let horizontals: Vec<Ruling> = page.horizontal_rulings().filter(long_enough).copied().collect();
        let verticals: Vec<Ruling> = page.vertical_rulings().filter(long_enough).copied().collect();

        let horizontals = merge_collinear(
            snap(horizontals, self.snap_tolerance, Axis::Y),
            self.snap_tolerance,
            Axis::Y,
        );
        let verticals = merge_collinear(
            snap(verticals, self.snap_tolerance, Axis::X),
            self.snap_tolerance,
            Axis::X,
        );
        (horizontals, verticals)
    }
}

impl RulingExtractor for LatticeExtractor {
    fn extract(&self, page: &Page, options: &ExtractorOptions) -> Result<Vec<Table>, ExtractError> {
        let separator = if options.use_line_returns { "\r" } else { " " };
        let tables = self
            .cell_groups(page)
            .into_iter()
            .map(|cells| build_table(page, cells, separator))
            .collect();
        Ok(tables)
    }
}

/// Which coordinate a set of rulings is aligned on.
#[derive(Debug, Clone, Copy)]
enum Axis {
    /// Horizontal rulings, keyed by y.
    Y,
    /// Vertical rulings, keyed by x.
    X,
}

impl Axis {
    fn key(self, r: &Ruling) -> f64 {
        match self {
            Axis::Y => r.top,
            Axis::X => r.x0,
        }
    }

    fn span(self, r: &Ruling) -> (f64, f64) {
        match self {
            Axis::Y => (r.x0, r.x1),
            Axis::X => (r.top, r.bottom),
        }
    }

    fn make(self, key: f64, start: f64, end: f64) -> Ruling {
        match self {
            Axis::Y => Ruling::horizontal(key, start, end),
            Axis::X => Ruling::vertical(key, start, end),
        }
    }
}

/// Cluster rulings whose keys lie within `tolerance` and move each cluster
/// to its mean.
fn snap(mut rulings: Vec<Ruling>, tolerance: f64, axis: Axis) -> Vec<Ruling> {
    rulings.sort_by(|a, b| axis.key(a).total_cmp(&axis.key(b)));

    let mut result = Vec::with_capacity(rulings.len());
    let mut cluster: Vec<Ruling> = Vec::new();
    let flush = |cluster: &mut Vec<Ruling>, result: &mut Vec<Ruling>| {
        if cluster.is_empty() {
            return;
        }
        let mean = cluster.iter().map(|r| axis.key(r)).sum::<f64>() / cluster.len() as f64;
        result.extend(cluster.drain(..).map(|r| {
            let (start, end) = axis.span(&r);
            axis.make(mean, start, end)
        }));
    };

    for ruling in rulings {
        let starts_new = cluster
            .last()
            .is_some_and(|last| axis.key(&ruling) - axis.key(last) > tolerance);
        if starts_new {
            flush(&mut cluster, &mut result);
        }
        cluster.push(ruling);
    }
    flush(&mut cluster, &mut result);
    result
}

/// Merge rulings on the same line whose spans overlap or nearly touch.
fn merge_collinear(mut rulings: Vec<Ruling>, tolerance: f64, axis: Axis) -> Vec<Ruling> {
    rulings.sort_by(|a, b| {
        axis.key(a)
            .total_cmp(&axis.key(b))
            .then_with(|| axis.span(a).0.total_cmp(&axis.span(b).0))
    });

    let mut merged: Vec<Ruling> = Vec::with_capacity(rulings.len());
    for ruling in rulings {
        let (start, end) = axis.span(&ruling);
        if let Some(last) = merged.last_mut() {
            let (last_start, last_end) = axis.span(last);
            if (axis.key(last) - axis.key(&ruling)).abs() < EPSILON && start <= last_end + tolerance
            {
                *last = axis.make(axis.key(last), last_start, last_end.max(end));
                continue;
            }
        }
        merged.push(ruling);
    }
    merged
}

/// Crossing points of horizontal and vertical rulings, deduplicated.
fn intersections(horizontals: &[Ruling], verticals: &[Ruling], tolerance: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for h in horizontals {
        let y = h.top;
        for v in verticals {
            let x = v.x0;
            if x >= h.x0 - tolerance
                && x <= h.x1 + tolerance
                && y >= v.top - tolerance
                && y <= v.bottom + tolerance
            {
                points.push((x, y));
            }
        }
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
    points.dedup_by(|a, b| (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON);
    points
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    values
}

/// A cell for every adjacent pair of grid lines whose four corners all exist.
fn cells_from_intersections(points: &[(f64, f64)]) -> Vec<Rectangle> {
    let xs = unique_sorted(points.iter().map(|p| p.0));
    let ys = unique_sorted(points.iter().map(|p| p.1));
    let has_point = |x: f64, y: f64| {
        points
            .iter()
            .any(|p| (p.0 - x).abs() < EPSILON && (p.1 - y).abs() < EPSILON)
    };

    let mut cells = Vec::new();
    for pair_y in ys.windows(2) {
        for pair_x in xs.windows(2) {
            let (left, right) = (pair_x[0], pair_x[1]);
            let (top, bottom) = (pair_y[0], pair_y[1]);
            if has_point(left, top)
                && has_point(right, top)
                && has_point(left, bottom)
                && has_point(right, bottom)
            {
                cells.push(Rectangle::from_edges(top, left, bottom, right));
            }
        }
    }
    cells
}

/// Whether all four sides of `cell` lie on a ruling. Corners alone can
/// line up across two separate grids.
fn edges_ruled(cell: &Rectangle, horizontals: &[Ruling], verticals: &[Ruling], tolerance: f64) -> bool {
    let covers_h = |y: f64| {
        horizontals.iter().any(|h| {
            (h.top - y).abs() < EPSILON && h.x0 <= cell.left + tolerance && h.x1 >= cell.right() - tolerance
        })
    };
    let covers_v = |x: f64| {
        verticals.iter().any(|v| {
            (v.x0 - x).abs() < EPSILON && v.top <= cell.top + tolerance && v.bottom >= cell.bottom() - tolerance
        })
    };
    covers_h(cell.top) && covers_h(cell.bottom()) && covers_v(cell.left) && covers_v(cell.right())
}

fn touches(a: &Rectangle, b: &Rectangle) -> bool {
    a.left <= b.right() + EPSILON
        && b.left <= a.right() + EPSILON
        && a.top <= b.bottom() + EPSILON
        && b.top <= a.bottom() + EPSILON
}

/// Union-find over touching cells. Groups come out ordered by their first
/// cell, which is the top-left-most one.
fn group_cells(cells: Vec<Rectangle>) -> Vec<Vec<Rectangle>> {
    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if touches(&cells[i], &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj.max(ri)] = ri.min(rj);
                }
            }
        }
    }

    let mut groups: Vec<(usize, Vec<Rectangle>)> = Vec::new();
    for (i, cell) in cells.into_iter().enumerate() {
        let root = find(&mut parent, i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, group)) => group.push(cell),
            None => groups.push((root, vec![cell])),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Lay the cells of one group out on their grid, padding spanned positions
/// with empty cells, and fill in their text.
fn build_table(page: &Page, cells: Vec<Rectangle>, separator: &str) -> Table {
    let xs = unique_sorted(cells.iter().flat_map(|c| [c.left, c.right()]));
    let ys = unique_sorted(cells.iter().flat_map(|c| [c.top, c.bottom()]));
    let area = cells
        .iter()
        .skip(1)
        .fold(cells[0], |acc, c| acc.union(c));

    let rows = ys
        .windows(2)
        .map(|pair_y| {
            xs.windows(2)
                .map(|pair_x| {
                    let slot = Rectangle::from_edges(pair_y[0], pair_x[0], pair_y[1], pair_x[1]);
                    match cells.iter().find(|c| same_rect(c, &slot)) {
                        Some(cell) => Cell::new(*cell, cell_text(page.text(), cell, separator)),
                        None => Cell::empty(slot),
                    }
                })
                .collect()
        })
        .collect();

    Table {
        kind: ExtractionKind::Lattice,
        page_number: page.number(),
        area,
        rows,
    }
}

fn same_rect(a: &Rectangle, b: &Rectangle) -> bool {
    (a.top - b.top).abs() < EPSILON
        && (a.left - b.left).abs() < EPSILON
        && (a.right() - b.right()).abs() < EPSILON
        && (a.bottom() - b.bottom()).abs() < EPSILON
}

fn cell_text(text: &[TextElement], cell: &Rectangle, separator: &str) -> String {
    let inside: Vec<&TextElement> = text
        .iter()
        .filter(|t| {
            let (cx, cy) = t.rect.center();
            cell.contains_point(cx, cy)
        })
        .collect();
    join_text(&inside, separator)
}
