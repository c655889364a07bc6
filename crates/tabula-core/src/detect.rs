//! Grid-based page classification and table region detection.

use crate::error::ExtractError;
use crate::extract::{RegionDetector, TabularityClassifier};
use crate::geometry::Rectangle;
use crate::lattice::LatticeExtractor;
use crate::page::Page;

/// Treats a page as tabular when its rulings form a grid of more than one cell.
#[derive(Debug, Clone, Default)]
pub struct GridClassifier {
    pub lattice: LatticeExtractor,
}

impl TabularityClassifier for GridClassifier {
    fn is_tabular(&self, page: &Page) -> bool {
        self.lattice
            .cell_groups(page)
            .iter()
            .any(|cells| cells.len() > 1)
    }
}

/// Proposes the bounding box of every ruled grid on the page.
#[derive(Debug, Clone, Default)]
pub struct GridRegionDetector {
    pub lattice: LatticeExtractor,
}

impl RegionDetector for GridRegionDetector {
    fn detect(&self, page: &Page) -> Result<Vec<Rectangle>, ExtractError> {
        let mut regions: Vec<Rectangle> = self
            .lattice
            .cell_groups(page)
            .iter()
            .filter_map(|cells| cells.iter().copied().reduce(|acc, c| acc.union(&c)))
            .collect();
        regions.sort_by(|a, b| a.top.total_cmp(&b.top).then_with(|| a.left.total_cmp(&b.left)));
        log::debug!("page {}: detected {} table region(s)", page.number(), regions.len());
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ruling;

    fn boxed(top: f64, left: f64, bottom: f64, right: f64) -> Vec<Ruling> {
        vec![
            Ruling::horizontal(top, left, right),
            Ruling::horizontal(bottom, left, right),
            Ruling::vertical(left, top, bottom),
            Ruling::vertical(right, top, bottom),
        ]
    }

    #[test]
    fn single_box_is_not_tabular() {
        let page = Page::new(1, 612.0, 792.0, Vec::new(), boxed(10.0, 10.0, 50.0, 100.0));
        assert!(!GridClassifier::default().is_tabular(&page));
    }

    #[test]
    fn split_box_is_tabular() {
        let mut rulings = boxed(10.0, 10.0, 50.0, 100.0);
        rulings.push(Ruling::vertical(55.0, 10.0, 50.0));
        let page = Page::new(1, 612.0, 792.0, Vec::new(), rulings);
        assert!(GridClassifier::default().is_tabular(&page));
    }

    #[test]
    fn plain_text_is_not_tabular() {
        let page = Page::new(1, 612.0, 792.0, Vec::new(), Vec::new());
        assert!(!GridClassifier::default().is_tabular(&page));
    }

    #[test]
    fn regions_ordered_top_to_bottom() {
        let mut rulings = boxed(400.0, 10.0, 450.0, 100.0);
        rulings.extend(boxed(100.0, 300.0, 150.0, 400.0));
        rulings.extend(boxed(100.0, 10.0, 150.0, 100.0));
        let page = Page::new(1, 612.0, 792.0, Vec::new(), rulings);

        let regions = GridRegionDetector::default().detect(&page).unwrap();
        assert_eq!(
            regions,
            vec![
                Rectangle::from_edges(100.0, 10.0, 150.0, 100.0),
                Rectangle::from_edges(100.0, 300.0, 150.0, 400.0),
                Rectangle::from_edges(400.0, 10.0, 450.0, 100.0),
            ]
        );
    }
}
