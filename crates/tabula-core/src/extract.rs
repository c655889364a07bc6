//! Detection and extraction collaborators.
//!
//! The dispatcher only sees these traits. [`Extractors::standard`] bundles
//! the baseline implementations shipped with this crate; tests and other
//! front ends can plug in their own.

use crate::detect::{GridClassifier, GridRegionDetector};
use crate::error::ExtractError;
use crate::geometry::Rectangle;
use crate::lattice::LatticeExtractor;
use crate::page::Page;
use crate::stream::StreamExtractor;
use crate::table::Table;

/// Options passed through to the extractors unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractorOptions {
    /// Keep line breaks inside cells instead of joining lines with spaces.
    pub use_line_returns: bool,
}

/// Decides whether a page looks like a ruled grid.
pub trait TabularityClassifier: Send + Sync {
    fn is_tabular(&self, page: &Page) -> bool;
}

/// Proposes candidate table regions on a page.
pub trait RegionDetector: Send + Sync {
    /// Candidate rectangles in emission order.
    fn detect(&self, page: &Page) -> Result<Vec<Rectangle>, ExtractError>;
}

/// Extracts tables from ruling-line geometry.
pub trait RulingExtractor: Send + Sync {
    fn extract(&self, page: &Page, options: &ExtractorOptions) -> Result<Vec<Table>, ExtractError>;
}

/// Extracts tables from text positions.
pub trait FlowExtractor: Send + Sync {
    /// `columns` are explicit column boundaries in page space, if any.
    fn extract(
        &self,
        page: &Page,
        columns: Option<&[f64]>,
        options: &ExtractorOptions,
    ) -> Result<Vec<Table>, ExtractError>;
}

/// One of each collaborator.
pub struct Extractors {
    pub classifier: Box<dyn TabularityClassifier>,
    pub detector: Box<dyn RegionDetector>,
    pub ruling: Box<dyn RulingExtractor>,
    pub flow: Box<dyn FlowExtractor>,
}

impl Extractors {
    /// The lattice/stream extractors and grid-based detectors of this crate.
    pub fn standard() -> Self {
        Self {
            classifier: Box::new(GridClassifier::default()),
            detector: Box::new(GridRegionDetector::default()),
            ruling: Box::new(LatticeExtractor::default()),
            flow: Box::new(StreamExtractor::default()),
        }
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Extractors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractors").finish_non_exhaustive()
    }
}
