//! tabula-core: Backend-independent extraction pipeline.
//!
//! This crate turns validated options into an immutable [`ExtractionPlan`],
//! resolves coordinate specs against each page, picks ruling-based or
//! flow-based extraction per page ([`MethodDispatcher`]), runs a plan over a
//! document ([`DocumentProcessor`]) or a directory of documents
//! ([`BatchOrchestrator`]) and serializes the resulting tables.
//!
//! PDF access is abstracted behind [`DocumentLoader`] and [`Document`];
//! the lopdf implementation lives in `tabula-parse`.

pub mod backend;
pub mod batch;
pub mod coords;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod lattice;
pub mod page;
pub mod plan;
pub mod processor;
pub mod stream;
pub mod table;
pub mod text;
pub mod writer;

pub use backend::{Document, DocumentLoader};
pub use batch::{BatchItem, BatchOrchestrator, BatchReport, ItemOutcome, ItemOutput, output_path_for};
pub use coords::{AreaSpec, ColumnSpec, CoordinateMode};
pub use detect::{GridClassifier, GridRegionDetector};
pub use dispatch::MethodDispatcher;
pub use error::{ConfigError, ExtractError};
pub use extract::{
    ExtractorOptions, Extractors, FlowExtractor, RegionDetector, RulingExtractor,
    TabularityClassifier,
};
pub use geometry::{Orientation, Rectangle, Ruling};
pub use lattice::LatticeExtractor;
pub use page::{Page, TextElement};
pub use plan::{
    ExtractionPlan, InputSource, Method, OutputFormat, OutputTarget, PageSelector, PlanOptions,
};
pub use processor::DocumentProcessor;
pub use stream::StreamExtractor;
pub use table::{Cell, ExtractionKind, Table};
pub use writer::{DelimitedWriter, JsonWriter, TableWriter, write_tables};
