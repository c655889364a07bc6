//! Per-page choice between ruling-based and flow-based extraction.

use crate::error::ExtractError;
use crate::extract::{ExtractorOptions, Extractors};
use crate::page::Page;
use crate::plan::{ExtractionPlan, Method};
use crate::table::Table;

/// Runs the extractor the plan's [`Method`] calls for on one page view.
///
/// Column positions reach the lattice extractor as the vertical rulings
/// [`DocumentProcessor`](crate::DocumentProcessor) has already added to the
/// page, and the stream extractor as explicit boundaries.
///
/// For [`Method::Auto`] the classifier is consulted on every call; nothing
/// is remembered between pages.
#[derive(Debug, Clone, Copy)]
pub struct MethodDispatcher<'a> {
    plan: &'a ExtractionPlan,
    extractors: &'a Extractors,
}

impl<'a> MethodDispatcher<'a> {
    pub fn new(plan: &'a ExtractionPlan, extractors: &'a Extractors) -> Self {
        Self { plan, extractors }
    }

    fn options(&self) -> ExtractorOptions {
        ExtractorOptions {
            use_line_returns: self.plan.use_line_returns,
        }
    }

    /// Extract tables from `page`, which may be a restricted view.
    pub fn dispatch(&self, page: &Page) -> Result<Vec<Table>, ExtractError> {
        match self.plan.method {
            Method::RulingBased => self.ruling_based(page),
            Method::FlowBased => self.flow_based(page),
            Method::Auto => {
                if self.extractors.classifier.is_tabular(page) {
                    log::debug!("page {}: ruled grid found, using lattice", page.number());
                    self.ruling_based(page)
                } else {
                    log::debug!("page {}: no ruled grid, using stream", page.number());
                    self.flow_based(page)
                }
            }
        }
    }

    fn ruling_based(&self, page: &Page) -> Result<Vec<Table>, ExtractError> {
        let options = self.options();
        if self.plan.guess {
            let regions = self.extractors.detector.detect(page)?;
            let mut tables = Vec::new();
            for region in &regions {
                tables.extend(self.extractors.ruling.extract(&page.restrict(region), &options)?);
            }
            return Ok(tables);
        }

        self.extractors.ruling.extract(page, &options)
    }

    fn flow_based(&self, page: &Page) -> Result<Vec<Table>, ExtractError> {
        if self.plan.guess {
            log::warn!(
                "page {}: --guess is not supported with stream extraction; no tables extracted",
                page.number()
            );
            return Ok(Vec::new());
        }
        let columns = self.plan.columns.as_ref().map(|c| c.resolve(page));
        self.extractors
            .flow
            .extract(page, columns.as_deref(), &self.options())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::coords::{ColumnSpec, CoordinateMode};
    use crate::extract::{FlowExtractor, RegionDetector, RulingExtractor, TabularityClassifier};
    use crate::geometry::{Rectangle, Ruling};
    use crate::plan::{InputSource, OutputFormat, OutputTarget, PageSelector};
    use crate::table::ExtractionKind;

    /// Records every collaborator call so tests can check order and arguments.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct Recorder(pub Arc<Mutex<Vec<String>>>);

    impl Recorder {
        pub(crate) fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct StubClassifier {
        tabular: bool,
        log: Recorder,
    }

    impl TabularityClassifier for StubClassifier {
        fn is_tabular(&self, page: &Page) -> bool {
            self.log.push(format!("classify {}", page.number()));
            self.tabular
        }
    }

    struct StubDetector {
        regions: Vec<Rectangle>,
        log: Recorder,
    }

    impl RegionDetector for StubDetector {
        fn detect(&self, page: &Page) -> Result<Vec<Rectangle>, ExtractError> {
            self.log.push(format!("detect {}", page.number()));
            Ok(self.regions.clone())
        }
    }

    struct StubRuling {
        log: Recorder,
        fail: bool,
    }

    impl RulingExtractor for StubRuling {
        fn extract(&self, page: &Page, options: &ExtractorOptions) -> Result<Vec<Table>, ExtractError> {
            let area = page.area();
            self.log.push(format!(
                "ruling {} area={},{},{},{} verticals={} lr={}",
                page.number(),
                area.top,
                area.left,
                area.bottom(),
                area.right(),
                page.vertical_rulings().count(),
                options.use_line_returns
            ));
            if self.fail {
                return Err(ExtractError::Collaborator("ruling failed".into()));
            }
            Ok(vec![stub_table(ExtractionKind::Lattice, page)])
        }
    }

    struct StubFlow {
        log: Recorder,
    }

    impl FlowExtractor for StubFlow {
        fn extract(
            &self,
            page: &Page,
            columns: Option<&[f64]>,
            _options: &ExtractorOptions,
        ) -> Result<Vec<Table>, ExtractError> {
            let area = page.area();
            self.log.push(format!(
                "flow {} area={},{},{},{} columns={:?}",
                page.number(),
                area.top,
                area.left,
                area.bottom(),
                area.right(),
                columns
            ));
            Ok(vec![stub_table(ExtractionKind::Stream, page)])
        }
    }

    fn stub_table(kind: ExtractionKind, page: &Page) -> Table {
        Table {
            kind,
            page_number: page.number(),
            area: page.area(),
            rows: Vec::new(),
        }
    }

    /// Stub collaborators that log into `log`.
    pub(crate) fn stub_extractors(log: &Recorder, tabular: bool, regions: Vec<Rectangle>) -> Extractors {
        Extractors {
            classifier: Box::new(StubClassifier {
                tabular,
                log: log.clone(),
            }),
            detector: Box::new(StubDetector {
                regions,
                log: log.clone(),
            }),
            ruling: Box::new(StubRuling {
                log: log.clone(),
                fail: false,
            }),
            flow: Box::new(StubFlow { log: log.clone() }),
        }
    }

    pub(crate) fn plan(method: Method) -> ExtractionPlan {
        ExtractionPlan {
            pages: PageSelector::default(),
            areas: Vec::new(),
            method,
            guess: false,
            use_line_returns: false,
            columns: None,
            format: OutputFormat::Csv,
            password: None,
            input: InputSource::File("in.pdf".into()),
            output: OutputTarget::Stdout,
        }
    }

    fn page(number: usize) -> Page {
        Page::new(number, 600.0, 800.0, Vec::new(), Vec::new())
    }

    #[test]
    fn auto_decides_per_call() {
        let log = Recorder::default();
        let plan = plan(Method::Auto);

        let tabular = stub_extractors(&log, true, Vec::new());
        let tables = MethodDispatcher::new(&plan, &tabular).dispatch(&page(1)).unwrap();
        assert_eq!(tables[0].kind, ExtractionKind::Lattice);

        let plain = stub_extractors(&log, false, Vec::new());
        let tables = MethodDispatcher::new(&plan, &plain).dispatch(&page(2)).unwrap();
        assert_eq!(tables[0].kind, ExtractionKind::Stream);

        assert_eq!(
            log.calls(),
            vec![
                "classify 1",
                "ruling 1 area=0,0,800,600 verticals=0 lr=false",
                "classify 2",
                "flow 2 area=0,0,800,600 columns=None",
            ]
        );
    }

    #[test]
    fn forced_methods_skip_classifier() {
        let log = Recorder::default();
        let extractors = stub_extractors(&log, false, Vec::new());

        let ruling = plan(Method::RulingBased);
        MethodDispatcher::new(&ruling, &extractors).dispatch(&page(1)).unwrap();
        let flow = plan(Method::FlowBased);
        MethodDispatcher::new(&flow, &extractors).dispatch(&page(1)).unwrap();

        let calls = log.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("ruling 1"));
        assert!(calls[1].starts_with("flow 1"));
    }

    #[test]
    fn guess_restricts_to_each_region_in_order() {
        let log = Recorder::default();
        let regions = vec![
            Rectangle::from_edges(500.0, 0.0, 600.0, 100.0),
            Rectangle::from_edges(10.0, 20.0, 30.0, 40.0),
        ];
        let extractors = stub_extractors(&log, true, regions);
        let mut plan = plan(Method::RulingBased);
        plan.guess = true;

        let tables = MethodDispatcher::new(&plan, &extractors).dispatch(&page(4)).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].area, Rectangle::from_edges(500.0, 0.0, 600.0, 100.0));
        assert_eq!(
            log.calls(),
            vec![
                "detect 4",
                "ruling 4 area=500,0,600,100 verticals=0 lr=false",
                "ruling 4 area=10,20,30,40 verticals=0 lr=false",
            ]
        );
    }

    #[test]
    fn guess_with_flow_yields_nothing() {
        let log = Recorder::default();
        let extractors = stub_extractors(&log, false, vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]);
        let mut plan = plan(Method::FlowBased);
        plan.guess = true;

        let tables = MethodDispatcher::new(&plan, &extractors).dispatch(&page(1)).unwrap();
        assert!(tables.is_empty());
        assert!(log.calls().is_empty());
    }

    #[test]
    fn lattice_uses_rulings_already_on_the_view() {
        let log = Recorder::default();
        let extractors = stub_extractors(&log, true, Vec::new());
        let mut plan = plan(Method::RulingBased);
        plan.columns = Some(ColumnSpec {
            mode: CoordinateMode::Relative,
            positions: vec![25.0, 50.0],
        });

        let mut view = page(1);
        view.add_ruling(Ruling::vertical(150.0, 0.0, 800.0));
        MethodDispatcher::new(&plan, &extractors).dispatch(&view).unwrap();
        assert_eq!(log.calls(), vec!["ruling 1 area=0,0,800,600 verticals=1 lr=false"]);
    }

    #[test]
    fn columns_resolved_for_flow() {
        let log = Recorder::default();
        let extractors = stub_extractors(&log, false, Vec::new());
        let mut plan = plan(Method::FlowBased);
        plan.columns = Some(ColumnSpec {
            mode: CoordinateMode::Relative,
            positions: vec![50.0],
        });

        MethodDispatcher::new(&plan, &extractors).dispatch(&page(1)).unwrap();
        assert_eq!(log.calls(), vec!["flow 1 area=0,0,800,600 columns=Some([300.0])"]);
    }

    #[test]
    fn line_returns_passed_through() {
        let log = Recorder::default();
        let extractors = stub_extractors(&log, true, Vec::new());
        let mut plan = plan(Method::RulingBased);
        plan.use_line_returns = true;

        MethodDispatcher::new(&plan, &extractors).dispatch(&page(1)).unwrap();
        assert!(log.calls()[0].ends_with("lr=true"));
    }

    #[test]
    fn extractor_errors_propagate() {
        let log = Recorder::default();
        let mut extractors = stub_extractors(&log, true, Vec::new());
        extractors.ruling = Box::new(StubRuling {
            log: log.clone(),
            fail: true,
        });
        let plan = plan(Method::Auto);

        let err = MethodDispatcher::new(&plan, &extractors)
            .dispatch(&page(1))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Collaborator(_)));
    }
}
