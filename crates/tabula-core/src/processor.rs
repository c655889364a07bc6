//! Per-document extraction: page selection, column injection and areas.

use crate::backend::Document;
use crate::dispatch::MethodDispatcher;
use crate::error::ExtractError;
use crate::extract::Extractors;
use crate::geometry::Ruling;
use crate::page::Page;
use crate::plan::ExtractionPlan;
use crate::table::Table;

/// Extracts every table the plan asks for from one document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentProcessor<'a> {
    plan: &'a ExtractionPlan,
    dispatcher: MethodDispatcher<'a>,
}

impl<'a> DocumentProcessor<'a> {
    pub fn new(plan: &'a ExtractionPlan, extractors: &'a Extractors) -> Self {
        Self {
            plan,
            dispatcher: MethodDispatcher::new(plan, extractors),
        }
    }

    /// Tables from all selected pages, in page order.
    pub fn process<D: Document + ?Sized>(&self, document: &D) -> Result<Vec<Table>, ExtractError> {
        let numbers = self.plan.pages.page_numbers(document.page_count())?;
        let mut tables = Vec::new();
        for number in numbers {
            let page = document.page(number)?;
            tables.extend(self.process_page(page)?);
        }
        Ok(tables)
    }

    /// Tables from one page: one dispatch per area in the order given, or a
    /// single dispatch over the whole page when no areas are configured.
    pub fn process_page(&self, mut page: Page) -> Result<Vec<Table>, ExtractError> {
        if let Some(columns) = &self.plan.columns {
            for x in columns.resolve(&page) {
                page.add_ruling(Ruling::vertical(x, 0.0, page.height()));
            }
        }

        if self.plan.areas.is_empty() {
            return self.dispatcher.dispatch(&page);
        }

        let mut tables = Vec::new();
        for spec in &self.plan.areas {
            let area = spec.resolve(&page);
            tables.extend(self.dispatcher.dispatch(&page.restrict(&area))?);
        }
        Ok(tables)
    }
}
