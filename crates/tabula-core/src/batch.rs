//! Running a plan over one file or a directory of files.
//!
//! Each [`BatchItem`] is processed on its own: its failure is recorded in the
//! [`BatchReport`] and the run moves on to the next item.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::backend::DocumentLoader;
use crate::error::ExtractError;
use crate::extract::Extractors;
use crate::plan::{ExtractionPlan, InputSource, OutputFormat, OutputTarget};
use crate::processor::DocumentProcessor;
use crate::writer::write_tables;

const INPUT_EXTENSION: &str = ".pdf";

/// Where one item's tables are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutput {
    Stdout,
    File(PathBuf),
}

/// One input document and its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: ItemOutput,
}

/// Result of processing one item: the number of tables written.
#[derive(Debug)]
pub struct ItemOutcome {
    pub item: BatchItem,
    pub result: Result<usize, ExtractError>,
}

/// Outcomes of a run, in item order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Output path for `input` in batch mode: a trailing `.pdf` is replaced by
/// the format's extension, otherwise the extension is appended.
pub fn output_path_for(input: &Path, format: OutputFormat) -> PathBuf {
    let name = input.as_os_str().to_string_lossy();
    let stem = name.strip_suffix(INPUT_EXTENSION).unwrap_or(&name);
    PathBuf::from(format!("{stem}{}", format.extension()))
}

/// The items `plan` describes. Directory entries are taken in listing order.
pub fn plan_items(plan: &ExtractionPlan) -> Result<Vec<BatchItem>, ExtractError> {
    match &plan.input {
        InputSource::File(path) => {
            let output = match &plan.output {
                OutputTarget::File(out) => ItemOutput::File(out.clone()),
                OutputTarget::PerInput => ItemOutput::File(output_path_for(path, plan.format)),
                OutputTarget::Stdout => ItemOutput::Stdout,
            };
            Ok(vec![BatchItem {
                input: path.clone(),
                output,
            }])
        }
        InputSource::Directory(dir) => {
            let mut items = Vec::new();
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                let is_pdf = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(INPUT_EXTENSION));
                if is_pdf && path.is_file() {
                    let output = ItemOutput::File(output_path_for(&path, plan.format));
                    items.push(BatchItem {
                        input: path,
                        output,
                    });
                }
            }
            Ok(items)
        }
    }
}

/// Runs a plan over its items with a document loader and extractors.
pub struct BatchOrchestrator<'a, L> {
    plan: &'a ExtractionPlan,
    loader: &'a L,
    extractors: &'a Extractors,
}

impl<'a, L: DocumentLoader> BatchOrchestrator<'a, L> {
    pub fn new(plan: &'a ExtractionPlan, loader: &'a L, extractors: &'a Extractors) -> Self {
        Self {
            plan,
            loader,
            extractors,
        }
    }

    /// Process every item of the plan.
    ///
    /// Only a failure to list the batch directory is returned as an error;
    /// per-item failures are recorded in the report.
    pub fn run(&self) -> Result<BatchReport, ExtractError> {
        let items = plan_items(self.plan)?;
        log::info!("processing {} document(s)", items.len());
        Ok(BatchReport {
            outcomes: self.run_items(items),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn run_items(&self, items: Vec<BatchItem>) -> Vec<ItemOutcome> {
        items.into_iter().map(|item| self.outcome(item)).collect()
    }

    #[cfg(feature = "parallel")]
    fn run_items(&self, items: Vec<BatchItem>) -> Vec<ItemOutcome> {
        use rayon::prelude::*;
        items.into_par_iter().map(|item| self.outcome(item)).collect()
    }

    fn outcome(&self, item: BatchItem) -> ItemOutcome {
        let result = self.process_item(&item);
        match &result {
            Ok(count) => log::info!("{}: {} table(s)", item.input.display(), count),
            Err(err) => log::error!("{}: {}", item.input.display(), err),
        }
        ItemOutcome { item, result }
    }

    /// Load, extract and write one item. The output is only created once
    /// extraction has succeeded.
    pub fn process_item(&self, item: &BatchItem) -> Result<usize, ExtractError> {
        let document = self.loader.load(&item.input, self.plan.password.as_deref())?;
        let tables = DocumentProcessor::new(self.plan, self.extractors).process(&document)?;

        match &item.output {
            ItemOutput::Stdout => {
                let mut sink = io::stdout().lock();
                write_tables(&tables, self.plan.format, &mut sink)?;
            }
            ItemOutput::File(path) => {
                let file = File::create(path).map_err(|e| ExtractError::output(path, e))?;
                let mut sink = BufWriter::new(file);
                write_tables(&tables, self.plan.format, &mut sink)
                    .and_then(|()| sink.flush())
                    .map_err(|e| ExtractError::output(path, e))?;
            }
        }
        Ok(tables.len())
    }
}
