//! The resolved, immutable extraction plan.
//!
//! [`ExtractionPlan::build`] turns raw option values ([`PlanOptions`]) into a
//! validated plan. Every configuration error is raised here, before any
//! document is opened; afterwards the plan is only read.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use crate::coords::{AreaSpec, ColumnSpec};
use crate::error::{ConfigError, ExtractError};

/// Which pages of each document to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    /// Every page of the document.
    All,
    /// 1-based page ranges, in the order given. Duplicates are kept. Ranges
    /// stay unexpanded until the document's page count is known.
    Pages(Vec<RangeInclusive<usize>>),
}

impl Default for PageSelector {
    fn default() -> Self {
        PageSelector::Pages(vec![1..=1])
    }
}

impl PageSelector {
    /// Parse `all`, `n`, or a comma-separated list of `n` and `a-b` ranges.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let input = input.trim();
        if input == "all" {
            return Ok(PageSelector::All);
        }

        let invalid = || ConfigError::InvalidPageSelector(input.to_string());
        let parse_page = |s: &str| -> Result<usize, ConfigError> {
            match s.trim().parse::<usize>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(n),
            }
        };

        let mut ranges = Vec::new();
        for part in input.split(',') {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if start > end {
                        return Err(invalid());
                    }
                    ranges.push(start..=end);
                }
                None => {
                    let page = parse_page(part)?;
                    ranges.push(page..=page);
                }
            }
        }

        if ranges.is_empty() {
            return Err(invalid());
        }
        Ok(PageSelector::Pages(ranges))
    }

    /// Expand to concrete 1-based page numbers for a document with
    /// `page_count` pages.
    ///
    /// Fails with the first page past the end before anything is expanded.
    pub fn page_numbers(&self, page_count: usize) -> Result<Vec<usize>, ExtractError> {
        match self {
            PageSelector::All => Ok((1..=page_count).collect()),
            PageSelector::Pages(ranges) => {
                if let Some(range) = ranges.iter().find(|r| *r.end() > page_count) {
                    return Err(ExtractError::PageOutOfRange {
                        page: (*range.start()).max(page_count + 1),
                        count: page_count,
                    });
                }
                Ok(ranges.iter().flat_map(|r| r.clone()).collect())
            }
        }
    }
}

/// Extraction method fixed by the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Decide per page with the tabularity classifier.
    #[default]
    Auto,
    /// Ruling-based ("lattice") extraction.
    RulingBased,
    /// Flow-based ("stream") extraction.
    FlowBased,
}

/// Output serialisation format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];

    /// The token accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Tsv => "TSV",
            OutputFormat::Json => "JSON",
        }
    }

    /// Every format token, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(OutputFormat::name).collect()
    }

    /// File extension (with dot) for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Tsv => ".tsv",
            OutputFormat::Json => ".json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    /// Case-sensitive match against [`OutputFormat::names`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ConfigError::UnknownFormat {
                token: s.to_string(),
                available: Self::names().join(","),
            })
    }
}

/// Where documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// One document.
    File(PathBuf),
    /// Every `.pdf` directly inside a directory.
    Directory(PathBuf),
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output.
    Stdout,
    /// A single named file.
    File(PathBuf),
    /// One file per input, named after it.
    PerInput,
}

/// Raw option values as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub files: Vec<PathBuf>,
    pub batch: Option<PathBuf>,
    pub outfile: Option<PathBuf>,
    pub format: Option<String>,
    pub password: Option<String>,
    pub columns: Option<String>,
    pub areas: Vec<String>,
    pub pages: Option<String>,
    pub guess: bool,
    /// Any of the ruling-based aliases was given.
    pub ruling_based: bool,
    /// Any of the flow-based aliases was given.
    pub flow_based: bool,
    pub use_line_returns: bool,
}

/// Fully validated extraction configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPlan {
    pub pages: PageSelector,
    /// Areas in the order supplied; empty means the whole page.
    pub areas: Vec<AreaSpec>,
    pub method: Method,
    pub guess: bool,
    pub use_line_returns: bool,
    pub columns: Option<ColumnSpec>,
    pub format: OutputFormat,
    pub password: Option<String>,
    pub input: InputSource,
    pub output: OutputTarget,
}

impl ExtractionPlan {
    /// Validate `options` and build the plan.
    pub fn build(options: PlanOptions) -> Result<Self, ConfigError> {
        let areas = options
            .areas
            .iter()
            .map(|a| AreaSpec::parse(a))
            .collect::<Result<Vec<_>, _>>()?;

        let pages = match options.pages.as_deref() {
            Some(spec) => PageSelector::parse(spec)?,
            None => PageSelector::default(),
        };

        let columns = options.columns.as_deref().map(ColumnSpec::parse).transpose()?;

        let format = match options.format.as_deref() {
            Some(token) => token.parse()?,
            None => OutputFormat::default(),
        };

        let method = if options.ruling_based {
            Method::RulingBased
        } else if options.flow_based {
            Method::FlowBased
        } else {
            Method::Auto
        };

        let (input, output) = resolve_io(&options)?;

        Ok(ExtractionPlan {
            pages,
            areas,
            method,
            guess: options.guess,
            use_line_returns: options.use_line_returns,
            columns,
            format,
            password: options.password,
            input,
            output,
        })
    }

    pub fn is_batch(&self) -> bool {
        matches!(self.input, InputSource::Directory(_))
    }
}

fn resolve_io(options: &PlanOptions) -> Result<(InputSource, OutputTarget), ConfigError> {
    match &options.batch {
        Some(dir) => {
            if !options.files.is_empty() {
                return Err(ConfigError::FileWithBatch);
            }
            if !dir.is_dir() {
                return Err(ConfigError::NotADirectory(dir.clone()));
            }
            if let Some(outfile) = &options.outfile {
                log::warn!(
                    "ignoring --outfile {} in batch mode; outputs are named after each input",
                    outfile.display()
                );
            }
            Ok((InputSource::Directory(dir.clone()), OutputTarget::PerInput))
        }
        None => {
            let [file] = options.files.as_slice() else {
                return Err(ConfigError::InputFileCount(options.files.len()));
            };
            if !file.exists() {
                return Err(ConfigError::FileNotFound(file.clone()));
            }
            let output = match &options.outfile {
                Some(path) => OutputTarget::File(path.clone()),
                None => OutputTarget::Stdout,
            };
            Ok((InputSource::File(file.clone()), output))
        }
    }
}
