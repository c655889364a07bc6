use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tabula_core::PlanOptions;

/// Extract tables from PDF files into CSV, TSV or JSON.
#[derive(Debug, Parser)]
#[command(name = "tabula", about, version, disable_version_flag = true)]
pub struct Cli {
    /// Print version information and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Guess the portion of the page to analyze per page
    #[arg(short = 'g', long, overrides_with = "guess")]
    pub guess: bool,

    /// Force PDF to be extracted using spreadsheet-style extraction
    /// (if there are ruling lines separating each cell)
    #[arg(
        short = 'r',
        long = "spreadsheet",
        visible_short_alias = 'l',
        visible_alias = "lattice",
        overrides_with = "spreadsheet"
    )]
    pub spreadsheet: bool,

    /// Force PDF not to be extracted using spreadsheet-style extraction
    /// (if there are no ruling lines separating each cell)
    #[arg(
        short = 'n',
        long = "no-spreadsheet",
        visible_short_alias = 't',
        visible_alias = "stream",
        overrides_with = "no_spreadsheet"
    )]
    pub no_spreadsheet: bool,

    /// Use embedded line returns in cells
    #[arg(short = 'u', long, overrides_with = "use_line_returns")]
    pub use_line_returns: bool,

    /// Suppress all log output
    #[arg(short = 'i', long, overrides_with = "silent")]
    pub silent: bool,

    /// Convert all .pdfs in the provided directory
    #[arg(short = 'b', long, value_name = "DIRECTORY")]
    pub batch: Option<PathBuf>,

    /// Write output to <OUTFILE> instead of stdout
    #[arg(short = 'o', long, value_name = "OUTFILE")]
    pub outfile: Option<PathBuf>,

    /// Output format: CSV, TSV or JSON. Default: CSV
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Password to decrypt document. Default is empty
    #[arg(short = 's', long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// X coordinates of column boundaries, e.g. 10.1,20.2,30.3.
    /// Prefix with % for percentages of the page width
    #[arg(short = 'c', long, value_name = "COLUMNS", allow_hyphen_values = true)]
    pub columns: Option<String>,

    /// Portion of the page to analyze, as top,left,bottom,right, e.g.
    /// 269.875,12.75,790.5,561. Prefix with % for percentages of the page
    /// size. May be given more than once
    #[arg(
        short = 'a',
        long = "area",
        value_name = "AREA",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub areas: Vec<String>,

    /// Comma separated list of ranges, or all, e.g. 1-3,5-7 or 3 or all.
    /// Default is 1
    #[arg(short = 'p', long, value_name = "PAGES")]
    pub pages: Option<String>,

    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Raw option values for plan construction. No validation happens here.
    pub fn into_options(self) -> PlanOptions {
        PlanOptions {
            files: self.files,
            batch: self.batch,
            outfile: self.outfile,
            format: self.format,
            password: self.password,
            columns: self.columns,
            areas: self.areas,
            pages: self.pages,
            guess: self.guess,
            ruling_based: self.spreadsheet,
            flow_based: self.no_spreadsheet,
            use_line_returns: self.use_line_returns,
        }
    }
}
