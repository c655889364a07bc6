//! Error types for tabula-rs.
//!
//! [`ConfigError`] covers everything detected while turning user input into an
//! [`ExtractionPlan`](crate::ExtractionPlan): it is raised before any document
//! is opened. [`ExtractError`] covers failures while a document is being
//! loaded, extracted or written; in batch mode it is contained to one item.

use std::path::PathBuf;

use thiserror::Error;

/// A malformed or contradictory option set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A comma-separated number list contained a token that is not a number.
    #[error("Invalid number format in: {input}")]
    InvalidNumberList {
        /// The full list as supplied (after any `%` marker was stripped).
        input: String,
        /// The first token that failed to parse.
        token: String,
    },

    /// An area did not decode to exactly four numbers.
    #[error("area parameters must be top,left,bottom,right optionally preceded by %")]
    AreaComponentCount { input: String, count: usize },

    /// The page selector could not be parsed.
    #[error("Syntax error in page range specification: {0}")]
    InvalidPageSelector(String),

    /// The output format token is not one of the known formats.
    #[error("format {token} is illegal. Available formats: {available}")]
    UnknownFormat { token: String, available: String },

    /// Both an input file and `--batch` were given.
    #[error("Filename specified with batch\nTry --help for help")]
    FileWithBatch,

    /// No input file or more than one input file was given in single-file mode.
    #[error("Need exactly one filename\nTry --help for help")]
    InputFileCount(usize),

    /// The single input file does not exist.
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The batch directory does not exist or is not a directory.
    #[error("Directory does not exist or is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Failure while loading, extracting or writing one document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Error reading input data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The document is encrypted and no password was supplied.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// The supplied password does not open the document.
    #[error("the supplied password is incorrect")]
    InvalidPassword,

    /// The page selector names a page the document does not have.
    #[error("page {page} exceeds document page count ({count})")]
    PageOutOfRange { page: usize, count: usize },

    /// The output sink could not be created or written.
    #[error("Cannot create or write to file: {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A detector or extractor failed internally.
    #[error("extraction failed: {0}")]
    Collaborator(String),
}

impl ExtractError {
    /// Wrap an I/O error raised while writing to `path`.
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Output {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_list_message_names_the_list() {
        let err = ConfigError::InvalidNumberList {
            input: "1.0,abc,3.8".to_string(),
            token: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid number format in: 1.0,abc,3.8");
    }

    #[test]
    fn unknown_format_lists_valid_set() {
        let err = ConfigError::UnknownFormat {
            token: "XML".to_string(),
            available: "CSV,TSV,JSON".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "format XML is illegal. Available formats: CSV,TSV,JSON"
        );
    }

    #[test]
    fn file_vs_batch_messages_differ() {
        assert_ne!(
            ConfigError::FileWithBatch.to_string(),
            ConfigError::InputFileCount(0).to_string()
        );
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn output_error_names_path() {
        let err = ExtractError::output(
            "/tmp/out.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.csv"));
        assert!(msg.contains("denied"));
    }
}
