//! Document loading traits.
//!
//! A [`DocumentLoader`] opens a file (decrypting it when a password is
//! given) and yields a [`Document`] from which individual [`Page`]s are
//! produced on demand. Implementations live in backend crates.
//!
//! # Usage
//!
//! ```ignore
//! let doc = loader.load(Path::new("report.pdf"), None)?;
//! for number in 1..=doc.page_count() {
//!     let page = doc.page(number)?;
//! }
//! ```

use std::path::Path;

use crate::error::ExtractError;
use crate::page::Page;

/// Opens documents from disk.
pub trait DocumentLoader: Send + Sync {
    type Document: Document;

    /// Open `path`, using `password` to decrypt it if needed.
    ///
    /// # Errors
    ///
    /// [`ExtractError::PasswordRequired`] or [`ExtractError::InvalidPassword`]
    /// for encrypted documents opened without the right password,
    /// [`ExtractError::Io`] when the file cannot be read and
    /// [`ExtractError::Parse`] when it is not a valid document.
    fn load(&self, path: &Path, password: Option<&str>) -> Result<Self::Document, ExtractError>;
}

/// An opened document.
pub trait Document {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Build page `number` (1-based).
    ///
    /// # Errors
    ///
    /// [`ExtractError::PageOutOfRange`] when the page does not exist, or a
    /// backend error when its content cannot be interpreted.
    fn page(&self, number: usize) -> Result<Page, ExtractError>;
}
