//! lopdf-based document loader.
//!
//! Implements [`DocumentLoader`] and [`Document`] using the
//! [lopdf](https://crates.io/crates/lopdf) crate. Pages are interpreted on
//! demand; nothing beyond the page id list is cached.
//!
//! # Example
//!
//! ```ignore
//! use tabula_core::{Document, DocumentLoader};
//! use tabula_parse::LopdfLoader;
//!
//! let doc = LopdfLoader.load(Path::new("report.pdf"), None)?;
//! let page = doc.page(1)?;
//! ```

use std::path::Path;

use lopdf::content::Content;
use tabula_core::{Document, DocumentLoader, ExtractError, Page};

use crate::error::BackendError;
use crate::font_metrics::page_fonts;
use crate::interpreter::ContentInterpreter;

/// Opens PDF files with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLoader;

impl DocumentLoader for LopdfLoader {
    type Document = LopdfDocument;

    fn load(&self, path: &Path, password: Option<&str>) -> Result<LopdfDocument, ExtractError> {
        let bytes = std::fs::read(path)?;
        Ok(LopdfDocument::from_bytes(&bytes, password)?)
    }
}

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse `bytes`, decrypting with `password` when the document is
    /// encrypted. Without a password the empty user password is tried.
    pub fn from_bytes(bytes: &[u8], password: Option<&str>) -> Result<Self, BackendError> {
        let supplied = password.is_some();
        // Objects of an encrypted file are only loaded when the password is
        // known at load time; decrypting afterwards leaves no pages.
        let inner = lopdf::Document::load_mem_with_password(bytes, password.unwrap_or(""))
            .map_err(|e| open_error(&e.to_string(), supplied))?;

        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();
        if inner.is_encrypted() && page_ids.is_empty() {
            return Err(password_error(supplied));
        }
        Ok(LopdfDocument { inner, page_ids })
    }

    fn build_page(&self, number: usize) -> Result<Page, BackendError> {
        let page_id = number
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i))
            .copied()
            .ok_or(ExtractError::PageOutOfRange {
                page: number,
                count: self.page_ids.len(),
            })?;
        let doc = &self.inner;

        let media_box = page_media_box(doc, page_id)?;
        let width = (media_box[2] - media_box[0]).abs();
        let height = (media_box[3] - media_box[1]).abs();

        let page_dict = doc
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let fonts = match resolve_inherited(doc, page_id, b"Resources")? {
            Some(obj) => match resolve_object(doc, obj).as_dict() {
                Ok(resources) => page_fonts(doc, resources),
                Err(_) => return Err(BackendError::Parse("/Resources is not a dictionary".into())),
            },
            None => Default::default(),
        };

        let bytes = page_content_bytes(doc, page_dict)?;
        let operations = Content::decode(&bytes)
            .map_err(|e| BackendError::Interpreter(format!("page {number}: {e}")))?
            .operations;
        let content = ContentInterpreter::new(&fonts, media_box).run(&operations);
        log::debug!(
            "page {number}: {} glyph(s), {} ruling(s)",
            content.text.len(),
            content.rulings.len()
        );

        Ok(Page::new(number, width, height, content.text, content.rulings))
    }
}

impl Document for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, number: usize) -> Result<Page, ExtractError> {
        Ok(self.build_page(number)?)
    }
}

fn password_error(supplied: bool) -> BackendError {
    if supplied {
        BackendError::Core(ExtractError::InvalidPassword)
    } else {
        BackendError::Core(ExtractError::PasswordRequired)
    }
}

/// Map a lopdf load failure. Decryption failures become password errors.
fn open_error(message: &str, password_supplied: bool) -> BackendError {
    let lower = message.to_lowercase();
    if lower.contains("password") || lower.contains("decrypt") {
        password_error(password_supplied)
    } else {
        BackendError::Parse(format!("failed to parse PDF: {message}"))
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow a single indirect reference; other objects are returned as is.
pub(crate) fn resolve_object<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// The page's `/MediaBox` as `[x0, y0, x1, y1]`.
fn page_media_box(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> Result<[f64; 4], BackendError> {
    let obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
    let array = resolve_object(doc, obj)
        .as_array()
        .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
    let [x0, y0, x1, y1] = array.as_slice() else {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    };
    Ok([
        object_to_f64(resolve_object(doc, x0))?,
        object_to_f64(resolve_object(doc, y0))?,
        object_to_f64(resolve_object(doc, x1))?,
        object_to_f64(resolve_object(doc, y1))?,
    ])
}

/// Concatenated, decompressed content stream bytes of a page.
///
/// `/Contents` may be a single stream reference or an array of them.
fn page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    let stream_bytes = |obj: &lopdf::Object| -> Result<Vec<u8>, BackendError> {
        let stream = resolve_object(doc, obj)
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents is not a stream: {e}")))?;
        if stream.dict.get(b"Filter").is_ok() {
            stream
                .decompressed_content()
                .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
        } else {
            Ok(stream.content.clone())
        }
    };

    match resolve_object(doc, contents) {
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend(stream_bytes(item)?);
            }
            Ok(content)
        }
        obj => stream_bytes(obj),
    }
}
