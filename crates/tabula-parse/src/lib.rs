//! tabula-parse: lopdf document backend for tabula-rs.
//!
//! Opens and decrypts PDFs, resolves page boxes and interprets content
//! streams into the glyphs and ruling lines of a [`tabula_core::Page`].

pub mod error;
pub mod font_metrics;
pub mod interpreter;
pub mod lopdf_backend;

pub use error::BackendError;
pub use lopdf_backend::{LopdfDocument, LopdfLoader};
pub use tabula_core;
