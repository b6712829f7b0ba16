//! Low-level PDF editing: loading a template, synthesizing blank pages,
//! and appending draw operations without disturbing existing content.

pub mod surface;

use thiserror::Error;

pub use surface::DocumentSurface;

/// Failures at the PDF object layer. The assembler decides whether these
/// fall through to the blank fallback or surface as a fatal error.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("document could not be parsed: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("document has no pages")]
    NoPages,
    #[error("failed to serialize document: {0}")]
    Save(#[source] std::io::Error),
}
