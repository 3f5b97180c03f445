use tabula_layout::LayoutError;
use tabula_style::StyleParseError;
use thiserror::Error;

/// Errors surfaced by the document loader and the command line tool.
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("Document parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid style: {0}")]
    Style(#[from] StyleParseError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Document(String),
}
