use std::path::Path;

use thiserror::Error;

/// Resolution pages are rendered at unless configured otherwise.
pub const DEFAULT_DPI: u32 = 72;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF rendering backend.
///
/// A backend opens a document once and renders its pages one at a time, so a
/// command can hand the opened document from `process` to `save`.
pub trait Rasterizer {
    type Document;

    fn open(&self, path: &Path) -> Result<Self::Document, RasterError>;

    fn page_count(&self, document: &Self::Document) -> Result<usize, RasterError>;

    /// Render page `index` (zero-based) of `document` as a PNG at `dest`.
    fn write_page_png(
        &self,
        document: &Self::Document,
        index: usize,
        dest: &Path,
    ) -> Result<(), RasterError>;
}
