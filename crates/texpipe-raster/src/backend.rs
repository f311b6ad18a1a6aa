use std::path::Path;

use mupdf::{Colorspace, Document, ImageFormat, Matrix};

use crate::rasterizer::{DEFAULT_DPI, RasterError, Rasterizer};

/// MuPDF-based implementation of [`Rasterizer`].
///
/// Pages are rendered as opaque RGB pixmaps. PDF user space is 72 units per
/// inch, so `dpi / 72` is the scale factor.
#[derive(Debug, Clone, Copy)]
pub struct MupdfRasterizer {
    dpi: u32,
}

impl Default for MupdfRasterizer {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

impl MupdfRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

impl Rasterizer for MupdfRasterizer {
    type Document = Document;

    fn open(&self, path: &Path) -> Result<Document, RasterError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| RasterError::Open("invalid path encoding".into()))?;
        Document::open(path_str).map_err(|e| RasterError::Open(e.to_string()))
    }

    fn page_count(&self, document: &Document) -> Result<usize, RasterError> {
        let count = document
            .page_count()
            .map_err(|e| RasterError::Open(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn write_page_png(
        &self,
        document: &Document,
        index: usize,
        dest: &Path,
    ) -> Result<(), RasterError> {
        let render_error = |message: String| RasterError::Render {
            page: index,
            message,
        };

        let page_number = i32::try_from(index).map_err(|e| render_error(e.to_string()))?;
        let page = document
            .load_page(page_number)
            .map_err(|e| render_error(e.to_string()))?;

        let scale = self.scale();
        let pixmap = page
            .to_pixmap(
                &Matrix::new_scale(scale, scale),
                &Colorspace::device_rgb(),
                false,
                true,
            )
            .map_err(|e| render_error(e.to_string()))?;

        let dest_str = dest
            .to_str()
            .ok_or_else(|| render_error("invalid path encoding".into()))?;
        pixmap
            .save_as(dest_str, ImageFormat::PNG)
            .map_err(|e| render_error(e.to_string()))
    }
}
