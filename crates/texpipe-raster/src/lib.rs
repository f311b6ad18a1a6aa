//! texpipe-raster: Page images of compiled papers
//!
//! Renders every page of every PDF a paper compiled to. Rendering sits behind
//! the [`Rasterizer`] trait; the MuPDF backend is enabled by the default
//! `mupdf` feature.

#[cfg(feature = "mupdf")]
pub mod backend;
pub mod command;
pub mod rasterizer;

#[cfg(feature = "mupdf")]
pub use backend::MupdfRasterizer;
pub use command::{PdfPath, RasterPages, RasterSource};
pub use rasterizer::{DEFAULT_DPI, RasterError, Rasterizer};
