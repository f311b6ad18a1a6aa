//! texpipe-bibitems: Bibliography extraction from TeX sources
//!
//! Finds `\bibitem` entries in `.tex` and `.bbl` files and writes one CSV
//! row (`key,text`) per entry to the paper's `bibitems` directory.

pub mod command;
pub mod extractor;

pub use command::{ExtractBibitems, ExtractionTask};
pub use extractor::{Bibitem, extract_bibitems, to_plain_text};
