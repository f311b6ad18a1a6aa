//! Detected symbols of one paper

use serde::{Deserialize, Serialize};
use texpipe_core::read_csv;
use texpipe_store::{ArxivId, DataDir, StageName};

/// File inside each paper's `detected-equation-tokens` directory.
pub const SYMBOLS_FILE: &str = "symbols.csv";

/// One row of `symbols.csv`. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// TeX file the equation was found in, relative to the sources directory.
    pub tex_path: String,
    pub equation_index: usize,
    pub symbol_index: usize,
    pub mathml: String,
}

/// Load the symbols detected for `arxiv_id`.
///
/// Returns `None` when the paper has no symbols file or the file cannot be
/// parsed; either way the paper has nothing to match.
pub fn load_symbols(data: &DataDir, arxiv_id: &ArxivId) -> Option<Vec<SymbolRecord>> {
    let path = data
        .stage_dir(StageName::DetectedEquationTokens, arxiv_id)
        .join(SYMBOLS_FILE);
    if !path.is_file() {
        log::debug!("{arxiv_id}: no symbols at {}", path.display());
        return None;
    }

    match read_csv(&path) {
        Ok(symbols) => Some(symbols),
        Err(e) => {
            log::warn!("{arxiv_id}: skipping unreadable symbols: {e:#}");
            None
        }
    }
}
