//! `find-symbol-matches` command

use std::collections::BTreeSet;
use std::fs;

use anyhow::{Context, Result};
use texpipe_core::{BatchCommand, Describe, WorkItem, append_to_csv, clean_directory};
use texpipe_store::{ArxivId, DataDir, StageName};

use crate::matcher::{SymbolMatch, get_mathml_matches};
use crate::symbols::load_symbols;

/// Output file inside each paper's `symbol-matches` directory.
pub const RESULTS_FILE: &str = "matches.csv";

/// The distinct symbols of one paper.
#[derive(Debug, Clone)]
pub struct MathmlForPaper {
    pub arxiv_id: ArxivId,
    pub mathml_equations: BTreeSet<String>,
}

impl WorkItem for MathmlForPaper {
    fn arxiv_id(&self) -> &ArxivId {
        &self.arxiv_id
    }
}

#[derive(Debug, Clone)]
pub struct FindSymbolMatches {
    data: DataDir,
}

impl FindSymbolMatches {
    pub fn new(data: DataDir) -> Self {
        Self { data }
    }
}

impl Describe for FindSymbolMatches {
    fn name(&self) -> &'static str {
        "find-symbol-matches"
    }

    fn description(&self) -> &'static str {
        "Find matches between a symbol and all other symbols in each paper."
    }

    fn input_stage(&self) -> StageName {
        StageName::DetectedEquationTokens
    }

    fn entity_type(&self) -> Option<&'static str> {
        Some("symbols")
    }
}

impl BatchCommand for FindSymbolMatches {
    type Item = MathmlForPaper;
    type Output = SymbolMatch;

    fn load<'a>(
        &'a self,
        arxiv_ids: &'a [ArxivId],
    ) -> impl Iterator<Item = Result<MathmlForPaper>> + 'a {
        arxiv_ids.iter().filter_map(move |arxiv_id| {
            let output_dir = self.data.stage_dir(StageName::SymbolMatches, arxiv_id);
            if let Err(e) = clean_directory(&output_dir) {
                return Some(Err(e));
            }

            let symbols = load_symbols(&self.data, arxiv_id)?;
            Some(Ok(MathmlForPaper {
                arxiv_id: arxiv_id.clone(),
                mathml_equations: symbols.into_iter().map(|s| s.mathml).collect(),
            }))
        })
    }

    fn process(&self, item: &MathmlForPaper) -> Result<impl Iterator<Item = SymbolMatch>> {
        let matches = get_mathml_matches(item.mathml_equations.iter().map(String::as_str));
        Ok(matches.into_values().flatten())
    }

    fn save(&self, item: &MathmlForPaper, symbol_match: SymbolMatch) -> Result<()> {
        let results_dir = self.data.stage_dir(StageName::SymbolMatches, &item.arxiv_id);
        fs::create_dir_all(&results_dir)
            .with_context(|| format!("failed to create {}", results_dir.display()))?;
        append_to_csv(&results_dir.join(RESULTS_FILE), &symbol_match)
    }
}
