//! `extract-bibitems` command

use std::fs;

use anyhow::{Context, Result};
use texpipe_core::{
    BatchCommand, Describe, FileContents, WorkItem, append_to_csv, clean_directory, find_files,
    read_file_tolerant,
};
use texpipe_store::{ArxivId, DataDir, StageName};

use crate::extractor::{Bibitem, extract_bibitems};

/// Source extensions searched for `\bibitem` entries.
const SOURCE_EXTENSIONS: &[&str] = &["tex", "bbl"];

/// Output file inside each paper's `bibitems` directory.
pub const RESULTS_FILE: &str = "bibitems.csv";

/// One readable source file of one paper.
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    pub arxiv_id: ArxivId,
    pub file: FileContents,
}

impl WorkItem for ExtractionTask {
    fn arxiv_id(&self) -> &ArxivId {
        &self.arxiv_id
    }
}

/// Extract bibliography entries from each paper's TeX sources.
#[derive(Debug, Clone)]
pub struct ExtractBibitems {
    data: DataDir,
}

impl ExtractBibitems {
    pub fn new(data: DataDir) -> Self {
        Self { data }
    }
}

impl Describe for ExtractBibitems {
    fn name(&self) -> &'static str {
        "extract-bibitems"
    }

    fn description(&self) -> &'static str {
        "Extract bibitems from TeX sources"
    }

    fn input_stage(&self) -> StageName {
        StageName::Sources
    }

    fn entity_type(&self) -> Option<&'static str> {
        Some("citations")
    }
}

impl BatchCommand for ExtractBibitems {
    type Item = ExtractionTask;
    type Output = Bibitem;

    fn load<'a>(
        &'a self,
        arxiv_ids: &'a [ArxivId],
    ) -> impl Iterator<Item = Result<ExtractionTask>> + 'a {
        arxiv_ids.iter().flat_map(move |arxiv_id| {
            let output_dir = self.data.stage_dir(StageName::Bibitems, arxiv_id);
            let cleaned = clean_directory(&output_dir);

            let sources_dir = self.data.stage_dir(StageName::Sources, arxiv_id);
            let paths = if cleaned.is_ok() {
                find_files(&sources_dir, SOURCE_EXTENSIONS)
            } else {
                Vec::new()
            };
            if cleaned.is_ok() && paths.is_empty() {
                log::debug!("{arxiv_id}: no .tex or .bbl files in {}", sources_dir.display());
            }

            cleaned
                .err()
                .map(Err)
                .into_iter()
                .chain(paths.into_iter().filter_map(move |path| {
                    read_file_tolerant(&path).map(|file| {
                        Ok(ExtractionTask {
                            arxiv_id: arxiv_id.clone(),
                            file,
                        })
                    })
                }))
        })
    }

    fn process(&self, item: &ExtractionTask) -> Result<impl Iterator<Item = Bibitem>> {
        Ok(extract_bibitems(&item.file.contents).into_iter())
    }

    fn save(&self, item: &ExtractionTask, result: Bibitem) -> Result<()> {
        log::debug!(
            "Extracted bibitem {} from {}",
            result.key,
            item.file.path.display()
        );
        let results_dir = self.data.stage_dir(StageName::Bibitems, &item.arxiv_id);
        fs::create_dir_all(&results_dir)
            .with_context(|| format!("failed to create {}", results_dir.display()))?;
        append_to_csv(&results_dir.join(RESULTS_FILE), &result)
    }
}
