//! `raster-pages` and `raster-pages-with-colorized-citations` commands

use std::fs;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use texpipe_core::{BatchCommand, Describe, WorkItem, clean_directory, read_csv};
use texpipe_store::{ArxivId, DataDir, StageName};

use crate::rasterizer::Rasterizer;

/// Directory written by the TeX compiler inside each compiled paper.
const COMPILATION_RESULTS_DIR: &str = "compilation_results";
/// Compilation outcome marker; `True` means the paper compiled.
const RESULT_FILE: &str = "result";
/// Rows of `<source file>,<pdf path relative to the paper directory>`.
const PDF_NAMES_FILE: &str = "pdf_names.csv";

/// One compiled PDF of one paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPath {
    pub arxiv_id: ArxivId,
    pub relative_path: String,
}

impl WorkItem for PdfPath {
    fn arxiv_id(&self) -> &ArxivId {
        &self.arxiv_id
    }
}

/// Which compiled papers to raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterSource {
    /// Papers as written.
    Plain,
    /// Papers recompiled with colorized citations.
    ColorizedCitations,
}

impl RasterSource {
    pub fn input_stage(self) -> StageName {
        match self {
            Self::Plain => StageName::CompiledSources,
            Self::ColorizedCitations => StageName::CompiledSourcesWithColorizedCitations,
        }
    }

    pub fn output_stage(self) -> StageName {
        match self {
            Self::Plain => StageName::PaperImages,
            Self::ColorizedCitations => StageName::PaperWithColorizedCitationsImages,
        }
    }
}

/// Render every page of every compiled PDF to `page-<index>.png`.
#[derive(Debug, Clone)]
pub struct RasterPages<R> {
    data: DataDir,
    source: RasterSource,
    rasterizer: R,
}

impl<R: Rasterizer> RasterPages<R> {
    pub fn new(data: DataDir, source: RasterSource, rasterizer: R) -> Self {
        Self {
            data,
            source,
            rasterizer,
        }
    }

    /// PDFs of one paper, after clearing its output directory.
    ///
    /// Papers that did not compile, or whose compilation results cannot be
    /// read, have no PDFs. Only a failure to clear the output is an error.
    fn load_paper(&self, arxiv_id: &ArxivId) -> Result<Vec<PdfPath>> {
        clean_directory(&self.data.stage_dir(self.source.output_stage(), arxiv_id))?;

        let results_dir = self
            .data
            .stage_dir(self.source.input_stage(), arxiv_id)
            .join(COMPILATION_RESULTS_DIR);
        if !compiled_successfully(&results_dir.join(RESULT_FILE)) {
            log::debug!("{arxiv_id}: not compiled, skipping");
            return Ok(Vec::new());
        }

        let rows: Vec<Vec<String>> = match read_csv(&results_dir.join(PDF_NAMES_FILE)) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("{arxiv_id}: {e:#}");
                return Ok(Vec::new());
            }
        };

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let Some(relative_path) = row.into_iter().nth(1) else {
                    log::warn!("{arxiv_id}: {PDF_NAMES_FILE} row without a PDF path");
                    return None;
                };
                if !stays_inside(Path::new(&relative_path)) {
                    log::warn!(
                        "{arxiv_id}: {PDF_NAMES_FILE} path '{relative_path}' is not inside the paper directory"
                    );
                    return None;
                }
                Some(PdfPath {
                    arxiv_id: arxiv_id.clone(),
                    relative_path,
                })
            })
            .collect())
    }
}

fn compiled_successfully(marker: &Path) -> bool {
    fs::read_to_string(marker).is_ok_and(|result| result.trim() == "True")
}

/// Non-empty, relative, and without `..` components.
fn stays_inside(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl<R: Rasterizer> Describe for RasterPages<R> {
    fn name(&self) -> &'static str {
        match self.source {
            RasterSource::Plain => "raster-pages",
            RasterSource::ColorizedCitations => "raster-pages-with-colorized-citations",
        }
    }

    fn description(&self) -> &'static str {
        match self.source {
            RasterSource::Plain => "Raster images of pages from the un-colorized papers.",
            RasterSource::ColorizedCitations => {
                "Raster images of pages from papers with colorized citations."
            }
        }
    }

    fn input_stage(&self) -> StageName {
        self.source.input_stage()
    }

    fn entity_type(&self) -> Option<&'static str> {
        Some("documents")
    }
}

impl<R: Rasterizer> BatchCommand for RasterPages<R> {
    type Item = PdfPath;
    type Output = R::Document;

    fn load<'a>(
        &'a self,
        arxiv_ids: &'a [ArxivId],
    ) -> impl Iterator<Item = Result<PdfPath>> + 'a {
        arxiv_ids
            .iter()
            .flat_map(move |arxiv_id| match self.load_paper(arxiv_id) {
                Ok(paths) => paths.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
    }

    fn process(&self, item: &PdfPath) -> Result<impl Iterator<Item = R::Document>> {
        let path = self
            .data
            .stage_dir(self.source.input_stage(), &item.arxiv_id)
            .join(&item.relative_path);
        let document = self
            .rasterizer
            .open(&path)
            .with_context(|| format!("{}", path.display()))?;
        Ok(std::iter::once(document))
    }

    fn save(&self, item: &PdfPath, document: R::Document) -> Result<()> {
        let dest_dir = self
            .data
            .stage_dir(self.source.output_stage(), &item.arxiv_id)
            .join(&item.relative_path);
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("failed to create {}", dest_dir.display()))?;

        let pages = self.rasterizer.page_count(&document)?;
        for index in 0..pages {
            let dest = dest_dir.join(format!("page-{index}.png"));
            self.rasterizer
                .write_page_png(&document, index, &dest)
                .with_context(|| format!("{}", item.relative_path))?;
        }
        log::debug!("{}: {pages} pages of {}", item.arxiv_id, item.relative_path);
        Ok(())
    }
}
