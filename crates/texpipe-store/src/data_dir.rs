//! Data directory rooted at a single base path
//!
//! Directory layout:
//! ```text
//! {root}/
//! ├── 01-sources-archives/
//! ├── 02-sources/
//! │   ├── 1601.00978/            # one directory per paper
//! │   └── hep-th__9901001/       # '/' replaced by "__"
//! ├── 03-compiled-sources/
//! │   └── {paper}/compilation_results/{result,pdf_names.csv}
//! ├── 05-bibitems/{paper}/bibitems.csv
//! ├── 09-symbol-matches/{paper}/matches.csv
//! └── ...
//! ```
//!
//! No locking is performed. Two runs of the same stage over the same papers
//! race between clearing a paper directory and writing into it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::arxiv_id::ArxivId;
use crate::stage::StageName;

/// Per-stage listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: StageName,
    pub path: PathBuf,
    pub exists: bool,
    pub paper_count: usize,
}

/// Root of all stage directories. Cheap to clone; pass it to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every paper's output for `stage`.
    pub fn stage_root(&self, stage: StageName) -> PathBuf {
        self.root.join(stage.dir_name())
    }

    /// Directory holding one paper's output for `stage`.
    pub fn stage_dir(&self, stage: StageName, arxiv_id: &ArxivId) -> PathBuf {
        self.stage_root(stage).join(arxiv_id.dir_name())
    }

    /// Papers that have a directory under `stage`, sorted.
    ///
    /// A stage that has never run has no root directory; that is an empty
    /// list, not an error.
    pub fn list_arxiv_ids(&self, stage: StageName) -> Result<Vec<ArxivId>> {
        let stage_root = self.stage_root(stage);
        if !stage_root.exists() {
            log::debug!("{}: no directory at {}", stage, stage_root.display());
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&stage_root)
            .with_context(|| format!("failed to list {}", stage_root.display()))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            ids.push(ArxivId::from_dir_name(&name));
        }

        ids.sort();
        Ok(ids)
    }

    /// Stage directories with the number of papers each holds.
    pub fn summarize(&self) -> Result<Vec<StageSummary>> {
        StageName::ALL
            .into_iter()
            .map(|stage| -> Result<StageSummary> {
                let path = self.stage_root(stage);
                let exists = path.is_dir();
                let paper_count = if exists {
                    self.list_arxiv_ids(stage)?.len()
                } else {
                    0
                };
                Ok(StageSummary {
                    stage,
                    path,
                    exists,
                    paper_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stage_dir_joins_root_stage_and_normalized_id() {
        let data = DataDir::new("/data");
        let id = ArxivId::new("hep-th/9901001");
        assert_eq!(
            data.stage_dir(StageName::Bibitems, &id),
            PathBuf::from("/data/05-bibitems/hep-th__9901001")
        );
        assert_eq!(
            data.stage_root(StageName::Sources),
            PathBuf::from("/data/02-sources")
        );
    }

    #[test]
    fn slash_id_produces_creatable_path() {
        let dir = TempDir::new().unwrap();
        let data = DataDir::new(dir.path());
        let id = ArxivId::new("math.AG/0601001");

        let path = data.stage_dir(StageName::SymbolMatches, &id);
        fs::create_dir_all(&path).unwrap();

        assert!(path.is_dir());
        assert_eq!(path.parent().unwrap(), data.stage_root(StageName::SymbolMatches));
        assert_eq!(data.list_arxiv_ids(StageName::SymbolMatches).unwrap(), vec![id]);
    }

    #[test]
    fn list_arxiv_ids_missing_stage_is_empty() {
        let dir = TempDir::new().unwrap();
        let data = DataDir::new(dir.path());
        assert!(data.list_arxiv_ids(StageName::Sources).unwrap().is_empty());
    }

    #[test]
    fn list_arxiv_ids_sorted_and_skips_files() {
        let dir = TempDir::new().unwrap();
        let data = DataDir::new(dir.path());
        let root = data.stage_root(StageName::Sources);
        fs::create_dir_all(root.join("2001.00002")).unwrap();
        fs::create_dir_all(root.join("cs__0112017")).unwrap();
        fs::create_dir_all(root.join("1601.00978")).unwrap();
        fs::write(root.join("README"), "not a paper").unwrap();

        let ids = data.list_arxiv_ids(StageName::Sources).unwrap();
        let ids: Vec<&str> = ids.iter().map(ArxivId::as_str).collect();
        assert_eq!(ids, vec!["1601.00978", "2001.00002", "cs/0112017"]);
    }

    #[test]
    fn summarize_counts_papers() {
        let dir = TempDir::new().unwrap();
        let data = DataDir::new(dir.path());
        fs::create_dir_all(data.stage_dir(StageName::Bibitems, &ArxivId::new("a"))).unwrap();
        fs::create_dir_all(data.stage_dir(StageName::Bibitems, &ArxivId::new("b"))).unwrap();

        let summary = data.summarize().unwrap();
        assert_eq!(summary.len(), StageName::ALL.len());

        let bibitems = summary
            .iter()
            .find(|s| s.stage == StageName::Bibitems)
            .unwrap();
        assert!(bibitems.exists);
        assert_eq!(bibitems.paper_count, 2);

        let sources = summary
            .iter()
            .find(|s| s.stage == StageName::Sources)
            .unwrap();
        assert!(!sources.exists);
        assert_eq!(sources.paper_count, 0);
    }
}
