//! Batch command template
//!
//! A stage is a [`BatchCommand`]: `load` turns a set of papers into work
//! items, `process` turns one item into zero or more results, and `save`
//! persists one result. [`run_batch`] drives the three phases in order, one
//! item at a time:
//!
//! ```text
//! for item in load(ids):
//!     for result in process(item):
//!         save(item, result)
//! ```
//!
//! An error from `load` aborts the run. An error from `process` or `save`
//! fails only the current item: it is logged and counted, and the run moves
//! on. Results already saved for a failed item stay on disk.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use texpipe_store::{ArxivId, StageName};

use crate::progress::{ProgressContext, fmt_num};

/// Identity of a command, shown by the CLI and used in log lines.
pub trait Describe {
    /// Registry key, e.g. `extract-bibitems`.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Stage whose paper directories define the default set of papers.
    fn input_stage(&self) -> StageName;

    /// What the results are, for log lines (e.g. `citations`).
    fn entity_type(&self) -> Option<&'static str> {
        None
    }
}

/// A unit of input tied to one paper.
pub trait WorkItem {
    fn arxiv_id(&self) -> &ArxivId;
}

/// Three-phase pipeline stage.
pub trait BatchCommand: Describe {
    type Item: WorkItem;
    type Output;

    /// Lazily produce work items for `arxiv_ids`.
    ///
    /// Clears each paper's output directory before yielding its items. Papers
    /// with missing or unreadable input yield nothing.
    fn load<'a>(&'a self, arxiv_ids: &'a [ArxivId])
    -> impl Iterator<Item = Result<Self::Item>> + 'a;

    /// Transform one item into zero or more results.
    fn process(&self, item: &Self::Item) -> Result<impl Iterator<Item = Self::Output>>;

    /// Persist one result.
    fn save(&self, item: &Self::Item, result: Self::Output) -> Result<()>;
}

/// Object-safe handle over any [`BatchCommand`], for the command registry.
pub trait Command: Describe {
    fn execute(&self, arxiv_ids: &[ArxivId], progress: &ProgressContext) -> Result<Summary>;
}

impl<C: BatchCommand> Command for C {
    fn execute(&self, arxiv_ids: &[ArxivId], progress: &ProgressContext) -> Result<Summary> {
        run_batch(self, arxiv_ids, progress)
    }
}

/// Outcome of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub papers: usize,
    pub items: usize,
    pub results: usize,
    pub failed_items: usize,
    pub elapsed: Duration,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed_items == 0
    }
}

/// Run `command` over `arxiv_ids`.
pub fn run_batch<C: BatchCommand>(
    command: &C,
    arxiv_ids: &[ArxivId],
    progress: &ProgressContext,
) -> Result<Summary> {
    let start = Instant::now();
    let name = command.name();
    let entity = command.entity_type().unwrap_or("results");

    log::info!(
        "{name}: {} papers (input stage: {})",
        fmt_num(arxiv_ids.len()),
        command.input_stage()
    );

    let line = progress.stage_line(name);
    let mut summary = Summary {
        papers: arxiv_ids.len(),
        ..Default::default()
    };

    for item in command.load(arxiv_ids) {
        let item = item.with_context(|| format!("{name}: failed to load work items"))?;
        summary.items += 1;
        line.set_message(item.arxiv_id().to_string());

        match process_item(command, &item) {
            Ok(count) => {
                summary.results += count;
                log::debug!("{name}: {}: {count} {entity}", item.arxiv_id());
            }
            Err(e) => {
                summary.failed_items += 1;
                log::error!("{name}: {}: {e:#}", item.arxiv_id());
            }
        }
        line.inc(1);
    }

    line.finish_and_clear();
    summary.elapsed = start.elapsed();

    log::info!("=== {name} Summary ===");
    log::info!(
        "Items: {} from {} papers ({} failed)",
        fmt_num(summary.items),
        fmt_num(summary.papers),
        fmt_num(summary.failed_items)
    );
    log::info!("{}: {}", capitalize(entity), fmt_num(summary.results));
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}

fn process_item<C: BatchCommand>(command: &C, item: &C::Item) -> Result<usize> {
    let mut count = 0;
    for result in command.process(item)? {
        command.save(item, result)?;
        count += 1;
    }
    Ok(count)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Task {
        arxiv_id: ArxivId,
        words: &'static str,
    }

    impl WorkItem for Task {
        fn arxiv_id(&self) -> &ArxivId {
            &self.arxiv_id
        }
    }

    /// Splits text into words; fails on items containing "boom".
    #[derive(Default)]
    struct Words {
        saved: RefCell<Vec<(String, String)>>,
        fail_load: bool,
    }

    impl Describe for Words {
        fn name(&self) -> &'static str {
            "split-words"
        }

        fn description(&self) -> &'static str {
            "Split text into words"
        }

        fn input_stage(&self) -> StageName {
            StageName::Sources
        }

        fn entity_type(&self) -> Option<&'static str> {
            Some("words")
        }
    }

    impl BatchCommand for Words {
        type Item = Task;
        type Output = String;

        fn load<'a>(
            &'a self,
            arxiv_ids: &'a [ArxivId],
        ) -> impl Iterator<Item = Result<Task>> + 'a {
            arxiv_ids.iter().map(move |id| {
                if self.fail_load {
                    anyhow::bail!("cannot clean output for {id}");
                }
                let words = match id.as_str() {
                    "bad" => "boom",
                    "empty" => "",
                    _ => "alpha beta",
                };
                Ok(Task {
                    arxiv_id: id.clone(),
                    words,
                })
            })
        }

        fn process(&self, item: &Task) -> Result<impl Iterator<Item = String>> {
            if item.words.contains("boom") {
                anyhow::bail!("extractor exploded");
            }
            Ok(item.words.split_whitespace().map(String::from))
        }

        fn save(&self, item: &Task, result: String) -> Result<()> {
            self.saved
                .borrow_mut()
                .push((item.arxiv_id.to_string(), result));
            Ok(())
        }
    }

    fn ids(raw: &[&str]) -> Vec<ArxivId> {
        raw.iter().map(|s| ArxivId::new(*s)).collect()
    }

    #[test]
    fn saves_in_production_order() {
        let cmd = Words::default();
        let summary = run_batch(&cmd, &ids(&["1", "2"]), &ProgressContext::hidden()).unwrap();

        assert_eq!(summary.papers, 2);
        assert_eq!(summary.items, 2);
        assert_eq!(summary.results, 4);
        assert!(summary.is_success());
        assert_eq!(
            *cmd.saved.borrow(),
            vec![
                ("1".into(), "alpha".into()),
                ("1".into(), "beta".into()),
                ("2".into(), "alpha".into()),
                ("2".into(), "beta".into()),
            ]
        );
    }

    #[test]
    fn process_failure_skips_only_that_item() {
        let cmd = Words::default();
        let summary =
            run_batch(&cmd, &ids(&["1", "bad", "2"]), &ProgressContext::hidden()).unwrap();

        assert_eq!(summary.items, 3);
        assert_eq!(summary.failed_items, 1);
        assert_eq!(summary.results, 4);
        assert!(!summary.is_success());
        assert!(cmd.saved.borrow().iter().all(|(id, _)| id != "bad"));
    }

    #[test]
    fn zero_results_is_not_a_failure() {
        let cmd = Words::default();
        let summary = run_batch(&cmd, &ids(&["empty"]), &ProgressContext::hidden()).unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.results, 0);
        assert!(summary.is_success());
    }

    #[test]
    fn load_failure_aborts() {
        let cmd = Words {
            fail_load: true,
            ..Default::default()
        };
        let err = run_batch(&cmd, &ids(&["1"]), &ProgressContext::hidden()).unwrap_err();
        assert!(format!("{err:#}").contains("cannot clean output for 1"));
        assert!(cmd.saved.borrow().is_empty());
    }

    #[test]
    fn boxed_command_runs_through_registry_handle() {
        let cmd: Box<dyn Command> = Box::new(Words::default());
        assert_eq!(cmd.name(), "split-words");
        assert_eq!(cmd.input_stage(), StageName::Sources);
        let summary = cmd
            .execute(&ids(&["1"]), &ProgressContext::hidden())
            .unwrap();
        assert_eq!(summary.results, 2);
    }

    #[test]
    fn capitalize_entity() {
        assert_eq!(capitalize("citations"), "Citations");
        assert_eq!(capitalize(""), "");
    }
}
