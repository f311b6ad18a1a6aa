//! `texpipe run` - run one pipeline command over a set of papers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use texpipe_core::{Describe, ProgressContext, Summary, fmt_num};
use texpipe_store::ArxivId;

use crate::registry::{self, Settings};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command to run (see `texpipe commands`)
    pub command: String,

    /// File with one arXiv id per line (`#` starts a comment)
    #[arg(long)]
    pub arxiv_ids: Option<PathBuf>,

    /// arXiv id to process; repeatable
    #[arg(long = "arxiv-id")]
    pub arxiv_id: Vec<String>,
}

pub fn run(args: RunArgs, settings: &Settings, progress: &ProgressContext) -> Result<()> {
    let entry = registry::find(&args.command).with_context(|| {
        format!(
            "unknown command '{}' (available: {})",
            args.command,
            registry::names().join(", ")
        )
    })?;
    let command = entry.build(settings);

    let mut arxiv_ids = match &args.arxiv_ids {
        Some(path) => read_arxiv_ids(path)?,
        None => Vec::new(),
    };
    arxiv_ids.extend(args.arxiv_id.into_iter().map(ArxivId::new));

    if arxiv_ids.is_empty() {
        let stage = command.input_stage();
        arxiv_ids = settings.data.list_arxiv_ids(stage)?;
        progress.println(format!(
            "Found {} papers in {}",
            fmt_num(arxiv_ids.len()),
            settings.data.stage_root(stage).display()
        ));
    }

    let summary = command.execute(&arxiv_ids, progress)?;
    print_summary(command.name(), &summary);

    if !summary.is_success() {
        anyhow::bail!("{} of {} items failed", summary.failed_items, summary.items);
    }
    Ok(())
}

/// Read arXiv ids from a file, one per line, skipping blank lines and `#`
/// comments.
pub fn read_arxiv_ids(path: &Path) -> Result<Vec<ArxivId>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read arXiv ids from {}", path.display()))?;
    Ok(parse_arxiv_ids(&content))
}

fn parse_arxiv_ids(content: &str) -> Vec<ArxivId> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(ArxivId::new)
        .collect()
}

fn print_summary(title: &str, summary: &Summary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table.add_row(vec![
        Cell::new("Items"),
        Cell::new(format!(
            "{} from {} papers ({} failed)",
            fmt_num(summary.items),
            fmt_num(summary.papers),
            fmt_num(summary.failed_items)
        )),
    ]);
    table.add_row(vec![Cell::new("Results"), Cell::new(fmt_num(summary.results))]);
    table.add_row(vec![
        Cell::new("Time"),
        Cell::new(format!("{:.1}s", summary.elapsed.as_secs_f64())),
    ]);
    eprintln!("\n{table}");
}
