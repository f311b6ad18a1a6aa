//! `texpipe stages` - list stage directories and their papers

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use texpipe_core::fmt_num;
use texpipe_store::DataDir;

#[derive(Args, Debug)]
pub struct StagesArgs {
    /// Data directory (default: from config)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

pub fn run(data: &DataDir) -> Result<()> {
    let stages = data.summarize()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Directory").fg(Color::Cyan),
            Cell::new("Papers").fg(Color::Cyan),
        ]);

    for stage in &stages {
        let papers = if stage.exists {
            Cell::new(fmt_num(stage.paper_count))
        } else {
            Cell::new("missing").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(stage.stage),
            Cell::new(stage.stage.dir_name()),
            papers,
        ]);
    }

    eprintln!("\n{table}");
    eprintln!("Data directory: {}", data.root().display());
    Ok(())
}
