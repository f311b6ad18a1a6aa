//! `texpipe commands` - list registered commands

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use texpipe_core::Describe;

use crate::registry::{COMMANDS, Settings};

pub fn run(settings: &Settings) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Command").fg(Color::Cyan),
            Cell::new("Input stage").fg(Color::Cyan),
            Cell::new("Results").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
        ]);

    for entry in COMMANDS {
        let command = entry.build(settings);
        table.add_row(vec![
            Cell::new(command.name()),
            Cell::new(command.input_stage().dir_name()),
            Cell::new(command.entity_type().unwrap_or("-")),
            Cell::new(command.description()),
        ]);
    }

    eprintln!("\n{table}");
}
