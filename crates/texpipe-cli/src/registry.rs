//! Registered commands, by name

use texpipe_bibitems::ExtractBibitems;
use texpipe_core::Command;
use texpipe_raster::{MupdfRasterizer, RasterPages, RasterSource};
use texpipe_store::DataDir;
use texpipe_symbols::FindSymbolMatches;

/// What commands are built from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data: DataDir,
    pub dpi: u32,
}

pub struct CommandEntry {
    pub name: &'static str,
    build: fn(&Settings) -> Box<dyn Command>,
}

impl CommandEntry {
    pub fn build(&self, settings: &Settings) -> Box<dyn Command> {
        (self.build)(settings)
    }
}

/// Every command the CLI can run, in pipeline order.
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "extract-bibitems",
        build: |s| Box::new(ExtractBibitems::new(s.data.clone())),
    },
    CommandEntry {
        name: "raster-pages",
        build: |s| {
            Box::new(RasterPages::new(
                s.data.clone(),
                RasterSource::Plain,
                MupdfRasterizer::new(s.dpi),
            ))
        },
    },
    CommandEntry {
        name: "raster-pages-with-colorized-citations",
        build: |s| {
            Box::new(RasterPages::new(
                s.data.clone(),
                RasterSource::ColorizedCitations,
                MupdfRasterizer::new(s.dpi),
            ))
        },
    },
    CommandEntry {
        name: "find-symbol-matches",
        build: |s| Box::new(FindSymbolMatches::new(s.data.clone())),
    },
];

pub fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

pub fn names() -> Vec<&'static str> {
    COMMANDS.iter().map(|entry| entry.name).collect()
}
